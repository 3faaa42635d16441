// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! In-place gate kernels over the amplitude vector.
//!
//! Every kernel walks the vector in blocks of `2 * stride` where
//! `stride = 1 << qubit`: inside one block the first `stride` entries have
//! the target bit clear and the next `stride` entries have it set, so the
//! pair `(i, i + stride)` enumerates exactly the amplitudes that differ in
//! the target bit. Blocks never overlap, which makes the outer loop safe to
//! hand to rayon unchanged; the parallel path is bit-identical to the
//! serial one.


use crate::{PARALLEL_THRESHOLD_QUBITS, QubitID};
use nalgebra::Matrix2;
use num_complex::Complex64;
use rayon::prelude::*;

fn run_parallel(len: usize) -> bool {
    len >= 1 << PARALLEL_THRESHOLD_QUBITS
}

/// Applies the 2×2 unitary `m` to `qubit`, in place.
///
/// This is the hot kernel: every named single-qubit gate reduces to it.
pub fn apply_single_qubit(state: &mut [Complex64], m: &Matrix2<Complex64>, qubit: QubitID) {
    let stride = 1usize << qubit;
    let span = stride << 1;
    assert!(span <= state.len(), "qubit {qubit} out of range");
    let (m00, m01, m10, m11) = (m[(0, 0)], m[(0, 1)], m[(1, 0)], m[(1, 1)]);

    let update = move |block: &mut [Complex64]| {
        let (zeros, ones) = block.split_at_mut(stride);
        for (a0, a1) in zeros.iter_mut().zip(ones.iter_mut()) {
            let (in0, in1) = (*a0, *a1);
            *a0 = m00 * in0 + m01 * in1;
            *a1 = m10 * in0 + m11 * in1;
        }
    };

    if run_parallel(state.len()) {
        state.par_chunks_exact_mut(span).for_each(update);
    } else {
        state.chunks_exact_mut(span).for_each(update);
    }
}

/// Swaps the pair `(i, i + 1 << target)` for every `i` whose `control` bit
/// is set and whose `target` bit is clear.
pub fn controlled_not(state: &mut [Complex64], control: QubitID, target: QubitID) {
    assert_ne!(control, target, "control and target must differ");
    let stride = 1usize << target;
    let span = stride << 1;
    assert!(span <= state.len() && (1 << control) < state.len(), "qubit out of range");
    let control_mask = 1usize << control;

    let update = move |(block, chunk): (usize, &mut [Complex64])| {
        let base = block * span;
        let (zeros, ones) = chunk.split_at_mut(stride);
        for i in 0..stride {
            if (base + i) & control_mask != 0 {
                std::mem::swap(&mut zeros[i], &mut ones[i]);
            }
        }
    };

    if run_parallel(state.len()) {
        state.par_chunks_exact_mut(span).enumerate().for_each(update);
    } else {
        state.chunks_exact_mut(span).enumerate().for_each(update);
    }
}

/// Toffoli kernel: swaps the target-bit pair for every index with both
/// control bits set.
pub fn controlled_controlled_not(
    state: &mut [Complex64],
    control1: QubitID,
    control2: QubitID,
    target: QubitID,
) {
    assert!(
        control1 != control2 && control1 != target && control2 != target,
        "control and target qubits must be distinct"
    );
    let stride = 1usize << target;
    let span = stride << 1;
    assert!(span <= state.len() && (1 << control1.max(control2)) < state.len(), "qubit out of range");
    let controls = (1usize << control1) | (1usize << control2);

    let update = move |(block, chunk): (usize, &mut [Complex64])| {
        let base = block * span;
        let (zeros, ones) = chunk.split_at_mut(stride);
        for i in 0..stride {
            if (base + i) & controls == controls {
                std::mem::swap(&mut zeros[i], &mut ones[i]);
            }
        }
    };

    if run_parallel(state.len()) {
        state.par_chunks_exact_mut(span).enumerate().for_each(update);
    } else {
        state.chunks_exact_mut(span).enumerate().for_each(update);
    }
}

/// Multiplies by `factor` every amplitude whose `control` and `target` bits
/// are both set.
pub fn controlled_phase(
    state: &mut [Complex64],
    control: QubitID,
    target: QubitID,
    factor: Complex64,
) {
    assert_ne!(control, target, "control and target must differ");
    let stride = 1usize << target;
    let span = stride << 1;
    assert!(span <= state.len() && (1 << control) < state.len(), "qubit out of range");
    let control_mask = 1usize << control;

    let update = move |(block, chunk): (usize, &mut [Complex64])| {
        let base = block * span;
        let ones = &mut chunk[stride..];
        for (i, a) in ones.iter_mut().enumerate() {
            if (base + stride + i) & control_mask != 0 {
                *a *= factor;
            }
        }
    };

    if run_parallel(state.len()) {
        state.par_chunks_exact_mut(span).enumerate().for_each(update);
    } else {
        state.chunks_exact_mut(span).enumerate().for_each(update);
    }
}

/// Probability of reading `1` on `qubit`: `Σ |aᵢ|²` over indices whose
/// `qubit` bit is set.
#[must_use]
pub fn probability_of_one(state: &[Complex64], qubit: QubitID) -> f64 {
    let stride = 1usize << qubit;
    let span = stride << 1;
    assert!(span <= state.len(), "qubit {qubit} out of range");

    let block_sum =
        move |block: &[Complex64]| -> f64 { block[stride..].iter().map(Complex64::norm_sqr).sum() };

    if run_parallel(state.len()) {
        state.par_chunks_exact(span).map(block_sum).sum()
    } else {
        state.chunks_exact(span).map(block_sum).sum()
    }
}

/// Zeroes every amplitude whose `qubit` bit disagrees with `outcome` and
/// returns the squared norm of the surviving amplitudes.
pub fn project(state: &mut [Complex64], qubit: QubitID, outcome: bool) -> f64 {
    let stride = 1usize << qubit;
    let span = stride << 1;
    assert!(span <= state.len(), "qubit {qubit} out of range");

    let update = move |block: &mut [Complex64]| -> f64 {
        let (zeros, ones) = block.split_at_mut(stride);
        let (kept, dropped) = if outcome { (ones, zeros) } else { (zeros, ones) };
        dropped.fill(Complex64::ZERO);
        kept.iter().map(Complex64::norm_sqr).sum()
    };

    if run_parallel(state.len()) {
        state.par_chunks_exact_mut(span).map(update).sum()
    } else {
        state.chunks_exact_mut(span).map(update).sum()
    }
}

/// Divides every amplitude by `√norm_sqr`, restoring unit norm after a
/// projection. The caller is responsible for `norm_sqr` being nonzero.
pub fn renormalize(state: &mut [Complex64], norm_sqr: f64) {
    let norm = norm_sqr.sqrt();
    if run_parallel(state.len()) {
        state.par_iter_mut().for_each(|a| *a /= norm);
    } else {
        state.iter_mut().for_each(|a| *a /= norm);
    }
}
