// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The quantum register: amplitude storage plus the classical shadow state
//! (measurement predictions, realized measurement bits, shot-averaging
//! counters) and the run's PRNG.


use crate::{Error, MAX_QUBITS, NORM_TOLERANCE, QubitID, buffer::AmplitudeBuffer};
use num_complex::Complex64;
use num_traits::Zero as _;
use rand::{Rng as _, SeedableRng as _, rngs::StdRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Tri-state classical shadow of a qubit: whether it is statically known to
/// be in a computational basis state. Not a quantum observable; control
/// gates use it to short-circuit and diagnostic dumps display it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Prediction {
    Zero,
    One,
    Unknown,
}

impl Prediction {
    /// The prediction after a classical flip. Flipping `Unknown` stays
    /// `Unknown`.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Zero => Self::One,
            Self::One => Self::Zero,
            Self::Unknown => Self::Unknown,
        }
    }
}

impl From<bool> for Prediction {
    fn from(bit: bool) -> Self {
        if bit { Self::One } else { Self::Zero }
    }
}

/// Per-qubit counters accumulated across repeated executions for shot-based
/// measurement statistics.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasurementAverage {
    pub ground: u64,
    pub excited: u64,
}

/// An N-qubit register: the `2^N` amplitude vector, a same-shaped scratch
/// vector, the per-qubit classical arrays, and a deterministic-seeded PRNG.
pub struct QuantumRegister {
    qubits: usize,
    state: AmplitudeBuffer,
    scratch: AmplitudeBuffer,
    prediction: Vec<Prediction>,
    measurement: Vec<bool>,
    averaging: Vec<MeasurementAverage>,
    averaging_enabled: bool,
    rng: StdRng,
}

impl QuantumRegister {
    /// Creates a register of `qubits` qubits in the `|0…0⟩` state, seeding
    /// the PRNG from the wall clock.
    pub fn new(qubits: usize) -> Result<Self, Error> {
        Self::new_with_seed(qubits, clock_seed())
    }

    /// Creates a register of `qubits` qubits in the `|0…0⟩` state with an
    /// explicit PRNG seed, so that measurement and noise trajectories are
    /// reproducible.
    pub fn new_with_seed(qubits: usize, seed: u64) -> Result<Self, Error> {
        assert!(qubits > 0, "a register needs at least one qubit");
        if qubits > MAX_QUBITS {
            return Err(Error::TooManyQubits { qubits });
        }
        let states = 1usize << qubits;
        let mut state = AmplitudeBuffer::new(states)?;
        let scratch = AmplitudeBuffer::new(states)?;
        state[0] = Complex64::ONE;
        Ok(Self {
            qubits,
            state,
            scratch,
            prediction: vec![Prediction::Zero; qubits],
            measurement: vec![false; qubits],
            averaging: vec![MeasurementAverage::default(); qubits],
            averaging_enabled: true,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    /// Restores the `|0…0⟩` state without reseeding the PRNG. The averaging
    /// counters are preserved; see [`Self::clear_averaging`].
    pub fn reset(&mut self) {
        self.state.fill_zero();
        self.state[0] = Complex64::ONE;
        self.prediction.fill(Prediction::Zero);
        self.measurement.fill(false);
    }

    #[must_use]
    pub fn num_qubits(&self) -> usize {
        self.qubits
    }

    /// Number of basis states, `2^N`.
    #[must_use]
    pub fn num_states(&self) -> usize {
        1 << self.qubits
    }

    #[must_use]
    pub fn state(&self) -> &[Complex64] {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut [Complex64] {
        &mut self.state
    }

    /// The auxiliary vector for kernels that cannot work purely in place.
    /// Contents between gates are undefined.
    #[must_use]
    pub fn scratch(&self) -> &[Complex64] {
        &self.scratch
    }

    pub fn scratch_mut(&mut self) -> &mut [Complex64] {
        &mut self.scratch
    }

    /// Swaps the state vector with the scratch vector, committing a result
    /// computed out of place.
    pub fn swap_with_scratch(&mut self) {
        std::mem::swap(&mut self.state, &mut self.scratch);
    }

    /// Draws a uniform double in `[0, 1)`.
    pub fn random(&mut self) -> f64 {
        self.rng.gen_range(0.0..1.0)
    }

    /// True iff the squared norm is within [`NORM_TOLERANCE`] of one.
    #[must_use]
    pub fn check(&self) -> bool {
        (self.state.norm_sqr() - 1.0).abs() < NORM_TOLERANCE
    }

    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        self.state.norm_sqr()
    }

    pub fn normalize(&mut self) -> Result<(), Error> {
        self.state.normalize()
    }

    #[must_use]
    pub fn prediction(&self, qubit: QubitID) -> Prediction {
        self.prediction[qubit]
    }

    pub fn set_prediction(&mut self, qubit: QubitID, value: Prediction) {
        self.prediction[qubit] = value;
    }

    pub fn flip_prediction(&mut self, qubit: QubitID) {
        self.prediction[qubit] = self.prediction[qubit].flipped();
    }

    #[must_use]
    pub fn measurement(&self, qubit: QubitID) -> bool {
        self.measurement[qubit]
    }

    pub fn set_measurement(&mut self, qubit: QubitID, value: bool) {
        self.measurement[qubit] = value;
    }

    pub fn flip_measurement(&mut self, qubit: QubitID) {
        self.measurement[qubit] = !self.measurement[qubit];
    }

    /// Collapses the register onto the basis state `basis`: all other
    /// amplitudes are zeroed and the classical arrays are set from the
    /// binary decomposition of `basis` (bit `q` is the value of qubit `q`).
    pub fn collapse(&mut self, basis: usize) {
        assert!(basis < self.num_states(), "basis state out of range");
        self.state.fill_zero();
        self.state[basis] = Complex64::ONE;
        for qubit in 0..self.qubits {
            let bit = (basis >> qubit) & 1 == 1;
            self.prediction[qubit] = bit.into();
            self.measurement[qubit] = bit;
        }
    }

    /// Register-wide projective measurement: draws once, scans the
    /// cumulative distribution in index order and collapses onto the first
    /// basis state where the running sum reaches the draw. Returns the
    /// sampled basis state.
    pub fn measure_register(&mut self) -> usize {
        let f = self.random();
        let mut sum = 0.0;
        for i in 0..self.state.len() {
            sum += self.state[i].norm_sqr();
            if sum >= f {
                self.collapse(i);
                return i;
            }
        }
        // Norm drift can leave the cumulative sum fractionally below the
        // draw; the tail state absorbs the remainder.
        let last = self.state.len() - 1;
        self.collapse(last);
        last
    }

    /// Records a single-qubit measurement outcome in the averaging
    /// counters, if averaging is enabled.
    pub fn record_average(&mut self, qubit: QubitID, excited: bool) {
        if self.averaging_enabled {
            if excited {
                self.averaging[qubit].excited += 1;
            } else {
                self.averaging[qubit].ground += 1;
            }
        }
    }

    #[must_use]
    pub fn averaging_enabled(&self) -> bool {
        self.averaging_enabled
    }

    pub fn set_averaging_enabled(&mut self, enabled: bool) {
        self.averaging_enabled = enabled;
    }

    /// Zeroes the averaging counters. `reset` intentionally does not.
    pub fn clear_averaging(&mut self) {
        self.averaging.fill(MeasurementAverage::default());
    }

    #[must_use]
    pub fn averaging(&self) -> &[MeasurementAverage] {
        &self.averaging
    }

    /// Fraction of recorded shots that measured `0` on `qubit`, or zero if
    /// nothing was recorded yet.
    #[must_use]
    #[allow(clippy::cast_precision_loss, reason = "shot counts are far below 2^52")]
    pub fn ground_state_fraction(&self, qubit: QubitID) -> f64 {
        let MeasurementAverage { ground, excited } = self.averaging[qubit];
        let total = ground + excited;
        if total == 0 { 0.0 } else { ground as f64 / total as f64 }
    }

    /// The nonzero amplitudes, one `(re,im) |basis⟩ +` line per basis
    /// state.
    #[must_use]
    pub fn state_string(&self) -> String {
        let mut out = String::new();
        for (i, amp) in self.state.iter().enumerate() {
            if !amp.is_zero() {
                out.push_str(&format!(
                    "({:+.6},{:+.6}) |{}> +\n",
                    amp.re,
                    amp.im,
                    to_binary_string(i, self.qubits)
                ));
            }
        }
        out
    }

    /// The full diagnostic block: quantum state (unless `only_binary`),
    /// averaging fractions, measurement predictions and measurement
    /// register, most significant qubit first.
    #[must_use]
    pub fn format_dump(&self, only_binary: bool) -> String {
        let mut out = String::new();
        if !only_binary {
            out.push_str("--------------[quantum state]--------------\n");
            out.push_str(&self.state_string());
        }
        if self.averaging_enabled {
            out.push_str("-------------------------------------------\n");
            out.push_str("[>>] measurement averaging (ground state):");
            for qubit in (0..self.qubits).rev() {
                out.push_str(&format!(" | {:.3}", self.ground_state_fraction(qubit)));
            }
            out.push_str(" |\n");
        }
        out.push_str("[>>] measurement prediction:");
        for qubit in (0..self.qubits).rev() {
            out.push_str(match self.prediction[qubit] {
                Prediction::Zero => " | 0",
                Prediction::One => " | 1",
                Prediction::Unknown => " | ?",
            });
        }
        out.push_str(" |\n");
        out.push_str("[>>] measurement register  :");
        for qubit in (0..self.qubits).rev() {
            out.push_str(if self.measurement[qubit] { " | 1" } else { " | 0" });
        }
        out.push_str(" |\n");
        out
    }

    /// Prints the diagnostic block to stdout.
    pub fn dump(&self, only_binary: bool) {
        print!("{}", self.format_dump(only_binary));
    }
}

/// Renders `state` as a bit string, most significant qubit first.
#[must_use]
pub fn to_binary_string(state: usize, qubits: usize) -> String {
    (0..qubits)
        .rev()
        .map(|q| if (state >> q) & 1 == 1 { '1' } else { '0' })
        .collect()
}

/// Fidelity-like overlap `Σᵢ √(|aᵢ|²·|bᵢ|²)` between two registers, or
/// `None` if their sizes differ.
#[must_use]
pub fn fidelity(a: &QuantumRegister, b: &QuantumRegister) -> Option<f64> {
    if a.num_qubits() != b.num_qubits() {
        return None;
    }
    Some(
        a.state()
            .iter()
            .zip(b.state())
            .map(|(x, y)| (x.norm_sqr() * y.norm_sqr()).sqrt())
            .sum(),
    )
}

fn clock_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| {
            d.as_secs()
                .wrapping_mul(1_000_000_000)
                .wrapping_add(u64::from(d.subsec_nanos()))
        })
}
