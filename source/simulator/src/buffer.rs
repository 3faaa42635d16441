// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Aligned storage for the amplitude vector.
//!
//! The buffer owns a `2^N`-element allocation of [`Complex64`] whose base
//! pointer is aligned to a full cache line, so that each (re, im) pair can
//! be loaded into a 128-bit lane and wider vector loads never straddle
//! cache lines.


use crate::{Error, PARALLEL_THRESHOLD_QUBITS};
use num_complex::Complex64;
use rayon::prelude::*;
use std::{
    alloc::{self, Layout},
    ops::{Deref, DerefMut},
    ptr::NonNull,
};

/// Alignment of the buffer base pointer, in bytes.
const BUFFER_ALIGN: usize = 64;

/// An exclusively owned, 64-byte-aligned vector of complex amplitudes.
///
/// Allocated once at register construction and never resized. Dereferences
/// to a `[Complex64]` slice for element access.
pub struct AmplitudeBuffer {
    ptr: NonNull<Complex64>,
    len: usize,
}

// SAFETY: the buffer exclusively owns its allocation and `Complex64` is
// plain data, so moving or sharing the buffer across threads is sound.
unsafe impl Send for AmplitudeBuffer {}
unsafe impl Sync for AmplitudeBuffer {}

impl AmplitudeBuffer {
    /// Allocates a zeroed buffer of `len` amplitudes.
    ///
    /// `len` must be a nonzero power of two (one slot per basis state).
    /// Returns [`Error::AllocationFailed`] if the allocator cannot satisfy
    /// the request.
    pub fn new(len: usize) -> Result<Self, Error> {
        assert!(len.is_power_of_two(), "buffer length must be a power of two");
        let layout = Self::layout(len);
        // SAFETY: `layout` has nonzero size since `len > 0`.
        let raw = unsafe { alloc::alloc_zeroed(layout) };
        let Some(ptr) = NonNull::new(raw.cast::<Complex64>()) else {
            return Err(Error::AllocationFailed { amplitudes: len });
        };
        Ok(Self { ptr, len })
    }

    fn layout(len: usize) -> Layout {
        Layout::from_size_align(len * size_of::<Complex64>(), BUFFER_ALIGN)
            .expect("buffer layout should be valid for any supported register size")
    }

    /// Number of amplitudes in the buffer.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Zeroes every amplitude.
    pub fn fill_zero(&mut self) {
        self.fill(Complex64::ZERO);
    }

    /// Swaps the amplitudes at `i` and `j`.
    pub fn swap_amplitudes(&mut self, i: usize, j: usize) {
        self.swap(i, j);
    }

    /// Scales the amplitude at `i` by the complex factor `z` in place.
    pub fn scale(&mut self, i: usize, z: Complex64) {
        self[i] *= z;
    }

    /// Accumulates the squared norm `Σᵢ |aᵢ|²`.
    #[must_use]
    pub fn norm_sqr(&self) -> f64 {
        if self.len >= 1 << PARALLEL_THRESHOLD_QUBITS {
            self.par_iter().map(Complex64::norm_sqr).sum()
        } else {
            self.iter().map(Complex64::norm_sqr).sum()
        }
    }

    /// Divides every amplitude by `√(Σᵢ |aᵢ|²)`.
    ///
    /// Returns [`Error::ZeroNorm`] if the buffer holds the zero vector.
    pub fn normalize(&mut self) -> Result<(), Error> {
        let norm_sqr = self.norm_sqr();
        if norm_sqr == 0.0 {
            return Err(Error::ZeroNorm);
        }
        let norm = norm_sqr.sqrt();
        if self.len >= 1 << PARALLEL_THRESHOLD_QUBITS {
            self.par_iter_mut().for_each(|a| *a /= norm);
        } else {
            self.iter_mut().for_each(|a| *a /= norm);
        }
        Ok(())
    }
}

impl Deref for AmplitudeBuffer {
    type Target = [Complex64];

    fn deref(&self) -> &Self::Target {
        // SAFETY: `ptr` points at `len` initialized amplitudes owned by
        // this buffer.
        unsafe { std::slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl DerefMut for AmplitudeBuffer {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: `ptr` points at `len` initialized amplitudes exclusively
        // owned by this buffer.
        unsafe { std::slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl Drop for AmplitudeBuffer {
    fn drop(&mut self) {
        // SAFETY: the allocation was obtained from the global allocator
        // with this exact layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), Self::layout(self.len)) };
    }
}
