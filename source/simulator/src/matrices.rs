// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Canonical 2×2 gate matrices.


use core::f64;
use nalgebra::Matrix2;
use num_complex::Complex64;
use std::sync::LazyLock;

pub static IDENTITY: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        Complex64::ONE,
    )
});

pub static X: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ZERO,
        Complex64::ONE,
        Complex64::ONE,
        Complex64::ZERO,
    )
});

pub static Y: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ZERO,
        -Complex64::I,
        Complex64::I,
        Complex64::ZERO,
    )
});

pub static Z: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        -Complex64::ONE,
    )
});

pub static H: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    let f = Complex64::new(f64::consts::FRAC_1_SQRT_2, 0.0);
    Matrix2::new(f, f, f, -f)
});

/// The S gate, `diag(1, i)`.
pub static S: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        Complex64::I,
    )
});

/// The T gate, `diag(1, e^{iπ/4})`.
pub static T: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        (Complex64::I * f64::consts::FRAC_PI_4).exp(),
    )
});

/// The T† gate, `diag(1, e^{-iπ/4})`.
pub static T_ADJ: LazyLock<Matrix2<Complex64>> = LazyLock::new(|| {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        (-Complex64::I * f64::consts::FRAC_PI_4).exp(),
    )
});

/// Rotation around the X axis by `angle`, with the half-angle convention.
#[must_use]
pub fn rx(angle: f64) -> Matrix2<Complex64> {
    let cos = Complex64::new((angle / 2.0).cos(), 0.0);
    let sin = -Complex64::I * (angle / 2.0).sin();
    Matrix2::new(cos, sin, sin, cos)
}

/// Rotation around the Y axis by `angle`, with the half-angle convention.
#[must_use]
pub fn ry(angle: f64) -> Matrix2<Complex64> {
    let cos = Complex64::new((angle / 2.0).cos(), 0.0);
    let sin = Complex64::new((angle / 2.0).sin(), 0.0);
    Matrix2::new(cos, -sin, sin, cos)
}

/// Rotation around the Z axis by `angle`, with the half-angle convention.
#[must_use]
pub fn rz(angle: f64) -> Matrix2<Complex64> {
    Matrix2::new(
        (-Complex64::I * (angle / 2.0)).exp(),
        Complex64::ZERO,
        Complex64::ZERO,
        (Complex64::I * (angle / 2.0)).exp(),
    )
}

/// Generic phase shift by `angle`, `diag(1, e^{i·angle})`.
#[must_use]
pub fn phase(angle: f64) -> Matrix2<Complex64> {
    Matrix2::new(
        Complex64::ONE,
        Complex64::ZERO,
        Complex64::ZERO,
        (Complex64::I * angle).exp(),
    )
}
