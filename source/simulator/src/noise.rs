// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The depolarizing-channel noise layer.
//!
//! The channel does not touch amplitudes itself: it rewrites an ideal
//! circuit into a new gate list in which each gate is, with the configured
//! probability, preceded by a uniformly drawn non-identity Pauli error on
//! the qubits it targets. Executing the rewritten circuit realizes the
//! channel.


use crate::{
    QubitID,
    circuit::Circuit,
    gate::{Gate, GateOp as _},
    register::QuantumRegister,
};

/// The error-model descriptor handed over by the circuit front end as
/// `(kind, parameters[])`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ErrorModel {
    None,
    DepolarizingChannel { probability: f64 },
}

impl ErrorModel {
    /// Parses the front end's textual descriptor. For
    /// `depolarizing_channel`, `parameters[0]` is the per-gate error
    /// probability.
    #[must_use]
    pub fn from_description(kind: &str, parameters: &[f64]) -> Option<Self> {
        match kind {
            "none" => Some(Self::None),
            "depolarizing_channel" => parameters
                .first()
                .map(|p| Self::DepolarizingChannel { probability: *p }),
            _ => None,
        }
    }
}

/// Rewrites ideal circuits into noisy ones and counts the errors it
/// injects.
#[derive(Debug)]
pub struct DepolarizingChannel {
    probability: f64,
    errors_injected: u64,
}

impl DepolarizingChannel {
    #[must_use]
    pub fn new(probability: f64) -> Self {
        assert!(
            (0.0..=1.0).contains(&probability),
            "error probability must lie in [0, 1]"
        );
        Self {
            probability,
            errors_injected: 0,
        }
    }

    /// Total number of Pauli errors injected across every `wrap` so far.
    #[must_use]
    pub fn errors_injected(&self) -> u64 {
        self.errors_injected
    }

    /// Produces the noisy version of `circuit`.
    ///
    /// Each gate with a nonempty target set is preceded, with the channel
    /// probability, by a random non-identity Pauli tensor on its targets;
    /// gates without targets (classical and diagnostic operations) pass
    /// through unchanged. Every draw comes from the register's PRNG, so a
    /// seed fully determines the trajectory. Wrapping the same circuit
    /// twice redraws the noise.
    pub fn wrap(&mut self, circuit: &Circuit, register: &mut QuantumRegister) -> Circuit {
        let mut noisy = Circuit::new(format!("noisy({})", circuit.name()));
        for gate in circuit.gates() {
            let targets = gate.target_qubits();
            if !targets.is_empty() && register.random() < self.probability {
                noisy.push(random_pauli_error(&targets, register));
                self.errors_injected += 1;
            }
            noisy.push(gate.clone());
        }
        noisy
    }
}

/// Draws uniformly over the `4^k − 1` non-identity Pauli tensor factors on
/// `targets`, encoded base-4 with one digit per target qubit.
#[allow(
    clippy::cast_precision_loss,
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    reason = "the combination count is exact in an f64 mantissa for any practical target set"
)]
fn random_pauli_error(targets: &[QubitID], register: &mut QuantumRegister) -> Gate {
    let digits = u32::try_from(targets.len()).expect("target sets are tiny");
    let combinations = 4u128.pow(digits) - 1;
    let draw = (1 + (register.random() * combinations as f64) as u128).min(combinations);

    let mut code = draw;
    let mut factors = Vec::new();
    for &target in targets {
        match code & 0b11 {
            1 => factors.push(Gate::pauli_x(target)),
            2 => factors.push(Gate::pauli_y(target)),
            3 => factors.push(Gate::pauli_z(target)),
            _ => {}
        }
        code >>= 2;
    }

    if factors.len() == 1 {
        factors.remove(0)
    } else {
        Gate::parallel(factors)
    }
}
