// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The circuit executor: an ordered gate list with an iteration count.


use crate::{
    Error,
    gate::{Gate, GateOp as _},
    register::QuantumRegister,
};

/// An ordered list of gates, executed front to back, optionally repeated.
#[derive(Debug, Clone)]
pub struct Circuit {
    name: String,
    iterations: usize,
    gates: Vec<Gate>,
}

impl Circuit {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_iterations(name, 1)
    }

    #[must_use]
    pub fn with_iterations(name: impl Into<String>, iterations: usize) -> Self {
        Self {
            name: name.into(),
            iterations,
            gates: Vec::new(),
        }
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn iterations(&self) -> usize {
        self.iterations
    }

    pub fn set_iterations(&mut self, iterations: usize) {
        self.iterations = iterations;
    }

    pub fn push(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Applies the gates in list order, repeating the whole list
    /// `iterations` times. An empty circuit is skipped.
    ///
    /// With `check_invariants`, the register norm is verified after every
    /// gate and drift surfaces as [`Error::NormDrift`]. With
    /// `disable_averaging`, measurement gates inside this execution leave
    /// the shot-averaging counters alone.
    pub fn execute(
        &self,
        register: &mut QuantumRegister,
        check_invariants: bool,
        disable_averaging: bool,
    ) -> Result<(), Error> {
        if self.is_empty() {
            return Ok(());
        }
        log::debug!("executing circuit '{}' ({} gates)", self.name, self.gates.len());

        let averaging = register.averaging_enabled();
        if disable_averaging {
            register.set_averaging_enabled(false);
        }
        let result = self.run(register, check_invariants);
        register.set_averaging_enabled(averaging);
        result
    }

    fn run(&self, register: &mut QuantumRegister, check_invariants: bool) -> Result<(), Error> {
        for _ in 0..self.iterations {
            for gate in &self.gates {
                gate.apply(register)?;
                if check_invariants && !register.check() {
                    let norm = register.norm_sqr();
                    log::warn!(
                        "norm drifted to {norm} after a {:?} gate in circuit '{}'",
                        gate.kind(),
                        self.name
                    );
                    return Err(Error::NormDrift { norm });
                }
            }
        }
        Ok(())
    }
}
