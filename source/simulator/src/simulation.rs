// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! The run driver: owns the register, the parsed sub-circuits and the error
//! model, and executes single passes or shot loops.


use crate::{
    Error,
    circuit::Circuit,
    noise::{DepolarizingChannel, ErrorModel},
    register::QuantumRegister,
};

/// A whole simulation: one register, the ordered sub-circuits the front end
/// produced, and the error model to run them under.
pub struct Simulation {
    register: QuantumRegister,
    circuits: Vec<Circuit>,
    error_model: ErrorModel,
    total_errors: u64,
}

impl Simulation {
    /// Creates a simulation over a clock-seeded register.
    pub fn new(qubits: usize, error_model: ErrorModel) -> Result<Self, Error> {
        Ok(Self::over(QuantumRegister::new(qubits)?, error_model))
    }

    /// Creates a simulation whose measurement and noise trajectories are
    /// fully determined by `seed`.
    pub fn with_seed(qubits: usize, seed: u64, error_model: ErrorModel) -> Result<Self, Error> {
        Ok(Self::over(
            QuantumRegister::new_with_seed(qubits, seed)?,
            error_model,
        ))
    }

    fn over(register: QuantumRegister, error_model: ErrorModel) -> Self {
        Self {
            register,
            circuits: Vec::new(),
            error_model,
            total_errors: 0,
        }
    }

    pub fn add_circuit(&mut self, circuit: Circuit) {
        self.circuits.push(circuit);
    }

    #[must_use]
    pub fn register(&self) -> &QuantumRegister {
        &self.register
    }

    pub fn register_mut(&mut self) -> &mut QuantumRegister {
        &mut self.register
    }

    /// Pauli errors injected by every run so far.
    #[must_use]
    pub fn total_errors(&self) -> u64 {
        self.total_errors
    }

    /// Executes every sub-circuit once, front to back. Under a
    /// depolarizing model, each iteration of each circuit executes a
    /// freshly drawn noisy rewrite.
    pub fn run(&mut self) -> Result<(), Error> {
        let mut channel = self.channel();
        let result = self.execute_all(channel.as_mut());
        self.collect_errors(channel);
        result
    }

    /// The shot loop: `shots` times, resets the register, executes every
    /// sub-circuit and finishes with a register-wide measurement.
    /// Averaging stays enabled so measurement gates accumulate the
    /// per-qubit counters across shots.
    pub fn run_shots(&mut self, shots: usize) -> Result<(), Error> {
        let mut channel = self.channel();
        let mut result = Ok(());
        for shot in 0..shots {
            log::debug!("shot {shot}");
            self.register.reset();
            if let Err(error) = self.execute_all(channel.as_mut()) {
                result = Err(error);
                break;
            }
            self.register.measure_register();
        }
        self.collect_errors(channel);
        result
    }

    /// Ground-state fraction per qubit, accumulated by the shot loop.
    #[must_use]
    pub fn average_report(&self) -> Vec<f64> {
        (0..self.register.num_qubits())
            .map(|qubit| self.register.ground_state_fraction(qubit))
            .collect()
    }

    fn channel(&self) -> Option<DepolarizingChannel> {
        match self.error_model {
            ErrorModel::None => None,
            ErrorModel::DepolarizingChannel { probability } => {
                Some(DepolarizingChannel::new(probability))
            }
        }
    }

    fn execute_all(&mut self, mut channel: Option<&mut DepolarizingChannel>) -> Result<(), Error> {
        for circuit in &self.circuits {
            if circuit.is_empty() {
                continue;
            }
            match &mut channel {
                Some(channel) => {
                    for _ in 0..circuit.iterations() {
                        let noisy = channel.wrap(circuit, &mut self.register);
                        noisy.execute(&mut self.register, false, false)?;
                    }
                }
                None => circuit.execute(&mut self.register, false, false)?,
            }
        }
        Ok(())
    }

    fn collect_errors(&mut self, channel: Option<DepolarizingChannel>) {
        if let Some(channel) = channel {
            self.total_errors += channel.errors_injected();
        }
    }
}
