// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

//! Gate objects: a tagged sum of concrete gate variants sharing the
//! [`GateOp`] capability, plus the composite gates (classical control,
//! parallel groups, lookup-table dispatch, state preparation).

#[cfg(test)]
mod tests;

use crate::{
    Error, NORM_TOLERANCE, QubitID, kernel, matrices,
    register::{Prediction, QuantumRegister},
};
use nalgebra::{DMatrix, Matrix2};
use num_complex::Complex64;
use rustc_hash::FxHashMap;
use std::f64::consts::PI;

/// Closed classifier for every gate the simulator understands. Reserved
/// entries (`Custom`) are carried for completeness even though applying
/// them is rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GateKind {
    Identity,
    Hadamard,
    PauliX,
    PauliY,
    PauliZ,
    Cnot,
    Toffoli,
    Swap,
    /// The S gate, `diag(1, i)`.
    Phase,
    Rx,
    Ry,
    Rz,
    Cphase,
    CtrlPhaseShift,
    T,
    Tdag,
    Measure,
    MeasureRegister,
    PrepZ,
    BinCtrl,
    ClassicalNot,
    LookupTable,
    Parallel,
    Prepare,
    Qft,
    Custom,
    Display,
    DisplayBinary,
    PrintStr,
}

/// The capability every gate exposes.
pub trait GateOp {
    /// Applies the gate to `register` in place. Ideal gates return 0; a
    /// single-qubit measurement returns the sampled bit.
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error>;

    /// Every qubit the gate involves.
    fn qubits(&self) -> Vec<QubitID>;

    fn control_qubits(&self) -> Vec<QubitID>;

    fn target_qubits(&self) -> Vec<QubitID>;

    fn kind(&self) -> GateKind;

    /// Scheduling hint for a higher-level scheduler; the simulation itself
    /// never reads it.
    fn duration(&self) -> u64 {
        0
    }
}

fn check_qubit(register: &QuantumRegister, qubit: QubitID) -> Result<(), Error> {
    if qubit < register.num_qubits() {
        Ok(())
    } else {
        Err(Error::QubitOutOfRange {
            qubit,
            qubits: register.num_qubits(),
        })
    }
}

/// A named single-qubit unitary. Every one of them reduces to the stride
/// kernel with its canonical 2×2 matrix; the kind decides the prediction
/// post-condition.
#[derive(Debug, Clone)]
pub struct UnitaryGate {
    kind: GateKind,
    qubit: QubitID,
    matrix: Matrix2<Complex64>,
}

impl UnitaryGate {
    fn new(kind: GateKind, qubit: QubitID, matrix: Matrix2<Complex64>) -> Self {
        Self { kind, qubit, matrix }
    }
}

impl GateOp for UnitaryGate {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.qubit)?;
        if self.kind != GateKind::Identity {
            kernel::apply_single_qubit(register.state_mut(), &self.matrix, self.qubit);
        }
        match self.kind {
            // Superposition-introducing gates invalidate the prediction.
            GateKind::Hadamard | GateKind::Rx | GateKind::Ry | GateKind::Rz => {
                register.set_prediction(self.qubit, Prediction::Unknown);
            }
            GateKind::PauliX | GateKind::PauliY => register.flip_prediction(self.qubit),
            _ => {}
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn kind(&self) -> GateKind {
        self.kind
    }
}

#[derive(Debug, Clone)]
pub struct ControlledNot {
    control: QubitID,
    target: QubitID,
}

impl ControlledNot {
    #[must_use]
    pub fn new(control: QubitID, target: QubitID) -> Self {
        Self { control, target }
    }
}

impl GateOp for ControlledNot {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.control)?;
        check_qubit(register, self.target)?;
        kernel::controlled_not(register.state_mut(), self.control, self.target);
        match register.prediction(self.control) {
            Prediction::One => register.flip_prediction(self.target),
            Prediction::Unknown => register.set_prediction(self.target, Prediction::Unknown),
            Prediction::Zero => {}
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.control, self.target]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        vec![self.control]
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.target]
    }

    fn kind(&self) -> GateKind {
        GateKind::Cnot
    }
}

#[derive(Debug, Clone)]
pub struct Toffoli {
    control1: QubitID,
    control2: QubitID,
    target: QubitID,
}

impl Toffoli {
    #[must_use]
    pub fn new(control1: QubitID, control2: QubitID, target: QubitID) -> Self {
        Self { control1, control2, target }
    }
}

impl GateOp for Toffoli {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.control1)?;
        check_qubit(register, self.control2)?;
        check_qubit(register, self.target)?;
        kernel::controlled_controlled_not(
            register.state_mut(),
            self.control1,
            self.control2,
            self.target,
        );
        let (c1, c2) = (
            register.prediction(self.control1),
            register.prediction(self.control2),
        );
        if c1 == Prediction::One && c2 == Prediction::One {
            register.flip_prediction(self.target);
        } else if c1 == Prediction::Unknown || c2 == Prediction::Unknown {
            register.set_prediction(self.target, Prediction::Unknown);
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.control1, self.control2, self.target]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        vec![self.control1, self.control2]
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.target]
    }

    fn kind(&self) -> GateKind {
        GateKind::Toffoli
    }
}

/// SWAP, executed as its three-CNOT decomposition.
#[derive(Debug, Clone)]
pub struct SwapGate {
    qubit1: QubitID,
    qubit2: QubitID,
}

impl SwapGate {
    #[must_use]
    pub fn new(qubit1: QubitID, qubit2: QubitID) -> Self {
        Self { qubit1, qubit2 }
    }
}

impl GateOp for SwapGate {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        ControlledNot::new(self.qubit1, self.qubit2).apply(register)?;
        ControlledNot::new(self.qubit2, self.qubit1).apply(register)?;
        ControlledNot::new(self.qubit1, self.qubit2).apply(register)?;
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.qubit1, self.qubit2]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.qubit1, self.qubit2]
    }

    fn kind(&self) -> GateKind {
        GateKind::Swap
    }
}

/// Controlled-Z, executed as H·CNOT·H on the target.
#[derive(Debug, Clone)]
pub struct ControlledPhase {
    control: QubitID,
    target: QubitID,
}

impl ControlledPhase {
    #[must_use]
    pub fn new(control: QubitID, target: QubitID) -> Self {
        Self { control, target }
    }
}

impl GateOp for ControlledPhase {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        UnitaryGate::new(GateKind::Hadamard, self.target, *matrices::H).apply(register)?;
        ControlledNot::new(self.control, self.target).apply(register)?;
        UnitaryGate::new(GateKind::Hadamard, self.target, *matrices::H).apply(register)?;
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.control, self.target]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        vec![self.control]
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.target]
    }

    fn kind(&self) -> GateKind {
        GateKind::Cphase
    }
}

/// Controlled phase shift by `π / 2^(control − target)`, applied as a
/// targeted scale of the amplitudes with both bits set.
#[derive(Debug, Clone)]
pub struct CtrlPhaseShift {
    control: QubitID,
    target: QubitID,
    factor: Complex64,
}

impl CtrlPhaseShift {
    #[must_use]
    #[allow(
        clippy::cast_possible_wrap,
        clippy::cast_possible_truncation,
        reason = "qubit indices are bounded by MAX_QUBITS"
    )]
    pub fn new(control: QubitID, target: QubitID) -> Self {
        Self::with_distance(control, target, control as i32 - target as i32)
    }

    /// A shift of `π / 2^distance`, for callers (such as the QFT) whose
    /// angle comes from gate positions rather than qubit numbers.
    #[must_use]
    pub fn with_distance(control: QubitID, target: QubitID, distance: i32) -> Self {
        let angle = PI / f64::powi(2.0, distance);
        Self {
            control,
            target,
            factor: Complex64::from_polar(1.0, angle),
        }
    }
}

impl GateOp for CtrlPhaseShift {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.control)?;
        check_qubit(register, self.target)?;
        kernel::controlled_phase(register.state_mut(), self.control, self.target, self.factor);
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.control, self.target]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        vec![self.control]
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.target]
    }

    fn kind(&self) -> GateKind {
        GateKind::CtrlPhaseShift
    }
}

/// Single-qubit projective measurement with collapse.
#[derive(Debug, Clone)]
pub struct Measure {
    qubit: QubitID,
    disable_averaging: bool,
}

impl Measure {
    #[must_use]
    pub fn new(qubit: QubitID) -> Self {
        Self { qubit, disable_averaging: false }
    }

    /// A measurement that never touches the averaging counters, for
    /// internal uses such as [`PrepZ`].
    #[must_use]
    pub fn without_averaging(qubit: QubitID) -> Self {
        Self { qubit, disable_averaging: true }
    }
}

impl GateOp for Measure {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.qubit)?;
        let p1 = kernel::probability_of_one(register.state(), self.qubit);
        let outcome = register.random() < p1;
        let surviving = kernel::project(register.state_mut(), self.qubit, outcome);
        if surviving == 0.0 {
            return Err(Error::ZeroNorm);
        }
        kernel::renormalize(register.state_mut(), surviving);
        register.set_prediction(self.qubit, outcome.into());
        register.set_measurement(self.qubit, outcome);
        if !self.disable_averaging {
            register.record_average(self.qubit, outcome);
        }
        Ok(i32::from(outcome))
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn kind(&self) -> GateKind {
        GateKind::Measure
    }
}

/// Register-wide measurement: one draw collapses the whole register.
///
/// Register-wide gates report an empty qubit set; they implicitly act on
/// every qubit of whatever register they are applied to.
#[derive(Debug, Clone, Copy, Default)]
pub struct MeasureRegister;

impl GateOp for MeasureRegister {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        register.measure_register();
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn kind(&self) -> GateKind {
        GateKind::MeasureRegister
    }
}

/// Deterministically prepares `|0⟩` on one qubit: measure (without
/// averaging), flip back with an X conditioned on the outcome, then clear
/// the measurement bit.
#[derive(Debug, Clone)]
pub struct PrepZ {
    qubit: QubitID,
}

impl PrepZ {
    #[must_use]
    pub fn new(qubit: QubitID) -> Self {
        Self { qubit }
    }
}

impl GateOp for PrepZ {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        Measure::without_averaging(self.qubit).apply(register)?;
        if register.measurement(self.qubit) {
            UnitaryGate::new(GateKind::PauliX, self.qubit, *matrices::X).apply(register)?;
        }
        register.set_measurement(self.qubit, false);
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        vec![self.qubit]
    }

    fn kind(&self) -> GateKind {
        GateKind::PrepZ
    }
}

/// Applies the child gate only when the recorded measurement bit is 1.
#[derive(Debug, Clone)]
pub struct BinCtrl {
    bit: QubitID,
    gate: Box<Gate>,
}

impl BinCtrl {
    #[must_use]
    pub fn new(bit: QubitID, gate: Gate) -> Self {
        Self { bit, gate: Box::new(gate) }
    }
}

impl GateOp for BinCtrl {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.bit)?;
        if register.measurement(self.bit) {
            self.gate.apply(register)?;
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        self.gate.qubits()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        self.gate.control_qubits()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        self.gate.target_qubits()
    }

    fn kind(&self) -> GateKind {
        GateKind::BinCtrl
    }
}

/// Flips one bit of the classical measurement register. Never touches the
/// amplitudes.
#[derive(Debug, Clone, Copy)]
pub struct ClassicalNot {
    bit: QubitID,
}

impl ClassicalNot {
    #[must_use]
    pub fn new(bit: QubitID) -> Self {
        Self { bit }
    }
}

impl GateOp for ClassicalNot {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        check_qubit(register, self.bit)?;
        register.flip_measurement(self.bit);
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn kind(&self) -> GateKind {
        GateKind::ClassicalNot
    }
}

/// Dispatches on a codeword formed by reading the measurement bits of the
/// control bits MSB-first; applies the mapped gate if one is registered.
#[derive(Debug, Clone)]
pub struct LookupTable {
    control_bits: Vec<QubitID>,
    gates: FxHashMap<u32, Gate>,
}

impl LookupTable {
    #[must_use]
    pub fn new(control_bits: Vec<QubitID>) -> Self {
        Self {
            control_bits,
            gates: FxHashMap::default(),
        }
    }

    /// Registers `gate` under `codeword`. The codeword must fit in the
    /// table's control bits.
    pub fn insert(&mut self, codeword: u32, gate: Gate) {
        assert!(
            codeword < 1 << self.control_bits.len(),
            "codeword {codeword} is wider than the control bits"
        );
        self.gates.insert(codeword, gate);
    }

    fn collect_sorted(&self, select: impl Fn(&Gate) -> Vec<QubitID>) -> Vec<QubitID> {
        let mut qubits: Vec<QubitID> = self.gates.values().flat_map(select).collect();
        qubits.sort_unstable();
        qubits.dedup();
        qubits
    }
}

impl GateOp for LookupTable {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        let mut codeword = 0u32;
        for bit in &self.control_bits {
            check_qubit(register, *bit)?;
            codeword = codeword * 2 + u32::from(register.measurement(*bit));
        }
        if let Some(gate) = self.gates.get(&codeword) {
            gate.apply(register)?;
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        self.collect_sorted(GateOp::qubits)
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        self.collect_sorted(GateOp::control_qubits)
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        self.collect_sorted(GateOp::target_qubits)
    }

    fn kind(&self) -> GateKind {
        GateKind::LookupTable
    }
}

/// A group of gates the source language marked as parallel. The label is a
/// scheduling hint that the gates act on disjoint qubits; the simulator
/// applies them strictly in insertion order.
#[derive(Debug, Clone, Default)]
pub struct ParallelGates {
    gates: Vec<Gate>,
}

impl ParallelGates {
    #[must_use]
    pub fn new(gates: Vec<Gate>) -> Self {
        Self { gates }
    }

    pub fn push(&mut self, gate: Gate) {
        self.gates.push(gate);
    }

    #[must_use]
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }
}

impl GateOp for ParallelGates {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        for gate in &self.gates {
            gate.apply(register)?;
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        self.gates.iter().flat_map(GateOp::qubits).collect()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        self.gates.iter().flat_map(GateOp::control_qubits).collect()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        self.gates.iter().flat_map(GateOp::target_qubits).collect()
    }

    fn kind(&self) -> GateKind {
        GateKind::Parallel
    }
}

/// Loads an explicit sparse `{basis state → amplitude}` mapping into the
/// register.
///
/// The buffer is zeroed first; a mapping whose norm is off by more than the
/// tolerance is renormalized with a warning. Every prediction becomes
/// `Unknown` — an arbitrary state is not a basis state.
#[derive(Debug, Clone)]
pub struct Prepare {
    amplitudes: FxHashMap<u64, Complex64>,
}

impl Prepare {
    #[must_use]
    pub fn new(amplitudes: FxHashMap<u64, Complex64>) -> Self {
        Self { amplitudes }
    }
}

impl GateOp for Prepare {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        let states = register.num_states() as u64;
        for &basis in self.amplitudes.keys() {
            if basis >= states {
                #[allow(
                    clippy::cast_possible_truncation,
                    reason = "a bit position in a u64 fits any usize"
                )]
                return Err(Error::QubitOutOfRange {
                    qubit: (u64::BITS - 1 - basis.leading_zeros()) as usize,
                    qubits: register.num_qubits(),
                });
            }
        }

        let state = register.state_mut();
        state.fill(Complex64::ZERO);
        let mut norm = 0.0;
        for (&basis, &amplitude) in &self.amplitudes {
            #[allow(
                clippy::cast_possible_truncation,
                reason = "bounds were checked against the register size"
            )]
            {
                state[basis as usize] = amplitude;
            }
            norm += amplitude.norm_sqr();
        }
        if (norm - 1.0).abs() > NORM_TOLERANCE {
            log::warn!("prepared state has norm {norm}; renormalizing");
            register.normalize()?;
        }
        for qubit in 0..register.num_qubits() {
            register.set_prediction(qubit, Prediction::Unknown);
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn kind(&self) -> GateKind {
        GateKind::Prepare
    }
}

/// The quantum Fourier transform over an ordered list of qubits, executed
/// as the standard decomposition: a Hadamard on each qubit with cascaded
/// controlled phase shifts of angle `π / 2^distance`, then the bit-reversal
/// swaps.
#[derive(Debug, Clone)]
pub struct Qft {
    qubits: Vec<QubitID>,
}

impl Qft {
    #[must_use]
    pub fn new(qubits: Vec<QubitID>) -> Self {
        Self { qubits }
    }
}

impl GateOp for Qft {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        for &qubit in &self.qubits {
            check_qubit(register, qubit)?;
        }
        let n = self.qubits.len();
        for i in 0..n {
            UnitaryGate::new(GateKind::Hadamard, self.qubits[i], *matrices::H).apply(register)?;
            for j in i + 1..n {
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_possible_wrap,
                    reason = "gate positions are bounded by MAX_QUBITS"
                )]
                CtrlPhaseShift::with_distance(self.qubits[j], self.qubits[i], (j - i) as i32)
                    .apply(register)?;
            }
        }
        for i in 0..n / 2 {
            SwapGate::new(self.qubits[i], self.qubits[n - 1 - i]).apply(register)?;
        }
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        self.qubits.clone()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        self.qubits.clone()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        self.qubits.clone()
    }

    fn kind(&self) -> GateKind {
        GateKind::Qft
    }
}

/// Reserved: an arbitrary n-qubit unitary. Applying one is rejected
/// without mutating the register.
#[derive(Debug, Clone)]
pub struct CustomGate {
    qubits: Vec<QubitID>,
    matrix: DMatrix<Complex64>,
}

impl CustomGate {
    #[must_use]
    pub fn new(qubits: Vec<QubitID>, matrix: DMatrix<Complex64>) -> Self {
        Self { qubits, matrix }
    }

    #[must_use]
    pub fn matrix(&self) -> &DMatrix<Complex64> {
        &self.matrix
    }
}

impl GateOp for CustomGate {
    fn apply(&self, _register: &mut QuantumRegister) -> Result<i32, Error> {
        Err(Error::UnsupportedCustomGate)
    }

    fn qubits(&self) -> Vec<QubitID> {
        self.qubits.clone()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        self.qubits.clone()
    }

    fn kind(&self) -> GateKind {
        GateKind::Custom
    }
}

/// Debug utility: prints the register dump mid-circuit.
#[derive(Debug, Clone, Copy)]
pub struct Display {
    only_binary: bool,
}

impl Display {
    #[must_use]
    pub fn new(only_binary: bool) -> Self {
        Self { only_binary }
    }
}

impl GateOp for Display {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        register.dump(self.only_binary);
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn kind(&self) -> GateKind {
        if self.only_binary {
            GateKind::DisplayBinary
        } else {
            GateKind::Display
        }
    }
}

/// Debug utility: prints a literal string mid-circuit.
#[derive(Debug, Clone)]
pub struct PrintStr {
    text: String,
}

impl PrintStr {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl GateOp for PrintStr {
    fn apply(&self, _register: &mut QuantumRegister) -> Result<i32, Error> {
        println!("{}", self.text);
        Ok(0)
    }

    fn qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        Vec::new()
    }

    fn kind(&self) -> GateKind {
        GateKind::PrintStr
    }
}

/// A gate, as a tagged sum of the concrete variants. Composites own their
/// children; dropping a parent drops the children.
#[derive(Debug, Clone)]
pub enum Gate {
    Unitary(UnitaryGate),
    Cnot(ControlledNot),
    Toffoli(Toffoli),
    Swap(SwapGate),
    Cphase(ControlledPhase),
    CtrlPhaseShift(CtrlPhaseShift),
    Measure(Measure),
    MeasureRegister(MeasureRegister),
    PrepZ(PrepZ),
    BinCtrl(BinCtrl),
    ClassicalNot(ClassicalNot),
    LookupTable(LookupTable),
    Parallel(ParallelGates),
    Prepare(Prepare),
    Qft(Qft),
    Custom(CustomGate),
    Display(Display),
    PrintStr(PrintStr),
}

macro_rules! dispatch {
    ($gate:expr, $inner:ident => $body:expr) => {
        match $gate {
            Gate::Unitary($inner) => $body,
            Gate::Cnot($inner) => $body,
            Gate::Toffoli($inner) => $body,
            Gate::Swap($inner) => $body,
            Gate::Cphase($inner) => $body,
            Gate::CtrlPhaseShift($inner) => $body,
            Gate::Measure($inner) => $body,
            Gate::MeasureRegister($inner) => $body,
            Gate::PrepZ($inner) => $body,
            Gate::BinCtrl($inner) => $body,
            Gate::ClassicalNot($inner) => $body,
            Gate::LookupTable($inner) => $body,
            Gate::Parallel($inner) => $body,
            Gate::Prepare($inner) => $body,
            Gate::Qft($inner) => $body,
            Gate::Custom($inner) => $body,
            Gate::Display($inner) => $body,
            Gate::PrintStr($inner) => $body,
        }
    };
}

impl GateOp for Gate {
    fn apply(&self, register: &mut QuantumRegister) -> Result<i32, Error> {
        dispatch!(self, gate => gate.apply(register))
    }

    fn qubits(&self) -> Vec<QubitID> {
        dispatch!(self, gate => gate.qubits())
    }

    fn control_qubits(&self) -> Vec<QubitID> {
        dispatch!(self, gate => gate.control_qubits())
    }

    fn target_qubits(&self) -> Vec<QubitID> {
        dispatch!(self, gate => gate.target_qubits())
    }

    fn kind(&self) -> GateKind {
        dispatch!(self, gate => gate.kind())
    }

    fn duration(&self) -> u64 {
        dispatch!(self, gate => gate.duration())
    }
}

impl Gate {
    #[must_use]
    pub fn identity(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Identity, qubit, *matrices::IDENTITY))
    }

    #[must_use]
    pub fn hadamard(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Hadamard, qubit, *matrices::H))
    }

    #[must_use]
    pub fn pauli_x(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::PauliX, qubit, *matrices::X))
    }

    #[must_use]
    pub fn pauli_y(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::PauliY, qubit, *matrices::Y))
    }

    #[must_use]
    pub fn pauli_z(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::PauliZ, qubit, *matrices::Z))
    }

    /// The S gate.
    #[must_use]
    pub fn phase(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Phase, qubit, *matrices::S))
    }

    #[must_use]
    pub fn t(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::T, qubit, *matrices::T))
    }

    #[must_use]
    pub fn t_dag(qubit: QubitID) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Tdag, qubit, *matrices::T_ADJ))
    }

    #[must_use]
    pub fn rx(qubit: QubitID, angle: f64) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Rx, qubit, matrices::rx(angle)))
    }

    #[must_use]
    pub fn ry(qubit: QubitID, angle: f64) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Ry, qubit, matrices::ry(angle)))
    }

    #[must_use]
    pub fn rz(qubit: QubitID, angle: f64) -> Self {
        Self::Unitary(UnitaryGate::new(GateKind::Rz, qubit, matrices::rz(angle)))
    }

    #[must_use]
    pub fn cnot(control: QubitID, target: QubitID) -> Self {
        Self::Cnot(ControlledNot::new(control, target))
    }

    #[must_use]
    pub fn toffoli(control1: QubitID, control2: QubitID, target: QubitID) -> Self {
        Self::Toffoli(Toffoli::new(control1, control2, target))
    }

    #[must_use]
    pub fn swap(qubit1: QubitID, qubit2: QubitID) -> Self {
        Self::Swap(SwapGate::new(qubit1, qubit2))
    }

    #[must_use]
    pub fn cphase(control: QubitID, target: QubitID) -> Self {
        Self::Cphase(ControlledPhase::new(control, target))
    }

    #[must_use]
    pub fn ctrl_phase_shift(control: QubitID, target: QubitID) -> Self {
        Self::CtrlPhaseShift(CtrlPhaseShift::new(control, target))
    }

    #[must_use]
    pub fn measure(qubit: QubitID) -> Self {
        Self::Measure(Measure::new(qubit))
    }

    #[must_use]
    pub fn measure_register() -> Self {
        Self::MeasureRegister(MeasureRegister)
    }

    #[must_use]
    pub fn prepz(qubit: QubitID) -> Self {
        Self::PrepZ(PrepZ::new(qubit))
    }

    #[must_use]
    pub fn bin_ctrl(bit: QubitID, gate: Self) -> Self {
        Self::BinCtrl(BinCtrl::new(bit, gate))
    }

    #[must_use]
    pub fn classical_not(bit: QubitID) -> Self {
        Self::ClassicalNot(ClassicalNot::new(bit))
    }

    #[must_use]
    pub fn lookup_table(table: LookupTable) -> Self {
        Self::LookupTable(table)
    }

    #[must_use]
    pub fn parallel(gates: Vec<Self>) -> Self {
        Self::Parallel(ParallelGates::new(gates))
    }

    #[must_use]
    pub fn prepare(amplitudes: FxHashMap<u64, Complex64>) -> Self {
        Self::Prepare(Prepare::new(amplitudes))
    }

    #[must_use]
    pub fn qft(qubits: Vec<QubitID>) -> Self {
        Self::Qft(Qft::new(qubits))
    }

    #[must_use]
    pub fn custom(qubits: Vec<QubitID>, matrix: DMatrix<Complex64>) -> Self {
        Self::Custom(CustomGate::new(qubits, matrix))
    }

    #[must_use]
    pub fn display() -> Self {
        Self::Display(Display::new(false))
    }

    #[must_use]
    pub fn display_binary() -> Self {
        Self::Display(Display::new(true))
    }

    #[must_use]
    pub fn print(text: impl Into<String>) -> Self {
        Self::PrintStr(PrintStr::new(text))
    }
}
