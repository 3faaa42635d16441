// Copyright (c) Microsoft Corporation.
// Licensed under the MIT License.

use super::{Gate, GateKind, GateOp, LookupTable, Measure};
use crate::{
    Error,
    register::{Prediction, QuantumRegister},
};
use core::f64;
use nalgebra::DMatrix;
use num_complex::Complex64;
use rustc_hash::FxHashMap;

const FRAC_1_SQRT_2: f64 = f64::consts::FRAC_1_SQRT_2;

fn register(qubits: usize) -> QuantumRegister {
    QuantumRegister::new_with_seed(qubits, 1234).expect("register should allocate")
}

fn assert_state_eq(reg: &QuantumRegister, expected: &[Complex64]) {
    assert_eq!(reg.state().len(), expected.len());
    for (i, (a, b)) in reg.state().iter().zip(expected.iter()).enumerate() {
        assert!((a - b).norm() < 1e-10, "amplitude {i}: {a} != {b}");
    }
}

#[test]
fn hadamard_on_one_qubit_gives_plus() {
    let mut reg = register(1);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    assert_state_eq(&reg, &[f, f]);
    assert_eq!(reg.prediction(0), Prediction::Unknown);
    assert!(reg.check());
}

#[test]
fn bell_pair() {
    let mut reg = register(2);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::cnot(0, 1).apply(&mut reg).expect("apply should succeed");
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    assert_state_eq(&reg, &[f, Complex64::ZERO, Complex64::ZERO, f]);
    assert_eq!(reg.prediction(1), Prediction::Unknown);
}

#[test]
fn ghz_three() {
    let mut reg = register(3);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::cnot(0, 1).apply(&mut reg).expect("apply should succeed");
    Gate::cnot(1, 2).apply(&mut reg).expect("apply should succeed");
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let mut expected = vec![Complex64::ZERO; 8];
    expected[0b000] = f;
    expected[0b111] = f;
    assert_state_eq(&reg, &expected);
}

#[test]
fn toffoli_flips_the_target_only_with_both_controls_set() {
    let mut reg = register(3);
    reg.collapse(0b011);
    Gate::toffoli(0, 1, 2).apply(&mut reg).expect("apply should succeed");
    let mut expected = vec![Complex64::ZERO; 8];
    expected[0b111] = Complex64::ONE;
    assert_state_eq(&reg, &expected);
    assert_eq!(reg.prediction(2), Prediction::One);

    // One control clear: no flip.
    reg.collapse(0b001);
    Gate::toffoli(0, 1, 2).apply(&mut reg).expect("apply should succeed");
    let mut expected = vec![Complex64::ZERO; 8];
    expected[0b001] = Complex64::ONE;
    assert_state_eq(&reg, &expected);
    assert_eq!(reg.prediction(2), Prediction::Zero);
}

#[test]
fn controlled_phase_shift_scales_the_doubly_set_amplitudes() {
    let mut reg = register(2);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::hadamard(1).apply(&mut reg).expect("apply should succeed");
    Gate::ctrl_phase_shift(1, 0).apply(&mut reg).expect("apply should succeed");
    let half = Complex64::new(0.5, 0.0);
    assert_state_eq(&reg, &[half, half, half, half * Complex64::I]);
}

#[test]
fn self_inverse_gates_return_the_state() {
    // An arbitrary, fully mixed-phase state.
    let mut reg = register(2);
    Gate::rx(0, 0.7).apply(&mut reg).expect("apply should succeed");
    Gate::ry(1, 1.3).apply(&mut reg).expect("apply should succeed");
    Gate::rz(0, 2.1).apply(&mut reg).expect("apply should succeed");
    let reference: Vec<Complex64> = reg.state().to_vec();

    for gate in [
        [Gate::pauli_x(0), Gate::pauli_x(0)],
        [Gate::pauli_y(1), Gate::pauli_y(1)],
        [Gate::pauli_z(0), Gate::pauli_z(0)],
        [Gate::hadamard(1), Gate::hadamard(1)],
        [Gate::swap(0, 1), Gate::swap(0, 1)],
    ] {
        for g in gate {
            g.apply(&mut reg).expect("apply should succeed");
        }
        assert_state_eq(&reg, &reference);
    }
}

#[test]
fn phase_gate_squares_to_pauli_z() {
    let mut reg = register(1);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::phase(0).apply(&mut reg).expect("apply should succeed");
    Gate::phase(0).apply(&mut reg).expect("apply should succeed");
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    assert_state_eq(&reg, &[f, -f]);

    // T·T·T†·T† cancels out.
    let mut reg = register(1);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::t(0).apply(&mut reg).expect("apply should succeed");
    Gate::t(0).apply(&mut reg).expect("apply should succeed");
    Gate::t_dag(0).apply(&mut reg).expect("apply should succeed");
    Gate::t_dag(0).apply(&mut reg).expect("apply should succeed");
    assert_state_eq(&reg, &[f, f]);
}

#[test]
fn three_cnots_equal_a_swap() {
    let mut swapped = register(2);
    Gate::rx(0, 0.9).apply(&mut swapped).expect("apply should succeed");
    Gate::ry(1, 0.4).apply(&mut swapped).expect("apply should succeed");
    let mut chained = QuantumRegister::new_with_seed(2, 1).expect("register should allocate");
    chained.state_mut().copy_from_slice(swapped.state());

    Gate::swap(0, 1).apply(&mut swapped).expect("apply should succeed");
    for gate in [Gate::cnot(0, 1), Gate::cnot(1, 0), Gate::cnot(0, 1)] {
        gate.apply(&mut chained).expect("apply should succeed");
    }
    let expected: Vec<Complex64> = swapped.state().to_vec();
    assert_state_eq(&chained, &expected);
}

#[test]
fn cphase_flips_the_sign_of_one_one() {
    let mut reg = register(2);
    reg.collapse(0b11);
    Gate::cphase(0, 1).apply(&mut reg).expect("apply should succeed");
    let mut expected = vec![Complex64::ZERO; 4];
    expected[0b11] = -Complex64::ONE;
    assert_state_eq(&reg, &expected);
}

#[test]
fn cnot_prediction_follows_the_control() {
    let mut reg = register(2);
    // Control predicted 0: nothing happens to the target prediction.
    Gate::cnot(0, 1).apply(&mut reg).expect("apply should succeed");
    assert_eq!(reg.prediction(1), Prediction::Zero);
    // Control predicted 1: the target prediction flips.
    Gate::pauli_x(0).apply(&mut reg).expect("apply should succeed");
    Gate::cnot(0, 1).apply(&mut reg).expect("apply should succeed");
    assert_eq!(reg.prediction(1), Prediction::One);
    // Control unknown: the target prediction degrades to unknown.
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::cnot(0, 1).apply(&mut reg).expect("apply should succeed");
    assert_eq!(reg.prediction(1), Prediction::Unknown);
}

#[test]
fn measurement_collapses_and_repeats_deterministically() {
    let mut reg = register(1);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    let first = Gate::measure(0).apply(&mut reg).expect("measure should succeed");
    assert!(first == 0 || first == 1);
    assert!(reg.check());
    assert_eq!(reg.measurement(0), first == 1);
    assert_eq!(reg.prediction(0), Prediction::from(first == 1));
    let snapshot: Vec<Complex64> = reg.state().to_vec();

    // An immediate second measurement returns the same bit and leaves the
    // amplitudes untouched.
    let second = Gate::measure(0).apply(&mut reg).expect("measure should succeed");
    assert_eq!(first, second);
    assert_state_eq(&reg, &snapshot);
}

#[test]
fn measurement_updates_the_averaging_counters() {
    let mut reg = register(1);
    reg.collapse(1);
    Gate::measure(0).apply(&mut reg).expect("measure should succeed");
    assert_eq!(reg.averaging()[0].excited, 1);
    assert_eq!(reg.averaging()[0].ground, 0);

    // A silenced measurement leaves the counters alone.
    Measure::without_averaging(0).apply(&mut reg).expect("measure should succeed");
    assert_eq!(reg.averaging()[0].excited, 1);

    // So does any measurement while averaging is disabled register-wide.
    reg.set_averaging_enabled(false);
    Gate::measure(0).apply(&mut reg).expect("measure should succeed");
    assert_eq!(reg.averaging()[0].excited, 1);
}

#[test]
fn prepz_forces_ground_state() {
    let mut reg = register(1);
    reg.collapse(1);
    Gate::prepz(0).apply(&mut reg).expect("apply should succeed");
    assert_state_eq(&reg, &[Complex64::ONE, Complex64::ZERO]);
    assert!(!reg.measurement(0));
    assert_eq!(reg.prediction(0), Prediction::Zero);
    assert_eq!(reg.averaging()[0].excited, 0, "prepz must not count as a shot");

    let mut reg = register(1);
    Gate::hadamard(0).apply(&mut reg).expect("apply should succeed");
    Gate::prepz(0).apply(&mut reg).expect("apply should succeed");
    assert_state_eq(&reg, &[Complex64::ONE, Complex64::ZERO]);
    assert!(!reg.measurement(0));
}

#[test]
fn bin_ctrl_consults_the_measurement_register() {
    let mut reg = register(2);
    Gate::bin_ctrl(0, Gate::pauli_x(1)).apply(&mut reg).expect("apply should succeed");
    assert_state_eq(
        &reg,
        &[Complex64::ONE, Complex64::ZERO, Complex64::ZERO, Complex64::ZERO],
    );

    reg.set_measurement(0, true);
    Gate::bin_ctrl(0, Gate::pauli_x(1)).apply(&mut reg).expect("apply should succeed");
    let mut expected = vec![Complex64::ZERO; 4];
    expected[0b10] = Complex64::ONE;
    assert_state_eq(&reg, &expected);
}

#[test]
fn classical_not_is_purely_classical() {
    let mut reg = register(1);
    let snapshot: Vec<Complex64> = reg.state().to_vec();
    Gate::classical_not(0).apply(&mut reg).expect("apply should succeed");
    assert!(reg.measurement(0));
    assert_eq!(reg.prediction(0), Prediction::Zero);
    assert_state_eq(&reg, &snapshot);
}

#[test]
fn lookup_table_reads_its_codeword_msb_first() {
    let mut table = LookupTable::new(vec![0, 1]);
    table.insert(0b10, Gate::pauli_x(2));
    let gate = Gate::lookup_table(table);

    // measurement(0) = 1 and measurement(1) = 0 reads as 0b10.
    let mut reg = register(3);
    reg.set_measurement(0, true);
    gate.apply(&mut reg).expect("apply should succeed");
    let mut expected = vec![Complex64::ZERO; 8];
    expected[0b100] = Complex64::ONE;
    assert_state_eq(&reg, &expected);

    // Any other codeword has no entry and is a no-op.
    let mut reg = register(3);
    reg.set_measurement(1, true);
    gate.apply(&mut reg).expect("apply should succeed");
    assert_eq!(reg.state()[0], Complex64::ONE);
}

#[test]
fn prepare_loads_a_sparse_state() {
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    let mut amplitudes = FxHashMap::default();
    amplitudes.insert(0u64, f);
    amplitudes.insert(3u64, f * Complex64::I);

    let mut reg = register(2);
    Gate::prepare(amplitudes).apply(&mut reg).expect("apply should succeed");
    assert_state_eq(&reg, &[f, Complex64::ZERO, Complex64::ZERO, f * Complex64::I]);
    assert_eq!(reg.prediction(0), Prediction::Unknown);
    assert_eq!(reg.prediction(1), Prediction::Unknown);
}

#[test]
fn prepare_renormalizes_an_off_norm_state() {
    let mut amplitudes = FxHashMap::default();
    amplitudes.insert(0u64, Complex64::new(3.0, 0.0));
    amplitudes.insert(1u64, Complex64::new(4.0, 0.0));

    let mut reg = register(1);
    Gate::prepare(amplitudes).apply(&mut reg).expect("apply should succeed");
    assert!(reg.check());
    assert_state_eq(&reg, &[Complex64::new(0.6, 0.0), Complex64::new(0.8, 0.0)]);
}

#[test]
fn prepare_rejects_out_of_range_basis_states() {
    let mut amplitudes = FxHashMap::default();
    amplitudes.insert(4u64, Complex64::ONE);
    let mut reg = register(2);
    assert!(matches!(
        Gate::prepare(amplitudes).apply(&mut reg),
        Err(Error::QubitOutOfRange { qubit: 2, qubits: 2 })
    ));
}

#[test]
fn qft_of_the_ground_state_is_uniform() {
    let mut reg = register(2);
    Gate::qft(vec![1, 0]).apply(&mut reg).expect("apply should succeed");
    let half = Complex64::new(0.5, 0.0);
    assert_state_eq(&reg, &[half, half, half, half]);
}

#[test]
fn qft_matches_the_discrete_fourier_transform() {
    // With the qubit list given most significant first, the gate computes
    // the DFT on the little-endian basis index: |1> -> (1/2) Σ_j i^j |j>.
    let mut reg = register(2);
    reg.collapse(1);
    Gate::qft(vec![1, 0]).apply(&mut reg).expect("apply should succeed");
    let half = Complex64::new(0.5, 0.0);
    assert_state_eq(
        &reg,
        &[half, half * Complex64::I, -half, -half * Complex64::I],
    );
}

#[test]
fn qft_on_a_single_qubit_is_a_hadamard() {
    let mut reg = register(1);
    reg.collapse(1);
    Gate::qft(vec![0]).apply(&mut reg).expect("apply should succeed");
    let f = Complex64::new(FRAC_1_SQRT_2, 0.0);
    assert_state_eq(&reg, &[f, -f]);
}

#[test]
fn custom_gates_are_rejected_without_mutation() {
    let mut reg = register(1);
    let snapshot: Vec<Complex64> = reg.state().to_vec();
    let gate = Gate::custom(vec![0], DMatrix::identity(2, 2));
    assert!(matches!(gate.apply(&mut reg), Err(Error::UnsupportedCustomGate)));
    assert_state_eq(&reg, &snapshot);
    assert_eq!(gate.kind(), GateKind::Custom);
}

#[test]
fn out_of_range_qubits_are_reported() {
    let mut reg = register(2);
    assert!(matches!(
        Gate::hadamard(5).apply(&mut reg),
        Err(Error::QubitOutOfRange { qubit: 5, qubits: 2 })
    ));
    assert!(matches!(
        Gate::cnot(0, 2).apply(&mut reg),
        Err(Error::QubitOutOfRange { qubit: 2, qubits: 2 })
    ));
}

#[test]
fn gate_introspection_reports_the_qubit_sets() {
    let gate = Gate::cnot(3, 1);
    assert_eq!(gate.qubits(), vec![3, 1]);
    assert_eq!(gate.control_qubits(), vec![3]);
    assert_eq!(gate.target_qubits(), vec![1]);
    assert_eq!(gate.kind(), GateKind::Cnot);
    assert_eq!(gate.duration(), 0);

    let gate = Gate::toffoli(0, 1, 2);
    assert_eq!(gate.control_qubits(), vec![0, 1]);
    assert_eq!(gate.target_qubits(), vec![2]);

    let gate = Gate::parallel(vec![Gate::hadamard(0), Gate::pauli_x(2)]);
    assert_eq!(gate.qubits(), vec![0, 2]);
    assert_eq!(gate.kind(), GateKind::Parallel);

    assert_eq!(Gate::measure_register().qubits(), Vec::<usize>::new());
    assert_eq!(Gate::display().kind(), GateKind::Display);
    assert_eq!(Gate::display_binary().kind(), GateKind::DisplayBinary);
    assert_eq!(Gate::print("hello").kind(), GateKind::PrintStr);
}
