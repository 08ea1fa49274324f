//! Property-based tests for operator embedding.
//!
//! Checks that embedding is multiplicative over sequences, respects the
//! tensor convention for single-wire gates, and commutes with the adjoint.

use ndarray::Array2;
use ndarray::linalg::kron;
use num_complex::Complex64;
use proptest::prelude::*;
use unisyn_ir::unitary::{dagger, is_unitary, max_abs_diff};
use unisyn_ir::{CircuitGate, Gate, GateSequence, Wire, embed};

const TOL: f64 = 1e-10;

/// Gates drawn from the elementary set plus CX and CCX.
fn arb_gate() -> impl Strategy<Value = Gate> {
    prop_oneof![
        Just(Gate::H),
        Just(Gate::X),
        Just(Gate::Y),
        Just(Gate::Z),
        Just(Gate::S),
        Just(Gate::Sdg),
        Just(Gate::T),
        Just(Gate::Tdg),
        (-3.2_f64..3.2).prop_map(Gate::Rx),
        (-3.2_f64..3.2).prop_map(Gate::Ry),
        (-3.2_f64..3.2).prop_map(Gate::Rz),
        Just(Gate::cx()),
        Just(Gate::controlled(Gate::X, 2)),
    ]
}

/// A circuit gate on distinct wires of an `n`-wire register.
///
/// Gates that need more wires than the register has are replaced by H.
fn arb_circuit_gate(num_wires: u32) -> impl Strategy<Value = CircuitGate> {
    (arb_gate(), Just(Wire::range(num_wires)).prop_shuffle()).prop_map(move |(gate, wires)| {
        let gate = if gate.num_qubits() > num_wires { Gate::H } else { gate };
        let arity = gate.num_qubits() as usize;
        CircuitGate::new(wires.into_iter().take(arity), gate).unwrap()
    })
}

fn arb_sequence(num_wires: u32) -> impl Strategy<Value = GateSequence> {
    prop::collection::vec(arb_circuit_gate(num_wires), 0..=8)
        .prop_map(|gates| gates.into_iter().collect())
}

fn identity(dim: usize) -> Array2<Complex64> {
    Array2::eye(dim)
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn embedding_is_multiplicative(
        (n, a, b) in (1_u32..=4).prop_flat_map(|n| (Just(n), arb_sequence(n), arb_sequence(n)))
    ) {
        let mut joined = a.clone();
        joined.extend(b.iter().cloned());

        let whole = embed(&joined, n).unwrap();
        let product = embed(&b, n).unwrap().matmul(&embed(&a, n).unwrap());
        prop_assert!(whole.approx_eq(&product, TOL));
    }

    #[test]
    fn single_wire_gate_is_local(
        (n, w) in (1_u32..=5).prop_flat_map(|n| (Just(n), 1..=n)),
        gate in prop_oneof![
            Just(Gate::H),
            Just(Gate::Y),
            (-3.2_f64..3.2).prop_map(Gate::Rx),
            (-3.2_f64..3.2).prop_map(Gate::Rz),
        ],
    ) {
        let placed = CircuitGate::single(gate.clone(), Wire(w)).unwrap();
        let full = embed(&placed, n).unwrap().to_dense();

        let left = identity(1 << (w - 1));
        let right = identity(1 << (n - w));
        let expected = kron(&kron(&left, &gate.matrix()), &right);
        prop_assert!(max_abs_diff(&full, &expected) < TOL);
    }

    #[test]
    fn adjoint_sequence_embeds_to_dagger(
        (n, seq) in (1_u32..=4).prop_flat_map(|n| (Just(n), arb_sequence(n)))
    ) {
        let forward = embed(&seq, n).unwrap().to_dense();
        let backward = embed(&seq.adjoint(), n).unwrap().to_dense();
        prop_assert!(max_abs_diff(&backward, &dagger(&forward)) < TOL);
        prop_assert!(is_unitary(&forward, TOL));
    }

    #[test]
    fn remap_onto_larger_register_matches_kron(
        seq in arb_sequence(2)
    ) {
        // wires 1, 2 of the local sequence become wires 2, 3 of a 3-wire register
        let moved = seq.remap(&[Wire(2), Wire(3)]).unwrap();
        let full = embed(&moved, 3).unwrap().to_dense();
        let expected = kron(&identity(2), &embed(&seq, 2).unwrap().to_dense());
        prop_assert!(max_abs_diff(&full, &expected) < TOL);
    }
}

// ----------------------------------------------------------------------------
// Fixed scenarios
// ----------------------------------------------------------------------------

#[test]
fn embedding_preserves_sparsity_for_permutations() {
    let mut seq = GateSequence::new();
    seq.x(Wire(1)).unwrap().cx(Wire(1), Wire(3)).unwrap();
    seq.apply(Gate::controlled(Gate::X, 2), [Wire(3), Wire(1), Wire(4)])
        .unwrap();
    let full = embed(&seq, 6).unwrap();
    assert_eq!(full.dim(), 64);
    assert_eq!(full.nnz(), 64);
}

#[test]
fn wire_out_of_range_is_rejected() {
    let gate = CircuitGate::cx(Wire(1), Wire(5)).unwrap();
    assert!(embed(&gate, 4).is_err());
    assert!(embed(&gate, 5).is_ok());
}
