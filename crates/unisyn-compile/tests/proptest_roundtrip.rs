//! Property-based round-trip tests for unitary synthesis.
//!
//! Random unitaries are compiled and the embedded synthesis is compared
//! against the embedded input, with and without the tracked global phase.

use ndarray::Array2;
use ndarray::linalg::kron;
use num_complex::Complex64;
use proptest::prelude::*;
use unisyn_compile::so4::{factorize, magic_image, quaternion_to_su2};
use unisyn_compile::{Compiler, single_qubit};
use unisyn_ir::unitary::{is_unitary, max_abs_diff, phase_between};
use unisyn_ir::{DenseMatrix, SparseMatrix, Wire, embed, embed_operator};

const TOL: f64 = 1e-8;

/// Orthonormalise the columns of a random complex matrix.
fn gram_schmidt(dim: usize, raw: &[f64]) -> Option<DenseMatrix> {
    let mut m = Array2::from_shape_fn((dim, dim), |(i, j)| {
        let k = 2 * (i * dim + j);
        Complex64::new(raw[k], raw[k + 1])
    });
    for j in 0..dim {
        for prev in 0..j {
            let proj: Complex64 = (0..dim).map(|i| m[(i, prev)].conj() * m[(i, j)]).sum();
            for i in 0..dim {
                let v = m[(i, prev)];
                m[(i, j)] -= proj * v;
            }
        }
        let norm = (0..dim).map(|i| m[(i, j)].norm_sqr()).sum::<f64>().sqrt();
        if norm < 1e-3 {
            return None;
        }
        for i in 0..dim {
            m[(i, j)] /= norm;
        }
    }
    Some(m)
}

fn arb_unitary(dim: usize) -> impl Strategy<Value = DenseMatrix> {
    prop::collection::vec(-1.0_f64..1.0, 2 * dim * dim)
        .prop_filter_map("degenerate columns", move |raw| gram_schmidt(dim, &raw))
}

/// A unit quaternion, as an SU(2) matrix.
fn arb_su2() -> impl Strategy<Value = DenseMatrix> {
    prop::array::uniform4(-1.0_f64..1.0).prop_filter_map("near zero", |q| {
        let norm = q.iter().map(|v| v * v).sum::<f64>().sqrt();
        (norm > 1e-3).then(|| quaternion_to_su2(q.map(|v| v / norm)))
    })
}

/// Register size and `k` distinct wires in it, in random order.
fn arb_placement(k: u32) -> impl Strategy<Value = (u32, Vec<Wire>)> {
    (k..=k + 2).prop_flat_map(move |n| {
        (
            Just(n),
            Just(Wire::range(n))
                .prop_shuffle()
                .prop_map(move |w| w[..k as usize].to_vec()),
        )
    })
}

fn embedded_input(m: &DenseMatrix, wires: &[Wire], n: u32) -> SparseMatrix {
    embed_operator(&SparseMatrix::from_dense(m), wires, n).unwrap()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn single_qubit_round_trip(m in arb_unitary(2), (n, wires) in arb_placement(1)) {
        let synthesis = Compiler::new().compile(&m, n, Some(wires.as_slice())).unwrap();
        let expected = embedded_input(&m, &wires, n);
        prop_assert!(embed(&synthesis, n).unwrap().approx_eq(&expected, TOL));
    }

    #[test]
    fn two_qubit_round_trip(m in arb_unitary(4), (n, wires) in arb_placement(2)) {
        let compiler = Compiler::new();
        let synthesis = compiler.compile(&m, n, Some(wires.as_slice())).unwrap();
        let expected = embedded_input(&m, &wires, n);
        prop_assert!(embed(&synthesis, n).unwrap().approx_eq(&expected, TOL));
        prop_assert!(compiler.verify(&m, &synthesis, n, Some(wires.as_slice())).is_ok());

        // the bare gates match up to a phase
        let bare = embed(&synthesis.sequence, n).unwrap().to_dense();
        prop_assert!(phase_between(&expected.to_dense(), &bare, TOL).is_some());
    }

    #[test]
    fn diagonal_round_trip(
        (k, angles) in (1_u32..=6).prop_flat_map(|k| {
            (Just(k), prop::collection::vec(-3.2_f64..3.2, 1 << k))
        })
    ) {
        let entries: Vec<Complex64> = angles.iter().map(|&a| Complex64::from_polar(1.0, a)).collect();
        let synthesis = Compiler::new().synthesize_diagonal(&entries, k, None).unwrap();
        let full = embed(&synthesis, k).unwrap();
        for (i, z) in entries.iter().enumerate() {
            prop_assert!((full.get(i, i) - z).norm() < TOL);
        }
        prop_assert_eq!(full.nnz(), entries.len());
    }

    #[test]
    fn so4_factorization_recovers_pair(a in arb_su2(), b in arb_su2()) {
        let (fa, fb) = factorize(&magic_image(&a, &b), 1e-9).unwrap();
        // The pair is recovered up to one shared sign.
        let direct = max_abs_diff(&fa, &a) < TOL && max_abs_diff(&fb, &b) < TOL;
        let negated = max_abs_diff(&fa, &(-&a)) < TOL && max_abs_diff(&fb, &(-&b)) < TOL;
        prop_assert!(direct || negated);
    }

    #[test]
    fn so4_factorization_of_negated_image(a in arb_su2(), b in arb_su2()) {
        // (-A) ⊗ B has the negated image; factorization must still succeed.
        let neg_a = -&a;
        let (fa, fb) = factorize(&magic_image(&neg_a, &b), 1e-9).unwrap();
        let rebuilt = magic_image(&fa, &fb);
        prop_assert!(max_abs_diff(&rebuilt, &magic_image(&neg_a, &b)) < TOL);
    }

    #[test]
    fn zxz_reconstructs(m in arb_unitary(2)) {
        let zxz = single_qubit::synthesize(&m, 1e-9).unwrap();
        prop_assert!(max_abs_diff(&zxz.matrix(), &m) < TOL);
        prop_assert!((zxz.phase.norm() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn untouched_wires_stay_identity(m in arb_unitary(4)) {
        // compiled on wires 1, 2 of three; wire 3 only sees the identity
        let synthesis = Compiler::new().compile(&m, 3, None).unwrap();
        let full = embed(&synthesis, 3).unwrap().to_dense();
        let expected = kron(&m, &DenseMatrix::eye(2));
        prop_assert!(max_abs_diff(&full, &expected) < TOL);
        prop_assert!(is_unitary(&full, TOL));
    }
}

// ----------------------------------------------------------------------------
// Sampled large diagonals
// ----------------------------------------------------------------------------

#[test]
fn diagonal_round_trip_ten_wires() {
    let k = 10_u32;
    let entries: Vec<Complex64> = (0..1_u32 << k)
        .map(|i| Complex64::from_polar(1.0, (f64::from(i) * 0.618_033_988).sin() * 3.0))
        .collect();
    let synthesis = Compiler::new()
        .synthesize_diagonal(&entries, k, None)
        .unwrap();
    assert_eq!(synthesis.len(), (1 << (k + 1)) - 3);
    let full = embed(&synthesis, k).unwrap();
    let worst = entries
        .iter()
        .enumerate()
        .map(|(i, z)| (full.get(i, i) - z).norm())
        .fold(0.0, f64::max);
    assert!(worst < 1e-9, "worst entry deviation {worst}");
}
