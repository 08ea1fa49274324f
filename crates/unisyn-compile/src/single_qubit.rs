//! Closed-form ZXZ decomposition of 2×2 unitaries.
//!
//! A unitary `M` is written as `phase · Rz(second_z) · Rx(x) · Rz(first_z)`,
//! i.e. `Rz(first_z)` is applied first.

use std::f64::consts::PI;

use num_complex::Complex64;
use unisyn_ir::unitary::{is_unitary, max_abs_diff, unitarity_deviation};
use unisyn_ir::{DenseMatrix, Gate, GateSequence, Wire};

use crate::error::{SynthError, SynthResult};

/// Euler angles and phase of a single-qubit unitary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ZxzDecomposition {
    /// Angle of the first (earliest applied) Z rotation.
    pub first_z: f64,
    /// Angle of the X rotation.
    pub x: f64,
    /// Angle of the last Z rotation.
    pub second_z: f64,
    /// Unit-modulus factor multiplying the rotation product.
    pub phase: Complex64,
}

impl ZxzDecomposition {
    /// The three rotations on `wire`, in application order.
    pub fn gates(&self, wire: Wire) -> SynthResult<GateSequence> {
        let mut seq = GateSequence::with_capacity(3);
        seq.rz(self.first_z, wire)?
            .rx(self.x, wire)?
            .rz(self.second_z, wire)?;
        Ok(seq)
    }

    /// The rotation product without the phase.
    pub fn rotation_matrix(&self) -> DenseMatrix {
        Gate::Rz(self.second_z)
            .matrix()
            .dot(&Gate::Rx(self.x).matrix())
            .dot(&Gate::Rz(self.first_z).matrix())
    }

    /// The reconstructed unitary, phase included.
    pub fn matrix(&self) -> DenseMatrix {
        self.rotation_matrix() * self.phase
    }
}

/// Decompose a 2×2 unitary.
///
/// Diagonal and anti-diagonal inputs (`sin x = 0`) are handled by their own
/// branches: the general formulas divide by `sin x`.
pub fn synthesize(matrix: &DenseMatrix, tolerance: f64) -> SynthResult<ZxzDecomposition> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(SynthError::NotSquare { rows, cols });
    }
    if rows != 2 {
        return Err(SynthError::UnsupportedSize(rows));
    }
    if !is_unitary(matrix, tolerance) {
        return Err(SynthError::NotUnitary {
            deviation: unitarity_deviation(matrix),
        });
    }

    let (m11, m12, m21, m22) = (
        matrix[(0, 0)],
        matrix[(0, 1)],
        matrix[(1, 0)],
        matrix[(1, 1)],
    );

    let (first_z, x, second_z) = if m21.norm() < tolerance {
        ((m22 * m11.conj()).arg(), 0.0, 0.0)
    } else if m11.norm() < tolerance {
        ((m12 * m21.conj()).arg(), PI, 0.0)
    } else {
        let prod = m11 * m22;
        let p = (prod / prod.norm()).sqrt();
        let (b11, b21, b22) = (m11 / p, m21 / p, m22 / p);
        let x = 2.0 * (b11 * b22).sqrt().acos().re;
        let two_i = Complex64::new(0.0, 2.0);
        let sin = x.sin();
        let second_z = (two_i * b21 * b22 / sin).ln().im;
        let first_z = -(two_i * b11 * b21 / sin).ln().im;
        (first_z, x, second_z)
    };

    let mut decomposition = ZxzDecomposition {
        first_z,
        x,
        second_z,
        phase: Complex64::new(1.0, 0.0),
    };
    decomposition.phase = phase_against(matrix, &decomposition.rotation_matrix(), tolerance)?;
    Ok(decomposition)
}

/// The unit-modulus factor `φ` with `target ≈ φ·rotations`.
fn phase_against(
    target: &DenseMatrix,
    rotations: &DenseMatrix,
    tolerance: f64,
) -> SynthResult<Complex64> {
    let (idx, pivot) = rotations
        .indexed_iter()
        .max_by(|(_, a), (_, b)| a.norm().total_cmp(&b.norm()))
        .ok_or(SynthError::UnsupportedSize(0))?;
    let ratio = target[idx] / pivot;
    let phase = ratio / ratio.norm();
    let deviation = max_abs_diff(target, &(rotations * phase));
    if deviation > tolerance.sqrt() {
        return Err(SynthError::VerificationFailed { deviation });
    }
    Ok(phase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    const TOL: f64 = 1e-9;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    fn assert_reconstructs(m: &DenseMatrix) -> ZxzDecomposition {
        let d = synthesize(m, TOL).unwrap();
        assert!(max_abs_diff(&d.matrix(), m) < 1e-10, "{d:?}");
        assert!((d.phase.norm() - 1.0).abs() < 1e-12);
        d
    }

    #[test]
    fn test_identity_has_zero_angles() {
        let d = assert_reconstructs(&Gate::I.matrix());
        assert!(d.first_z.abs() < 1e-12);
        assert!(d.x.abs() < 1e-12);
        assert!(d.second_z.abs() < 1e-12);
    }

    #[test]
    fn test_elementary_gates() {
        for gate in [
            Gate::H,
            Gate::X,
            Gate::Y,
            Gate::Z,
            Gate::S,
            Gate::Tdg,
            Gate::Rx(0.7),
            Gate::Ry(-2.1),
            Gate::Rz(3.0),
        ] {
            assert_reconstructs(&gate.matrix());
        }
    }

    #[test]
    fn test_anti_diagonal_branch() {
        let m = array![[c(0.0, 0.0), c(0.6, 0.8)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let d = assert_reconstructs(&m);
        assert!((d.x - PI).abs() < 1e-12);
    }

    #[test]
    fn test_gates_apply_in_order() {
        let d = synthesize(&Gate::H.matrix(), TOL).unwrap();
        let seq = d.gates(Wire(3)).unwrap();
        let names: Vec<String> = seq.iter().map(|g| g.name()).collect();
        assert_eq!(names, vec!["rz", "rx", "rz"]);
        assert!(seq.iter().all(|g| g.wires() == [Wire(3)]));
    }

    #[test]
    fn test_rejects_bad_input() {
        let m = array![[c(1.0, 0.0), c(1.0, 0.0)], [c(0.0, 0.0), c(1.0, 0.0)]];
        assert!(matches!(
            synthesize(&m, TOL),
            Err(SynthError::NotUnitary { .. })
        ));
        assert!(matches!(
            synthesize(&Gate::cx().matrix(), TOL),
            Err(SynthError::UnsupportedSize(4))
        ));
    }
}
