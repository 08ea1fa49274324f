//! Dense complex matrix helpers.
//!
//! Dense operators are `ndarray` arrays of `Complex64`. These helpers cover
//! the handful of linear-algebra queries the synthesizers and the
//! verification code need: conjugate transpose, unitarity and diagonality
//! checks and comparison up to a global phase.

use ndarray::Array2;
use num_complex::Complex64;

/// A dense complex matrix.
pub type DenseMatrix = Array2<Complex64>;

pub(crate) const ZERO: Complex64 = Complex64::new(0.0, 0.0);
pub(crate) const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Number of qubits `n` such that `dim == 2^n`, if `dim` is a power of two.
pub fn num_qubits_for_dim(dim: usize) -> Option<u32> {
    if dim.is_power_of_two() {
        Some(dim.trailing_zeros())
    } else {
        None
    }
}

/// Conjugate transpose.
pub fn dagger(m: &DenseMatrix) -> DenseMatrix {
    m.t().mapv(|z| z.conj())
}

/// Largest absolute entry of `M·M† − I`.
///
/// Returns `f64::INFINITY` for non-square input.
pub fn unitarity_deviation(m: &DenseMatrix) -> f64 {
    if !m.is_square() {
        return f64::INFINITY;
    }
    let product = m.dot(&dagger(m));
    product
        .indexed_iter()
        .map(|((i, j), z)| {
            let expected = if i == j { ONE } else { ZERO };
            (z - expected).norm()
        })
        .fold(0.0, f64::max)
}

/// Check `M·M† ≈ I` within `tolerance`.
pub fn is_unitary(m: &DenseMatrix, tolerance: f64) -> bool {
    unitarity_deviation(m) <= tolerance
}

/// Check that every off-diagonal entry is within `tolerance` of zero.
pub fn is_diagonal(m: &DenseMatrix, tolerance: f64) -> bool {
    m.indexed_iter()
        .all(|((i, j), z)| i == j || z.norm() <= tolerance)
}

/// Largest absolute entry-wise difference. Shapes must agree.
pub fn max_abs_diff(a: &DenseMatrix, b: &DenseMatrix) -> f64 {
    if a.dim() != b.dim() {
        return f64::INFINITY;
    }
    a.iter()
        .zip(b.iter())
        .map(|(x, y)| (x - y).norm())
        .fold(0.0, f64::max)
}

/// The unit-modulus factor `φ` with `a ≈ φ·b`, if one exists within `tolerance`.
///
/// The candidate phase is read off the largest entry of `b`.
pub fn phase_between(a: &DenseMatrix, b: &DenseMatrix, tolerance: f64) -> Option<Complex64> {
    if a.dim() != b.dim() {
        return None;
    }
    let (idx, pivot) = b
        .indexed_iter()
        .max_by(|(_, x), (_, y)| x.norm().total_cmp(&y.norm()))?;
    if pivot.norm() <= tolerance {
        return None;
    }
    let ratio = a[idx] / pivot;
    let phase = ratio / ratio.norm();
    let scaled = b.mapv(|z| z * phase);
    (max_abs_diff(a, &scaled) <= tolerance).then_some(phase)
}

/// Build a diagonal matrix from its entries.
pub fn from_diagonal(entries: &[Complex64]) -> DenseMatrix {
    let mut m = Array2::zeros((entries.len(), entries.len()));
    for (i, z) in entries.iter().enumerate() {
        m[(i, i)] = *z;
    }
    m
}
