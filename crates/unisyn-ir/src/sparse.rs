//! Compressed sparse row operators.
//!
//! Full-register operators grow as `2^N × 2^N`, but the embedding of a
//! k-wire gate only has `nnz(G) · 2^(N-k)` non-zero entries. [`SparseMatrix`]
//! wraps a square [`CsrMatrix`] so embeddings and their products never
//! materialise the dense matrix.

use nalgebra_sparse::coo::CooMatrix;
use nalgebra_sparse::csr::CsrMatrix;
use ndarray::Array2;
use num_complex::Complex64;

use crate::unitary::{DenseMatrix, ZERO};

/// A square complex matrix in compressed sparse row form.
#[derive(Debug, Clone, PartialEq)]
pub struct SparseMatrix {
    inner: CsrMatrix<Complex64>,
}

impl SparseMatrix {
    /// Build from `(row, col, value)` triplets. Duplicate positions are summed.
    ///
    /// # Panics
    ///
    /// Panics if a triplet lies outside `dim × dim`.
    pub fn from_triplets(dim: usize, triplets: Vec<(usize, usize, Complex64)>) -> Self {
        let mut coo = CooMatrix::new(dim, dim);
        for (r, c, v) in triplets {
            coo.push(r, c, v);
        }
        Self {
            inner: CsrMatrix::from(&coo),
        }
    }

    /// Build from a square dense matrix, dropping exact zeros.
    ///
    /// # Panics
    ///
    /// Panics if `dense` is not square.
    pub fn from_dense(dense: &DenseMatrix) -> Self {
        assert!(dense.is_square(), "sparse operators must be square");
        let triplets = dense
            .indexed_iter()
            .filter(|(_, z)| **z != ZERO)
            .map(|((r, c), z)| (r, c, *z))
            .collect();
        Self::from_triplets(dense.nrows(), triplets)
    }

    /// The `dim × dim` identity.
    pub fn identity(dim: usize) -> Self {
        Self {
            inner: CsrMatrix::identity(dim),
        }
    }

    /// The underlying CSR storage.
    #[inline]
    pub fn as_csr(&self) -> &CsrMatrix<Complex64> {
        &self.inner
    }

    /// Side length.
    #[inline]
    pub fn dim(&self) -> usize {
        self.inner.nrows()
    }

    /// Number of stored entries.
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inner.nnz()
    }

    /// Entry at `(row, col)`; zero when not stored.
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.inner
            .get_entry(row, col)
            .map_or(ZERO, |entry| entry.into_value())
    }

    /// Iterate stored entries as `(row, col, value)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, Complex64)> + '_ {
        self.inner.triplet_iter().map(|(r, c, v)| (r, c, *v))
    }

    /// Matrix product `self · rhs`, with cancelled entries dropped.
    ///
    /// # Panics
    ///
    /// Panics if the dimensions differ.
    pub fn matmul(&self, rhs: &SparseMatrix) -> SparseMatrix {
        assert_eq!(self.dim(), rhs.dim(), "dimension mismatch in sparse product");
        let product = &self.inner * &rhs.inner;
        Self {
            inner: product.filter(|_, _, v| *v != ZERO),
        }
    }

    /// Conjugate transpose.
    pub fn adjoint(&self) -> SparseMatrix {
        let mut inner = self.inner.transpose();
        for v in inner.values_mut() {
            *v = v.conj();
        }
        Self { inner }
    }

    /// Multiply every entry by `factor`.
    #[must_use]
    pub fn scale(mut self, factor: Complex64) -> SparseMatrix {
        for v in self.inner.values_mut() {
            *v *= factor;
        }
        self
    }

    /// Expand to a dense matrix.
    pub fn to_dense(&self) -> DenseMatrix {
        let mut dense = Array2::zeros((self.dim(), self.dim()));
        for (r, c, v) in self.iter() {
            dense[(r, c)] = v;
        }
        dense
    }

    /// Largest absolute entry-wise difference, `INFINITY` on dimension mismatch.
    pub fn max_abs_diff(&self, other: &SparseMatrix) -> f64 {
        if self.dim() != other.dim() {
            return f64::INFINITY;
        }
        let diff = &self.inner - &other.inner;
        diff.values().iter().map(|z| z.norm()).fold(0.0, f64::max)
    }

    /// Entry-wise comparison within `tolerance`.
    pub fn approx_eq(&self, other: &SparseMatrix, tolerance: f64) -> bool {
        self.max_abs_diff(other) <= tolerance
    }
}

impl From<CsrMatrix<Complex64>> for SparseMatrix {
    /// # Panics
    ///
    /// Panics if `inner` is not square.
    fn from(inner: CsrMatrix<Complex64>) -> Self {
        assert_eq!(inner.nrows(), inner.ncols(), "sparse operators must be square");
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unitary::ONE;
    use ndarray::array;

    fn c(re: f64, im: f64) -> Complex64 {
        Complex64::new(re, im)
    }

    #[test]
    fn test_from_triplets_sums_duplicates() {
        let m = SparseMatrix::from_triplets(
            2,
            vec![(1, 0, c(1.0, 0.0)), (0, 1, c(2.0, 0.0)), (1, 0, c(0.0, 1.0))],
        );
        assert_eq!(m.nnz(), 2);
        assert_eq!(m.get(1, 0), c(1.0, 1.0));
        assert_eq!(m.get(0, 1), c(2.0, 0.0));
        assert_eq!(m.get(0, 0), ZERO);
    }

    #[test]
    fn test_dense_round_trip() {
        let dense = array![[c(0.0, 0.0), c(0.0, -1.0)], [c(0.0, 1.0), c(0.0, 0.0)]];
        let sparse = SparseMatrix::from_dense(&dense);
        assert_eq!(sparse.nnz(), 2);
        assert_eq!(sparse.to_dense(), dense);
    }

    #[test]
    fn test_matmul_matches_dense() {
        let a = array![[c(1.0, 0.0), c(2.0, 1.0)], [c(0.0, 0.0), c(-1.0, 0.5)]];
        let b = array![[c(0.0, 1.0), c(0.0, 0.0)], [c(3.0, 0.0), c(1.0, -1.0)]];
        let product = SparseMatrix::from_dense(&a).matmul(&SparseMatrix::from_dense(&b));
        let expected = a.dot(&b);
        assert!(product.approx_eq(&SparseMatrix::from_dense(&expected), 1e-12));
    }

    #[test]
    fn test_identity_and_adjoint() {
        let id = SparseMatrix::identity(4);
        assert_eq!(id.nnz(), 4);
        assert_eq!(id.get(3, 3), ONE);
        assert_eq!(id.get(7, 0), ZERO);

        let m = SparseMatrix::from_triplets(2, vec![(0, 1, c(0.0, 2.0))]);
        let adj = m.adjoint();
        assert_eq!(adj.get(1, 0), c(0.0, -2.0));
        assert_eq!(adj.get(0, 1), ZERO);
    }

    #[test]
    fn test_cancelled_products_are_dropped() {
        let h = SparseMatrix::from_triplets(
            2,
            vec![
                (0, 0, c(1.0, 0.0)),
                (0, 1, c(1.0, 0.0)),
                (1, 0, c(1.0, 0.0)),
                (1, 1, c(-1.0, 0.0)),
            ],
        );
        let square = h.matmul(&h);
        assert_eq!(square.nnz(), 2);
        assert_eq!(square.get(0, 0), c(2.0, 0.0));
        assert_eq!(square.as_csr().ncols(), 2);
    }

    #[test]
    fn test_scale_and_diff() {
        let id = SparseMatrix::identity(2);
        let scaled = id.clone().scale(c(0.0, 1.0));
        assert!((id.max_abs_diff(&scaled) - 2.0_f64.sqrt()).abs() < 1e-12);
        assert!(id.max_abs_diff(&SparseMatrix::identity(4)).is_infinite());
    }
}
