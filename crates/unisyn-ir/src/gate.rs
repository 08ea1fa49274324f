//! Elementary gate operators.
//!
//! The gate set is a closed union: the fixed-matrix Clifford+T gates, the
//! three axis rotations, a controlled wrapper around any other gate and a
//! fallback [`MatrixGate`] carrying an arbitrary dense unitary.

use std::f64::consts::FRAC_1_SQRT_2;
use std::f64::consts::FRAC_PI_4;

use ndarray::{Array2, array};
use num_complex::Complex64;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::sparse::SparseMatrix;
use crate::unitary::{DenseMatrix, ONE, ZERO, dagger, max_abs_diff, num_qubits_for_dim};

const I_UNIT: Complex64 = Complex64::new(0.0, 1.0);

/// A gate operator of fixed arity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Gate {
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,
    /// Rotation around X: `exp(-iθX/2)`.
    Rx(f64),
    /// Rotation around Y: `exp(-iθY/2)`.
    Ry(f64),
    /// Rotation around Z: `exp(-iθZ/2)`.
    Rz(f64),
    /// `base` conditioned on `num_controls` leading control wires.
    Controlled {
        /// The gate applied when every control is set.
        base: Box<Gate>,
        /// Number of control wires.
        num_controls: u32,
    },
    /// An arbitrary dense operator.
    Matrix(MatrixGate),
}

impl Gate {
    /// Controlled-NOT.
    pub fn cx() -> Self {
        Self::controlled(Gate::X, 1)
    }

    /// Wrap `base` with `num_controls` controls.
    pub fn controlled(base: Gate, num_controls: u32) -> Self {
        Gate::Controlled {
            base: Box::new(base),
            num_controls,
        }
    }

    /// Get the name of this gate.
    pub fn name(&self) -> String {
        match self {
            Gate::I => "id".into(),
            Gate::H => "h".into(),
            Gate::X => "x".into(),
            Gate::Y => "y".into(),
            Gate::Z => "z".into(),
            Gate::S => "s".into(),
            Gate::Sdg => "sdg".into(),
            Gate::T => "t".into(),
            Gate::Tdg => "tdg".into(),
            Gate::Rx(_) => "rx".into(),
            Gate::Ry(_) => "ry".into(),
            Gate::Rz(_) => "rz".into(),
            Gate::Controlled { base, num_controls } => {
                format!("{}{}", "c".repeat(*num_controls as usize), base.name())
            }
            Gate::Matrix(m) => m.name.clone(),
        }
    }

    /// Get the number of wires this gate acts on.
    pub fn num_qubits(&self) -> u32 {
        match self {
            Gate::Controlled { base, num_controls } => base.num_qubits() + num_controls,
            Gate::Matrix(m) => m.num_qubits,
            _ => 1,
        }
    }

    /// Dense `2^k × 2^k` matrix.
    pub fn matrix(&self) -> DenseMatrix {
        match self {
            Gate::I => Array2::eye(2),
            Gate::H => {
                let s = Complex64::new(FRAC_1_SQRT_2, 0.0);
                array![[s, s], [s, -s]]
            }
            Gate::X => array![[ZERO, ONE], [ONE, ZERO]],
            Gate::Y => array![[ZERO, -I_UNIT], [I_UNIT, ZERO]],
            Gate::Z => array![[ONE, ZERO], [ZERO, -ONE]],
            Gate::S => array![[ONE, ZERO], [ZERO, I_UNIT]],
            Gate::Sdg => array![[ONE, ZERO], [ZERO, -I_UNIT]],
            Gate::T => array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, FRAC_PI_4)]],
            Gate::Tdg => array![[ONE, ZERO], [ZERO, Complex64::from_polar(1.0, -FRAC_PI_4)]],
            Gate::Rx(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new(0.0, -(theta / 2.0).sin());
                array![[c, s], [s, c]]
            }
            Gate::Ry(theta) => {
                let c = Complex64::new((theta / 2.0).cos(), 0.0);
                let s = Complex64::new((theta / 2.0).sin(), 0.0);
                array![[c, -s], [s, c]]
            }
            Gate::Rz(theta) => array![
                [Complex64::from_polar(1.0, -theta / 2.0), ZERO],
                [ZERO, Complex64::from_polar(1.0, theta / 2.0)]
            ],
            Gate::Controlled { base, .. } => {
                let dim = 1usize << self.num_qubits();
                let block = base.matrix();
                let offset = dim - block.nrows();
                let mut m = Array2::eye(dim);
                m.slice_mut(ndarray::s![offset.., offset..]).assign(&block);
                m
            }
            Gate::Matrix(m) => m.matrix(),
        }
    }

    /// Sparse `2^k × 2^k` matrix.
    pub fn sparse_matrix(&self) -> SparseMatrix {
        match self {
            Gate::Controlled { base, .. } => {
                let dim = 1usize << self.num_qubits();
                let block = base.sparse_matrix();
                let offset = dim - block.dim();
                let mut triplets: Vec<_> = (0..offset).map(|i| (i, i, ONE)).collect();
                triplets.extend(block.iter().map(|(r, c, v)| (r + offset, c + offset, v)));
                SparseMatrix::from_triplets(dim, triplets)
            }
            _ => SparseMatrix::from_dense(&self.matrix()),
        }
    }

    /// The inverse gate, of the same arity.
    #[must_use]
    pub fn adjoint(&self) -> Gate {
        match self {
            Gate::S => Gate::Sdg,
            Gate::Sdg => Gate::S,
            Gate::T => Gate::Tdg,
            Gate::Tdg => Gate::T,
            Gate::Rx(theta) => Gate::Rx(-theta),
            Gate::Ry(theta) => Gate::Ry(-theta),
            Gate::Rz(theta) => Gate::Rz(-theta),
            Gate::Controlled { base, num_controls } => Gate::controlled(base.adjoint(), *num_controls),
            Gate::Matrix(m) => Gate::Matrix(m.adjoint()),
            Gate::I | Gate::H | Gate::X | Gate::Y | Gate::Z => self.clone(),
        }
    }

    /// Approximate equality. Gates of different kinds never compare equal.
    pub fn approx_eq(&self, other: &Gate, tolerance: f64) -> bool {
        match (self, other) {
            (Gate::Rx(a), Gate::Rx(b)) | (Gate::Ry(a), Gate::Ry(b)) | (Gate::Rz(a), Gate::Rz(b)) => {
                (a - b).abs() <= tolerance
            }
            (
                Gate::Controlled {
                    base: a,
                    num_controls: na,
                },
                Gate::Controlled {
                    base: b,
                    num_controls: nb,
                },
            ) => na == nb && a.approx_eq(b, tolerance),
            (Gate::Matrix(a), Gate::Matrix(b)) => a.approx_eq(b, tolerance),
            _ => std::mem::discriminant(self) == std::mem::discriminant(other),
        }
    }
}

/// A gate defined by an explicit dense unitary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatrixGate {
    /// Display name.
    pub name: String,
    /// Number of wires.
    pub num_qubits: u32,
    /// Row-major `2^n × 2^n` entries.
    data: Vec<Complex64>,
}

impl MatrixGate {
    /// Wrap a square matrix whose side is a power of two.
    pub fn new(name: impl Into<String>, matrix: &DenseMatrix) -> IrResult<Self> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(IrError::InvalidMatrix(format!(
                "expected a square matrix, got {rows}x{cols}"
            )));
        }
        let num_qubits = num_qubits_for_dim(rows)
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                IrError::InvalidMatrix(format!("dimension {rows} is not a positive power of two"))
            })?;
        Ok(Self {
            name: name.into(),
            num_qubits,
            data: matrix.iter().copied().collect(),
        })
    }

    /// Dense matrix.
    pub fn matrix(&self) -> DenseMatrix {
        let dim = 1usize << self.num_qubits;
        Array2::from_shape_fn((dim, dim), |(r, c)| self.data[r * dim + c])
    }

    /// Conjugate-transposed gate with a `_dg` suffix.
    #[must_use]
    pub fn adjoint(&self) -> MatrixGate {
        let adj = dagger(&self.matrix());
        MatrixGate {
            name: format!("{}_dg", self.name),
            num_qubits: self.num_qubits,
            data: adj.iter().copied().collect(),
        }
    }

    /// Entry-wise comparison of the operators; names are ignored.
    pub fn approx_eq(&self, other: &MatrixGate, tolerance: f64) -> bool {
        self.num_qubits == other.num_qubits
            && max_abs_diff(&self.matrix(), &other.matrix()) <= tolerance
    }
}

impl From<MatrixGate> for Gate {
    fn from(gate: MatrixGate) -> Self {
        Gate::Matrix(gate)
    }
}
