//! Error types for the synthesis crate.

use thiserror::Error;
use unisyn_ir::IrError;

/// Broad classification of a [`SynthError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// The caller handed in an input the synthesizers do not accept.
    Precondition,
    /// A gate, wire list or register is malformed.
    Structural,
    /// A floating-point identity the algorithm relies on did not hold.
    Numerical,
}

/// Errors produced by unitary synthesis.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SynthError {
    /// Input matrix is not square.
    #[error("Matrix must be square, got {rows}×{cols}")]
    NotSquare {
        /// Number of rows.
        rows: usize,
        /// Number of columns.
        cols: usize,
    },

    /// Input dimension is not a power of two.
    #[error("Matrix dimension {0} is not a power of two")]
    NotPowerOfTwo(usize),

    /// Input matrix is not unitary within tolerance.
    #[error("Matrix is not unitary (deviation {deviation:.3e})")]
    NotUnitary {
        /// Max-abs deviation of `U·U†` from the identity.
        deviation: f64,
    },

    /// Non-diagonal matrix of a size no synthesizer handles.
    #[error("No synthesizer for a non-diagonal {0}×{0} matrix")]
    UnsupportedSize(usize),

    /// Placement does not supply one wire per matrix qubit.
    #[error("Operator acts on {expected} wires, placement lists {got}")]
    WireCountMismatch {
        /// Number of qubits the matrix acts on.
        expected: usize,
        /// Number of wires supplied.
        got: usize,
    },

    /// A diagonal entry does not have modulus one.
    #[error("Diagonal entry {index} has modulus {modulus}, expected 1")]
    NotUnitModulus {
        /// Position of the entry.
        index: usize,
        /// Its modulus.
        modulus: f64,
    },

    /// The SO(4) factorizer found no sign for which the unit-norm identity holds.
    #[error("SO(4) factorization failed: {0}")]
    Factorization(String),

    /// No mixing attempt diagonalised `U·Uᵗ`.
    #[error("Simultaneous diagonalisation failed after {attempts} attempts")]
    EigenDecomposition {
        /// Attempts made.
        attempts: usize,
    },

    /// The two halves of a partially peeled diagonal differ.
    #[error("Diagonal halves differ by {deviation:.3e} at depth {depth}")]
    UnequalHalves {
        /// Recursion depth.
        depth: u32,
        /// Largest entry-wise difference.
        deviation: f64,
    },

    /// A synthesized sequence does not reproduce its input.
    #[error("Synthesized sequence deviates from input by {deviation:.3e}")]
    VerificationFailed {
        /// Max-abs deviation of the embedded operators.
        deviation: f64,
    },

    /// Gate or embedding construction failed.
    #[error("IR error: {0}")]
    Ir(#[from] IrError),
}

impl SynthError {
    /// Classify this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SynthError::NotSquare { .. }
            | SynthError::NotPowerOfTwo(_)
            | SynthError::NotUnitary { .. }
            | SynthError::UnsupportedSize(_)
            | SynthError::WireCountMismatch { .. }
            | SynthError::NotUnitModulus { .. } => ErrorKind::Precondition,
            SynthError::Factorization(_)
            | SynthError::EigenDecomposition { .. }
            | SynthError::UnequalHalves { .. }
            | SynthError::VerificationFailed { .. } => ErrorKind::Numerical,
            SynthError::Ir(_) => ErrorKind::Structural,
        }
    }
}

/// Result type for synthesis operations.
pub type SynthResult<T> = Result<T, SynthError>;
