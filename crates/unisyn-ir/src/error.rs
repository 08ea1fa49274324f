//! Error types for the IR crate.

use crate::wire::Wire;
use thiserror::Error;

/// Structural errors raised while building gates, circuit gates and embeddings.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// Gate requires a different number of wires.
    #[error("Gate '{gate_name}' acts on {expected} wires, got {got}")]
    ArityMismatch {
        /// Name of the gate.
        gate_name: String,
        /// Arity of the gate.
        expected: u32,
        /// Number of wires supplied.
        got: u32,
    },

    /// The same wire appears twice in one operation.
    #[error("Duplicate wire {wire} in operation{}", format_gate_context(.gate_name))]
    DuplicateWire {
        /// The repeated wire.
        wire: Wire,
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// Wire indices are 1-based.
    #[error("Wire index must be positive, got 0{}", format_gate_context(.gate_name))]
    NonPositiveWire {
        /// Optional gate name for context.
        gate_name: Option<String>,
    },

    /// A register of `num_wires` wires cannot host the requested wire.
    #[error("Register of {num_wires} wires cannot address wire {wire}")]
    RegisterTooSmall {
        /// The largest requested wire.
        wire: Wire,
        /// Register size.
        num_wires: u32,
    },

    /// The full operator dimension would not fit in a machine word.
    #[error("Register of {0} wires is too large to embed")]
    RegisterTooLarge(u32),

    /// Matrix data does not describe a square 2^n × 2^n operator.
    #[error("Invalid operator matrix: {0}")]
    InvalidMatrix(String),
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_name: &Option<String>) -> String {
    match gate_name {
        Some(name) => format!(" (gate: {name})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
