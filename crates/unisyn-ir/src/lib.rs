//! Unisyn Gate and Operator Primitives
//!
//! This crate provides the data model shared by the Unisyn synthesizers:
//! wires, the closed gate set, circuit gates, gate sequences and the
//! sparse operator embedding used to evaluate and verify them.
//!
//! # Core Components
//!
//! - **Wires**: [`Wire`] is a 1-based register position
//! - **Gates**: [`Gate`] covers the elementary gates, a controlled wrapper
//!   and [`MatrixGate`] for arbitrary dense operators
//! - **Circuit gates**: [`CircuitGate`] binds a gate to distinct wires
//! - **Sequences**: [`GateSequence`] lists circuit gates in application order
//! - **Embedding**: [`embed`] maps a gate or sequence to its `2^N × 2^N`
//!   [`SparseMatrix`]
//!
//! # Example: Bell-state preparation
//!
//! ```rust
//! use unisyn_ir::{embed, GateSequence, Wire};
//!
//! let mut seq = GateSequence::new();
//! seq.h(Wire(1)).unwrap();
//! seq.cx(Wire(1), Wire(2)).unwrap();
//!
//! let op = embed(&seq, 2).unwrap();
//! assert_eq!(op.dim(), 4);
//! // |00> is sent to (|00> + |11>)/sqrt(2)
//! assert!((op.get(3, 0).re - 0.5_f64.sqrt()).abs() < 1e-12);
//! ```
//!
//! # Tensor convention
//!
//! Wire 1 is the left-most tensor factor and the highest-indexed wire varies
//! fastest: on a 2-wire register, a Hadamard on wire 1 embeds as `H ⊗ I`.

pub mod circuit_gate;
pub mod embed;
pub mod error;
pub mod gate;
pub mod sequence;
pub mod sparse;
pub mod unitary;
pub mod wire;

pub use circuit_gate::CircuitGate;
pub use embed::{Embed, embed, embed_operator, register_dim};
pub use error::{IrError, IrResult};
pub use gate::{Gate, MatrixGate};
pub use sequence::GateSequence;
pub use sparse::SparseMatrix;
pub use unitary::DenseMatrix;
pub use wire::{Wire, validate_wires};
