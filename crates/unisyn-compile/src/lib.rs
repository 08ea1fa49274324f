//! Unisyn Unitary Synthesis
//!
//! This crate turns unitary matrices into sequences of elementary gates
//! from [`unisyn_ir`].
//!
//! # Synthesizers
//!
//! - **Single-qubit**: closed-form `Rz·Rx·Rz` decomposition of any 2×2
//!   unitary ([`single_qubit`])
//! - **Two-qubit**: magic-basis decomposition of any 4×4 unitary into local
//!   rotations, two fixed basis-change skeletons and a diagonal core
//!   ([`two_qubit`], built on [`so4`])
//! - **Diagonal**: Gray-code CNOT/Rz ladders for diagonal unitaries on any
//!   number of wires ([`diagonal`])
//!
//! [`Compiler`] validates the input and picks the synthesizer.
//!
//! # Example
//!
//! ```rust
//! use unisyn_compile::Compiler;
//! use unisyn_ir::{Gate, Wire, embed};
//!
//! let compiler = Compiler::new();
//! let cx = Gate::cx().matrix();
//! let synthesis = compiler.compile(&cx, 3, Some(&[Wire(3), Wire(1)])).unwrap();
//!
//! // The phase-carrying synthesis reproduces the input exactly.
//! let deviation = compiler
//!     .verify(&cx, &synthesis, 3, Some(&[Wire(3), Wire(1)]))
//!     .unwrap();
//! assert!(deviation < 1e-9);
//! assert_eq!(embed(&synthesis, 3).unwrap().dim(), 8);
//! ```

pub mod cache;
pub mod compiler;
pub mod config;
pub mod diagonal;
pub mod error;
pub mod single_qubit;
pub mod so4;
pub mod two_qubit;

pub use cache::GrayCodeCache;
pub use compiler::{Compiler, Synthesis, compile};
pub use config::SynthesisConfig;
pub use error::{ErrorKind, SynthError, SynthResult};
pub use single_qubit::ZxzDecomposition;
