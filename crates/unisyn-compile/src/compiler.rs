//! Top-level dispatch from a unitary to a gate sequence.

use std::sync::Arc;

use num_complex::Complex64;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};
use unisyn_ir::unitary::{is_diagonal, is_unitary, num_qubits_for_dim, unitarity_deviation};
use unisyn_ir::{
    DenseMatrix, Embed, GateSequence, IrError, IrResult, SparseMatrix, Wire, embed_operator,
    validate_wires,
};

use crate::cache::GrayCodeCache;
use crate::config::SynthesisConfig;
use crate::error::{SynthError, SynthResult};
use crate::{diagonal, single_qubit, two_qubit};

/// A synthesized gate sequence and the phase it leaves out.
///
/// The sequence alone equals the input only up to `global_phase`;
/// embedding the `Synthesis` applies the phase and reproduces the input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Gates in application order, on the requested placement.
    pub sequence: GateSequence,
    /// Unit-modulus factor with `input = global_phase · sequence`.
    pub global_phase: Complex64,
}

impl Synthesis {
    /// Number of gates.
    pub fn len(&self) -> usize {
        self.sequence.len()
    }

    /// Check if the synthesis emitted no gates.
    pub fn is_empty(&self) -> bool {
        self.sequence.is_empty()
    }

    /// Drop the phase and keep the gates.
    pub fn into_sequence(self) -> GateSequence {
        self.sequence
    }
}

impl Embed for Synthesis {
    fn embed(&self, num_wires: u32) -> IrResult<SparseMatrix> {
        Ok(self.sequence.embed(num_wires)?.scale(self.global_phase))
    }
}

/// Unitary synthesizer.
///
/// Owns a [`SynthesisConfig`] and a Gray-code cache that may be shared with
/// other compilers.
#[derive(Debug, Clone, Default)]
pub struct Compiler {
    config: SynthesisConfig,
    cache: Arc<GrayCodeCache>,
}

impl Compiler {
    /// Create a compiler with the default configuration and a fresh cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use the given configuration.
    #[must_use]
    pub fn with_config(mut self, config: SynthesisConfig) -> Self {
        self.config = config;
        self
    }

    /// Share an existing Gray-code cache.
    #[must_use]
    pub fn with_cache(mut self, cache: Arc<GrayCodeCache>) -> Self {
        self.cache = cache;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &SynthesisConfig {
        &self.config
    }

    /// The Gray-code cache.
    pub fn cache(&self) -> &Arc<GrayCodeCache> {
        &self.cache
    }

    /// Synthesize `matrix` on an `num_wires`-wire register.
    ///
    /// `wires` places the matrix's local wires `1..=k` on the register; it
    /// defaults to wires `1..=k`. Diagonal matrices of any size go to the
    /// diagonal synthesizer, other 2×2 and 4×4 unitaries to the single- and
    /// two-qubit synthesizers.
    #[instrument(skip(self, matrix, wires), fields(dim = matrix.nrows()))]
    pub fn compile(
        &self,
        matrix: &DenseMatrix,
        num_wires: u32,
        wires: Option<&[Wire]>,
    ) -> SynthResult<Synthesis> {
        let num_qubits = self.check_matrix(matrix)?;
        let placement = resolve_placement(num_qubits, num_wires, wires)?;
        let tolerance = self.config.tolerance;

        let (local, global_phase) = if is_diagonal(matrix, tolerance) {
            debug!("dispatching to diagonal synthesizer");
            let entries: Vec<Complex64> = matrix.diag().to_vec();
            diagonal::synthesize(&entries, &self.cache, tolerance)?
        } else {
            match matrix.nrows() {
                2 => {
                    debug!("dispatching to single-qubit synthesizer");
                    let zxz = single_qubit::synthesize(matrix, tolerance)?;
                    (zxz.gates(Wire(1))?, zxz.phase)
                }
                4 => {
                    debug!("dispatching to two-qubit synthesizer");
                    two_qubit::synthesize(matrix, &self.cache, &self.config)?
                }
                dim => return Err(SynthError::UnsupportedSize(dim)),
            }
        };

        let sequence = local.remap(&placement)?;
        info!(gates = sequence.len(), "synthesis complete");
        Ok(Synthesis {
            sequence,
            global_phase,
        })
    }

    /// Synthesize `diag(entries)` without building the dense matrix.
    #[instrument(skip(self, entries, wires), fields(len = entries.len()))]
    pub fn synthesize_diagonal(
        &self,
        entries: &[Complex64],
        num_wires: u32,
        wires: Option<&[Wire]>,
    ) -> SynthResult<Synthesis> {
        let num_qubits =
            num_qubits_for_dim(entries.len()).ok_or(SynthError::NotPowerOfTwo(entries.len()))?;
        let tolerance = self.config.tolerance;
        if let Some((index, z)) = entries
            .iter()
            .enumerate()
            .find(|(_, z)| (z.norm() - 1.0).abs() > tolerance)
        {
            return Err(SynthError::NotUnitModulus {
                index,
                modulus: z.norm(),
            });
        }
        let placement = resolve_placement(num_qubits, num_wires, wires)?;

        let (local, global_phase) = diagonal::synthesize(entries, &self.cache, tolerance)?;
        let sequence = local.remap(&placement)?;
        info!(gates = sequence.len(), "diagonal synthesis complete");
        Ok(Synthesis {
            sequence,
            global_phase,
        })
    }

    /// Check that `synthesis` reproduces `matrix` on the given placement.
    ///
    /// Returns the max-abs deviation between the two embedded operators.
    pub fn verify(
        &self,
        matrix: &DenseMatrix,
        synthesis: &Synthesis,
        num_wires: u32,
        wires: Option<&[Wire]>,
    ) -> SynthResult<f64> {
        let num_qubits = num_qubits_for_dim(matrix.nrows())
            .ok_or(SynthError::NotPowerOfTwo(matrix.nrows()))?;
        let placement = resolve_placement(num_qubits, num_wires, wires)?;
        let expected = embed_operator(&SparseMatrix::from_dense(matrix), &placement, num_wires)?;
        let deviation = synthesis.embed(num_wires)?.max_abs_diff(&expected);
        if deviation > self.config.tolerance.sqrt() {
            return Err(SynthError::VerificationFailed { deviation });
        }
        debug!(deviation, "synthesis verified");
        Ok(deviation)
    }

    /// Reject non-square, non-power-of-two and non-unitary input.
    fn check_matrix(&self, matrix: &DenseMatrix) -> SynthResult<u32> {
        let (rows, cols) = matrix.dim();
        if rows != cols {
            return Err(SynthError::NotSquare { rows, cols });
        }
        let num_qubits = num_qubits_for_dim(rows).ok_or(SynthError::NotPowerOfTwo(rows))?;
        if !is_unitary(matrix, self.config.tolerance) {
            return Err(SynthError::NotUnitary {
                deviation: unitarity_deviation(matrix),
            });
        }
        Ok(num_qubits)
    }
}

/// Synthesize `matrix` with a default [`Compiler`].
pub fn compile(
    matrix: &DenseMatrix,
    num_wires: u32,
    wires: Option<&[Wire]>,
) -> SynthResult<Synthesis> {
    Compiler::new().compile(matrix, num_wires, wires)
}

/// The register wires hosting local wires `1..=num_qubits`.
fn resolve_placement(
    num_qubits: u32,
    num_wires: u32,
    wires: Option<&[Wire]>,
) -> SynthResult<Vec<Wire>> {
    let placement = match wires {
        Some(wires) => {
            if wires.len() != num_qubits as usize {
                return Err(SynthError::WireCountMismatch {
                    expected: num_qubits as usize,
                    got: wires.len(),
                });
            }
            wires.to_vec()
        }
        None => Wire::range(num_qubits),
    };
    validate_wires(&placement, None)?;
    if let Some(&max) = placement.iter().max() {
        if max.index() > num_wires {
            return Err(IrError::RegisterTooSmall {
                wire: max,
                num_wires,
            }
            .into());
        }
    }
    Ok(placement)
}
