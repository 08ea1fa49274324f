//! Operator embedding.
//!
//! Places a k-wire operator on an ordered tuple of wires of an N-wire
//! register, acting as the identity elsewhere.
//!
//! # Convention
//!
//! Wire `w` of an N-wire register has stride `2^(N - w)`: the
//! highest-indexed wire varies fastest, so wire 1 is the left-most tensor
//! factor. Inside a k-wire operator the `m`-th listed target wire carries
//! local bit `k - m` of the row/column index.
//!
//! Every non-zero entry of the operator is mapped to full-register indices
//! through the target strides and then replicated across all `2^(N-k)`
//! settings of the complementary wires, so the result has exactly
//! `nnz(G) · 2^(N-k)` entries and the dense `2^N × 2^N` matrix is never
//! formed.

use crate::error::{IrError, IrResult};
use crate::sparse::SparseMatrix;
use crate::unitary::num_qubits_for_dim;
use crate::wire::{Wire, validate_wires};

/// Anything with a full-register operator.
pub trait Embed {
    /// The `2^N × 2^N` operator on a register of `num_wires` wires.
    fn embed(&self, num_wires: u32) -> IrResult<SparseMatrix>;
}

/// Embed a gate, a gate sequence or any other [`Embed`] item.
pub fn embed<E: Embed + ?Sized>(item: &E, num_wires: u32) -> IrResult<SparseMatrix> {
    item.embed(num_wires)
}

/// Side length `2^num_wires` of the full-register operator.
///
/// Fails with [`IrError::RegisterTooLarge`] when the dimension would not fit
/// in a `usize` with room for a row terminator.
pub fn register_dim(num_wires: u32) -> IrResult<usize> {
    let dim = register_dim(num_wires)?;
    Ok(1usize << num_wires)
}

/// Embed `op` on `wires` of a `num_wires`-wire register.
pub fn embed_operator(op: &SparseMatrix, wires: &[Wire], num_wires: u32) -> IrResult<SparseMatrix> {
    validate_wires(wires, None)?;
    let arity = u32::try_from(wires.len()).unwrap_or(u32::MAX);
    if num_qubits_for_dim(op.dim()) != Some(arity) {
        return Err(IrError::ArityMismatch {
            gate_name: "operator".into(),
            expected: num_qubits_for_dim(op.dim()).unwrap_or(0),
            got: arity,
        });
    }
    if let Some(&max) = wires.iter().max() {
        if max.0 > num_wires {
            return Err(IrError::RegisterTooSmall {
                wire: max,
                num_wires,
            });
        }
    }
    let dim = register_dim(num_wires)?;

    let stride = |w: Wire| 1usize << (num_wires - w.0);
    let local_dim = op.dim();

    // Full-register offset of each local basis index.
    let target_offsets: Vec<usize> = (0..local_dim)
        .map(|local| {
            wires
                .iter()
                .enumerate()
                .filter(|(m, _)| (local >> (wires.len() - 1 - m)) & 1 == 1)
                .map(|(_, &w)| stride(w))
                .sum()
        })
        .collect();

    let complement: Vec<usize> = (1..=num_wires)
        .map(Wire)
        .filter(|w| !wires.contains(w))
        .map(stride)
        .collect();
    let complement_offsets: Vec<usize> = (0..1usize << complement.len())
        .map(|setting| {
            complement
                .iter()
                .enumerate()
                .filter(|(bit, _)| (setting >> bit) & 1 == 1)
                .map(|(_, &s)| s)
                .sum()
        })
        .collect();

    let mut triplets = Vec::with_capacity(op.nnz() * complement_offsets.len());
    for (r, c, v) in op.iter() {
        let (row, col) = (target_offsets[r], target_offsets[c]);
        for &offset in &complement_offsets {
            triplets.push((row + offset, col + offset, v));
        }
    }

    Ok(SparseMatrix::from_triplets(dim, triplets))
}
