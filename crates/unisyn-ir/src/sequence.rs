//! Ordered gate sequences.

use serde::{Deserialize, Serialize};

use crate::circuit_gate::CircuitGate;
use crate::embed::{Embed, register_dim};
use crate::error::IrResult;
use crate::gate::Gate;
use crate::sparse::SparseMatrix;
use crate::wire::Wire;

/// Circuit gates in application order.
///
/// The combined operator is the product of the per-gate embeddings taken
/// in reverse: the last gate applied is the left-most factor.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GateSequence {
    gates: Vec<CircuitGate>,
}

impl GateSequence {
    /// Create an empty sequence.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty sequence with room for `capacity` gates.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            gates: Vec::with_capacity(capacity),
        }
    }

    /// Append one gate.
    pub fn push(&mut self, gate: CircuitGate) {
        self.gates.push(gate);
    }

    /// Move every gate of `other` to the end of this sequence.
    pub fn append(&mut self, other: &mut GateSequence) {
        self.gates.append(&mut other.gates);
    }

    /// The gates, in application order.
    pub fn gates(&self) -> &[CircuitGate] {
        &self.gates
    }

    /// Iterate gates in application order.
    pub fn iter(&self) -> std::slice::Iter<'_, CircuitGate> {
        self.gates.iter()
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the sequence has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Largest wire touched, if any.
    pub fn max_wire(&self) -> Option<Wire> {
        self.gates.iter().map(CircuitGate::max_wire).max()
    }

    /// Count gates with the given name.
    pub fn count(&self, name: &str) -> usize {
        self.gates.iter().filter(|g| g.name() == name).count()
    }

    /// The inverse sequence: reversed, with every gate adjointed.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        self.gates.iter().rev().map(CircuitGate::adjoint).collect()
    }

    /// Rebind every gate: local wire `k` becomes `placement[k - 1]`.
    pub fn remap(&self, placement: &[Wire]) -> IrResult<Self> {
        self.gates.iter().map(|g| g.remap(placement)).collect()
    }

    /// Approximate gate-by-gate equality.
    pub fn approx_eq(&self, other: &GateSequence, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .iter()
                .zip(other.iter())
                .all(|(a, b)| a.approx_eq(b, tolerance))
    }

    // =========================================================================
    // Builder helpers
    // =========================================================================

    /// Apply a gate on explicit wires.
    pub fn apply(
        &mut self,
        gate: impl Into<Gate>,
        wires: impl IntoIterator<Item = Wire>,
    ) -> IrResult<&mut Self> {
        self.gates.push(CircuitGate::new(wires, gate)?);
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::H, [wire])
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::X, [wire])
    }

    /// Apply S gate.
    pub fn s(&mut self, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::S, [wire])
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::Sdg, [wire])
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::Rx(theta), [wire])
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, wire: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::Rz(theta), [wire])
    }

    /// Apply CNOT gate.
    pub fn cx(&mut self, control: Wire, target: Wire) -> IrResult<&mut Self> {
        self.apply(Gate::cx(), [control, target])
    }
}

impl Embed for GateSequence {
    fn embed(&self, num_wires: u32) -> IrResult<SparseMatrix> {
        self.gates.as_slice().embed(num_wires)
    }
}

impl Embed for [CircuitGate] {
    fn embed(&self, num_wires: u32) -> IrResult<SparseMatrix> {
        let dim = register_dim(num_wires)?;
        let mut gates = self.iter();
        let Some(first) = gates.next() else {
            return Ok(SparseMatrix::identity(dim));
        };
        let mut total = first.embed(num_wires)?;
        for gate in gates {
            total = gate.embed(num_wires)?.matmul(&total);
        }
        Ok(total)
    }
}

impl FromIterator<CircuitGate> for GateSequence {
    fn from_iter<I: IntoIterator<Item = CircuitGate>>(iter: I) -> Self {
        Self {
            gates: iter.into_iter().collect(),
        }
    }
}

impl Extend<CircuitGate> for GateSequence {
    fn extend<I: IntoIterator<Item = CircuitGate>>(&mut self, iter: I) {
        self.gates.extend(iter);
    }
}

impl IntoIterator for GateSequence {
    type Item = CircuitGate;
    type IntoIter = std::vec::IntoIter<CircuitGate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.into_iter()
    }
}

impl<'a> IntoIterator for &'a GateSequence {
    type Item = &'a CircuitGate;
    type IntoIter = std::slice::Iter<'a, CircuitGate>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}
