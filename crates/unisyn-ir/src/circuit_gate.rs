//! Circuit gates: a gate operator bound to the wires it acts on.

use serde::{Deserialize, Serialize};

use crate::embed::{Embed, embed_operator};
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::sparse::SparseMatrix;
use crate::wire::{Wire, validate_wires};

/// An immutable `(wires, gate)` pair.
///
/// The wire list is ordered: its `k`-th entry is the `k`-th tensor factor of
/// the gate's matrix. For controlled gates the controls come first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CircuitGate {
    wires: Vec<Wire>,
    gate: Gate,
}

impl CircuitGate {
    /// Bind `gate` to `wires`.
    ///
    /// Fails when the number of wires differs from the gate's arity, when a
    /// wire index is zero, or when a wire repeats.
    pub fn new(wires: impl IntoIterator<Item = Wire>, gate: impl Into<Gate>) -> IrResult<Self> {
        let wires: Vec<Wire> = wires.into_iter().collect();
        let gate = gate.into();
        let got = u32::try_from(wires.len()).unwrap_or(u32::MAX);
        if got != gate.num_qubits() {
            return Err(IrError::ArityMismatch {
                gate_name: gate.name(),
                expected: gate.num_qubits(),
                got,
            });
        }
        validate_wires(&wires, Some(&gate.name()))?;
        Ok(Self { wires, gate })
    }

    /// Single-wire gate.
    pub fn single(gate: impl Into<Gate>, wire: Wire) -> IrResult<Self> {
        Self::new([wire], gate)
    }

    /// Controlled-NOT from `control` onto `target`.
    pub fn cx(control: Wire, target: Wire) -> IrResult<Self> {
        Self::new([control, target], Gate::cx())
    }

    /// The wires, in tensor-factor order.
    #[inline]
    pub fn wires(&self) -> &[Wire] {
        &self.wires
    }

    /// The gate operator.
    #[inline]
    pub fn gate(&self) -> &Gate {
        &self.gate
    }

    /// Get the name of the gate.
    pub fn name(&self) -> String {
        self.gate.name()
    }

    /// Largest wire index touched.
    pub fn max_wire(&self) -> Wire {
        self.wires.iter().copied().max().unwrap_or(Wire(0))
    }

    /// Adjoint gate on the same wires.
    #[must_use]
    pub fn adjoint(&self) -> Self {
        Self {
            wires: self.wires.clone(),
            gate: self.gate.adjoint(),
        }
    }

    /// Same wires in the same order, and approximately equal gates.
    pub fn approx_eq(&self, other: &CircuitGate, tolerance: f64) -> bool {
        self.wires == other.wires && self.gate.approx_eq(&other.gate, tolerance)
    }

    /// Rebind to new wires: local wire `k` becomes `placement[k - 1]`.
    pub fn remap(&self, placement: &[Wire]) -> IrResult<Self> {
        let wires = self
            .wires
            .iter()
            .map(|w| {
                placement
                    .get(w.0 as usize - 1)
                    .copied()
                    .ok_or(IrError::RegisterTooSmall {
                        wire: *w,
                        num_wires: u32::try_from(placement.len()).unwrap_or(u32::MAX),
                    })
            })
            .collect::<IrResult<Vec<_>>>()?;
        Self::new(wires, self.gate.clone())
    }
}

impl Embed for CircuitGate {
    fn embed(&self, num_wires: u32) -> IrResult<SparseMatrix> {
        embed_operator(&self.gate.sparse_matrix(), &self.wires, num_wires)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_validates_arity() {
        let err = CircuitGate::new([Wire(1)], Gate::cx()).unwrap_err();
        assert!(matches!(
            err,
            IrError::ArityMismatch {
                expected: 2,
                got: 1,
                ..
            }
        ));
    }

    #[test]
    fn test_new_rejects_repeated_wire() {
        let err = CircuitGate::cx(Wire(2), Wire(2)).unwrap_err();
        assert!(matches!(err, IrError::DuplicateWire { wire: Wire(2), .. }));
    }

    #[test]
    fn test_new_rejects_zero_wire() {
        assert!(matches!(
            CircuitGate::single(Gate::H, Wire(0)),
            Err(IrError::NonPositiveWire { .. })
        ));
    }

    #[test]
    fn test_adjoint_keeps_wires() {
        let g = CircuitGate::single(Gate::Rz(0.3), Wire(4)).unwrap();
        let adj = g.adjoint();
        assert_eq!(adj.wires(), &[Wire(4)]);
        assert!(adj.gate().approx_eq(&Gate::Rz(-0.3), 1e-15));
    }

    #[test]
    fn test_approx_eq_requires_same_wires() {
        let a = CircuitGate::cx(Wire(1), Wire(2)).unwrap();
        let b = CircuitGate::cx(Wire(2), Wire(1)).unwrap();
        assert!(a.approx_eq(&a.clone(), 0.0));
        assert!(!a.approx_eq(&b, 1.0));
    }

    #[test]
    fn test_remap() {
        let g = CircuitGate::cx(Wire(1), Wire(2)).unwrap();
        let moved = g.remap(&[Wire(5), Wire(3)]).unwrap();
        assert_eq!(moved.wires(), &[Wire(5), Wire(3)]);
        assert!(g.remap(&[Wire(5)]).is_err());
        assert_eq!(moved.max_wire(), Wire(5));
    }
}
