//! Wire indices.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{IrError, IrResult};

/// A 1-based wire position inside a register.
///
/// Wire 1 is the most significant tensor factor: under the embedding
/// convention the highest-indexed wire varies fastest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Wire(pub u32);

impl Wire {
    /// The index as a `u32`.
    #[inline]
    pub fn index(self) -> u32 {
        self.0
    }

    /// Wires `1..=n` in order.
    pub fn range(n: u32) -> Vec<Wire> {
        (1..=n).map(Wire).collect()
    }
}

impl fmt::Display for Wire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "w{}", self.0)
    }
}

impl From<u32> for Wire {
    fn from(index: u32) -> Self {
        Wire(index)
    }
}

/// Check that every wire is positive and that no wire repeats.
pub fn validate_wires(wires: &[Wire], gate_name: Option<&str>) -> IrResult<()> {
    for (i, wire) in wires.iter().enumerate() {
        if wire.0 == 0 {
            return Err(IrError::NonPositiveWire {
                gate_name: gate_name.map(str::to_string),
            });
        }
        if wires[..i].contains(wire) {
            return Err(IrError::DuplicateWire {
                wire: *wire,
                gate_name: gate_name.map(str::to_string),
            });
        }
    }
    Ok(())
}
