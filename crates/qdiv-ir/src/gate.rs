//! Reversible gate types.

use serde::{Deserialize, Serialize};

/// Gates of the classical-reversible set.
///
/// Every gate flips its last operand when all preceding operands are 1, so each
/// gate permutes computational basis states and is its own inverse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StandardGate {
    /// Bit flip.
    X,
    /// Controlled-XOR (CNOT): operands are `[control, target]`.
    CX,
    /// Controlled-controlled-XOR (Toffoli): operands are `[c1, c2, target]`.
    CCX,
}

impl StandardGate {
    /// Get the name of this gate (OpenQASM naming).
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            StandardGate::X => "x",
            StandardGate::CX => "cx",
            StandardGate::CCX => "ccx",
        }
    }

    /// Get the number of qubits this gate operates on.
    #[inline]
    pub fn num_qubits(&self) -> u32 {
        match self {
            StandardGate::X => 1,
            StandardGate::CX => 2,
            StandardGate::CCX => 3,
        }
    }

    /// Number of control operands preceding the target.
    #[inline]
    pub fn num_controls(&self) -> usize {
        self.num_qubits() as usize - 1
    }

    /// Look up a gate by its name.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "x" => Some(StandardGate::X),
            "cx" => Some(StandardGate::CX),
            "ccx" => Some(StandardGate::CCX),
            _ => None,
        }
    }
}
