//! Conditional adder used to restore a negative remainder.

use qdiv_ir::{Circuit, QubitId};

use crate::block::{ReversibleBlock, ensure_distinct};
use crate::error::{ArithError, ArithResult};
use crate::register::QubitRegister;

/// `target ← target + addend (mod 2^w)` when the control is 1, identity otherwise.
///
/// Needs neither a carry-in nor an ancilla: the carries are computed in place
/// in the upper addend bits, gated into the target through the control, and
/// then uncomputed, so the addend and the control are left exactly as they
/// came in.
#[derive(Debug, Clone)]
pub struct ConditionalAdd {
    control: QubitId,
    target: QubitRegister,
    addend: QubitRegister,
}

impl ConditionalAdd {
    /// Validate and build the block.
    pub fn new(control: QubitId, target: QubitRegister, addend: QubitRegister) -> ArithResult<Self> {
        if target.is_empty() {
            return Err(ArithError::InvalidWidth(0));
        }
        if target.len() != addend.len() {
            return Err(ArithError::WidthMismatch {
                role: "conditional add addend",
                expected: target.len(),
                got: addend.len(),
            });
        }
        let block = Self {
            control,
            target,
            addend,
        };
        ensure_distinct("conditional add", block.qubits())?;
        Ok(block)
    }

    /// The control qubit.
    pub fn control(&self) -> QubitId {
        self.control
    }

    /// The register that conditionally receives the sum.
    pub fn target(&self) -> &QubitRegister {
        &self.target
    }

    /// The register that is conditionally added.
    pub fn addend(&self) -> &QubitRegister {
        &self.addend
    }
}

impl ReversibleBlock for ConditionalAdd {
    fn name(&self) -> &'static str {
        "conditional add"
    }

    fn qubits(&self) -> Vec<QubitId> {
        std::iter::once(self.control)
            .chain(self.target.iter())
            .chain(self.addend.iter())
            .collect()
    }

    fn apply(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let a = self.target.qubits();
        let b = self.addend.qubits();
        let ctrl = self.control;
        let w = a.len();

        for i in 1..w {
            circuit.cx(b[i], a[i])?;
        }
        for i in (2..w).rev() {
            circuit.cx(b[i - 1], b[i])?;
        }
        // Carry ladder: b[i + 1] picks up the carry out of bit i.
        for i in 0..w - 1 {
            circuit.ccx(a[i], b[i], b[i + 1])?;
        }
        circuit.ccx(ctrl, b[w - 1], a[w - 1])?;
        for i in (0..w - 1).rev() {
            circuit.ccx(a[i], b[i], b[i + 1])?;
            circuit.ccx(ctrl, b[i], a[i])?;
        }
        for i in 2..w {
            circuit.cx(b[i - 1], b[i])?;
        }
        for i in (1..w).rev() {
            circuit.cx(b[i], a[i])?;
        }
        Ok(())
    }
}
