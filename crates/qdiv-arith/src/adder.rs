//! Cuccaro ripple-carry adder.
//!
//! The adder walks up the registers with a chain of MAJ (majority) stages,
//! each leaving the running carry in an addend qubit, then walks back down
//! with UMA (un-majority and add) stages that erase the carries and leave the
//! sum bits in the target register:
//!
//! ```text
//!   carry_in ──MAJ──────────────────────────────UMA── carry_in
//!   target0  ──MAJ──────────────────────────────UMA── sum0
//!   addend0  ──MAJ──MAJ──────────────────UMA────UMA── addend0
//!   target1  ───────MAJ──────────────────UMA───────── sum1
//!   addend1  ───────MAJ──...──●(tap)──...UMA───────── addend1
//!   ancilla  ─────────────────⊕────────────────────── ancilla ⊕ carry_out
//! ```
//!
//! With `w`-bit registers the result is
//! `target ← (target + addend + carry_in) mod 2^w`; addend and carry-in are
//! restored.

use qdiv_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::block::{ReversibleBlock, ensure_distinct};
use crate::error::{ArithError, ArithResult};
use crate::register::QubitRegister;

/// What happens to the carry out of the top bit.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum CarryOut {
    /// Drop it: arithmetic is modulo `2^w` and the ancilla is never touched.
    #[default]
    Discard,
    /// XOR it into the ancilla so callers can detect overflow.
    IntoAncilla,
}

/// Operand wiring shared by the adder, the subtractor and the controlled
/// add/subtract unit.
///
/// Both registers are LSB first and of equal width, and no qubit appears in
/// two roles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdderWiring {
    carry_in: QubitId,
    addend: QubitRegister,
    target: QubitRegister,
    ancilla: QubitId,
}

impl AdderWiring {
    /// Validate and build a wiring.
    pub fn new(
        carry_in: QubitId,
        addend: QubitRegister,
        target: QubitRegister,
        ancilla: QubitId,
    ) -> ArithResult<Self> {
        if addend.is_empty() {
            return Err(ArithError::InvalidWidth(0));
        }
        if addend.len() != target.len() {
            return Err(ArithError::WidthMismatch {
                role: "adder target",
                expected: addend.len(),
                got: target.len(),
            });
        }
        let wiring = Self {
            carry_in,
            addend,
            target,
            ancilla,
        };
        ensure_distinct("adder", wiring.qubits())?;
        Ok(wiring)
    }

    /// Register width in bits.
    pub fn width(&self) -> usize {
        self.target.len()
    }

    /// The carry-in qubit.
    pub fn carry_in(&self) -> QubitId {
        self.carry_in
    }

    /// The register added into the target.
    pub fn addend(&self) -> &QubitRegister {
        &self.addend
    }

    /// The register that receives the sum.
    pub fn target(&self) -> &QubitRegister {
        &self.target
    }

    /// The scratch qubit for the carry-out tap.
    pub fn ancilla(&self) -> QubitId {
        self.ancilla
    }

    /// All wired qubits: carry-in, addend, target, ancilla.
    pub fn qubits(&self) -> Vec<QubitId> {
        std::iter::once(self.carry_in)
            .chain(self.addend.iter())
            .chain(self.target.iter())
            .chain(std::iter::once(self.ancilla))
            .collect()
    }
}

/// Majority stage: leaves `maj(c, b, a)` in `a` and `a ⊕ b` in `b`.
fn maj(circuit: &mut Circuit, c: QubitId, b: QubitId, a: QubitId) -> ArithResult<()> {
    circuit.cx(a, b)?.cx(a, c)?.ccx(c, b, a)?;
    Ok(())
}

/// Un-majority and add: inverts [`maj`] on `c` and `a`, leaving the sum bit in `b`.
fn uma(circuit: &mut Circuit, c: QubitId, b: QubitId, a: QubitId) -> ArithResult<()> {
    circuit.ccx(c, b, a)?.cx(a, c)?.cx(c, b)?;
    Ok(())
}

/// In-place adder: `target ← target + addend + carry_in (mod 2^w)`.
#[derive(Debug, Clone)]
pub struct Adder {
    wiring: AdderWiring,
    carry_out: CarryOut,
}

impl Adder {
    /// Create an adder that discards the carry-out.
    pub fn new(wiring: AdderWiring) -> Self {
        Self {
            wiring,
            carry_out: CarryOut::Discard,
        }
    }

    /// Choose what happens to the carry-out.
    pub fn with_carry_out(mut self, carry_out: CarryOut) -> Self {
        self.carry_out = carry_out;
        self
    }

    /// The operand wiring.
    pub fn wiring(&self) -> &AdderWiring {
        &self.wiring
    }
}

impl ReversibleBlock for Adder {
    fn name(&self) -> &'static str {
        "adder"
    }

    fn qubits(&self) -> Vec<QubitId> {
        self.wiring.qubits()
    }

    fn apply(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let AdderWiring {
            carry_in,
            addend,
            target,
            ancilla,
        } = &self.wiring;

        // Stage i reads the carry left by stage i - 1 in addend[i - 1].
        let carries: Vec<QubitId> = std::iter::once(*carry_in)
            .chain(addend.iter().take(addend.len() - 1))
            .collect();
        let stages: Vec<_> = carries
            .iter()
            .zip(target.iter())
            .zip(addend.iter())
            .map(|((&c, b), a)| (c, b, a))
            .collect();

        for &(c, b, a) in &stages {
            maj(circuit, c, b, a)?;
        }
        if self.carry_out == CarryOut::IntoAncilla {
            if let Some(top) = addend.msb() {
                circuit.cx(top, *ancilla)?;
            }
        }
        for &(c, b, a) in stages.iter().rev() {
            uma(circuit, c, b, a)?;
        }
        Ok(())
    }
}
