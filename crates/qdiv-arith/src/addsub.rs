//! Controlled add/subtract unit.

use qdiv_ir::{Circuit, QubitId};

use crate::adder::{Adder, AdderWiring, CarryOut};
use crate::block::{ReversibleBlock, ensure_distinct};
use crate::error::ArithResult;

/// Adds when the control is 0 and subtracts when it is 1.
///
/// The control is XORed into the carry-in and every addend bit, the adder runs
/// unconditionally, and the addend is restored. The control qubit is only ever
/// used as a control, so it is left unchanged; the carry-in ends as
/// `carry_in ⊕ control`.
#[derive(Debug, Clone)]
pub struct ControlledAddSub {
    control: QubitId,
    adder: Adder,
}

impl ControlledAddSub {
    /// Create the unit. The control must not be part of the wiring.
    pub fn new(control: QubitId, wiring: AdderWiring) -> ArithResult<Self> {
        ensure_distinct(
            "controlled add/subtract",
            std::iter::once(control).chain(wiring.qubits()),
        )?;
        Ok(Self {
            control,
            adder: Adder::new(wiring),
        })
    }

    /// Choose what happens to the carry-out of the inner adder.
    pub fn with_carry_out(mut self, carry_out: CarryOut) -> Self {
        self.adder = self.adder.with_carry_out(carry_out);
        self
    }

    /// The selector qubit.
    pub fn control(&self) -> QubitId {
        self.control
    }

    /// The operand wiring.
    pub fn wiring(&self) -> &AdderWiring {
        self.adder.wiring()
    }
}

impl ReversibleBlock for ControlledAddSub {
    fn name(&self) -> &'static str {
        "controlled add/subtract"
    }

    fn qubits(&self) -> Vec<QubitId> {
        std::iter::once(self.control)
            .chain(self.adder.qubits())
            .collect()
    }

    fn apply(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let wiring = self.adder.wiring();
        circuit.cx(self.control, wiring.carry_in())?;
        for q in wiring.addend().iter() {
            circuit.cx(self.control, q)?;
        }
        self.adder.apply(circuit)?;
        for q in wiring.addend().iter().rev() {
            circuit.cx(self.control, q)?;
        }
        Ok(())
    }
}
