//! Two's-complement subtraction on top of the adder.

use qdiv_ir::{Circuit, QubitId};

use crate::adder::{Adder, AdderWiring, CarryOut};
use crate::block::ReversibleBlock;
use crate::error::ArithResult;

/// In-place subtractor: `target ← target − addend − carry_in (mod 2^w)`.
///
/// Complements the carry-in and the addend, adds, and complements the addend
/// back. The addend is restored; the carry-in is left complemented, which is
/// what lets the divider chain a fresh carry-in per iteration.
#[derive(Debug, Clone)]
pub struct Subtractor {
    adder: Adder,
}

impl Subtractor {
    /// Create a subtractor that discards the final carry.
    pub fn new(wiring: AdderWiring) -> Self {
        Self {
            adder: Adder::new(wiring),
        }
    }

    /// Choose what happens to the carry-out of the inner adder. With
    /// [`CarryOut::IntoAncilla`] the ancilla receives the "no borrow" flag.
    pub fn with_carry_out(mut self, carry_out: CarryOut) -> Self {
        self.adder = self.adder.with_carry_out(carry_out);
        self
    }

    /// The operand wiring.
    pub fn wiring(&self) -> &AdderWiring {
        self.adder.wiring()
    }
}

impl ReversibleBlock for Subtractor {
    fn name(&self) -> &'static str {
        "subtractor"
    }

    fn qubits(&self) -> Vec<QubitId> {
        self.adder.qubits()
    }

    fn apply(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let wiring = self.adder.wiring();
        circuit.x(wiring.carry_in())?;
        for q in wiring.addend().iter() {
            circuit.x(q)?;
        }
        self.adder.apply(circuit)?;
        for q in wiring.addend().iter().rev() {
            circuit.x(q)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::register::QubitRegister;
    use qdiv_adapter_sim::BasisState;

    fn subtractor() -> Subtractor {
        Subtractor::new(
            AdderWiring::new(
                QubitId(0),
                QubitRegister::from_qubits((1..=4).map(QubitId).collect()),
                QubitRegister::from_qubits((5..=8).map(QubitId).collect()),
                QubitId(9),
            )
            .unwrap(),
        )
    }

    #[test]
    fn test_four_bit_subtraction_wraps() {
        let sub = subtractor();
        let mut circuit = Circuit::with_size("sub", 10, 0);
        sub.apply(&mut circuit).unwrap();

        for cin in 0..2 {
            for a in 0..16u64 {
                for b in 0..16u64 {
                    let mut state = BasisState::new(10).unwrap();
                    state.write(&[QubitId(0)], cin);
                    state.write(sub.wiring().addend().qubits(), a);
                    state.write(sub.wiring().target().qubits(), b);
                    state.run(&circuit).unwrap();

                    let expected = (b + 32 - a - cin) % 16;
                    assert_eq!(state.read(sub.wiring().target().qubits()), expected);
                    assert_eq!(state.read(sub.wiring().addend().qubits()), a);
                    assert_eq!(state.read(&[QubitId(0)]), 1 - cin, "carry-in complemented");
                    assert_eq!(state.read(&[QubitId(9)]), 0);
                }
            }
        }
    }

    #[test]
    fn test_borrow_flag() {
        let sub = subtractor().with_carry_out(CarryOut::IntoAncilla);
        let mut circuit = Circuit::with_size("sub", 10, 0);
        sub.apply(&mut circuit).unwrap();

        // 3 - 5 borrows, 5 - 3 does not.
        for (a, b, no_borrow) in [(5, 3, 0), (3, 5, 1), (4, 4, 1)] {
            let mut state = BasisState::new(10).unwrap();
            state.write(sub.wiring().addend().qubits(), a);
            state.write(sub.wiring().target().qubits(), b);
            state.run(&circuit).unwrap();
            assert_eq!(state.read(&[QubitId(9)]), no_borrow, "{b} - {a}");
        }
    }
}
