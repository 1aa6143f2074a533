//! Exact basis-state engine.
//!
//! X, CX and CCX map basis states to basis states, so the whole register fits
//! in one `u64` with bit `i` holding qubit `i`.

use qdiv_hal::{HalError, HalResult};
use qdiv_ir::{Circuit, Instruction, InstructionKind, QubitId, StandardGate};

/// Largest register the engine can hold.
pub const MAX_BASIS_QUBITS: usize = u64::BITS as usize;

/// A computational basis state of up to 64 qubits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BasisState {
    num_qubits: usize,
    word: u64,
}

impl BasisState {
    /// Create |0…0⟩ over `num_qubits` qubits.
    pub fn new(num_qubits: usize) -> HalResult<Self> {
        if num_qubits > MAX_BASIS_QUBITS {
            return Err(HalError::CircuitTooLarge(format!(
                "{num_qubits} qubits exceed the basis-state limit of {MAX_BASIS_QUBITS}"
            )));
        }
        Ok(Self {
            num_qubits,
            word: 0,
        })
    }

    /// Number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// The raw state word.
    pub fn word(&self) -> u64 {
        self.word
    }

    /// Value of one qubit. Qubits outside the register read as 0.
    pub fn bit(&self, qubit: QubitId) -> bool {
        qubit.index() < self.num_qubits && (self.word >> qubit.index()) & 1 == 1
    }

    /// Overwrite `qubits` (LSB first) with the low bits of `value`.
    /// Qubits outside the register are skipped.
    pub fn write(&mut self, qubits: &[QubitId], value: u64) {
        for (i, &q) in qubits.iter().enumerate() {
            if q.index() >= self.num_qubits {
                continue;
            }
            let mask = 1u64 << q.index();
            if (value >> i) & 1 == 1 {
                self.word |= mask;
            } else {
                self.word &= !mask;
            }
        }
    }

    /// Read `qubits` as an unsigned integer, LSB first.
    pub fn read(&self, qubits: &[QubitId]) -> u64 {
        qubits
            .iter()
            .enumerate()
            .fold(0, |acc, (i, &q)| acc | (u64::from(self.bit(q)) << i))
    }

    fn flip(&mut self, qubit: QubitId) {
        self.word ^= 1u64 << qubit.index();
    }

    /// Apply one instruction. Measurements and barriers leave the state as is.
    pub fn apply(&mut self, instruction: &Instruction) -> HalResult<()> {
        if let Some(q) = instruction
            .qubits
            .iter()
            .find(|q| q.index() >= self.num_qubits)
        {
            return Err(HalError::InvalidCircuit(format!(
                "{} acts on {q} outside a {}-qubit register",
                instruction.name(),
                self.num_qubits
            )));
        }

        let q = &instruction.qubits;
        match instruction.kind {
            InstructionKind::Gate(StandardGate::X) => self.flip(q[0]),
            InstructionKind::Gate(StandardGate::CX) => {
                if self.bit(q[0]) {
                    self.flip(q[1]);
                }
            }
            InstructionKind::Gate(StandardGate::CCX) => {
                if self.bit(q[0]) && self.bit(q[1]) {
                    self.flip(q[2]);
                }
            }
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
        Ok(())
    }

    /// Apply every instruction of `circuit` in order.
    pub fn run(&mut self, circuit: &Circuit) -> HalResult<()> {
        for inst in circuit.instructions() {
            self.apply(inst)?;
        }
        Ok(())
    }

    /// Run `circuit` and return its classical bits as a bit string,
    /// character `i` being clbit `i`.
    ///
    /// Each measurement records the qubit's value at that point in the
    /// circuit; clbits that are never written read as `0`.
    pub fn execute(&mut self, circuit: &Circuit) -> HalResult<String> {
        let mut clbits = vec![false; circuit.num_clbits()];
        for inst in circuit.instructions() {
            self.apply(inst)?;
            if inst.is_measure() {
                for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
                    let slot = clbits.get_mut(c.index()).ok_or_else(|| {
                        HalError::InvalidCircuit(format!("measurement into unknown {c}"))
                    })?;
                    *slot = self.bit(*q);
                }
            }
        }
        Ok(clbits.iter().map(|&b| if b { '1' } else { '0' }).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdiv_ir::ClbitId;

    #[test]
    fn test_read_write_lsb_first() {
        let mut state = BasisState::new(6).unwrap();
        let reg = [QubitId(4), QubitId(1), QubitId(5)];
        state.write(&reg, 0b101);

        assert!(state.bit(QubitId(4)));
        assert!(!state.bit(QubitId(1)));
        assert!(state.bit(QubitId(5)));
        assert_eq!(state.read(&reg), 5);
        assert_eq!(state.word(), 0b110000);

        state.write(&reg, 0b010);
        assert_eq!(state.word(), 0b000010);
    }

    #[test]
    fn test_toffoli_truth_table() {
        for input in 0..8u64 {
            let mut circuit = Circuit::with_size("ccx", 3, 0);
            circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();

            let mut state = BasisState::new(3).unwrap();
            state.write(&[QubitId(0), QubitId(1), QubitId(2)], input);
            state.run(&circuit).unwrap();

            let expected = if input & 0b011 == 0b011 { input ^ 0b100 } else { input };
            assert_eq!(state.word(), expected, "input {input:03b}");
        }
    }

    #[test]
    fn test_execute_projects_clbits() {
        let mut circuit = Circuit::with_size("flip", 3, 3);
        circuit.x(QubitId(2)).unwrap();
        circuit.measure(QubitId(2), ClbitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();

        let mut state = BasisState::new(3).unwrap();
        assert_eq!(state.execute(&circuit).unwrap(), "100");
    }

    #[test]
    fn test_measurement_records_value_at_that_point() {
        let mut circuit = Circuit::with_size("mid", 1, 2);
        circuit.x(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(0)).unwrap();
        circuit.x(QubitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(1)).unwrap();

        let mut state = BasisState::new(1).unwrap();
        assert_eq!(state.execute(&circuit).unwrap(), "10");
    }

    #[test]
    fn test_register_limits() {
        assert!(BasisState::new(64).is_ok());
        assert!(matches!(
            BasisState::new(65),
            Err(HalError::CircuitTooLarge(_))
        ));

        let mut wide = Circuit::with_size("wide", 4, 0);
        wide.x(QubitId(3)).unwrap();
        let mut state = BasisState::new(2).unwrap();
        assert!(matches!(state.run(&wide), Err(HalError::InvalidCircuit(_))));
    }
}
