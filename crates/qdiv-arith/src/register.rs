//! Ordered qubit registers holding unsigned integers.

use qdiv_ir::{Circuit, QubitId};
use serde::{Deserialize, Serialize};

use crate::error::{ArithError, ArithResult};

/// A register of qubits holding an unsigned integer, ordered from LSB to MSB.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QubitRegister {
    /// The qubits in this register, ordered from LSB to MSB.
    qubits: Vec<QubitId>,
    /// Label for this register (for debugging/visualization).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    label: Option<String>,
}

impl QubitRegister {
    /// Allocate `size` fresh qubits at the end of the circuit.
    pub fn new(circuit: &mut Circuit, size: usize) -> Self {
        let qubits = (0..size).map(|_| circuit.add_qubit()).collect();
        Self {
            qubits,
            label: None,
        }
    }

    /// Allocate a named register of `size` qubits.
    pub fn named(circuit: &mut Circuit, name: &str, size: usize) -> Self {
        let size = u32::try_from(size).unwrap_or(u32::MAX);
        Self {
            qubits: circuit.add_qreg(name, size),
            label: Some(name.to_string()),
        }
    }

    /// Create a register from existing qubits, LSB first.
    pub fn from_qubits(qubits: Vec<QubitId>) -> Self {
        Self {
            qubits,
            label: None,
        }
    }

    /// Create a register with a label.
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Get the number of qubits in this register.
    pub fn len(&self) -> usize {
        self.qubits.len()
    }

    /// Check if the register is empty.
    pub fn is_empty(&self) -> bool {
        self.qubits.is_empty()
    }

    /// Get the qubits in this register.
    pub fn qubits(&self) -> &[QubitId] {
        &self.qubits
    }

    /// Get a specific qubit by bit position.
    pub fn qubit(&self, index: usize) -> Option<QubitId> {
        self.qubits.get(index).copied()
    }

    /// Get the LSB qubit.
    pub fn lsb(&self) -> Option<QubitId> {
        self.qubits.first().copied()
    }

    /// Get the MSB qubit. For a remainder window this is the sign bit.
    pub fn msb(&self) -> Option<QubitId> {
        self.qubits.last().copied()
    }

    /// Get the label if set.
    pub fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }

    /// A contiguous sub-register of `len` qubits starting at bit `start`.
    pub fn window(&self, start: usize, len: usize) -> ArithResult<QubitRegister> {
        let end = start + len;
        if end > self.qubits.len() {
            return Err(ArithError::IndexOutOfBounds {
                index: end - 1,
                size: self.qubits.len(),
            });
        }
        Ok(QubitRegister::from_qubits(self.qubits[start..end].to_vec()))
    }

    /// Iterate over qubits, LSB first.
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = QubitId> + ExactSizeIterator + '_ {
        self.qubits.iter().copied()
    }

    /// Largest value the register can hold.
    pub fn max_value(&self) -> u64 {
        if self.qubits.len() >= 64 {
            u64::MAX
        } else {
            (1u64 << self.qubits.len()) - 1
        }
    }

    /// Bits of `value`, LSB first, one per qubit.
    pub fn bits_of(&self, value: u64) -> ArithResult<Vec<bool>> {
        if value > self.max_value() {
            return Err(ArithError::OperandOutOfRange {
                value,
                width: self.qubits.len(),
            });
        }
        Ok((0..self.qubits.len()).map(|i| (value >> i) & 1 == 1).collect())
    }

    /// Load a classical value by flipping the qubits of its set bits.
    ///
    /// The register is assumed to be all zero beforehand.
    pub fn initialize(&self, value: u64, circuit: &mut Circuit) -> ArithResult<()> {
        let bits = self.bits_of(value)?;
        circuit.initialize(&self.qubits, &bits)?;
        Ok(())
    }
}

impl IntoIterator for QubitRegister {
    type Item = QubitId;
    type IntoIter = std::vec::IntoIter<QubitId>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.into_iter()
    }
}

impl<'a> IntoIterator for &'a QubitRegister {
    type Item = &'a QubitId;
    type IntoIter = std::slice::Iter<'a, QubitId>;

    fn into_iter(self) -> Self::IntoIter {
        self.qubits.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_creation() {
        let mut circuit = Circuit::new("test");
        let reg = QubitRegister::new(&mut circuit, 4);

        assert_eq!(reg.len(), 4);
        assert_eq!(circuit.num_qubits(), 4);
        assert_eq!(reg.lsb(), Some(QubitId(0)));
        assert_eq!(reg.msb(), Some(QubitId(3)));
        assert_eq!(reg.max_value(), 15);
    }

    #[test]
    fn test_named_register_follows_existing_qubits() {
        let mut circuit = Circuit::with_size("test", 2, 0);
        let reg = QubitRegister::named(&mut circuit, "divisor", 3);

        assert_eq!(reg.qubits(), &[QubitId(2), QubitId(3), QubitId(4)]);
        assert_eq!(reg.label(), Some("divisor"));
        assert_eq!(format!("{}", circuit.qubits()[4]), "divisor[2]");
    }

    #[test]
    fn test_window() {
        let reg = QubitRegister::from_qubits((10..16).map(QubitId).collect());
        let window = reg.window(2, 3).unwrap();
        assert_eq!(window.qubits(), &[QubitId(12), QubitId(13), QubitId(14)]);
        assert_eq!(window.msb(), Some(QubitId(14)));

        assert!(matches!(
            reg.window(4, 3),
            Err(ArithError::IndexOutOfBounds { index: 6, size: 6 })
        ));
    }

    #[test]
    fn test_initialize() {
        let mut circuit = Circuit::new("test");
        let reg = QubitRegister::new(&mut circuit, 4);

        // 5 = 0b0101: flips on bits 0 and 2
        reg.initialize(5, &mut circuit).unwrap();
        let flipped: Vec<_> = circuit.instructions().map(|i| i.qubits[0]).collect();
        assert_eq!(flipped, vec![QubitId(0), QubitId(2)]);
    }

    #[test]
    fn test_initialize_overflow() {
        let mut circuit = Circuit::new("test");
        let reg = QubitRegister::new(&mut circuit, 3);
        assert!(matches!(
            reg.initialize(8, &mut circuit),
            Err(ArithError::OperandOutOfRange { value: 8, width: 3 })
        ));
        assert_eq!(circuit.num_ops(), 0);
    }

    #[test]
    fn test_iteration_order() {
        let reg = QubitRegister::from_qubits(vec![QubitId(7), QubitId(3)]).with_label("pair");
        let forward: Vec<_> = reg.iter().collect();
        let backward: Vec<_> = reg.iter().rev().collect();
        assert_eq!(forward, vec![QubitId(7), QubitId(3)]);
        assert_eq!(backward, vec![QubitId(3), QubitId(7)]);
        assert_eq!(reg.label(), Some("pair"));
    }
}
