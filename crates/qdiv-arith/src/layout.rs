//! Qubit layout of the `n`-bit divider.
//!
//! Registers are allocated in this order, each LSB first:
//!
//! | Register | Qubits | Initial value |
//! |----------|--------|---------------|
//! | divisor | n + 1 | b (top bit 0) |
//! | dividend | 2n | a in the low n bits |
//! | quotient | n | all ones |
//! | carry_in | n | 0 |
//! | ancilla | n | 0 |
//! | restore | 1 | 0 |
//!
//! Iteration `k` works on the (n + 1)-bit window of the dividend register
//! starting at bit `n - 1 - k`; its top bit is the sign of the partial
//! remainder. The last window holds the remainder.

use qdiv_ir::{Circuit, QubitId};
use serde::Serialize;

use crate::error::{ArithError, ArithResult};
use crate::register::QubitRegister;

/// Register positions for a divider of a given operand width.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DividerLayout {
    width: usize,
    divisor: QubitRegister,
    dividend: QubitRegister,
    quotient: QubitRegister,
    carry_ins: QubitRegister,
    ancillas: QubitRegister,
    restore: QubitId,
}

impl DividerLayout {
    /// Generate the layout for `width`-bit operands.
    pub fn new(width: usize) -> ArithResult<Self> {
        if width == 0 || width > crate::MAX_WIDTH {
            return Err(ArithError::InvalidWidth(width));
        }

        let mut next = 0u32;
        let mut take = |label: &str, len: usize| {
            let start = next;
            next += len as u32;
            QubitRegister::from_qubits((start..next).map(QubitId).collect()).with_label(label)
        };

        let divisor = take("divisor", width + 1);
        let dividend = take("dividend", 2 * width);
        let quotient = take("quotient", width);
        let carry_ins = take("carry_in", width);
        let ancillas = take("ancilla", width);
        let restore = take("restore", 1);

        Ok(Self {
            width,
            divisor,
            dividend,
            quotient,
            carry_ins,
            ancillas,
            restore: restore.qubits()[0],
        })
    }

    /// Operand width `n`.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Width of the working registers, `n + 1`.
    pub fn register_width(&self) -> usize {
        self.width + 1
    }

    /// Total qubit count, `6n + 2`.
    pub fn num_qubits(&self) -> usize {
        6 * self.width + 2
    }

    /// Measured classical bits: `n` quotient bits then `n + 1` remainder bits.
    pub fn num_clbits(&self) -> usize {
        2 * self.width + 1
    }

    /// The divisor register.
    pub fn divisor(&self) -> &QubitRegister {
        &self.divisor
    }

    /// The dividend register, which the windows slide over.
    pub fn dividend(&self) -> &QubitRegister {
        &self.dividend
    }

    /// The quotient register. Bit `k` is produced by iteration `k`, so the
    /// register is stored MSB first.
    pub fn quotient(&self) -> &QubitRegister {
        &self.quotient
    }

    /// The carry-in consumed by iteration `k`.
    pub fn carry_in(&self, k: usize) -> ArithResult<QubitId> {
        self.carry_ins
            .qubit(k)
            .ok_or(ArithError::IndexOutOfBounds {
                index: k,
                size: self.width,
            })
    }

    /// The ancilla of iteration `k`.
    pub fn ancilla(&self, k: usize) -> ArithResult<QubitId> {
        self.ancillas
            .qubit(k)
            .ok_or(ArithError::IndexOutOfBounds {
                index: k,
                size: self.width,
            })
    }

    /// The restore-control qubit.
    pub fn restore(&self) -> QubitId {
        self.restore
    }

    /// The remainder window of iteration `k`.
    pub fn window(&self, k: usize) -> ArithResult<QubitRegister> {
        if k >= self.width {
            return Err(ArithError::IndexOutOfBounds {
                index: k,
                size: self.width,
            });
        }
        self.dividend
            .window(self.width - 1 - k, self.register_width())
    }

    /// The sign qubit of window `k`.
    pub fn sign(&self, k: usize) -> ArithResult<QubitId> {
        let window = self.window(k)?;
        window.msb().ok_or(ArithError::InvalidWidth(0))
    }

    /// The final remainder register.
    pub fn remainder(&self) -> ArithResult<QubitRegister> {
        self.window(self.width - 1)
    }

    /// Qubits in measurement order: quotient MSB first, then remainder MSB first.
    pub fn measured_qubits(&self) -> ArithResult<Vec<QubitId>> {
        let remainder = self.remainder()?;
        Ok(self.quotient.iter().chain(remainder.iter().rev()).collect())
    }

    /// Every register with its label, in allocation order.
    pub fn registers(&self) -> Vec<(&str, QubitRegister)> {
        let restore = QubitRegister::from_qubits(vec![self.restore]);
        vec![
            ("divisor", self.divisor.clone()),
            ("dividend", self.dividend.clone()),
            ("quotient", self.quotient.clone()),
            ("carry_in", self.carry_ins.clone()),
            ("ancilla", self.ancillas.clone()),
            ("restore", restore),
        ]
    }

    /// A fresh circuit with this layout's named registers and the
    /// `quotient`/`remainder` classical registers.
    pub fn circuit(&self, name: impl Into<String>) -> Circuit {
        let mut circuit = Circuit::new(name);
        for (label, register) in self.registers() {
            let ids = circuit.add_qreg(label, register.len() as u32);
            debug_assert_eq!(ids.as_slice(), register.qubits());
        }
        circuit.add_creg("quotient", self.width as u32);
        circuit.add_creg("remainder", self.register_width() as u32);
        circuit
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_three_bit_layout() {
        let layout = DividerLayout::new(3).unwrap();
        assert_eq!(layout.num_qubits(), 20);
        assert_eq!(layout.num_clbits(), 7);
        assert_eq!(layout.divisor().qubits(), &[QubitId(0), QubitId(1), QubitId(2), QubitId(3)]);
        assert_eq!(layout.dividend().lsb(), Some(QubitId(4)));
        assert_eq!(layout.quotient().qubits(), &[QubitId(10), QubitId(11), QubitId(12)]);
        assert_eq!(layout.carry_in(0).unwrap(), QubitId(13));
        assert_eq!(layout.ancilla(2).unwrap(), QubitId(18));
        assert_eq!(layout.restore(), QubitId(19));
    }

    #[test]
    fn test_windows_slide_down() {
        let layout = DividerLayout::new(3).unwrap();
        // Dividend occupies q4..=q9.
        assert_eq!(
            layout.window(0).unwrap().qubits(),
            &[QubitId(6), QubitId(7), QubitId(8), QubitId(9)]
        );
        assert_eq!(layout.window(1).unwrap().lsb(), Some(QubitId(5)));
        assert_eq!(layout.window(2).unwrap().lsb(), Some(QubitId(4)));
        assert_eq!(layout.sign(2).unwrap(), QubitId(7));
        assert_eq!(layout.remainder().unwrap(), layout.window(2).unwrap());
        assert!(layout.window(3).is_err());
    }

    #[test]
    fn test_measured_qubits_order() {
        let layout = DividerLayout::new(3).unwrap();
        let measured = layout.measured_qubits().unwrap();
        assert_eq!(
            measured,
            vec![
                QubitId(10),
                QubitId(11),
                QubitId(12),
                QubitId(7),
                QubitId(6),
                QubitId(5),
                QubitId(4)
            ]
        );
    }

    #[test]
    fn test_layout_scales_with_width() {
        for width in 1..=crate::MAX_WIDTH {
            let layout = DividerLayout::new(width).unwrap();
            let total: usize = layout.registers().iter().map(|(_, r)| r.len()).sum();
            assert_eq!(total, layout.num_qubits());
            assert_eq!(layout.window(width - 1).unwrap().len(), width + 1);
        }
    }

    #[test]
    fn test_invalid_width() {
        assert!(matches!(DividerLayout::new(0), Err(ArithError::InvalidWidth(0))));
        assert!(DividerLayout::new(crate::MAX_WIDTH + 1).is_err());
    }

    #[test]
    fn test_circuit_names_registers() {
        let layout = DividerLayout::new(2).unwrap();
        let circuit = layout.circuit("divide");
        assert_eq!(circuit.num_qubits(), 14);
        assert_eq!(circuit.num_clbits(), 5);
        assert_eq!(format!("{}", circuit.qubits()[0]), "divisor[0]");
        assert_eq!(format!("{}", circuit.qubits()[13]), "restore[0]");
        assert_eq!(format!("{}", circuit.clbits()[2]), "remainder[0]");
    }
}
