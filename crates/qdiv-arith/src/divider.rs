//! Non-restoring division as a reversible circuit.
//!
//! For `n`-bit operands the divider runs `n` iterations over the sliding
//! windows of [`DividerLayout`]:
//!
//! 1. Iteration 0 subtracts the divisor from the first window.
//! 2. Iteration `k > 0` flips the previous sign bit and uses it to select
//!    subtract (previous remainder non-negative) or add (negative).
//! 3. After each iteration the sign is XORed into the quotient bit, which
//!    starts at 1, so the quotient bit is 1 exactly when the new partial
//!    remainder is non-negative.
//! 4. The last sign is copied into the restore control, and a conditional add
//!    puts the divisor back if the final remainder is negative.
//!
//! There is no classical branching: every "decision" is a controlled gate and
//! resolves only when the quotient and remainder are measured.

use qdiv_ir::Circuit;
use tracing::debug;

use crate::adder::{AdderWiring, CarryOut};
use crate::addsub::ControlledAddSub;
use crate::block::ReversibleBlock;
use crate::cond_add::ConditionalAdd;
use crate::error::{ArithError, ArithResult};
use crate::layout::DividerLayout;
use crate::outcome::DivisionOutcome;
use crate::subtractor::Subtractor;

/// Builder for division circuits of a fixed operand width.
#[derive(Debug, Clone)]
pub struct Divider {
    layout: DividerLayout,
    carry_out: CarryOut,
}

impl Divider {
    /// Create a divider for `width`-bit operands.
    pub fn new(width: usize) -> ArithResult<Self> {
        Ok(Self {
            layout: DividerLayout::new(width)?,
            carry_out: CarryOut::Discard,
        })
    }

    /// Choose the carry-out policy of every add/subtract step.
    ///
    /// With [`CarryOut::IntoAncilla`] iteration `k` leaves its carry in
    /// ancilla `k`; quotient and remainder are unaffected.
    pub fn with_carry_out(mut self, carry_out: CarryOut) -> Self {
        self.carry_out = carry_out;
        self
    }

    /// Operand width.
    pub fn width(&self) -> usize {
        self.layout.width()
    }

    /// The register layout.
    pub fn layout(&self) -> &DividerLayout {
        &self.layout
    }

    /// Build the full circuit for `dividend / divisor`: initialization, the
    /// iteration schedule and the measurement of quotient and remainder.
    pub fn build(&self, dividend: u64, divisor: u64) -> ArithResult<DivisionCircuit> {
        let expected = DivisionOutcome::expected(self.width(), dividend, divisor)?;
        let layout = &self.layout;

        let mut circuit = layout.circuit(format!("divide_{dividend}_by_{divisor}"));
        layout.dividend().initialize(dividend, &mut circuit)?;
        layout.divisor().initialize(divisor, &mut circuit)?;
        let ones = vec![true; layout.width()];
        circuit.initialize(layout.quotient().qubits(), &ones)?;
        let all: Vec<_> = circuit.qubits().iter().map(|q| q.id).collect();
        circuit.barrier(all)?;

        self.emit_schedule(&mut circuit)?;

        let measured = layout.measured_qubits()?;
        let clbits: Vec<_> = circuit.clbits().iter().map(|c| c.id).collect();
        circuit.measure_many(&measured, &clbits)?;

        debug!(
            dividend,
            divisor,
            qubits = circuit.num_qubits(),
            ops = circuit.num_ops(),
            depth = circuit.depth(),
            "built division circuit"
        );

        Ok(DivisionCircuit {
            circuit,
            layout: layout.clone(),
            expected,
        })
    }

    /// Append the reversible iteration schedule (no initialization, no
    /// measurement) to a circuit holding this divider's layout.
    pub fn emit_schedule(&self, circuit: &mut Circuit) -> ArithResult<()> {
        let layout = &self.layout;
        let divisor = layout.divisor();

        for k in 0..layout.width() {
            let window = layout.window(k)?;
            let wiring = AdderWiring::new(
                layout.carry_in(k)?,
                divisor.clone(),
                window,
                layout.ancilla(k)?,
            )?;

            if k == 0 {
                debug!(iteration = k, "subtract divisor");
                Subtractor::new(wiring)
                    .with_carry_out(self.carry_out)
                    .apply(circuit)?;
            } else {
                let previous = layout.sign(k - 1)?;
                debug!(iteration = k, control = %previous, "add or subtract divisor");
                circuit.x(previous)?;
                ControlledAddSub::new(previous, wiring)?
                    .with_carry_out(self.carry_out)
                    .apply(circuit)?;
            }

            let quotient_bit = layout
                .quotient()
                .qubit(k)
                .ok_or(ArithError::IndexOutOfBounds {
                    index: k,
                    size: layout.width(),
                })?;
            circuit.cx(layout.sign(k)?, quotient_bit)?;
        }

        let last = layout.width() - 1;
        debug!("restore negative remainder");
        circuit.cx(layout.sign(last)?, layout.restore())?;
        ConditionalAdd::new(layout.restore(), layout.window(last)?, divisor.clone())?
            .apply(circuit)?;
        Ok(())
    }
}

/// A built division circuit together with the layout needed to read it.
#[derive(Debug, Clone)]
pub struct DivisionCircuit {
    circuit: Circuit,
    layout: DividerLayout,
    expected: DivisionOutcome,
}

impl DivisionCircuit {
    /// The circuit to execute.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume and return the circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// The register layout.
    pub fn layout(&self) -> &DividerLayout {
        &self.layout
    }

    /// The classically computed result the circuit must reproduce.
    pub fn expected(&self) -> DivisionOutcome {
        self.expected
    }

    /// Decode one sampled bit string.
    pub fn decode(&self, bitstring: &str) -> ArithResult<DivisionOutcome> {
        DivisionOutcome::decode(&self.layout, bitstring)
    }
}
