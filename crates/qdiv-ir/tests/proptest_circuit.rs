//! Property-based tests for reversible circuit construction.

use qdiv_ir::{Circuit, Instruction, QubitId};
use proptest::prelude::*;

/// Gate operations that can be applied to a circuit.
#[derive(Debug, Clone)]
enum GateOp {
    X(u32),
    CX(u32, u32),
    CCX(u32, u32, u32),
}

impl GateOp {
    fn apply(self, circuit: &mut Circuit) {
        // Aliased operands are rejected by the builder and simply skipped here.
        match self {
            GateOp::X(q) => {
                let _ = circuit.x(QubitId(q));
            }
            GateOp::CX(c, t) => {
                let _ = circuit.cx(QubitId(c), QubitId(t));
            }
            GateOp::CCX(c1, c2, t) => {
                let _ = circuit.ccx(QubitId(c1), QubitId(c2), QubitId(t));
            }
        }
    }
}

fn arb_gate_op(num_qubits: u32) -> impl Strategy<Value = GateOp> {
    prop_oneof![
        (0..num_qubits).prop_map(GateOp::X),
        (0..num_qubits, 0..num_qubits).prop_map(|(c, t)| GateOp::CX(c, t)),
        (0..num_qubits, 0..num_qubits, 0..num_qubits)
            .prop_map(|(a, b, t)| GateOp::CCX(a, b, t)),
    ]
}

/// Circuits over 3-8 qubits with up to 30 reversible gates.
fn arb_reversible_circuit() -> impl Strategy<Value = Circuit> {
    (3_u32..=8).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate_op(num_qubits), 0..=30).prop_map(move |ops| {
            let mut circuit = Circuit::with_size("prop", num_qubits, 0);
            for op in ops {
                op.apply(&mut circuit);
            }
            circuit
        })
    })
}

fn ops(circuit: &Circuit) -> Vec<Instruction> {
    circuit.instructions().cloned().collect()
}

proptest! {
    #[test]
    fn double_inverse_is_identity(circuit in arb_reversible_circuit()) {
        let twice = circuit.inverse().unwrap().inverse().unwrap();
        prop_assert_eq!(ops(&circuit), ops(&twice));
    }

    #[test]
    fn inverse_preserves_counts(circuit in arb_reversible_circuit()) {
        let inverse = circuit.inverse().unwrap();
        prop_assert_eq!(circuit.gate_counts(), inverse.gate_counts());
        prop_assert_eq!(circuit.depth(), inverse.depth());
    }

    #[test]
    fn depth_bounded_by_ops(circuit in arb_reversible_circuit()) {
        prop_assert!(circuit.depth() <= circuit.num_ops());
        let counted: usize = circuit.gate_counts().values().sum();
        prop_assert_eq!(counted, circuit.num_ops());
    }

    #[test]
    fn no_gate_touches_a_qubit_twice(circuit in arb_reversible_circuit()) {
        for inst in circuit.instructions() {
            let mut qubits = inst.qubits.clone();
            qubits.sort();
            qubits.dedup();
            prop_assert_eq!(qubits.len(), inst.qubits.len());
        }
    }
}
