//! DAG-based circuit representation.

use petgraph::Direction;
use petgraph::graph::{DiGraph, NodeIndex as PetNodeIndex};
use petgraph::visit::EdgeRef;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::instruction::{Instruction, InstructionKind};
use crate::qubit::{ClbitId, QubitId};

/// Node index type for the circuit DAG.
pub type NodeIndex = PetNodeIndex<u32>;

/// A node in the circuit DAG.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum DagNode {
    /// Input node for a wire.
    In(WireId),
    /// Output node for a wire.
    Out(WireId),
    /// Operation node containing an instruction.
    Op(Instruction),
}

impl DagNode {
    /// Check if this is an operation node.
    #[inline]
    pub fn is_op(&self) -> bool {
        matches!(self, DagNode::Op(_))
    }

    /// Get the instruction if this is an operation node.
    #[inline]
    pub fn instruction(&self) -> Option<&Instruction> {
        match self {
            DagNode::Op(inst) => Some(inst),
            _ => None,
        }
    }
}

/// Identifier for a wire in the DAG.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WireId {
    /// A quantum wire.
    Qubit(QubitId),
    /// A classical wire.
    Clbit(ClbitId),
}

impl From<QubitId> for WireId {
    fn from(q: QubitId) -> Self {
        WireId::Qubit(q)
    }
}

impl From<ClbitId> for WireId {
    fn from(c: ClbitId) -> Self {
        WireId::Clbit(c)
    }
}

/// An edge in the circuit DAG representing a wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DagEdge {
    /// The wire this edge represents.
    pub wire: WireId,
}

/// DAG-based circuit representation.
///
/// - Nodes are input nodes, output nodes or operation nodes
/// - Edges are wires; every wire runs from its input node through the
///   operations touching it to its output node
///
/// Operation nodes are only ever appended, so ascending node index order is a
/// topological order that also matches the order in which gates were applied.
#[derive(Debug, Clone)]
pub struct CircuitDag {
    /// The underlying graph.
    graph: DiGraph<DagNode, DagEdge, u32>,
    /// Map from qubit to its output node.
    qubit_outputs: FxHashMap<QubitId, NodeIndex>,
    /// Map from classical bit to its output node.
    clbit_outputs: FxHashMap<ClbitId, NodeIndex>,
    /// Wire front: maps each wire to the node just before its output node.
    wire_front: FxHashMap<WireId, NodeIndex>,
    /// Qubits in insertion order.
    qubit_order: Vec<QubitId>,
    /// Classical bits in insertion order.
    clbit_order: Vec<ClbitId>,
    /// Number of operation nodes.
    num_ops: usize,
}

impl CircuitDag {
    /// Create a new empty circuit DAG.
    pub fn new() -> Self {
        Self {
            graph: DiGraph::default(),
            qubit_outputs: FxHashMap::default(),
            clbit_outputs: FxHashMap::default(),
            wire_front: FxHashMap::default(),
            qubit_order: vec![],
            clbit_order: vec![],
            num_ops: 0,
        }
    }

    /// Add a qubit wire. Adding an existing qubit is a no-op.
    pub fn add_qubit(&mut self, qubit: QubitId) {
        if self.qubit_outputs.contains_key(&qubit) {
            return;
        }
        let wire = WireId::Qubit(qubit);
        let out_node = self.add_wire(wire);
        self.qubit_outputs.insert(qubit, out_node);
        self.qubit_order.push(qubit);
    }

    /// Add a classical wire. Adding an existing bit is a no-op.
    pub fn add_clbit(&mut self, clbit: ClbitId) {
        if self.clbit_outputs.contains_key(&clbit) {
            return;
        }
        let wire = WireId::Clbit(clbit);
        let out_node = self.add_wire(wire);
        self.clbit_outputs.insert(clbit, out_node);
        self.clbit_order.push(clbit);
    }

    fn add_wire(&mut self, wire: WireId) -> NodeIndex {
        let in_node = self.graph.add_node(DagNode::In(wire));
        let out_node = self.graph.add_node(DagNode::Out(wire));
        self.graph.add_edge(in_node, out_node, DagEdge { wire });
        self.wire_front.insert(wire, in_node);
        out_node
    }

    /// Append an instruction to the end of every wire it touches.
    pub fn apply(&mut self, instruction: Instruction) -> IrResult<NodeIndex> {
        let gate_name = match &instruction.kind {
            InstructionKind::Gate(gate) => Some(gate.name().to_string()),
            _ => None,
        };

        if let InstructionKind::Gate(gate) = &instruction.kind {
            let expected = gate.num_qubits();
            let got = u32::try_from(instruction.qubits.len()).unwrap_or(u32::MAX);
            if expected != got {
                return Err(IrError::QubitCountMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got,
                });
            }
        }

        for &qubit in &instruction.qubits {
            if !self.qubit_outputs.contains_key(&qubit) {
                return Err(IrError::QubitNotFound {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        for &clbit in &instruction.clbits {
            if !self.clbit_outputs.contains_key(&clbit) {
                return Err(IrError::ClbitNotFound {
                    clbit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        // An aliased operand would make a controlled gate act on its own control.
        let mut seen = FxHashSet::default();
        for &qubit in &instruction.qubits {
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_name: gate_name.clone(),
                });
            }
        }

        let wires: Vec<(WireId, NodeIndex)> = instruction
            .qubits
            .iter()
            .map(|&q| (WireId::Qubit(q), self.qubit_outputs[&q]))
            .chain(
                instruction
                    .clbits
                    .iter()
                    .map(|&c| (WireId::Clbit(c), self.clbit_outputs[&c])),
            )
            .collect();

        let op_node = self.graph.add_node(DagNode::Op(instruction));
        self.num_ops += 1;

        for (wire, out_node) in wires {
            let prev_node = self.wire_front[&wire];

            let edge_id = self
                .graph
                .edges_directed(prev_node, Direction::Outgoing)
                .find(|e| e.weight().wire == wire && e.target() == out_node)
                .map(|e| e.id())
                .ok_or_else(|| {
                    IrError::InvalidDag(format!(
                        "Missing edge from predecessor to output for wire {wire:?}"
                    ))
                })?;

            self.graph.remove_edge(edge_id);
            self.graph.add_edge(prev_node, op_node, DagEdge { wire });
            self.graph.add_edge(op_node, out_node, DagEdge { wire });
            self.wire_front.insert(wire, op_node);
        }

        Ok(op_node)
    }

    /// Iterate over operations in application order.
    pub fn topological_ops(&self) -> impl Iterator<Item = (NodeIndex, &Instruction)> {
        self.graph
            .node_indices()
            .filter_map(|idx| self.graph[idx].instruction().map(|inst| (idx, inst)))
    }

    /// Get an instruction by node index.
    #[inline]
    pub fn get_instruction(&self, node: NodeIndex) -> Option<&Instruction> {
        self.graph.node_weight(node).and_then(DagNode::instruction)
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubit_order.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbit_order.len()
    }

    /// Get the number of operations.
    pub fn num_ops(&self) -> usize {
        self.num_ops
    }

    /// Length of the longest chain of dependent operations.
    pub fn depth(&self) -> usize {
        let mut depths: Vec<usize> = vec![0; self.graph.node_count()];
        let mut max_depth = 0usize;

        // Predecessors of an operation (input nodes or earlier operations)
        // always have a lower index. Output nodes are skipped.
        for node in self.graph.node_indices() {
            if !self.graph[node].is_op() {
                continue;
            }
            let node_depth = 1 + self
                .graph
                .edges_directed(node, Direction::Incoming)
                .map(|e| depths[e.source().index()])
                .max()
                .unwrap_or(0);

            max_depth = max_depth.max(node_depth);
            depths[node.index()] = node_depth;
        }

        max_depth
    }

    /// Iterate over qubits in insertion order.
    pub fn qubits(&self) -> impl Iterator<Item = QubitId> + '_ {
        self.qubit_order.iter().copied()
    }

    /// Iterate over classical bits in insertion order.
    pub fn clbits(&self) -> impl Iterator<Item = ClbitId> + '_ {
        self.clbit_order.iter().copied()
    }

    /// Get a reference to the underlying graph.
    pub fn graph(&self) -> &DiGraph<DagNode, DagEdge, u32> {
        &self.graph
    }
}

impl Default for CircuitDag {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gate::StandardGate;

    #[test]
    fn test_empty_dag() {
        let dag = CircuitDag::new();
        assert_eq!(dag.num_qubits(), 0);
        assert_eq!(dag.num_clbits(), 0);
        assert_eq!(dag.num_ops(), 0);
        assert_eq!(dag.depth(), 0);
    }

    #[test]
    fn test_add_qubit_idempotent() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.add_qubit(QubitId(0));
        assert_eq!(dag.num_qubits(), 2);
    }

    #[test]
    fn test_chain_depth() {
        let mut dag = CircuitDag::new();
        for i in 0..3 {
            dag.add_qubit(QubitId(i));
        }

        dag.apply(Instruction::gate(StandardGate::X, [QubitId(0)]))
            .unwrap();
        dag.apply(Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(1)]))
            .unwrap();
        dag.apply(Instruction::gate(
            StandardGate::CCX,
            [QubitId(0), QubitId(1), QubitId(2)],
        ))
        .unwrap();

        assert_eq!(dag.num_ops(), 3);
        assert_eq!(dag.depth(), 3);
    }

    #[test]
    fn test_parallel_gates_depth() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        dag.apply(Instruction::gate(StandardGate::X, [QubitId(0)]))
            .unwrap();
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(1)]))
            .unwrap();

        assert_eq!(dag.num_ops(), 2);
        assert_eq!(dag.depth(), 1);
    }

    #[test]
    fn test_ops_keep_application_order() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(1)]))
            .unwrap();
        dag.apply(Instruction::gate(StandardGate::CX, [QubitId(1), QubitId(0)]))
            .unwrap();
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(0)]))
            .unwrap();

        let names: Vec<_> = dag.topological_ops().map(|(_, i)| i.name()).collect();
        assert_eq!(names, vec!["x", "cx", "x"]);
        let first = dag.topological_ops().next().unwrap().1;
        assert_eq!(first.qubits, vec![QubitId(1)]);
    }

    #[test]
    fn test_gate_arity_mismatch() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        let result = dag.apply(Instruction::gate(StandardGate::CCX, [QubitId(0), QubitId(1)]));

        match result {
            Err(IrError::QubitCountMismatch {
                gate_name,
                expected,
                got,
            }) => {
                assert_eq!(gate_name, "ccx");
                assert_eq!(expected, 3);
                assert_eq!(got, 2);
            }
            other => panic!("Expected QubitCountMismatch, got {other:?}"),
        }
    }

    #[test]
    fn test_aliased_operands_rejected() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_qubit(QubitId(1));

        let result = dag.apply(Instruction::gate(
            StandardGate::CCX,
            [QubitId(0), QubitId(1), QubitId(0)],
        ));
        assert!(matches!(
            result,
            Err(IrError::DuplicateQubit {
                qubit: QubitId(0),
                ..
            })
        ));
        assert_eq!(dag.num_ops(), 0);
    }

    #[test]
    fn test_qubit_not_found_with_context() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));

        let err = dag
            .apply(Instruction::gate(StandardGate::CX, [QubitId(0), QubitId(5)]))
            .unwrap_err();
        assert!(err.to_string().contains("gate: cx"));
    }

    #[test]
    fn test_measure_extends_classical_wire() {
        let mut dag = CircuitDag::new();
        dag.add_qubit(QubitId(0));
        dag.add_clbit(ClbitId(0));
        dag.apply(Instruction::gate(StandardGate::X, [QubitId(0)]))
            .unwrap();
        dag.apply(Instruction::measure(QubitId(0), ClbitId(0)))
            .unwrap();

        assert_eq!(dag.depth(), 2);
        assert!(matches!(
            dag.apply(Instruction::measure(QubitId(0), ClbitId(1))),
            Err(IrError::ClbitNotFound { .. })
        ));
    }
}
