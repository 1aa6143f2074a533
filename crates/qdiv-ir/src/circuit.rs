//! High-level circuit builder API.

use std::collections::BTreeMap;

use serde::Serialize;

use crate::dag::CircuitDag;
use crate::error::{IrError, IrResult};
use crate::gate::StandardGate;
use crate::instruction::Instruction;
use crate::qubit::{Clbit, ClbitId, Qubit, QubitId};

/// A reversible circuit under construction.
///
/// This is the explicit construction context threaded through every
/// arithmetic building block: each block borrows it mutably, appends its gate
/// sequence and hands it back. Nothing is executed here; the finished circuit is
/// passed to a backend.
#[derive(Debug, Clone)]
pub struct Circuit {
    /// Name of the circuit.
    name: String,
    /// Qubits in the circuit.
    qubits: Vec<Qubit>,
    /// Classical bits in the circuit.
    clbits: Vec<Clbit>,
    /// The underlying DAG representation.
    dag: CircuitDag,
    /// Counter for generating qubit IDs.
    next_qubit_id: u32,
    /// Counter for generating classical bit IDs.
    next_clbit_id: u32,
}

/// Serializable view of a circuit.
#[derive(Serialize)]
struct CircuitSnapshot<'a> {
    name: &'a str,
    qubits: &'a [Qubit],
    clbits: &'a [Clbit],
    depth: usize,
    instructions: Vec<&'a Instruction>,
}

impl Circuit {
    /// Create a new empty circuit.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            qubits: vec![],
            clbits: vec![],
            dag: CircuitDag::new(),
            next_qubit_id: 0,
            next_clbit_id: 0,
        }
    }

    /// Create a circuit with a given number of qubits and classical bits.
    pub fn with_size(name: impl Into<String>, num_qubits: u32, num_clbits: u32) -> Self {
        let mut circuit = Self::new(name);
        for _ in 0..num_qubits {
            circuit.add_qubit();
        }
        for _ in 0..num_clbits {
            circuit.add_clbit();
        }
        circuit
    }

    /// Add a single qubit to the circuit.
    pub fn add_qubit(&mut self) -> QubitId {
        let id = QubitId(self.next_qubit_id);
        self.next_qubit_id += 1;
        self.qubits.push(Qubit::new(id));
        self.dag.add_qubit(id);
        id
    }

    /// Add a named register of qubits, returned LSB first.
    pub fn add_qreg(&mut self, name: impl Into<String>, size: u32) -> Vec<QubitId> {
        let name = name.into();
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = QubitId(self.next_qubit_id);
            self.next_qubit_id += 1;
            self.qubits.push(Qubit::with_register(id, &name, i));
            self.dag.add_qubit(id);
            ids.push(id);
        }
        ids
    }

    /// Add a single classical bit to the circuit.
    pub fn add_clbit(&mut self) -> ClbitId {
        let id = ClbitId(self.next_clbit_id);
        self.next_clbit_id += 1;
        self.clbits.push(Clbit::new(id));
        self.dag.add_clbit(id);
        id
    }

    /// Add a named register of classical bits.
    pub fn add_creg(&mut self, name: impl Into<String>, size: u32) -> Vec<ClbitId> {
        let name = name.into();
        let mut ids = Vec::with_capacity(size as usize);
        for i in 0..size {
            let id = ClbitId(self.next_clbit_id);
            self.next_clbit_id += 1;
            self.clbits.push(Clbit::with_register(id, &name, i));
            self.dag.add_clbit(id);
            ids.push(id);
        }
        ids
    }

    // =========================================================================
    // Gates
    // =========================================================================

    /// Apply a bit flip.
    pub fn x(&mut self, qubit: QubitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(StandardGate::X, [qubit]))?;
        Ok(self)
    }

    /// Apply a controlled-XOR.
    pub fn cx(&mut self, control: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CX, [control, target]))?;
        Ok(self)
    }

    /// Apply a controlled-controlled-XOR.
    pub fn ccx(&mut self, c1: QubitId, c2: QubitId, target: QubitId) -> IrResult<&mut Self> {
        self.dag
            .apply(Instruction::gate(StandardGate::CCX, [c1, c2, target]))?;
        Ok(self)
    }

    /// Apply any gate of the reversible set.
    pub fn gate(
        &mut self,
        gate: StandardGate,
        qubits: impl IntoIterator<Item = QubitId>,
    ) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::gate(gate, qubits))?;
        Ok(self)
    }

    // =========================================================================
    // Other operations
    // =========================================================================

    /// Load a classical bit pattern as the starting configuration.
    ///
    /// Every qubit is assumed to start in |0⟩; an X gate is applied to each
    /// qubit whose bit is set.
    pub fn initialize(&mut self, qubits: &[QubitId], bits: &[bool]) -> IrResult<&mut Self> {
        if qubits.len() != bits.len() {
            return Err(IrError::InitLengthMismatch {
                qubits: qubits.len(),
                bits: bits.len(),
            });
        }
        for (&qubit, &bit) in qubits.iter().zip(bits) {
            if bit {
                self.x(qubit)?;
            }
        }
        Ok(self)
    }

    /// Measure a qubit to a classical bit.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure(qubit, clbit))?;
        Ok(self)
    }

    /// Measure an ordered list of qubits onto an ordered list of classical bits.
    pub fn measure_many(&mut self, qubits: &[QubitId], clbits: &[ClbitId]) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::measure_many(
            qubits.iter().copied(),
            clbits.iter().copied(),
        )?)?;
        Ok(self)
    }

    /// Apply a barrier to specified qubits.
    pub fn barrier(&mut self, qubits: impl IntoIterator<Item = QubitId>) -> IrResult<&mut Self> {
        self.dag.apply(Instruction::barrier(qubits))?;
        Ok(self)
    }

    /// Build the inverse circuit: the same gates in reverse order.
    ///
    /// Every gate in the reversible set is its own inverse, so running a
    /// circuit followed by its inverse is the identity on every basis state.
    pub fn inverse(&self) -> IrResult<Self> {
        let mut inverse = Self {
            name: format!("{}_inv", self.name),
            qubits: self.qubits.clone(),
            clbits: self.clbits.clone(),
            dag: CircuitDag::new(),
            next_qubit_id: self.next_qubit_id,
            next_clbit_id: self.next_clbit_id,
        };
        for qubit in &self.qubits {
            inverse.dag.add_qubit(qubit.id);
        }
        for clbit in &self.clbits {
            inverse.dag.add_clbit(clbit.id);
        }

        let ops: Vec<&Instruction> = self.instructions().collect();
        for inst in ops.into_iter().rev() {
            if inst.is_measure() {
                return Err(IrError::NotReversible(inst.name().to_string()));
            }
            inverse.dag.apply(inst.clone())?;
        }
        Ok(inverse)
    }

    /// Append every operation of `other` to this circuit.
    ///
    /// Both circuits must share qubit and classical bit positions.
    pub fn compose(&mut self, other: &Circuit) -> IrResult<&mut Self> {
        for inst in other.instructions() {
            self.dag.apply(inst.clone())?;
        }
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Get the circuit name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the number of qubits.
    pub fn num_qubits(&self) -> usize {
        self.qubits.len()
    }

    /// Get the number of classical bits.
    pub fn num_clbits(&self) -> usize {
        self.clbits.len()
    }

    /// Get the circuit depth.
    pub fn depth(&self) -> usize {
        self.dag.depth()
    }

    /// Get the number of operations (gates, measurements and barriers).
    pub fn num_ops(&self) -> usize {
        self.dag.num_ops()
    }

    /// Count operations by name.
    pub fn gate_counts(&self) -> BTreeMap<&'static str, usize> {
        let mut counts = BTreeMap::new();
        for inst in self.instructions() {
            *counts.entry(inst.name()).or_insert(0) += 1;
        }
        counts
    }

    /// Whether the circuit is made only of gates and barriers.
    pub fn is_reversible(&self) -> bool {
        self.instructions().all(|inst| !inst.is_measure())
    }

    /// Iterate over instructions in application order.
    pub fn instructions(&self) -> impl Iterator<Item = &Instruction> {
        self.dag.topological_ops().map(|(_, inst)| inst)
    }

    /// Get a reference to the underlying DAG.
    pub fn dag(&self) -> &CircuitDag {
        &self.dag
    }

    /// Consume the circuit and return the DAG.
    pub fn into_dag(self) -> CircuitDag {
        self.dag
    }

    /// Create a circuit from a DAG.
    pub fn from_dag(dag: CircuitDag) -> Self {
        let qubits: Vec<_> = dag.qubits().map(Qubit::new).collect();
        let clbits: Vec<_> = dag.clbits().map(Clbit::new).collect();
        let next_qubit_id = qubits.iter().map(|q| q.id.0 + 1).max().unwrap_or(0);
        let next_clbit_id = clbits.iter().map(|c| c.id.0 + 1).max().unwrap_or(0);

        Self {
            name: "circuit".into(),
            qubits,
            clbits,
            dag,
            next_qubit_id,
            next_clbit_id,
        }
    }

    /// Get the qubits in the circuit.
    pub fn qubits(&self) -> &[Qubit] {
        &self.qubits
    }

    /// Get the classical bits in the circuit.
    pub fn clbits(&self) -> &[Clbit] {
        &self.clbits
    }

    /// Serialize the circuit (registers and instruction list) to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        let snapshot = CircuitSnapshot {
            name: &self.name,
            qubits: &self.qubits,
            clbits: &self.clbits,
            depth: self.depth(),
            instructions: self.instructions().collect(),
        };
        serde_json::to_string_pretty(&snapshot)
    }
}
