//! qdiv Circuit Intermediate Representation
//!
//! This crate provides the data structures used to describe reversible
//! arithmetic circuits in qdiv. Every higher layer (the arithmetic building
//! blocks, the divider and the simulator backend) speaks in terms of these types.
//!
//! # Overview
//!
//! A [`Circuit`] is the explicit construction context that building blocks
//! write into. Internally it keeps a DAG ([`CircuitDag`]) whose node order is
//! the order gates were applied, so iteration is deterministic and depth can be
//! computed from wire dependencies.
//!
//! # Core Components
//!
//! - **Qubits and Classical Bits**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`StandardGate`] restricted to the reversible set X, CX and CCX
//! - **Instructions**: [`Instruction`] combining gates with their operands
//! - **DAG**: [`CircuitDag`] for the wire-dependency graph
//! - **Circuit**: [`Circuit`] builder API
//!
//! # Example: A One-Bit Half Adder
//!
//! ```rust
//! use qdiv_ir::{Circuit, ClbitId, QubitId};
//!
//! let mut circuit = Circuit::with_size("half_adder", 3, 2);
//! let (a, b, carry) = (QubitId(0), QubitId(1), QubitId(2));
//!
//! circuit.initialize(&[a, b], &[true, true]).unwrap();
//! circuit.ccx(a, b, carry).unwrap().cx(a, b).unwrap();
//! circuit.measure(b, ClbitId(0)).unwrap();
//! circuit.measure(carry, ClbitId(1)).unwrap();
//!
//! assert_eq!(circuit.num_qubits(), 3);
//! assert_eq!(circuit.gate_counts()["ccx"], 1);
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Description |
//! |------|--------|-------------|
//! | `X` | 1 | Bit flip |
//! | `CX` | 2 | Controlled-XOR (CNOT) |
//! | `CCX` | 3 | Controlled-controlled-XOR (Toffoli) |

pub mod circuit;
pub mod dag;
pub mod error;
pub mod gate;
pub mod instruction;
pub mod qubit;

pub use circuit::Circuit;
pub use dag::{CircuitDag, DagEdge, DagNode, NodeIndex, WireId};
pub use error::{IrError, IrResult};
pub use gate::StandardGate;
pub use instruction::{Instruction, InstructionKind};
pub use qubit::{Clbit, ClbitId, Qubit, QubitId};
