//! Backend capability introspection.
//!
//! Describes what a backend can run: how many qubits it can hold and which
//! gates it understands. [`Backend::validate`](crate::Backend::validate)
//! checks circuits against these limits before anything is submitted.

use qdiv_ir::{Circuit, StandardGate};
use serde::{Deserialize, Serialize};

/// Capabilities of a backend.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Capabilities {
    /// Name of the backend.
    pub name: String,
    /// Number of qubits available.
    pub num_qubits: u32,
    /// Supported gate set (OpenQASM naming).
    pub gate_set: GateSet,
    /// Maximum number of shots per job.
    pub max_shots: u32,
    /// Whether this is a simulator.
    pub is_simulator: bool,
    /// Additional capability flags such as `"basis_state"` or `"statevector"`.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub features: Vec<String>,
}

impl Capabilities {
    /// Create capabilities for a simulator holding `num_qubits` qubits.
    pub fn simulator(num_qubits: u32) -> Self {
        Self {
            name: "simulator".into(),
            num_qubits,
            gate_set: GateSet::reversible(),
            max_shots: 100_000,
            is_simulator: true,
            features: vec![],
        }
    }

    /// Rename the backend.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Add a capability flag.
    pub fn with_feature(mut self, feature: impl Into<String>) -> Self {
        self.features.push(feature.into());
        self
    }

    /// Whether a capability flag is set.
    pub fn has_feature(&self, feature: &str) -> bool {
        self.features.iter().any(|f| f == feature)
    }

    /// Reasons `circuit` cannot run here; empty when it fits.
    pub fn violations(&self, circuit: &Circuit) -> Vec<String> {
        let mut reasons = vec![];
        if circuit.num_qubits() > self.num_qubits as usize {
            reasons.push(format!(
                "circuit has {} qubits but {} supports {}",
                circuit.num_qubits(),
                self.name,
                self.num_qubits
            ));
        }
        for inst in circuit.instructions() {
            if let Some(gate) = inst.as_gate() {
                let reason = format!("unsupported gate: {}", gate.name());
                if !self.gate_set.contains(gate.name()) && !reasons.contains(&reason) {
                    reasons.push(reason);
                }
            }
        }
        reasons
    }
}

/// Gate set supported by a backend.
///
/// Gate names follow the OpenQASM convention (lowercase). If `native` is empty,
/// all supported gates are considered native.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GateSet {
    /// Single-qubit gates supported.
    pub single_qubit: Vec<String>,
    /// Two-qubit gates supported.
    pub two_qubit: Vec<String>,
    /// Three-qubit gates supported.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub three_qubit: Vec<String>,
    /// Native gates (execute without decomposition on this backend).
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub native: Vec<String>,
}

impl GateSet {
    /// The classical-reversible set: X, CX and CCX.
    pub fn reversible() -> Self {
        let names = |gates: &[StandardGate]| -> Vec<String> {
            gates.iter().map(|g| g.name().to_string()).collect()
        };
        Self {
            single_qubit: names(&[StandardGate::X]),
            two_qubit: names(&[StandardGate::CX]),
            three_qubit: names(&[StandardGate::CCX]),
            native: vec![],
        }
    }

    /// Check if a gate is supported.
    pub fn contains(&self, gate: &str) -> bool {
        self.single_qubit.iter().any(|g| g == gate)
            || self.two_qubit.iter().any(|g| g == gate)
            || self.three_qubit.iter().any(|g| g == gate)
    }

    /// Check if a gate is native (executes without decomposition).
    pub fn is_native(&self, gate: &str) -> bool {
        if self.native.is_empty() {
            self.contains(gate)
        } else {
            self.native.iter().any(|g| g == gate)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdiv_ir::QubitId;

    #[test]
    fn test_reversible_gate_set() {
        let gates = GateSet::reversible();
        assert!(gates.contains("x"));
        assert!(gates.contains("cx"));
        assert!(gates.contains("ccx"));
        assert!(!gates.contains("h"));
        assert!(gates.is_native("ccx"));
    }

    #[test]
    fn test_simulator_capabilities() {
        let caps = Capabilities::simulator(20).with_feature("statevector");
        assert_eq!(caps.num_qubits, 20);
        assert!(caps.is_simulator);
        assert!(caps.has_feature("statevector"));
        assert!(!caps.has_feature("basis_state"));
    }

    #[test]
    fn test_violations() {
        let caps = Capabilities::simulator(2);
        let mut small = Circuit::with_size("small", 2, 0);
        small.cx(QubitId(0), QubitId(1)).unwrap();
        assert!(caps.violations(&small).is_empty());

        let big = Circuit::with_size("big", 3, 0);
        let reasons = caps.violations(&big);
        assert_eq!(reasons.len(), 1);
        assert!(reasons[0].contains("3 qubits"));
    }

    #[test]
    fn test_missing_gate_is_reported() {
        let mut caps = Capabilities::simulator(3);
        caps.gate_set.three_qubit.clear();
        let mut circuit = Circuit::with_size("toffoli", 3, 0);
        circuit.ccx(QubitId(0), QubitId(1), QubitId(2)).unwrap();
        assert_eq!(caps.violations(&circuit), vec!["unsupported gate: ccx"]);
    }
}
