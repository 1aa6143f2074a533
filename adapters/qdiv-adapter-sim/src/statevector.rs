//! Statevector simulation engine.

use num_complex::Complex64;
use rand::Rng;

use rustc_hash::FxHashSet;

use qdiv_ir::{Circuit, Instruction, InstructionKind, QubitId, StandardGate};

/// A statevector representing a quantum state.
pub struct Statevector {
    /// The state amplitudes (2^n complex numbers).
    amplitudes: Vec<Complex64>,
    /// Number of qubits.
    num_qubits: usize,
}

impl Statevector {
    /// Create a new statevector initialized to |0...0⟩.
    pub fn new(num_qubits: usize) -> Self {
        let size = 1 << num_qubits;
        let mut amplitudes = vec![Complex64::new(0.0, 0.0); size];
        amplitudes[0] = Complex64::new(1.0, 0.0);
        Self {
            amplitudes,
            num_qubits,
        }
    }

    /// Apply an instruction to the statevector.
    pub fn apply(&mut self, instruction: &Instruction) {
        let q: Vec<usize> = instruction.qubits.iter().map(|q| q.index()).collect();
        match instruction.kind {
            InstructionKind::Gate(StandardGate::X) => self.apply_x(q[0]),
            InstructionKind::Gate(StandardGate::CX) => self.apply_cx(q[0], q[1]),
            InstructionKind::Gate(StandardGate::CCX) => self.apply_ccx(q[0], q[1], q[2]),
            // Sampling happens once at the end of the circuit.
            InstructionKind::Measure | InstructionKind::Barrier => {}
        }
    }

    fn apply_x(&mut self, qubit: usize) {
        let mask = 1 << qubit;
        for i in 0..(1 << self.num_qubits) {
            if i & mask == 0 {
                let j = i | mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_cx(&mut self, control: usize, target: usize) {
        let ctrl_mask = 1 << control;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & ctrl_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    fn apply_ccx(&mut self, c1: usize, c2: usize, target: usize) {
        let c1_mask = 1 << c1;
        let c2_mask = 1 << c2;
        let tgt_mask = 1 << target;
        for i in 0..(1 << self.num_qubits) {
            if (i & c1_mask != 0) && (i & c2_mask != 0) && (i & tgt_mask == 0) {
                let j = i | tgt_mask;
                self.amplitudes.swap(i, j);
            }
        }
    }

    /// Probability of observing basis state `index`.
    #[cfg(test)]
    fn probability(&self, index: usize) -> f64 {
        self.amplitudes.get(index).map_or(0.0, |a| a.norm_sqr())
    }

    /// Sample a measurement outcome over all qubits.
    pub fn sample<R: Rng>(&self, rng: &mut R) -> usize {
        let r: f64 = rng.r#gen();

        let mut cumulative = 0.0;
        for (i, amp) in self.amplitudes.iter().enumerate() {
            cumulative += amp.norm_sqr();
            if r < cumulative {
                return i;
            }
        }

        // Rounding can leave the cumulative sum just below 1.
        self.amplitudes.len() - 1
    }
}

/// Which qubit each classical bit reads; the last measurement into a clbit wins.
pub fn measurement_map(circuit: &Circuit) -> Vec<Option<QubitId>> {
    let mut map = vec![None; circuit.num_clbits()];
    for inst in circuit.instructions().filter(|i| i.is_measure()) {
        for (q, c) in inst.qubits.iter().zip(&inst.clbits) {
            if let Some(slot) = map.get_mut(c.index()) {
                *slot = Some(*q);
            }
        }
    }
    map
}

/// The first qubit a gate touches after that qubit was measured.
///
/// Final-state sampling cannot reproduce such circuits.
pub fn gate_after_measure(circuit: &Circuit) -> Option<QubitId> {
    let mut measured = FxHashSet::default();
    for inst in circuit.instructions() {
        if inst.is_measure() {
            measured.extend(inst.qubits.iter().copied());
        } else if inst.is_gate() {
            if let Some(q) = inst.qubits.iter().find(|q| measured.contains(*q)) {
                return Some(*q);
            }
        }
    }
    None
}

/// Project a full basis outcome onto the classical bits, clbit 0 first.
pub fn project(outcome: usize, map: &[Option<QubitId>]) -> String {
    map.iter()
        .map(|q| match q {
            Some(q) if (outcome >> q.index()) & 1 == 1 => '1',
            _ => '0',
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use qdiv_ir::ClbitId;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn approx_eq(a: Complex64, b: Complex64) -> bool {
        (a - b).norm() < 1e-10
    }

    #[test]
    fn test_initial_state() {
        let sv = Statevector::new(2);
        assert!(approx_eq(sv.amplitudes[0], Complex64::new(1.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[2], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[3], Complex64::new(0.0, 0.0)));
    }

    #[test]
    fn test_x_gate() {
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        assert!(approx_eq(sv.amplitudes[0], Complex64::new(0.0, 0.0)));
        assert!(approx_eq(sv.amplitudes[1], Complex64::new(1.0, 0.0)));
    }

    #[test]
    fn test_toffoli_moves_amplitude() {
        let mut sv = Statevector::new(3);
        sv.apply_x(0);
        sv.apply_x(1);
        sv.apply_ccx(0, 1, 2);

        assert!((sv.probability(0b111) - 1.0).abs() < 1e-12);
        assert_eq!(sv.probability(0b011), 0.0);
    }

    #[test]
    fn test_cx_requires_control() {
        let mut sv = Statevector::new(2);
        sv.apply_cx(0, 1);
        assert!((sv.probability(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_sample_deterministic() {
        // |1⟩ state should always sample to 1
        let mut sv = Statevector::new(1);
        sv.apply_x(0);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..100 {
            assert_eq!(sv.sample(&mut rng), 1);
        }
    }

    #[test]
    fn test_gate_after_measure() {
        let mut terminal = Circuit::with_size("terminal", 2, 2);
        terminal
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .cx(QubitId(1), QubitId(0))
            .unwrap();
        assert_eq!(gate_after_measure(&terminal), Some(QubitId(0)));

        let mut clean = Circuit::with_size("clean", 2, 2);
        clean
            .x(QubitId(0))
            .unwrap()
            .measure(QubitId(0), ClbitId(0))
            .unwrap()
            .x(QubitId(1))
            .unwrap()
            .measure(QubitId(1), ClbitId(1))
            .unwrap();
        assert_eq!(gate_after_measure(&clean), None);
    }

    #[test]
    fn test_projection_follows_clbit_order() {
        let mut circuit = Circuit::with_size("proj", 3, 3);
        circuit.measure(QubitId(2), ClbitId(0)).unwrap();
        circuit.measure(QubitId(0), ClbitId(2)).unwrap();

        let map = measurement_map(&circuit);
        assert_eq!(map, vec![Some(QubitId(2)), None, Some(QubitId(0))]);
        assert_eq!(project(0b100, &map), "100");
        assert_eq!(project(0b101, &map), "101");
        assert_eq!(project(0b010, &map), "000");
    }
}
