//! Division circuits run through the simulator backend.

use qdiv_adapter_sim::{SimEngine, SimulatorBackend};
use qdiv_arith::{CarryOut, Divider, DivisionOutcome, expected_division};
use qdiv_hal::Backend;

async fn divide(backend: &SimulatorBackend, divider: &Divider, a: u64, b: u64) -> DivisionOutcome {
    let built = divider.build(a, b).unwrap();
    let result = backend.run(built.circuit(), 16).await.unwrap();

    assert!(
        result.counts.is_deterministic(),
        "{a} / {b} sampled {} outcomes",
        result.counts.len()
    );
    let (bitstring, count) = result.counts.most_frequent().unwrap();
    assert_eq!(*count, 16);
    built.decode(bitstring).unwrap()
}

#[tokio::test]
async fn test_documented_scenarios() {
    let backend = SimulatorBackend::new();
    let divider = Divider::new(3).unwrap();

    let cases = [
        (5, 2, "Q 010 R 0001"),
        (7, 1, "Q 111 R 0000"),
        (3, 3, "Q 001 R 0000"),
    ];
    for (a, b, rendered) in cases {
        let outcome = divide(&backend, &divider, a, b).await;
        assert_eq!(outcome.to_string(), rendered);
    }
}

#[tokio::test]
async fn test_raw_bitstring_for_five_by_two() {
    let backend = SimulatorBackend::new();
    let built = Divider::new(3).unwrap().build(5, 2).unwrap();
    let result = backend.run(built.circuit(), 4).await.unwrap();

    assert_eq!(result.counts.get("0100001"), 4);
    assert_eq!(result.memory.len(), 4);
    assert_eq!(result.first_sample(), Some("0100001"));
}

#[tokio::test]
async fn test_all_pairs_up_to_four_bits() {
    let backend = SimulatorBackend::new();
    for width in 1..=4 {
        let divider = Divider::new(width).unwrap();
        let max = 1_u64 << width;
        for a in 0..max {
            for b in 1..max {
                let outcome = divide(&backend, &divider, a, b).await;
                let (q, r) = expected_division(a, b).unwrap();
                assert_eq!((outcome.quotient, outcome.remainder), (q, r), "{a} / {b}");
            }
        }
    }
}

#[tokio::test]
async fn test_statevector_engine_agrees() {
    let backend = SimulatorBackend::new().with_engine(SimEngine::Statevector);
    let divider = Divider::new(2).unwrap();
    for (a, b) in [(3, 1), (3, 2), (2, 3), (0, 1)] {
        let outcome = divide(&backend, &divider, a, b).await;
        assert_eq!(outcome, DivisionOutcome::expected(2, a, b).unwrap());
    }
}

#[tokio::test]
async fn test_statevector_rejects_wide_divider() {
    let backend = SimulatorBackend::new().with_engine(SimEngine::Statevector);
    let built = Divider::new(4).unwrap().build(9, 4).unwrap();
    assert!(backend.run(built.circuit(), 1).await.is_err());
}

#[tokio::test]
async fn test_overflow_taps_do_not_change_result() {
    let backend = SimulatorBackend::new();
    let divider = Divider::new(4).unwrap().with_carry_out(CarryOut::IntoAncilla);
    for (a, b) in [(15, 4), (9, 9), (2, 11)] {
        let outcome = divide(&backend, &divider, a, b).await;
        assert_eq!(outcome, DivisionOutcome::expected(4, a, b).unwrap());
    }
}

#[tokio::test]
async fn test_widest_divider() {
    let backend = SimulatorBackend::new();
    let divider = Divider::new(qdiv_arith::MAX_WIDTH).unwrap();
    assert_eq!(divider.layout().num_qubits(), 62);

    for (a, b) in [(1023, 1), (1023, 512), (0, 1023), (1000, 3), (513, 37), (1023, 1023)] {
        let outcome = divide(&backend, &divider, a, b).await;
        assert_eq!(outcome, DivisionOutcome::expected(10, a, b).unwrap(), "{a} / {b}");
    }
}
