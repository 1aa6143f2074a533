//! Tests for the provided `Backend` methods against a scripted backend.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;
use qdiv_hal::{
    Backend, BackendAvailability, Capabilities, ExecutionResult, HalError, HalResult, JobId,
    JobStatus, ValidationResult,
};
use qdiv_ir::{Circuit, ClbitId, QubitId};

/// Reports `Running` for a fixed number of polls, then a final status.
struct ScriptedBackend {
    capabilities: Capabilities,
    polls_before_done: u32,
    polls: AtomicU32,
    final_status: JobStatus,
    submitted: Mutex<Vec<String>>,
}

impl ScriptedBackend {
    fn new(polls_before_done: u32, final_status: JobStatus) -> Self {
        Self {
            capabilities: Capabilities::simulator(4).with_name("scripted"),
            polls_before_done,
            polls: AtomicU32::new(0),
            final_status,
            submitted: Mutex::new(vec![]),
        }
    }
}

#[async_trait]
impl Backend for ScriptedBackend {
    fn name(&self) -> &str {
        &self.capabilities.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn submit(&self, circuit: &Circuit, _shots: u32) -> HalResult<JobId> {
        self.submitted.lock().unwrap().push(circuit.name().to_string());
        Ok(JobId::new("scripted-1"))
    }

    async fn status(&self, _job_id: &JobId) -> HalResult<JobStatus> {
        let seen = self.polls.fetch_add(1, Ordering::SeqCst);
        if seen < self.polls_before_done {
            Ok(JobStatus::Running)
        } else {
            Ok(self.final_status.clone())
        }
    }

    async fn result(&self, _job_id: &JobId) -> HalResult<ExecutionResult> {
        Ok(ExecutionResult::from_memory(vec!["10".into(); 3]))
    }

    async fn cancel(&self, _job_id: &JobId) -> HalResult<()> {
        Ok(())
    }
}

fn flip_circuit(num_qubits: u32) -> Circuit {
    let mut circuit = Circuit::with_size("flip", num_qubits, 2);
    circuit.x(QubitId(0)).unwrap();
    circuit.measure(QubitId(0), ClbitId(0)).unwrap();
    circuit.measure(QubitId(1), ClbitId(1)).unwrap();
    circuit
}

#[tokio::test(start_paused = true)]
async fn wait_polls_until_completed() {
    let backend = ScriptedBackend::new(3, JobStatus::Completed);
    let job_id = backend.submit(&flip_circuit(2), 3).await.unwrap();

    let result = backend.wait(&job_id).await.unwrap();
    assert_eq!(result.counts.get("10"), 3);
    assert_eq!(backend.polls.load(Ordering::SeqCst), 4);
}

#[tokio::test(start_paused = true)]
async fn wait_surfaces_failure() {
    let backend = ScriptedBackend::new(1, JobStatus::Failed("engine crashed".into()));
    let err = backend.wait(&JobId::new("x")).await.unwrap_err();
    assert!(matches!(err, HalError::JobFailed(msg) if msg == "engine crashed"));
}

#[tokio::test(start_paused = true)]
async fn wait_surfaces_cancellation() {
    let backend = ScriptedBackend::new(0, JobStatus::Cancelled);
    let err = backend.wait(&JobId::new("x")).await.unwrap_err();
    assert!(matches!(err, HalError::JobCancelled));
}

#[tokio::test(start_paused = true)]
async fn wait_times_out() {
    let backend = ScriptedBackend::new(u32::MAX, JobStatus::Completed);
    let err = backend.wait(&JobId::new("slow")).await.unwrap_err();
    assert!(matches!(err, HalError::Timeout(id) if id == "slow"));
}

#[tokio::test]
async fn validate_checks_qubit_budget() {
    let backend = ScriptedBackend::new(0, JobStatus::Completed);
    assert_eq!(
        backend.validate(&flip_circuit(4)).await.unwrap(),
        ValidationResult::Valid
    );
    assert!(!backend.validate(&flip_circuit(5)).await.unwrap().is_valid());
}

#[tokio::test]
async fn run_rejects_invalid_circuit_before_submitting() {
    let backend = ScriptedBackend::new(0, JobStatus::Completed);
    let err = backend.run(&flip_circuit(6), 1).await.unwrap_err();

    assert!(matches!(err, HalError::InvalidCircuit(msg) if msg.contains("6 qubits")));
    assert!(backend.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn run_submits_and_waits() {
    let backend = ScriptedBackend::new(0, JobStatus::Completed);
    let result = backend.run(&flip_circuit(2), 3).await.unwrap();

    assert!(result.counts.is_deterministic());
    assert_eq!(*backend.submitted.lock().unwrap(), vec!["flip".to_string()]);
}
