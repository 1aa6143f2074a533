//! Simulator backend implementation.

use std::fmt;
use std::str::FromStr;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Instant;

use async_trait::async_trait;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};
use uuid::Uuid;

use qdiv_hal::{
    Backend, BackendAvailability, BackendConfig, BackendFactory, Capabilities, ExecutionResult,
    HalError, HalResult, Job, JobId, JobStatus, ValidationResult,
};
use qdiv_ir::Circuit;

use crate::basis::{BasisState, MAX_BASIS_QUBITS};
use crate::statevector::{Statevector, gate_after_measure, measurement_map, project};

/// Default qubit budget of the statevector engine.
pub const DEFAULT_MAX_QUBITS: u32 = 20;

/// Largest statevector budget accepted; `2^30` amplitudes take 16 GiB.
pub const MAX_STATEVECTOR_QUBITS: u32 = 30;

/// Simulation engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SimEngine {
    /// Pick the engine for the circuit. Every supported gate is a basis-state
    /// permutation, so this is always the basis engine.
    #[default]
    Auto,
    /// Exact single-word basis-state simulation, up to 64 qubits.
    Basis,
    /// Complex amplitudes with sampled measurement, up to `max_qubits`.
    ///
    /// Sampling happens once on the final state, so circuits that apply a
    /// gate to an already measured qubit are rejected.
    Statevector,
}

impl SimEngine {
    /// Configuration name of the engine.
    pub fn name(&self) -> &'static str {
        match self {
            SimEngine::Auto => "auto",
            SimEngine::Basis => "basis",
            SimEngine::Statevector => "statevector",
        }
    }

    /// The concrete engine `Auto` stands for.
    fn resolve(self) -> Self {
        match self {
            SimEngine::Auto | SimEngine::Basis => SimEngine::Basis,
            SimEngine::Statevector => SimEngine::Statevector,
        }
    }
}

impl fmt::Display for SimEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SimEngine {
    type Err = HalError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(SimEngine::Auto),
            "basis" => Ok(SimEngine::Basis),
            "statevector" => Ok(SimEngine::Statevector),
            other => Err(HalError::Configuration(format!(
                "unknown engine '{other}' (expected auto, basis or statevector)"
            ))),
        }
    }
}

/// Job data for the simulator.
struct SimJob {
    job: Job,
    result: Option<ExecutionResult>,
}

/// Local simulator backend.
///
/// Jobs run to completion inside `submit`; `status` and `result` only look
/// them up.
pub struct SimulatorBackend {
    /// Backend configuration.
    config: BackendConfig,
    /// Capabilities of the selected engine, cached at construction.
    capabilities: Capabilities,
    /// Selected engine.
    engine: SimEngine,
    /// Qubit budget of the statevector engine.
    max_qubits: u32,
    /// Seed for statevector sampling.
    seed: Option<u64>,
    /// Active jobs.
    jobs: Arc<Mutex<FxHashMap<String, SimJob>>>,
}

impl SimulatorBackend {
    /// Create a new simulator backend with default settings.
    pub fn new() -> Self {
        Self::with_max_qubits(DEFAULT_MAX_QUBITS)
    }

    /// Create a simulator with a custom statevector qubit budget, capped at
    /// [`MAX_STATEVECTOR_QUBITS`].
    pub fn with_max_qubits(max_qubits: u32) -> Self {
        let max_qubits = max_qubits.min(MAX_STATEVECTOR_QUBITS);
        let config = BackendConfig::new("simulator");
        Self {
            capabilities: capabilities_for(&config.name, SimEngine::Auto, max_qubits),
            config,
            engine: SimEngine::Auto,
            max_qubits,
            seed: None,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        }
    }

    /// Select the simulation engine.
    pub fn with_engine(mut self, engine: SimEngine) -> Self {
        self.engine = engine;
        self.capabilities = capabilities_for(&self.config.name, engine, self.max_qubits);
        self
    }

    /// Make statevector sampling reproducible.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// The selected engine.
    pub fn engine(&self) -> SimEngine {
        self.engine
    }

    fn jobs(&self) -> std::sync::MutexGuard<'_, FxHashMap<String, SimJob>> {
        self.jobs.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Run simulation synchronously.
    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    fn run_simulation(&self, circuit: &Circuit, shots: u32) -> HalResult<ExecutionResult> {
        let start = Instant::now();
        let engine = self.engine.resolve();
        let num_qubits = circuit.num_qubits();
        debug!(%engine, num_qubits, shots, "starting simulation");

        let memory = match engine {
            SimEngine::Statevector => {
                if let Some(q) = circuit
                    .instructions()
                    .flat_map(|inst| inst.qubits.iter())
                    .find(|q| q.index() >= num_qubits)
                {
                    return Err(HalError::InvalidCircuit(format!(
                        "{q} is outside a {num_qubits}-qubit register"
                    )));
                }
                if let Some(q) = gate_after_measure(circuit) {
                    return Err(HalError::InvalidCircuit(format!(
                        "{q} is used by a gate after it was measured"
                    )));
                }

                let mut sv = Statevector::new(num_qubits);
                for inst in circuit.instructions() {
                    sv.apply(inst);
                }
                let map = measurement_map(circuit);
                let mut rng = match self.seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_entropy(),
                };
                (0..shots).map(|_| project(sv.sample(&mut rng), &map)).collect()
            }
            SimEngine::Auto | SimEngine::Basis => {
                // The outcome is certain, so one pass serves every shot.
                let mut state = BasisState::new(num_qubits)?;
                let bits = state.execute(circuit)?;
                vec![bits; shots as usize]
            }
        };

        let elapsed = start.elapsed();
        debug!("Simulation completed in {:?}", elapsed);

        Ok(ExecutionResult::from_memory(memory)
            .with_execution_time(elapsed.as_millis() as u64)
            .with_metadata("engine", serde_json::json!(engine.name()))
            .with_metadata("num_qubits", serde_json::json!(num_qubits)))
    }
}

fn capabilities_for(name: &str, engine: SimEngine, max_qubits: u32) -> Capabilities {
    match engine.resolve() {
        SimEngine::Statevector => Capabilities::simulator(max_qubits)
            .with_name(name)
            .with_feature("statevector"),
        SimEngine::Auto | SimEngine::Basis => Capabilities::simulator(MAX_BASIS_QUBITS as u32)
            .with_name(name)
            .with_feature("basis_state"),
    }
}

impl Default for SimulatorBackend {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Backend for SimulatorBackend {
    fn name(&self) -> &str {
        &self.config.name
    }

    fn capabilities(&self) -> &Capabilities {
        &self.capabilities
    }

    async fn availability(&self) -> HalResult<BackendAvailability> {
        Ok(BackendAvailability::always_available())
    }

    async fn validate(&self, circuit: &Circuit) -> HalResult<ValidationResult> {
        let mut reasons = self.capabilities.violations(circuit);
        if self.engine.resolve() == SimEngine::Statevector {
            if let Some(q) = gate_after_measure(circuit) {
                reasons.push(format!(
                    "{q} is used by a gate after it was measured (statevector samples the final state only)"
                ));
            }
        }
        if reasons.is_empty() {
            Ok(ValidationResult::Valid)
        } else {
            Ok(ValidationResult::Invalid { reasons })
        }
    }

    #[instrument(skip(self, circuit), fields(circuit = circuit.name()))]
    async fn submit(&self, circuit: &Circuit, shots: u32) -> HalResult<JobId> {
        if shots == 0 || shots > self.capabilities.max_shots {
            return Err(HalError::InvalidShots(format!(
                "{shots} (expected 1..={})",
                self.capabilities.max_shots
            )));
        }
        if circuit.num_qubits() > self.capabilities.num_qubits as usize {
            return Err(HalError::CircuitTooLarge(format!(
                "Circuit has {} qubits but the {} engine only supports {}",
                circuit.num_qubits(),
                self.engine.resolve(),
                self.capabilities.num_qubits
            )));
        }

        let job_id = JobId::new(Uuid::new_v4().to_string());
        let mut job = Job::new(job_id.clone(), circuit.name(), shots);
        job.advance(JobStatus::Running)?;
        self.jobs().insert(
            job_id.0.clone(),
            SimJob { job, result: None },
        );
        debug!("Submitted job: {}", job_id);

        let outcome = self.run_simulation(circuit, shots);

        let mut jobs = self.jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match outcome {
            Ok(result) => {
                sim_job.result = Some(result);
                sim_job.job.advance(JobStatus::Completed)?;
            }
            Err(e) => {
                debug!("Job {} failed: {}", job_id, e);
                sim_job.job.advance(JobStatus::Failed(e.to_string()))?;
            }
        }

        Ok(job_id)
    }

    async fn status(&self, job_id: &JobId) -> HalResult<JobStatus> {
        self.jobs()
            .get(&job_id.0)
            .map(|j| j.job.status.clone())
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))
    }

    async fn result(&self, job_id: &JobId) -> HalResult<ExecutionResult> {
        let jobs = self.jobs();
        let sim_job = jobs
            .get(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        match (&sim_job.result, &sim_job.job.status) {
            (Some(result), _) => Ok(result.clone()),
            (None, JobStatus::Failed(msg)) => Err(HalError::JobFailed(msg.clone())),
            (None, JobStatus::Cancelled) => Err(HalError::JobCancelled),
            (None, status) => Err(HalError::Backend(format!(
                "job {job_id} has no result yet ({status})"
            ))),
        }
    }

    async fn cancel(&self, job_id: &JobId) -> HalResult<()> {
        let mut jobs = self.jobs();
        let sim_job = jobs
            .get_mut(&job_id.0)
            .ok_or_else(|| HalError::JobNotFound(job_id.0.clone()))?;
        sim_job.job.advance(JobStatus::Cancelled)
    }
}

impl BackendFactory for SimulatorBackend {
    fn from_config(config: BackendConfig) -> HalResult<Self> {
        let max_qubits = match config.get_u64("max_qubits")? {
            None => DEFAULT_MAX_QUBITS,
            Some(v) if v <= u64::from(MAX_STATEVECTOR_QUBITS) => v as u32,
            Some(v) => {
                return Err(HalError::Configuration(format!(
                    "max_qubits must be at most {MAX_STATEVECTOR_QUBITS}, got {v}"
                )));
            }
        };
        let engine = config
            .get_str("engine")?
            .map(SimEngine::from_str)
            .transpose()?
            .unwrap_or_default();
        let seed = config.get_u64("seed")?;

        Ok(Self {
            capabilities: capabilities_for(&config.name, engine, max_qubits),
            config,
            engine,
            max_qubits,
            seed,
            jobs: Arc::new(Mutex::new(FxHashMap::default())),
        })
    }
}
