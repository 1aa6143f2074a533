//! Backend errors.

use thiserror::Error;

/// Errors raised by backends, jobs and the registry.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HalError {
    /// The backend cannot take jobs right now.
    #[error("Backend not available: {0}")]
    BackendUnavailable(String),

    /// No factory is registered under this name.
    #[error("Unknown backend: {0}")]
    UnknownBackend(String),

    /// The job ran and failed.
    #[error("Job failed: {0}")]
    JobFailed(String),

    /// The job was cancelled before it produced a result.
    #[error("Job cancelled")]
    JobCancelled,

    /// No job with this id exists on the backend.
    #[error("Job not found: {0}")]
    JobNotFound(String),

    /// The circuit failed validation against the backend.
    #[error("Invalid circuit: {0}")]
    InvalidCircuit(String),

    /// Backend options could not be parsed.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// `wait` gave up before the job reached a terminal state.
    #[error("Timeout waiting for job {0}")]
    Timeout(String),

    /// The circuit needs more qubits than the selected engine holds.
    #[error("Circuit exceeds backend capabilities: {0}")]
    CircuitTooLarge(String),

    /// Shot count is zero or above the backend limit.
    #[error("Invalid shots: {0}")]
    InvalidShots(String),

    /// Any other backend failure, including illegal job state transitions.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// Result type for backend operations.
pub type HalResult<T> = Result<T, HalError>;
