//! qdiv Hardware Abstraction Layer
//!
//! The boundary between circuit construction and execution. A circuit built
//! with `qdiv-ir` is handed to a [`Backend`], which samples its measured
//! classical bits and reports them as an [`ExecutionResult`].
//!
//! # Overview
//!
//! - A common [`Backend`] trait for job submission and management
//! - [`Capabilities`] describing the qubit budget and gate set of a backend
//! - [`BackendRegistry`] for choosing a backend by name at runtime
//! - Result handling via [`ExecutionResult`] and [`Counts`]
//!
//! # Example: Running a Circuit
//!
//! ```ignore
//! use qdiv_hal::Backend;
//! use qdiv_adapter_sim::SimulatorBackend;
//! use qdiv_ir::{Circuit, ClbitId, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut circuit = Circuit::with_size("flip", 1, 1);
//!     circuit.x(QubitId(0))?.measure(QubitId(0), ClbitId(0))?;
//!
//!     let backend = SimulatorBackend::new();
//!     let job_id = backend.submit(&circuit, 10).await?;
//!     let result = backend.wait(&job_id).await?;
//!
//!     assert_eq!(result.counts.get("1"), 10);
//!     Ok(())
//! }
//! ```

pub mod backend;
pub mod capability;
pub mod error;
pub mod job;
pub mod registry;
pub mod result;

pub use backend::{Backend, BackendAvailability, BackendConfig, BackendFactory, ValidationResult};
pub use capability::{Capabilities, GateSet};
pub use error::{HalError, HalResult};
pub use job::{Job, JobId, JobStatus};
pub use registry::BackendRegistry;
pub use result::{Counts, ExecutionResult};
