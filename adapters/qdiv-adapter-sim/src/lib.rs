//! qdiv Local Simulator
//!
//! A local [`Backend`](qdiv_hal::Backend) for circuits built from X, CX and
//! CCX. Every such gate permutes computational basis states, so a circuit
//! started from |0…0⟩ stays in a single basis state and can be simulated
//! exactly on one machine word.
//!
//! # Engines
//!
//! | Engine | State | Qubit limit | Use |
//! |--------|-------|-------------|-----|
//! | [`SimEngine::Basis`] | one `u64` | 64 | exact, default (`Auto`) |
//! | [`SimEngine::Statevector`] | `2^n` complex amplitudes | `max_qubits` (20) | cross-checking |
//!
//! | Qubits | Statevector memory |
//! |--------|--------------------|
//! | 10 | ~16 KB |
//! | 15 | ~512 KB |
//! | 20 | ~16 MB |
//!
//! # Example
//!
//! ```ignore
//! use qdiv_adapter_sim::SimulatorBackend;
//! use qdiv_hal::Backend;
//! use qdiv_ir::{Circuit, ClbitId, QubitId};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let backend = SimulatorBackend::new();
//!
//!     let mut circuit = Circuit::with_size("toffoli", 3, 1);
//!     circuit.x(QubitId(0))?.x(QubitId(1))?.ccx(QubitId(0), QubitId(1), QubitId(2))?;
//!     circuit.measure(QubitId(2), ClbitId(0))?;
//!
//!     let result = backend.run(&circuit, 100).await?;
//!     assert_eq!(result.counts.get("1"), 100);
//!     Ok(())
//! }
//! ```

mod basis;
mod simulator;
mod statevector;

pub use basis::BasisState;
pub use simulator::{SimEngine, SimulatorBackend};
