//! Runtime core: orchestration and lifecycle.
//!
//! The public API from this module is [`WorkerGroup`], which sequences worker
//! startup by readiness dependency, supervises concurrent execution, and
//! aggregates the first failure, plus [`cancel_on_signal`] for wiring OS
//! termination signals to the root cancellation token.
//!
//! Internal modules:
//! - [`group`]: the orchestrator;
//! - [`alive`]: tracks which workers are still running, for stuck detection;
//! - [`shutdown`]: cross-platform shutdown signal handling.

mod alive;
mod group;
mod shutdown;

pub use group::WorkerGroup;
pub use shutdown::cancel_on_signal;
