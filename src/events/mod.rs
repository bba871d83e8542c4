//! Lifecycle events published by the worker group.
//!
//! - [`event`]: event payload and classification;
//! - [`bus`]: broadcast channel wrapper for non-blocking publish;
//! - [`log`]: a simple subscriber that renders events via `tracing`.

mod bus;
mod event;
mod log;

pub use bus::Bus;
pub use event::{Event, EventKind};
pub use log::LogWriter;
