//! # Runtime events emitted by the worker group.
//!
//! The [`EventKind`] enum classifies event types across two categories:
//! - **Worker lifecycle**: waiting on dependencies, starting, readiness,
//!   terminal stop or failure.
//! - **Shutdown**: cancellation observed, graceful completion, grace period
//!   exceeded.
//!
//! The [`Event`] struct carries metadata such as the wall-clock timestamp,
//! worker name, and a free-form reason.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases
//! monotonically. Use `seq` to restore the exact order when events are
//! delivered out of order.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Worker lifecycle events ===
    /// Worker is blocked on its dependency readiness signals.
    ///
    /// Sets: `worker`, `at`, `seq`.
    WorkerWaiting,

    /// Worker's dependencies are satisfied; its `run` is being invoked.
    ///
    /// Sets: `worker`, `at`, `seq`.
    WorkerStarting,

    /// Worker fired its readiness signal.
    ///
    /// Sets: `worker`, `at`, `seq`.
    WorkerReady,

    /// Worker reached a terminal state cleanly (finished or cancelled).
    ///
    /// Sets: `worker`, optional `reason`, `at`, `seq`.
    WorkerStopped,

    /// Worker failed with a non-cancellation error.
    ///
    /// Sets: `worker`, `reason`, `at`, `seq`.
    WorkerFailed,

    // === Shutdown events ===
    /// Group-wide cancellation observed (external trigger or fail-fast).
    ///
    /// Sets: `at`, `seq`.
    ShutdownRequested,

    /// All workers stopped within the configured grace period.
    ///
    /// Sets: `at`, `seq`.
    AllStoppedWithin,

    /// Grace period exceeded; some workers did not stop in time.
    ///
    /// Sets: `at`, `seq`.
    GraceExceeded,
}

/// A single runtime event with metadata.
#[derive(Debug, Clone)]
pub struct Event {
    /// Event classification.
    pub kind: EventKind,
    /// Worker name, for worker-scoped events.
    pub worker: Option<String>,
    /// Free-form detail (error message, cancellation phase).
    pub reason: Option<String>,
    /// Wall-clock timestamp at creation.
    pub at: SystemTime,
    /// Globally monotonic sequence number.
    pub seq: u64,
}

impl Event {
    /// Creates an event stamped with the current time and the next sequence
    /// number.
    pub fn now(kind: EventKind) -> Self {
        Self {
            kind,
            worker: None,
            reason: None,
            at: SystemTime::now(),
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
        }
    }

    /// Attaches a worker name.
    pub fn with_worker(mut self, worker: impl Into<String>) -> Self {
        self.worker = Some(worker.into());
        self
    }

    /// Attaches a free-form reason.
    pub fn with_reason(mut self, reason: impl Into<String>) -> Self {
        self.reason = Some(reason.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seq_is_monotonic() {
        let a = Event::now(EventKind::WorkerStarting);
        let b = Event::now(EventKind::WorkerStopped);
        assert!(b.seq > a.seq);
    }

    #[test]
    fn test_builders_attach_metadata() {
        let ev = Event::now(EventKind::WorkerFailed)
            .with_worker("storage")
            .with_reason("boom");
        assert_eq!(ev.worker.as_deref(), Some("storage"));
        assert_eq!(ev.reason.as_deref(), Some("boom"));
    }
}
