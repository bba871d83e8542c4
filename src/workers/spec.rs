//! # Worker registration for supervised execution.
//!
//! Defines [`WorkerSpec`] an immutable bundle that describes how a worker
//! participates in a group: which readiness signals it must wait for before
//! starting and which signal it fires itself.
//!
//! ## Rules
//! - Specs are built once at composition time and never mutated afterwards.
//! - Dependency edges across the registered set must form a DAG. The group
//!   performs no cycle detection: a cyclic dependency set leaves every
//!   affected worker blocked in its waiting phase until external
//!   cancellation — a liveness bug, not a crash.

use crate::workers::ready::ReadySignal;
use crate::workers::worker::WorkerRef;

/// Registration of one worker with its readiness dependencies.
///
/// ## Example
/// ```rust
/// use kvserve::{ReadySignal, WorkerError, WorkerFn, WorkerSpec};
///
/// let storage_ready = ReadySignal::new();
///
/// let storage = WorkerSpec::new(WorkerFn::arc("storage", |_ctx, ready| async move {
///     // ... connect, then:
///     if let Some(ready) = ready {
///         ready.fire();
///     }
///     Ok::<_, WorkerError>(())
/// }))
/// .emits(&storage_ready);
///
/// let observer = WorkerSpec::new(WorkerFn::arc("observer", |_ctx, _ready| async {
///     Ok::<_, WorkerError>(())
/// }))
/// .after(&storage_ready);
///
/// assert_eq!(storage.name(), "storage");
/// assert_eq!(observer.deps().len(), 1);
/// ```
#[derive(Clone)]
pub struct WorkerSpec {
    worker: WorkerRef,
    deps: Vec<ReadySignal>,
    emits: Option<ReadySignal>,
}

impl WorkerSpec {
    /// Creates a registration with no dependencies and no emitted signal.
    pub fn new(worker: WorkerRef) -> Self {
        Self {
            worker,
            deps: Vec::new(),
            emits: None,
        }
    }

    /// Adds a readiness signal this worker must wait for before starting.
    ///
    /// Dependencies are awaited in the order they were added; each wait is
    /// raced against the group's cancellation token.
    pub fn after(mut self, signal: &ReadySignal) -> Self {
        self.deps.push(signal.clone());
        self
    }

    /// Declares the readiness signal this worker fires once it is prepared
    /// to serve.
    pub fn emits(mut self, signal: &ReadySignal) -> Self {
        self.emits = Some(signal.clone());
        self
    }

    /// Returns the worker handle.
    pub fn worker(&self) -> &WorkerRef {
        &self.worker
    }

    /// Convenience: returns the worker name.
    pub fn name(&self) -> &str {
        self.worker.name()
    }

    /// Returns the dependency signals, in declaration order.
    pub fn deps(&self) -> &[ReadySignal] {
        &self.deps
    }

    /// Returns the emitted readiness signal, if declared.
    pub fn ready(&self) -> Option<&ReadySignal> {
        self.emits.as_ref()
    }
}
