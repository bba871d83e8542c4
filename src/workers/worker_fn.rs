//! # Function-backed worker (`WorkerFn`)
//!
//! [`WorkerFn`] wraps a closure `F: Fn(CancellationToken, Option<ReadySignal>) -> Fut`,
//! producing a fresh future per invocation. Useful for zero-duration workers
//! such as readiness observers, and for tests.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use kvserve::{ReadySignal, WorkerError, WorkerFn, WorkerRef};
//!
//! let w: WorkerRef = WorkerFn::arc("observer", |_ctx, _ready| async {
//!     // one-shot side effect, then done
//!     Ok::<_, WorkerError>(())
//! });
//!
//! assert_eq!(w.name(), "observer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::ready::ReadySignal;
use crate::workers::worker::Worker;

/// Function-backed worker implementation.
///
/// Wraps a closure that creates a new future per invocation; shared state, if
/// any, must be captured explicitly via `Arc` inside the closure.
pub struct WorkerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> WorkerFn<F> {
    /// Creates a new function-backed worker.
    ///
    /// Prefer [`WorkerFn::arc`] when you immediately need a
    /// [`WorkerRef`](crate::WorkerRef).
    ///
    /// The bounds mirror the [`Worker`] impl so closure parameter types are
    /// inferred at the call site.
    pub fn new<Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Self
    where
        F: Fn(CancellationToken, Option<ReadySignal>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
    {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the worker and returns it as a shared handle.
    pub fn arc<Fut>(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self>
    where
        F: Fn(CancellationToken, Option<ReadySignal>) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
    {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Worker for WorkerFn<F>
where
    F: Fn(CancellationToken, Option<ReadySignal>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(
        &self,
        ctx: CancellationToken,
        ready: Option<ReadySignal>,
    ) -> Result<(), WorkerError> {
        (self.f)(ctx, ready).await
    }
}
