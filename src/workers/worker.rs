//! # The worker contract.
//!
//! A [`Worker`] is a long-running unit of supervised work with a setup
//! phase, an optional readiness emission, and a cancellation-driven
//! run-until-stopped main phase. The common handle type is [`WorkerRef`], an
//! `Arc<dyn Worker>` suitable for sharing across the runtime.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;
use crate::workers::ready::ReadySignal;

/// Shared handle to a worker.
pub type WorkerRef = Arc<dyn Worker>;

/// # Asynchronous, supervised, cancelable unit of long-running work.
///
/// The contract, enforced by convention and exercised by the
/// [`WorkerGroup`](crate::WorkerGroup):
///
/// - Perform setup, then, if `ready` is `Some`, fire it exactly once as soon
///   as the worker is prepared to serve — not before, and before blocking on
///   the main loop.
/// - Block (never busy-poll) until `ctx` is cancelled, then perform bounded
///   best-effort teardown and return [`WorkerError::Teardown`] on teardown
///   failure or [`WorkerError::Canceled`] otherwise.
/// - Return promptly when `ctx` is cancelled at any point, including inside
///   setup retry loops.
/// - Return [`WorkerError::Setup`] immediately on irrecoverable setup
///   failure, without firing `ready`.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use kvserve::{ReadySignal, Worker, WorkerError};
///
/// struct Heartbeat;
///
/// #[async_trait]
/// impl Worker for Heartbeat {
///     fn name(&self) -> &str { "heartbeat" }
///
///     async fn run(
///         &self,
///         ctx: CancellationToken,
///         ready: Option<ReadySignal>,
///     ) -> Result<(), WorkerError> {
///         if let Some(ready) = ready {
///             ready.fire();
///         }
///         ctx.cancelled().await;
///         Err(WorkerError::Canceled)
///     }
/// }
/// ```
#[async_trait]
pub trait Worker: Send + Sync + 'static {
    /// Returns a stable, human-readable worker name.
    fn name(&self) -> &str;

    /// Executes the worker until failure or cancellation.
    async fn run(
        &self,
        ctx: CancellationToken,
        ready: Option<ReadySignal>,
    ) -> Result<(), WorkerError>;
}
