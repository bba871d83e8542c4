//! # Logging subscriber for worker lifecycle events.
//!
//! [`LogWriter`] renders bus events through `tracing` in a compact,
//! human-readable form. Attach it once per group run:
//!
//! ```no_run
//! # use kvserve::{Config, LogWriter, WorkerGroup};
//! # async fn demo() {
//! let group = WorkerGroup::new(Config::default());
//! LogWriter::attach(group.bus());
//! # }
//! ```

use tracing::{info, warn};

use super::bus::Bus;
use super::event::{Event, EventKind};

/// Renders lifecycle events via `tracing`.
pub struct LogWriter;

impl LogWriter {
    /// Subscribes to the bus and spawns a background task that logs every
    /// event until the bus is closed.
    pub fn attach(bus: &Bus) {
        let mut rx = bus.subscribe();
        tokio::spawn(async move {
            loop {
                match rx.recv().await {
                    Ok(ev) => LogWriter.handle(&ev),
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(_)) => continue,
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        });
    }

    /// Renders a single event.
    pub fn handle(&self, ev: &Event) {
        let worker = ev.worker.as_deref().unwrap_or("-");
        match ev.kind {
            EventKind::WorkerWaiting => {
                info!(worker, "waiting on dependencies");
            }
            EventKind::WorkerStarting => {
                info!(worker, "starting");
            }
            EventKind::WorkerReady => {
                info!(worker, "ready");
            }
            EventKind::WorkerStopped => match ev.reason.as_deref() {
                Some(reason) => info!(worker, reason, "stopped"),
                None => info!(worker, "stopped"),
            },
            EventKind::WorkerFailed => {
                warn!(
                    worker,
                    reason = ev.reason.as_deref().unwrap_or("unknown"),
                    "failed"
                );
            }
            EventKind::ShutdownRequested => {
                info!("shutdown requested");
            }
            EventKind::AllStoppedWithin => {
                info!("all workers stopped within grace");
            }
            EventKind::GraceExceeded => {
                warn!("shutdown grace exceeded");
            }
        }
    }
}
