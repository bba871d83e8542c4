//! # Cross-platform OS signal handling.
//!
//! Provides [`cancel_on_signal`], an async helper that cancels the given root
//! token when the process receives a termination signal. Spawn it once at
//! startup:
//!
//! ```no_run
//! # use tokio_util::sync::CancellationToken;
//! # async fn demo() {
//! let root = CancellationToken::new();
//! tokio::spawn(kvserve::cancel_on_signal(root.clone()));
//! # }
//! ```
//!
//! ## Signals
//! **Unix platforms:** `SIGINT` (Ctrl-C), `SIGTERM` (systemd/Kubernetes),
//! `SIGQUIT`.
//!
//! **Other platforms:** `Ctrl-C` via [`tokio::signal::ctrl_c`].

use tokio_util::sync::CancellationToken;
use tracing::{error, info};

/// Waits for a termination signal, then cancels `root`.
///
/// Cancellation is idempotent: if `root` was already cancelled by the time a
/// signal arrives, this is a no-op. If signal registration fails the error is
/// logged and the listener gives up; the process can then only stop through
/// worker failure.
pub async fn cancel_on_signal(root: CancellationToken) {
    match wait_for_termination().await {
        Ok(()) => {
            info!("termination signal received");
            root.cancel();
        }
        Err(err) => {
            error!(error = %err, "failed to register signal listeners");
        }
    }
}

#[cfg(unix)]
async fn wait_for_termination() -> std::io::Result<()> {
    use tokio::signal::unix::{SignalKind, signal};

    let mut sigint = signal(SignalKind::interrupt())?;
    let mut sigterm = signal(SignalKind::terminate())?;
    let mut sigquit = signal(SignalKind::quit())?;

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {},
        _ = sigint.recv() => {},
        _ = sigterm.recv() => {},
        _ = sigquit.recv() => {},
    }
    Ok(())
}

#[cfg(not(unix))]
async fn wait_for_termination() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await
}
