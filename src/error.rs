//! Error types used by the worker runtime and the request path.
//!
//! This module defines three error enums:
//!
//! - [`WorkerError`] — terminal outcomes of individual workers.
//! - [`RuntimeError`] — the aggregated outcome of a [`WorkerGroup`](crate::WorkerGroup) run.
//! - [`AppError`] — structured errors surfaced by the CRUD request path.
//!
//! All types provide `as_label`/`as_message` helpers for logging, following a
//! stable snake_case labeling scheme.

use std::time::Duration;
use thiserror::Error;

/// # Terminal outcomes of a supervised worker.
///
/// The taxonomy distinguishes the phase in which a worker stopped:
/// setup (before readiness), steady-state runtime, teardown (after
/// cancellation), or plain cooperative cancellation.
///
/// [`WorkerError::Canceled`] is not a defect: it is the expected terminal
/// state of every worker when shutdown is requested.
#[non_exhaustive]
#[derive(Error, Debug, Clone)]
pub enum WorkerError {
    /// Irrecoverable failure during the worker's preparation phase.
    ///
    /// The worker must not have fired its readiness signal.
    #[error("setup failed: {error}")]
    Setup {
        /// The underlying error message.
        error: String,
    },

    /// Failure surfaced from the worker's steady-state operation.
    ///
    /// Escalated by the group into a group-wide cancellation.
    #[error("runtime failure: {error}")]
    Runtime {
        /// The underlying error message.
        error: String,
    },

    /// Error or timeout while releasing resources during shutdown.
    ///
    /// Reported but not escalated further; the process is exiting anyway.
    #[error("teardown failed: {error}")]
    Teardown {
        /// The underlying error message.
        error: String,
    },

    /// Worker observed cancellation and exited cooperatively.
    #[error("context cancelled")]
    Canceled,
}

impl WorkerError {
    /// Shorthand for [`WorkerError::Setup`].
    pub fn setup(error: impl ToString) -> Self {
        WorkerError::Setup {
            error: error.to_string(),
        }
    }

    /// Shorthand for [`WorkerError::Runtime`].
    pub fn runtime(error: impl ToString) -> Self {
        WorkerError::Runtime {
            error: error.to_string(),
        }
    }

    /// Shorthand for [`WorkerError::Teardown`].
    pub fn teardown(error: impl ToString) -> Self {
        WorkerError::Teardown {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use kvserve::WorkerError;
    ///
    /// let err = WorkerError::Canceled;
    /// assert_eq!(err.as_label(), "worker_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkerError::Setup { .. } => "worker_setup_failed",
            WorkerError::Runtime { .. } => "worker_runtime_failed",
            WorkerError::Teardown { .. } => "worker_teardown_failed",
            WorkerError::Canceled => "worker_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkerError::Setup { error } => format!("setup: {error}"),
            WorkerError::Runtime { error } => format!("runtime: {error}"),
            WorkerError::Teardown { error } => format!("teardown: {error}"),
            WorkerError::Canceled => "context cancelled".to_string(),
        }
    }

    /// Indicates whether this outcome is a plain cooperative cancellation.
    ///
    /// Cancellation does not trigger fail-fast propagation; every other
    /// variant does.
    ///
    /// # Example
    /// ```
    /// use kvserve::WorkerError;
    ///
    /// assert!(WorkerError::Canceled.is_cancellation());
    /// assert!(!WorkerError::runtime("boom").is_cancellation());
    /// ```
    pub fn is_cancellation(&self) -> bool {
        matches!(self, WorkerError::Canceled)
    }
}

/// # Aggregated outcome of a worker group run.
///
/// Exactly one representative error is surfaced to the caller; secondary
/// cancellation errors caused by fail-fast propagation are not reported.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown was requested externally and every worker terminated with a
    /// plain cancellation.
    #[error("shutdown requested; all workers cancelled")]
    Canceled,

    /// A worker failed for a reason other than cancellation; its error was
    /// the first one observed and triggered group-wide cancellation.
    #[error("worker {worker} failed: {source}")]
    Worker {
        /// Name of the worker that initiated shutdown.
        worker: String,
        /// The worker's terminal error.
        source: WorkerError,
    },

    /// Shutdown grace period was exceeded; some workers remained stuck.
    #[error("shutdown grace {grace:?} exceeded; stuck: {stuck:?}")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Names of workers that did not stop in time.
        stuck: Vec<String>,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::Canceled => "runtime_canceled",
            RuntimeError::Worker { .. } => "runtime_worker_failed",
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            RuntimeError::Canceled => "all workers cancelled".to_string(),
            RuntimeError::Worker { worker, source } => {
                format!("worker {worker}: {}", source.as_message())
            }
            RuntimeError::GraceExceeded { grace, stuck } => {
                format!("grace exceeded after {grace:?}; stuck workers={stuck:?}")
            }
        }
    }
}

/// # Structured errors for the CRUD request path.
///
/// The controller maps these onto HTTP status codes; the service layer
/// attaches user-facing messages.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AppError {
    /// Request input failed validation.
    #[error("{message}")]
    InvalidArgument {
        /// User-facing description of the violation.
        message: String,
    },

    /// The requested key does not exist.
    #[error("{message}")]
    NotFound {
        /// User-facing description.
        message: String,
    },

    /// The key already exists and the operation requires it not to.
    #[error("{message}")]
    AlreadyExists {
        /// User-facing description.
        message: String,
    },

    /// Unexpected internal failure (storage, connectivity).
    #[error("internal error: {message}")]
    Internal {
        /// Diagnostic description, not exposed verbatim to clients.
        message: String,
    },
}

impl AppError {
    /// Shorthand for [`AppError::InvalidArgument`].
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        AppError::InvalidArgument {
            message: message.into(),
        }
    }

    /// Shorthand for [`AppError::NotFound`].
    pub fn not_found(message: impl Into<String>) -> Self {
        AppError::NotFound {
            message: message.into(),
        }
    }

    /// Shorthand for [`AppError::AlreadyExists`].
    pub fn already_exists(message: impl Into<String>) -> Self {
        AppError::AlreadyExists {
            message: message.into(),
        }
    }

    /// Shorthand for [`AppError::Internal`].
    pub fn internal(message: impl ToString) -> Self {
        AppError::Internal {
            message: message.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            AppError::InvalidArgument { .. } => "invalid_argument",
            AppError::NotFound { .. } => "not_found",
            AppError::AlreadyExists { .. } => "already_exists",
            AppError::Internal { .. } => "internal",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_worker_error_cancellation_classification() {
        assert!(WorkerError::Canceled.is_cancellation());
        assert!(!WorkerError::setup("bad dsn").is_cancellation());
        assert!(!WorkerError::runtime("io").is_cancellation());
        assert!(!WorkerError::teardown("timeout").is_cancellation());
    }

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(WorkerError::setup("x").as_label(), "worker_setup_failed");
        assert_eq!(RuntimeError::Canceled.as_label(), "runtime_canceled");
        assert_eq!(AppError::not_found("x").as_label(), "not_found");
    }

    #[test]
    fn test_runtime_error_message_names_worker() {
        let err = RuntimeError::Worker {
            worker: "storage".into(),
            source: WorkerError::setup("bad dsn"),
        };
        assert!(err.as_message().contains("storage"));
        assert!(err.as_message().contains("bad dsn"));
    }
}
