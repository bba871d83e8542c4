//! # kvserve
//!
//! **kvserve** is a key/value CRUD service built on a small, general-purpose
//! orchestration runtime: a dependency-ordered, fail-fast, cancellation-
//! propagating worker group.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!     ┌──────────────┐    ┌──────────────┐    ┌──────────────┐
//!     │  WorkerSpec  │    │  WorkerSpec  │    │  WorkerSpec  │
//!     │  (storage)   │    │ (controller) │    │  (observer)  │
//!     │ emits: db    │    │ after: db    │    │ after: http  │
//!     │              │    │ emits: http  │    │              │
//!     └──────┬───────┘    └──────┬───────┘    └──────┬───────┘
//!            ▼                   ▼                   ▼
//! ┌───────────────────────────────────────────────────────────────┐
//! │  WorkerGroup (orchestrator)                                   │
//! │  - shared CancellationToken (child of the caller's root)      │
//! │  - ReadySignal dependency gating before each worker starts    │
//! │  - set-once first-failure slot → fail-fast cancellation       │
//! │  - Bus (broadcast lifecycle events) → LogWriter               │
//! │  - shutdown grace window with stuck-worker reporting          │
//! └───────────────────────────────────────────────────────────────┘
//! ```
//!
//! ### Lifecycle
//! ```text
//! root token ──► group token ──► one drive task per WorkerSpec
//!
//! drive:
//!   ├─► wait for dependency ReadySignals (raced against cancellation)
//!   ├─► worker.run(token, emitted signal)
//!   │       ├─ Ok / Canceled ──► terminal, no propagation
//!   │       └─ Setup/Runtime/Teardown error
//!   │             ──► claim first-failure slot, cancel group token
//!   └─► group.run() returns the single representative outcome
//! ```
//!
//! The application wires three workers in a fixed chain: the Postgres
//! [`storage`](crate::Postgres) collaborator, the axum
//! [`controller`](crate::Controller) that depends on storage readiness, and a
//! zero-duration readiness observer that logs once the controller accepts
//! requests.
//!
//! ## Example
//! ```no_run
//! use tokio_util::sync::CancellationToken;
//! use kvserve::{
//!     cancel_on_signal, Config, LogWriter, ReadySignal, WorkerError, WorkerFn, WorkerGroup,
//!     WorkerSpec,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), kvserve::RuntimeError> {
//!     let root = CancellationToken::new();
//!     tokio::spawn(cancel_on_signal(root.clone()));
//!
//!     let ready = ReadySignal::new();
//!     let server = WorkerSpec::new(WorkerFn::arc("server", |ctx, ready| async move {
//!         if let Some(ready) = ready {
//!             ready.fire();
//!         }
//!         ctx.cancelled().await;
//!         Err::<(), _>(WorkerError::Canceled)
//!     }))
//!     .emits(&ready);
//!
//!     let observer = WorkerSpec::new(WorkerFn::arc("observer", |_ctx, _ready| async {
//!         println!("server is ready");
//!         Ok::<(), WorkerError>(())
//!     }))
//!     .after(&ready);
//!
//!     let group = WorkerGroup::new(Config::default());
//!     LogWriter::attach(group.bus());
//!     group.run(&root, vec![server, observer]).await
//! }
//! ```

mod config;
mod controller;
mod core;
mod error;
mod events;
mod model;
mod service;
mod storage;
mod workers;

// ---- Public re-exports ----

pub use config::Config;
pub use controller::Controller;
pub use crate::core::{WorkerGroup, cancel_on_signal};
pub use error::{AppError, RuntimeError, WorkerError};
pub use events::{Bus, Event, EventKind, LogWriter};
pub use model::{Key, Value};
pub use service::Service;
pub use storage::{Postgres, Storage};
pub use workers::{ReadySignal, Worker, WorkerFn, WorkerRef, WorkerSpec};
