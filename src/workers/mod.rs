//! Worker abstractions: the contract, registrations, and readiness.
//!
//! - [`worker`]: the [`Worker`] trait and the shared [`WorkerRef`] handle;
//! - [`worker_fn`]: closure-backed [`WorkerFn`] implementation;
//! - [`spec`]: immutable [`WorkerSpec`] registration bundles;
//! - [`ready`]: the one-shot, multi-waiter [`ReadySignal`] primitive.

mod ready;
mod spec;
mod worker;
mod worker_fn;

pub use ready::ReadySignal;
pub use spec::WorkerSpec;
pub use worker::{Worker, WorkerRef};
pub use worker_fn::WorkerFn;
