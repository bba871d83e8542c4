//! # WorkerGroup: dependency-ordered, fail-fast worker supervision.
//!
//! The [`WorkerGroup`] owns the event bus and the runtime configuration. It
//! spawns one drive task per registered worker, sequences startup by
//! readiness dependencies, and propagates the first failure as group-wide
//! cancellation.
//!
//! ## Per-worker state machine
//! ```text
//! Registered ──► Waiting(deps) ──► Running ──► { Succeeded, Failed, Canceled }
//!                     │
//!                     └── group token cancelled ──► Canceled (run never invoked)
//! ```
//!
//! ## High-level architecture
//! ```text
//! Inputs to run():
//!   parent CancellationToken, Vec<WorkerSpec>
//!
//! Spawn drive tasks (one per spec, all sharing token = parent.child_token()):
//!   drive:
//!     ├─► publish WorkerWaiting (if the spec has dependencies)
//!     ├─► for each dep: dep.wait(token)      (canceled → terminal, no run)
//!     ├─► publish WorkerStarting
//!     ├─► worker.run(token, emitted signal)
//!     └─► Ok / Canceled → publish WorkerStopped
//!         other error   → publish WorkerFailed
//!                         first one claims the set-once failure slot
//!                         and cancels the shared token        (fail-fast)
//!
//! Supervision:
//!   token cancelled ──► publish ShutdownRequested
//!                  ──► wait_all_with_grace(cfg.grace):
//!                        ├─ all joined  → AllStoppedWithin
//!                        └─ timeout     → GraceExceeded { stuck }
//!
//! Outcome:
//!   failure slot set  → RuntimeError::Worker { worker, source }
//!   token cancelled   → RuntimeError::Canceled
//!   otherwise         → Ok(())
//! ```
//!
//! ## Rules
//! - At most one independent failure initiates shutdown; every other worker
//!   observes cancellation within one scheduling quantum of it.
//! - A readiness signal abandoned by a failed producer never fires; waiters
//!   are released through the shared token.
//! - Dependency edges must form a DAG; a cycle deadlocks the affected
//!   workers in Waiting until external cancellation (no detection is
//!   performed over the small static set).

use std::sync::Arc;
use std::sync::OnceLock;

use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::core::alive::AliveTracker;
use crate::error::{RuntimeError, WorkerError};
use crate::events::{Bus, Event, EventKind};
use crate::workers::WorkerSpec;

/// First non-cancellation failure observed across the group.
#[derive(Clone, Debug)]
struct WorkerFailure {
    worker: String,
    error: WorkerError,
}

/// Coordinates worker startup ordering, supervision, and fail-fast shutdown.
///
/// ## Example
/// ```no_run
/// use tokio_util::sync::CancellationToken;
/// use kvserve::{Config, ReadySignal, WorkerError, WorkerFn, WorkerGroup, WorkerSpec};
///
/// # async fn demo() -> Result<(), kvserve::RuntimeError> {
/// let group = WorkerGroup::new(Config::default());
/// let root = CancellationToken::new();
///
/// let ready = ReadySignal::new();
/// let producer = WorkerSpec::new(WorkerFn::arc("producer", |ctx, ready| async move {
///     if let Some(ready) = ready {
///         ready.fire();
///     }
///     ctx.cancelled().await;
///     Err::<(), _>(WorkerError::Canceled)
/// }))
/// .emits(&ready);
///
/// let consumer = WorkerSpec::new(WorkerFn::arc("consumer", |_ctx, _ready| async {
///     Ok::<(), WorkerError>(())
/// }))
/// .after(&ready);
///
/// group.run(&root, vec![producer, consumer]).await?;
/// # Ok(())
/// # }
/// ```
pub struct WorkerGroup {
    /// Global runtime configuration.
    pub cfg: Config,
    /// Event bus shared with all drive tasks.
    bus: Bus,
}

impl WorkerGroup {
    /// Creates a new group with the given configuration.
    pub fn new(cfg: Config) -> Self {
        let bus = Bus::new(cfg.bus_capacity);
        Self { cfg, bus }
    }

    /// Returns the lifecycle event bus for subscribing observers.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Runs the registered workers until every one of them is terminal.
    ///
    /// The group derives its shared token from `parent`; cancelling `parent`
    /// cancels the whole group without affecting sibling groups. Returns the
    /// single representative outcome:
    ///
    /// - `Err(RuntimeError::Worker { .. })` — the first non-cancellation
    ///   failure, which triggered fail-fast shutdown;
    /// - `Err(RuntimeError::Canceled)` — shutdown was requested and all
    ///   workers cancelled cleanly;
    /// - `Err(RuntimeError::GraceExceeded { .. })` — some workers did not
    ///   stop within [`Config::grace`] after cancellation;
    /// - `Ok(())` — every worker finished on its own without cancellation.
    pub async fn run(
        &self,
        parent: &CancellationToken,
        workers: Vec<WorkerSpec>,
    ) -> Result<(), RuntimeError> {
        let token = parent.child_token();
        let alive = Arc::new(AliveTracker::new());
        let failure: Arc<OnceLock<WorkerFailure>> = Arc::new(OnceLock::new());

        let mut set = JoinSet::new();
        let mut watchers = JoinSet::new();
        self.spawn_drivers(&mut set, &mut watchers, &token, &alive, &failure, workers);
        let supervised = self.supervise(&mut set, &token, &alive).await;
        // A watcher whose signal never fired would otherwise wait forever;
        // dropping the set aborts any still pending.
        drop(watchers);
        supervised?;
        self.outcome(&token, &failure)
    }

    /// Spawns one drive task per spec, plus a readiness watcher for every
    /// emitted signal (the watcher only publishes the `WorkerReady` event).
    ///
    /// Watchers live in their own join set so a signal that never fires
    /// cannot hold up the group's clean-completion path.
    fn spawn_drivers(
        &self,
        set: &mut JoinSet<()>,
        watchers: &mut JoinSet<()>,
        token: &CancellationToken,
        alive: &Arc<AliveTracker>,
        failure: &Arc<OnceLock<WorkerFailure>>,
        workers: Vec<WorkerSpec>,
    ) {
        for spec in workers {
            if let Some(sig) = spec.ready() {
                let sig = sig.clone();
                let bus = self.bus.clone();
                let tok = token.clone();
                let name = spec.name().to_string();
                watchers.spawn(async move {
                    if sig.wait(&tok).await.is_ok() {
                        bus.publish(Event::now(EventKind::WorkerReady).with_worker(name));
                    }
                });
            }

            set.spawn(Self::drive(
                spec,
                token.clone(),
                self.bus.clone(),
                Arc::clone(alive),
                Arc::clone(failure),
            ));
        }
    }

    /// Drives one worker through Waiting → Running → terminal.
    async fn drive(
        spec: WorkerSpec,
        token: CancellationToken,
        bus: Bus,
        alive: Arc<AliveTracker>,
        failure: Arc<OnceLock<WorkerFailure>>,
    ) {
        let name = spec.name().to_string();
        alive.started(&name).await;

        if !spec.deps().is_empty() {
            bus.publish(Event::now(EventKind::WorkerWaiting).with_worker(&*name));
        }
        for dep in spec.deps() {
            if dep.wait(&token).await.is_err() {
                // Canceled while waiting; run is never invoked.
                bus.publish(
                    Event::now(EventKind::WorkerStopped)
                        .with_worker(&*name)
                        .with_reason("cancelled while waiting"),
                );
                alive.stopped(&name).await;
                return;
            }
        }

        bus.publish(Event::now(EventKind::WorkerStarting).with_worker(&*name));
        let res = spec
            .worker()
            .run(token.clone(), spec.ready().cloned())
            .await;

        match res {
            Ok(()) => {
                bus.publish(Event::now(EventKind::WorkerStopped).with_worker(&*name));
            }
            Err(err) if err.is_cancellation() => {
                bus.publish(
                    Event::now(EventKind::WorkerStopped)
                        .with_worker(&*name)
                        .with_reason("cancelled"),
                );
            }
            Err(err) => {
                bus.publish(
                    Event::now(EventKind::WorkerFailed)
                        .with_worker(&*name)
                        .with_reason(err.to_string()),
                );
                // First failure wins; later ones are kept out of the slot
                // and shutdown is triggered exactly once.
                let _ = failure.set(WorkerFailure {
                    worker: name.clone(),
                    error: err,
                });
                token.cancel();
            }
        }

        alive.stopped(&name).await;
    }

    /// Waits until either all drive tasks finish on their own or the shared
    /// token is cancelled, in which case the remaining workers get the grace
    /// period to stop.
    async fn supervise(
        &self,
        set: &mut JoinSet<()>,
        token: &CancellationToken,
        alive: &AliveTracker,
    ) -> Result<(), RuntimeError> {
        tokio::select! {
            _ = token.cancelled() => {
                self.bus.publish(Event::now(EventKind::ShutdownRequested));
                self.wait_all_with_grace(set, alive).await
            }
            _ = async { while set.join_next().await.is_some() {} } => {
                Ok(())
            }
        }
    }

    /// Waits for all drive tasks to finish within the configured grace
    /// period. On timeout the remaining tasks are reported as stuck and
    /// aborted when the join set drops.
    async fn wait_all_with_grace(
        &self,
        set: &mut JoinSet<()>,
        alive: &AliveTracker,
    ) -> Result<(), RuntimeError> {
        let grace = self.cfg.grace;
        let done = async { while set.join_next().await.is_some() {} };

        match tokio::time::timeout(grace, done).await {
            Ok(_) => {
                self.bus.publish(Event::now(EventKind::AllStoppedWithin));
                Ok(())
            }
            Err(_) => {
                self.bus.publish(Event::now(EventKind::GraceExceeded));
                let stuck = alive.snapshot().await;
                Err(RuntimeError::GraceExceeded { grace, stuck })
            }
        }
    }

    /// Computes the representative outcome once every worker is terminal.
    fn outcome(
        &self,
        token: &CancellationToken,
        failure: &OnceLock<WorkerFailure>,
    ) -> Result<(), RuntimeError> {
        match failure.get() {
            Some(f) => Err(RuntimeError::Worker {
                worker: f.worker.clone(),
                source: f.error.clone(),
            }),
            None if token.is_cancelled() => Err(RuntimeError::Canceled),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workers::{ReadySignal, WorkerFn};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::time::{Duration, Instant};

    fn group() -> WorkerGroup {
        WorkerGroup::new(Config::default())
    }

    /// Cancels `root` after `delay` from a background task.
    fn cancel_after(root: &CancellationToken, delay: Duration) {
        let root = root.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            root.cancel();
        });
    }

    /// A worker that fires its signal after `setup` and then blocks until
    /// cancellation.
    fn server_like(name: &'static str, setup: Duration) -> crate::workers::WorkerRef {
        WorkerFn::arc(name, move |ctx: CancellationToken, ready| async move {
            tokio::select! {
                _ = tokio::time::sleep(setup) => {}
                _ = ctx.cancelled() => return Err(WorkerError::Canceled),
            }
            if let Some(ready) = ready {
                ready.fire();
            }
            ctx.cancelled().await;
            Err::<(), _>(WorkerError::Canceled)
        })
    }

    #[tokio::test]
    async fn test_dependent_starts_only_after_ready() {
        let root = CancellationToken::new();
        let ready = ReadySignal::new();
        let dep_fired_at_start = Arc::new(AtomicBool::new(false));

        let producer =
            WorkerSpec::new(server_like("producer", Duration::from_millis(30))).emits(&ready);

        let consumer = {
            let seen = Arc::clone(&dep_fired_at_start);
            let probe = ready.clone();
            WorkerSpec::new(WorkerFn::arc("consumer", move |_ctx, _ready| {
                let seen = Arc::clone(&seen);
                let probe = probe.clone();
                async move {
                    seen.store(probe.is_fired(), Ordering::SeqCst);
                    Ok::<(), WorkerError>(())
                }
            }))
            .after(&ready)
        };

        cancel_after(&root, Duration::from_millis(150));
        let res = group().run(&root, vec![producer, consumer]).await;

        assert!(matches!(res, Err(RuntimeError::Canceled)));
        assert!(dep_fired_at_start.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_cancel_before_deps_skips_run() {
        let root = CancellationToken::new();
        let never = ReadySignal::new();
        let invoked = Arc::new(AtomicBool::new(false));

        let blocked = {
            let invoked = Arc::clone(&invoked);
            WorkerSpec::new(WorkerFn::arc("blocked", move |_ctx, _ready| {
                let invoked = Arc::clone(&invoked);
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    Ok::<(), WorkerError>(())
                }
            }))
            .after(&never)
        };

        cancel_after(&root, Duration::from_millis(20));
        let res = group().run(&root, vec![blocked]).await;

        assert!(matches!(res, Err(RuntimeError::Canceled)));
        assert!(!invoked.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn test_fail_fast_reports_first_error_and_cancels_siblings() {
        let root = CancellationToken::new();
        let sibling_cancelled = Arc::new(AtomicBool::new(false));

        let failing = WorkerSpec::new(WorkerFn::arc("boom", |_ctx, _ready| async {
            tokio::time::sleep(Duration::from_millis(10)).await;
            Err::<(), _>(WorkerError::runtime("disk on fire"))
        }));

        let steady = {
            let flag = Arc::clone(&sibling_cancelled);
            WorkerSpec::new(WorkerFn::arc(
                "steady",
                move |ctx: CancellationToken, _ready| {
                    let flag = Arc::clone(&flag);
                    async move {
                        ctx.cancelled().await;
                        flag.store(true, Ordering::SeqCst);
                        Err::<(), _>(WorkerError::Canceled)
                    }
                },
            ))
        };

        let res = group().run(&root, vec![failing, steady]).await;

        match res {
            Err(RuntimeError::Worker { worker, source }) => {
                assert_eq!(worker, "boom");
                assert!(matches!(source, WorkerError::Runtime { .. }));
            }
            other => panic!("expected worker failure, got {other:?}"),
        }
        assert!(sibling_cancelled.load(Ordering::SeqCst));
        // Fail-fast cancels the group token, not the caller's root.
        assert!(!root.is_cancelled());
    }

    #[tokio::test]
    async fn test_setup_failure_blocks_dependent() {
        let root = CancellationToken::new();
        let ready = ReadySignal::new();
        let dependent_invoked = Arc::new(AtomicBool::new(false));

        let storage = WorkerSpec::new(WorkerFn::arc("storage", |_ctx, _ready| async {
            // Irrecoverable setup failure; readiness is never fired.
            Err::<(), _>(WorkerError::setup("invalid configuration"))
        }))
        .emits(&ready);

        let controller = {
            let invoked = Arc::clone(&dependent_invoked);
            WorkerSpec::new(WorkerFn::arc("controller", move |_ctx, _ready| {
                let invoked = Arc::clone(&invoked);
                async move {
                    invoked.store(true, Ordering::SeqCst);
                    Ok::<(), WorkerError>(())
                }
            }))
            .after(&ready)
        };

        let res = group().run(&root, vec![storage, controller]).await;

        match res {
            Err(RuntimeError::Worker { worker, source }) => {
                assert_eq!(worker, "storage");
                assert!(matches!(source, WorkerError::Setup { .. }));
            }
            other => panic!("expected setup failure, got {other:?}"),
        }
        assert!(!dependent_invoked.load(Ordering::SeqCst));
        assert!(!ready.is_fired());
    }

    #[tokio::test]
    async fn test_chain_shutdown_scenario() {
        let root = CancellationToken::new();
        let storage_ready = ReadySignal::new();
        let controller_ready = ReadySignal::new();
        let observer_ran = Arc::new(AtomicBool::new(false));
        let t0 = Instant::now();

        let storage =
            WorkerSpec::new(server_like("storage", Duration::from_millis(50))).emits(&storage_ready);
        let controller = WorkerSpec::new(server_like("controller", Duration::ZERO))
            .after(&storage_ready)
            .emits(&controller_ready);
        let observer = {
            let ran = Arc::clone(&observer_ran);
            WorkerSpec::new(WorkerFn::arc("observer", move |_ctx, _ready| {
                let ran = Arc::clone(&ran);
                async move {
                    ran.store(true, Ordering::SeqCst);
                    Ok::<(), WorkerError>(())
                }
            }))
            .after(&controller_ready)
        };

        cancel_after(&root, Duration::from_millis(200));
        let res = group().run(&root, vec![storage, controller, observer]).await;

        assert!(matches!(res, Err(RuntimeError::Canceled)));
        assert!(observer_ran.load(Ordering::SeqCst));
        // The chain cannot complete before storage setup.
        assert!(t0.elapsed() >= Duration::from_millis(50));
        // And join returned well within the grace period.
        assert!(t0.elapsed() < Duration::from_secs(10));
    }

    #[tokio::test]
    async fn test_all_workers_finishing_cleanly_returns_ok() {
        let root = CancellationToken::new();
        let one = WorkerSpec::new(WorkerFn::arc("one", |_ctx, _ready| async {
            Ok::<(), WorkerError>(())
        }));
        let two = WorkerSpec::new(WorkerFn::arc("two", |_ctx, _ready| async {
            Ok::<(), WorkerError>(())
        }));

        let res = group().run(&root, vec![one, two]).await;
        assert!(res.is_ok());
    }

    #[tokio::test]
    async fn test_repeated_cancellation_is_idempotent() {
        let root = CancellationToken::new();
        let steady = WorkerSpec::new(WorkerFn::arc(
            "steady",
            |ctx: CancellationToken, _ready| async move {
                ctx.cancelled().await;
                Err::<(), _>(WorkerError::Canceled)
            },
        ));

        let raced = root.clone();
        tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            raced.cancel();
            raced.cancel();
        });

        let res = group().run(&root, vec![steady]).await;
        assert!(matches!(res, Err(RuntimeError::Canceled)));
    }

    #[tokio::test]
    async fn test_grace_exceeded_names_stuck_worker() {
        let root = CancellationToken::new();
        let mut cfg = Config::default();
        cfg.grace = Duration::from_millis(50);
        let group = WorkerGroup::new(cfg);

        // Ignores cancellation entirely.
        let stubborn = WorkerSpec::new(WorkerFn::arc("stubborn", |_ctx, _ready| async {
            tokio::time::sleep(Duration::from_secs(60)).await;
            Ok::<(), WorkerError>(())
        }));

        cancel_after(&root, Duration::from_millis(20));
        let res = group.run(&root, vec![stubborn]).await;

        match res {
            Err(RuntimeError::GraceExceeded { stuck, .. }) => {
                assert_eq!(stuck, vec!["stubborn"]);
            }
            other => panic!("expected grace exceeded, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ready_event_published_on_fire() {
        let root = CancellationToken::new();
        let ready = ReadySignal::new();
        let group = group();
        let mut rx = group.bus().subscribe();

        let producer =
            WorkerSpec::new(server_like("producer", Duration::from_millis(10))).emits(&ready);

        cancel_after(&root, Duration::from_millis(100));
        let res = group.run(&root, vec![producer]).await;
        assert!(matches!(res, Err(RuntimeError::Canceled)));

        let mut saw_ready = false;
        while let Ok(ev) = rx.try_recv() {
            if ev.kind == EventKind::WorkerReady && ev.worker.as_deref() == Some("producer") {
                saw_ready = true;
            }
        }
        assert!(saw_ready);
    }
}
