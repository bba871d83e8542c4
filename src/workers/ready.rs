//! # One-shot, multi-waiter readiness notification.
//!
//! [`ReadySignal`] represents "has event E happened yet" with exactly two
//! observable states, pending and fired. The transition happens at most once;
//! firing is sticky, so waiters that arrive after the transition observe it
//! immediately.
//!
//! A signal that is abandoned by its producer (the producing worker failed or
//! was cancelled before firing) never fires. Waiters are released through the
//! shared [`CancellationToken`] instead, which is why [`ReadySignal::wait`]
//! always races the signal against cancellation.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::Notify;
use tokio_util::sync::CancellationToken;

use crate::error::WorkerError;

/// One-shot, multi-waiter "has this happened yet" notification.
///
/// Cheap to clone; all clones observe the same underlying state.
///
/// # Example
/// ```
/// use kvserve::ReadySignal;
///
/// let sig = ReadySignal::new();
/// assert!(!sig.is_fired());
/// assert!(sig.fire());
/// assert!(!sig.fire()); // second fire is a guarded no-op
/// assert!(sig.is_fired());
/// ```
#[derive(Clone, Debug, Default)]
pub struct ReadySignal {
    inner: Arc<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    fired: AtomicBool,
    notify: Notify,
}

impl ReadySignal {
    /// Creates a new signal in the pending state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Transitions pending → fired and wakes every current waiter.
    ///
    /// Returns `true` if this call performed the transition, `false` if the
    /// signal had already fired. Firing more than once is a programming
    /// error on the producer side; the guard makes it harmless.
    pub fn fire(&self) -> bool {
        if self.inner.fired.swap(true, Ordering::SeqCst) {
            return false;
        }
        self.inner.notify.notify_waiters();
        true
    }

    /// Returns whether the signal has fired.
    pub fn is_fired(&self) -> bool {
        self.inner.fired.load(Ordering::SeqCst)
    }

    /// Suspends until the signal fires or `ctx` is cancelled.
    ///
    /// Returns `Ok(())` once fired (immediately for late waiters) and
    /// `Err(WorkerError::Canceled)` if cancellation wins the race. There is
    /// no error for a signal that never fires; cancellation is the only
    /// guaranteed release.
    pub async fn wait(&self, ctx: &CancellationToken) -> Result<(), WorkerError> {
        let mut notified = std::pin::pin!(self.inner.notify.notified());
        // Register the waiter before checking the flag so a concurrent
        // `fire()` cannot slip between the check and the await.
        notified.as_mut().enable();
        if self.inner.fired.load(Ordering::SeqCst) {
            return Ok(());
        }

        tokio::select! {
            _ = &mut notified => Ok(()),
            _ = ctx.cancelled() => Err(WorkerError::Canceled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_late_waiter_observes_fired_signal() {
        let sig = ReadySignal::new();
        sig.fire();

        let ctx = CancellationToken::new();
        // Must return immediately even though no notify will ever arrive.
        let res = tokio::time::timeout(Duration::from_millis(100), sig.wait(&ctx)).await;
        assert!(matches!(res, Ok(Ok(()))));
    }

    #[tokio::test]
    async fn test_wait_released_by_fire() {
        let sig = ReadySignal::new();
        let ctx = CancellationToken::new();

        let waiter = {
            let sig = sig.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move { sig.wait(&ctx).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(sig.fire());
        assert!(waiter.await.unwrap().is_ok());
    }

    #[tokio::test]
    async fn test_multiple_waiters_all_wake() {
        let sig = ReadySignal::new();
        let ctx = CancellationToken::new();

        let mut waiters = Vec::new();
        for _ in 0..4 {
            let sig = sig.clone();
            let ctx = ctx.clone();
            waiters.push(tokio::spawn(async move { sig.wait(&ctx).await }));
        }

        tokio::time::sleep(Duration::from_millis(20)).await;
        sig.fire();
        for w in waiters {
            assert!(w.await.unwrap().is_ok());
        }
    }

    #[tokio::test]
    async fn test_wait_released_by_cancellation() {
        let sig = ReadySignal::new();
        let ctx = CancellationToken::new();

        let waiter = {
            let sig = sig.clone();
            let ctx = ctx.clone();
            tokio::spawn(async move { sig.wait(&ctx).await })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        ctx.cancel();
        let res = waiter.await.unwrap();
        assert!(matches!(res, Err(WorkerError::Canceled)));
    }

    #[tokio::test]
    async fn test_double_fire_is_guarded() {
        let sig = ReadySignal::new();
        assert!(sig.fire());
        assert!(!sig.fire());

        // A waiter after the double fire still resolves cleanly.
        let ctx = CancellationToken::new();
        assert!(sig.wait(&ctx).await.is_ok());
    }
}
