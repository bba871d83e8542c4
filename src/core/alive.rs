//! # Worker liveness tracking.
//!
//! Maintains the set of workers that have been spawned but have not yet
//! reached a terminal state. The group consults it when the shutdown grace
//! period expires, to name the workers that are stuck.
//!
//! Registration is explicit (the drive task marks itself started and
//! stopped), so no event ordering concerns arise.

use std::collections::BTreeSet;

use tokio::sync::RwLock;

/// Thread-safe tracker of live workers.
pub(crate) struct AliveTracker {
    state: RwLock<BTreeSet<String>>,
}

impl AliveTracker {
    /// Creates a new empty tracker.
    pub(crate) fn new() -> Self {
        Self {
            state: RwLock::new(BTreeSet::new()),
        }
    }

    /// Marks a worker as live.
    pub(crate) async fn started(&self, name: &str) {
        self.state.write().await.insert(name.to_string());
    }

    /// Marks a worker as terminal.
    pub(crate) async fn stopped(&self, name: &str) {
        self.state.write().await.remove(name);
    }

    /// Returns the names of all currently live workers, sorted.
    pub(crate) async fn snapshot(&self) -> Vec<String> {
        self.state.read().await.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_snapshot_reflects_started_and_stopped() {
        let tracker = AliveTracker::new();
        tracker.started("storage").await;
        tracker.started("controller").await;
        assert_eq!(tracker.snapshot().await, vec!["controller", "storage"]);

        tracker.stopped("controller").await;
        assert_eq!(tracker.snapshot().await, vec!["storage"]);
    }
}
