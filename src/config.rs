//! # Global runtime configuration.
//!
//! [`Config`] defines the worker group's behavior: shutdown grace period and
//! event bus capacity. Collaborator endpoints (database DSN, listen address)
//! are opaque strings passed to the collaborators at construction and are not
//! part of this struct.
//!
//! # Example
//! ```
//! use std::time::Duration;
//! use kvserve::Config;
//!
//! let mut cfg = Config::default();
//! cfg.grace = Duration::from_secs(5);
//!
//! assert_eq!(cfg.bus_capacity, 1024);
//! ```

use std::time::Duration;

/// Global configuration for the worker group.
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum time to wait for workers to stop once cancellation has been
    /// observed, before the group gives up and reports them as stuck.
    pub grace: Duration,
    /// Capacity of the lifecycle event bus channel.
    pub bus_capacity: usize,
}

impl Default for Config {
    /// Provides a default configuration:
    /// - `grace = 10s`
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self {
            grace: Duration::from_secs(10),
            bus_capacity: 1024,
        }
    }
}
