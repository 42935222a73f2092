//! # Wait session configuration.
//!
//! [`WaitConfig`] bundles everything a wait session needs besides the
//! predicate itself: the timeout budget, the pacing policy, and the periodic
//! logging knobs. One config can be reused across many calls; each call
//! builds a fresh session from it.
//!
//! ## Sentinel values
//! - `timeout = None` → wait indefinitely
//! - `log_interval = None` → never emit "still waiting" notices

use std::time::Duration;

use crate::log::LogLevel;
use crate::policies::BackoffPolicy;

/// Configuration for predicate waits.
#[derive(Clone, Copy, Debug)]
pub struct WaitConfig {
    /// Give up once this much time has elapsed. `None` waits forever.
    pub timeout: Option<Duration>,
    /// Pacing between probe evaluations.
    pub backoff: BackoffPolicy,
    /// Emit one notice via the injected logger every time this much time
    /// passes without success. `None` disables notices.
    pub log_interval: Option<Duration>,
    /// Level for the periodic notices.
    pub log_level: LogLevel,
}

impl Default for WaitConfig {
    /// Default configuration:
    ///
    /// - `timeout = None` (wait indefinitely)
    /// - `backoff = BackoffPolicy::default()` (100ms doubling, capped at 30s)
    /// - `log_interval = None` (silent)
    /// - `log_level = Debug`
    fn default() -> Self {
        Self {
            timeout: None,
            backoff: BackoffPolicy::default(),
            log_interval: None,
            log_level: LogLevel::Debug,
        }
    }
}

impl WaitConfig {
    /// Shorthand for a config that only sets a timeout.
    pub fn timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
            ..Self::default()
        }
    }

    /// Returns `self` with the backoff policy replaced.
    pub fn with_backoff(mut self, backoff: BackoffPolicy) -> Self {
        self.backoff = backoff;
        self
    }

    /// Returns `self` with periodic logging enabled.
    pub fn with_log_interval(mut self, interval: Duration, level: LogLevel) -> Self {
        self.log_interval = Some(interval);
        self.log_level = level;
        self
    }
}
