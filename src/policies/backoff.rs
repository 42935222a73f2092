//! # Backoff policy and delay sequence.
//!
//! Two layers:
//!
//! - [`BackoffPolicy`] computes the delay for attempt `n` purely from `n`:
//!   `first × factor^n`, clamped to `max`, then jitter. Because the base is
//!   derived only from the attempt number, jitter output never feeds back
//!   into later delays.
//! - [`BackoffSequence`] adds the cursor: `next()` hands out the delay for
//!   the *current* attempt and then advances. The order is compute, return,
//!   then increment — the first call always yields `delay(0)`, i.e. `first`
//!   itself (clamped), never `first × factor`.
//!
//! # Example
//! ```rust
//! use std::time::Duration;
//! use steadfast::{BackoffPolicy, BackoffSequence, JitterPolicy};
//!
//! let policy = BackoffPolicy {
//!     first: Duration::from_millis(100),
//!     max: Duration::from_secs(10),
//!     factor: 2.0,
//!     jitter: JitterPolicy::None,
//! };
//!
//! let mut seq = BackoffSequence::unbounded(policy);
//! assert_eq!(seq.next().unwrap(), Duration::from_millis(100)); // delay(0) = first
//! assert_eq!(seq.next().unwrap(), Duration::from_millis(200)); // delay(1)
//! seq.reset();
//! assert_eq!(seq.next().unwrap(), Duration::from_millis(100)); // back to delay(0)
//! ```

use std::time::Duration;

use crate::error::BackoffError;
use crate::policies::jitter::JitterPolicy;

/// Delay-growth policy for retries and waits.
#[derive(Clone, Copy, Debug)]
pub struct BackoffPolicy {
    /// Delay for attempt 0.
    pub first: Duration,
    /// Cap applied to every emitted delay.
    pub max: Duration,
    /// Multiplicative growth factor (`>= 1.0` recommended).
    pub factor: f64,
    /// Randomization applied to the clamped base delay.
    pub jitter: JitterPolicy,
}

impl Default for BackoffPolicy {
    /// Returns a policy with:
    /// - `first = 100ms`;
    /// - `max = 30s`;
    /// - `factor = 2.0` (exponential doubling);
    /// - `jitter = None`.
    fn default() -> Self {
        Self {
            first: Duration::from_millis(100),
            max: Duration::from_secs(30),
            factor: 2.0,
            jitter: JitterPolicy::None,
        }
    }
}

impl BackoffPolicy {
    /// Computes the delay for the given attempt number (0-indexed).
    ///
    /// The base is `first × factor^attempt`, clamped to [`BackoffPolicy::max`];
    /// overflow and non-finite intermediates clamp to `max` as well. Jitter is
    /// applied to the clamped base and never fed back into later attempts.
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let max_secs = self.max.as_secs_f64();
        let exp = attempt.min(i32::MAX as u32) as i32;
        let raw_secs = self.first.as_secs_f64() * self.factor.powi(exp);

        let base = if !raw_secs.is_finite() || raw_secs < 0.0 || raw_secs > max_secs {
            self.max
        } else {
            Duration::from_secs_f64(raw_secs)
        };

        self.jitter.apply(base)
    }
}

/// Stateful delay sequence over a [`BackoffPolicy`].
///
/// Produces the schedule lazily: each `next()` emits one delay and advances
/// the attempt counter by exactly one. Optionally bounded by `max_attempts`,
/// after which `next()` fails with [`BackoffError::Exhausted`] until
/// [`reset`](BackoffSequence::reset) is called. Not restartable
/// mid-iteration other than via `reset()`.
#[derive(Clone, Debug)]
pub struct BackoffSequence {
    policy: BackoffPolicy,
    attempt: u32,
    max_attempts: Option<u32>,
}

impl BackoffSequence {
    /// Creates a sequence limited to `max_attempts` emissions.
    pub fn new(policy: BackoffPolicy, max_attempts: u32) -> Self {
        Self {
            policy,
            attempt: 0,
            max_attempts: Some(max_attempts),
        }
    }

    /// Creates a sequence with no attempt limit.
    pub fn unbounded(policy: BackoffPolicy) -> Self {
        Self {
            policy,
            attempt: 0,
            max_attempts: None,
        }
    }

    /// Returns the delay for the current attempt, then advances.
    ///
    /// Compute, return, then increment: the first call yields `delay(0)`
    /// untouched by any prior advance. Once `max_attempts` emissions have
    /// happened, fails with [`BackoffError::Exhausted`].
    pub fn next(&mut self) -> Result<Duration, BackoffError> {
        if let Some(limit) = self.max_attempts {
            if self.attempt >= limit {
                return Err(BackoffError::Exhausted { attempts: limit });
            }
        }
        let delay = self.policy.delay_for(self.attempt);
        self.attempt = self.attempt.saturating_add(1);
        Ok(delay)
    }

    /// Restores the cursor to attempt 0.
    pub fn reset(&mut self) {
        self.attempt = 0;
    }

    /// Number of delays emitted since creation or the last `reset()`.
    pub fn attempt(&self) -> u32 {
        self.attempt
    }

    /// The policy this sequence draws from.
    pub fn policy(&self) -> &BackoffPolicy {
        &self.policy
    }
}
