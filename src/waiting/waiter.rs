//! # Predicate waiter.
//!
//! [`Waiter`] polls a caller-supplied probe until it reports ready, pacing
//! the polls with a [`BackoffSequence`](crate::BackoffSequence) and giving
//! up once the configured timeout has elapsed.
//!
//! ## Rules
//! - The probe is evaluated **before** any sleep; a probe that is ready on
//!   the first evaluation returns immediately.
//! - Sleeps are clamped to the remaining budget, and the probe gets one
//!   final evaluation at the deadline before the wait fails.
//! - With `log_interval` set, one notice per interval is emitted through the
//!   injected [`Log`] describing the last probe result and the elapsed time.
//! - Failure is a [`WaitError::PredicateNotSatisfied`] value, never a panic;
//!   it carries the last observed result and the time spent.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use steadfast::{WaitConfig, Waiter};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let waiter = Waiter::new(WaitConfig::timeout(Duration::from_secs(1)));
//! let value = waiter.wait(|| Some(42)).await.unwrap();
//! assert_eq!(value, Some(42));
//! # }
//! ```

use std::sync::Arc;

use tokio::time::{self, Instant};

use crate::error::WaitError;
use crate::log::{Log, NullLog};
use crate::policies::BackoffSequence;
use crate::waiting::config::WaitConfig;
use crate::waiting::iter::WaitIter;
use crate::waiting::ready::Ready;

/// Polls a predicate until it is satisfied or the timeout elapses.
///
/// One `Waiter` can serve many calls; every call builds a fresh session
/// (its own backoff cursor and deadline) from the shared [`WaitConfig`].
pub struct Waiter {
    config: WaitConfig,
    log: Arc<dyn Log>,
}

impl Waiter {
    /// Creates a waiter with no logging collaborator.
    pub fn new(config: WaitConfig) -> Self {
        Self {
            config,
            log: Arc::new(NullLog),
        }
    }

    /// Creates a waiter that emits periodic notices through `log`.
    pub fn with_logger(config: WaitConfig, log: Arc<dyn Log>) -> Self {
        Self { config, log }
    }

    /// The configuration sessions are built from.
    pub fn config(&self) -> &WaitConfig {
        &self.config
    }

    /// Polls `probe` until it is ready, returning the satisfied outcome.
    ///
    /// The probe result type decides what "ready" means via [`Ready`]:
    /// `bool` probes succeed on `true`, `Option<T>` probes succeed on
    /// `Some` (and the wrapped value is returned to the caller).
    ///
    /// On timeout, fails with [`WaitError::PredicateNotSatisfied`] carrying
    /// the Debug rendering of the last probe result, the elapsed time, and
    /// the number of evaluations performed.
    pub async fn wait<R, F>(&self, mut probe: F) -> Result<R, WaitError>
    where
        R: Ready + std::fmt::Debug,
        F: FnMut() -> R,
    {
        let started = Instant::now();
        let mut seq = BackoffSequence::unbounded(self.config.backoff);
        let mut attempts: u32 = 0;
        let mut last_notice = started;

        loop {
            attempts = attempts.saturating_add(1);
            let outcome = probe();
            if outcome.is_ready() {
                return Ok(outcome);
            }

            let elapsed = started.elapsed();

            if let Some(interval) = self.config.log_interval {
                if last_notice.elapsed() >= interval {
                    let message = format!(
                        "still waiting after {elapsed:?} ({attempts} attempts; last: {outcome:?})"
                    );
                    self.log.log(self.config.log_level, &message).await;
                    last_notice = Instant::now();
                }
            }

            if let Some(timeout) = self.config.timeout {
                if elapsed >= timeout {
                    return Err(WaitError::PredicateNotSatisfied {
                        elapsed,
                        attempts,
                        last: format!("{outcome:?}"),
                    });
                }
            }

            // Unbounded sequences never exhaust; the fallback is unreachable.
            let delay = seq.next().unwrap_or(self.config.backoff.max);
            let sleep_for = match self.config.timeout {
                Some(timeout) => delay.min(timeout.saturating_sub(elapsed)),
                None => delay,
            };
            time::sleep(sleep_for).await;
        }
    }

    /// The same polling loop as [`wait`](Waiter::wait), exposed as a lazy
    /// sequence of per-evaluation [`WaitStep`](crate::WaitStep)s.
    ///
    /// The returned iterator is finite (it ends after the satisfied or
    /// timed-out step) and may be dropped early to abandon the wait without
    /// an error. Each call builds an independent session; sessions are not
    /// restartable.
    pub fn probe_stream<R, F>(&self, probe: F) -> WaitIter<R, F>
    where
        R: Ready,
        F: FnMut() -> R,
    {
        WaitIter::new(probe, self.config)
    }
}
