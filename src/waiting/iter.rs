//! # Lazy wait iterator.
//!
//! [`WaitIter`] is the polling loop of [`Waiter::wait`](crate::Waiter::wait)
//! exposed one evaluation at a time: an explicit stateful iterator rather
//! than an implicit suspension. Each `next()` performs (at most) one sleep
//! and one probe evaluation and yields a [`WaitStep`].
//!
//! ## Rules
//! - The first `next()` probes immediately; later calls sleep the next
//!   backoff delay (clamped to the remaining budget) before probing.
//! - The iterator is finite: after yielding a satisfied step, or an
//!   unsatisfied step at the deadline, every further `next()` returns `None`.
//! - Dropping the iterator abandons the wait; no error is raised and the
//!   underlying loop does not run to completion.

use std::time::Duration;

use tokio::time::{self, Instant};

use crate::policies::BackoffSequence;
use crate::waiting::config::WaitConfig;
use crate::waiting::ready::Ready;

/// One probe evaluation observed through a [`WaitIter`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WaitStep<R> {
    /// The probe's result for this evaluation.
    pub outcome: R,
    /// Time elapsed since the session started.
    pub elapsed: Duration,
    /// Whether this outcome satisfied the wait (always the final step).
    pub satisfied: bool,
}

/// Stateful iterator over the evaluations of one wait session.
///
/// Built by [`Waiter::probe_stream`](crate::Waiter::probe_stream); not
/// restartable.
pub struct WaitIter<R, F>
where
    R: Ready,
    F: FnMut() -> R,
{
    probe: F,
    seq: BackoffSequence,
    timeout: Option<Duration>,
    max_delay: Duration,
    started: Option<Instant>,
    done: bool,
}

impl<R, F> WaitIter<R, F>
where
    R: Ready,
    F: FnMut() -> R,
{
    pub(crate) fn new(probe: F, config: WaitConfig) -> Self {
        Self {
            probe,
            seq: BackoffSequence::unbounded(config.backoff),
            timeout: config.timeout,
            max_delay: config.backoff.max,
            started: None,
            done: false,
        }
    }

    /// Sleeps (except before the first evaluation), probes once, and yields
    /// the step. Returns `None` once the session has ended.
    pub async fn next(&mut self) -> Option<WaitStep<R>> {
        if self.done {
            return None;
        }

        let started = match self.started {
            Some(at) => {
                // Not the first step: pace before re-probing.
                let delay = self.seq.next().unwrap_or(self.max_delay);
                let sleep_for = match self.timeout {
                    Some(timeout) => delay.min(timeout.saturating_sub(at.elapsed())),
                    None => delay,
                };
                time::sleep(sleep_for).await;
                at
            }
            None => {
                let now = Instant::now();
                self.started = Some(now);
                now
            }
        };

        let outcome = (self.probe)();
        let elapsed = started.elapsed();
        let satisfied = outcome.is_ready();

        let timed_out = self
            .timeout
            .map(|timeout| elapsed >= timeout)
            .unwrap_or(false);
        if satisfied || timed_out {
            self.done = true;
        }

        Some(WaitStep {
            outcome,
            elapsed,
            satisfied,
        })
    }

    /// Whether the session has ended (satisfied or timed out).
    pub fn is_done(&self) -> bool {
        self.done
    }
}
