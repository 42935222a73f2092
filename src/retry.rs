//! # Bounded retry with backoff.
//!
//! [`Retrier`] runs a fallible async operation up to `max_attempts` times,
//! sleeping the next [`BackoffSequence`](crate::BackoffSequence) delay
//! between attempts and reporting each failure through the injected
//! [`Log`]. The first success wins; once the budget is spent the final
//! attempt's error is returned inside [`RetryError::Exhausted`].
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use steadfast::{BackoffPolicy, Retrier};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let retrier = Retrier::new(3, BackoffPolicy::default());
//! let value = retrier.run(|| async { Ok::<_, steadfast::BoxError>(42) }).await.unwrap();
//! assert_eq!(value, 42);
//! # }
//! ```

use std::future::Future;
use std::sync::Arc;

use tokio::time;

use crate::error::{BoxError, RetryError};
use crate::log::{Log, LogLevel, NullLog};
use crate::policies::{BackoffPolicy, BackoffSequence};

/// Retries a fallible async operation on a bounded backoff schedule.
pub struct Retrier {
    policy: BackoffPolicy,
    max_attempts: u32,
    log_level: LogLevel,
    log: Arc<dyn Log>,
}

impl Retrier {
    /// Creates a retrier making at most `max_attempts` attempts
    /// (a value of 0 is treated as 1: the operation always runs once).
    pub fn new(max_attempts: u32, policy: BackoffPolicy) -> Self {
        Self {
            policy,
            max_attempts,
            log_level: LogLevel::Debug,
            log: Arc::new(NullLog),
        }
    }

    /// Returns `self` reporting per-attempt failures through `log`.
    pub fn with_logger(mut self, log: Arc<dyn Log>, level: LogLevel) -> Self {
        self.log = log;
        self.log_level = level;
        self
    }

    /// Runs `op` until it succeeds or the attempt budget is spent.
    ///
    /// Sleeps `delay(n)` after the (n+1)-th failure, so the pause after the
    /// first failure is the policy's `first` delay exactly. The last
    /// attempt's error is preserved as the source of
    /// [`RetryError::Exhausted`].
    pub async fn run<T, F, Fut>(&self, mut op: F) -> Result<T, RetryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, BoxError>>,
    {
        let mut seq = BackoffSequence::unbounded(self.policy);
        let mut attempt: u32 = 0;
        loop {
            attempt += 1;
            match op().await {
                Ok(value) => return Ok(value),
                Err(err) => {
                    if attempt >= self.max_attempts {
                        return Err(RetryError::Exhausted {
                            attempts: attempt,
                            last: err,
                        });
                    }
                    let delay = seq.next().unwrap_or(self.policy.max);
                    let message = format!(
                        "attempt {attempt}/{} failed: {err}; retrying in {delay:?}",
                        self.max_attempts
                    );
                    self.log.log(self.log_level, &message).await;
                    time::sleep(delay).await;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use tokio::time::Instant;

    use crate::policies::JitterPolicy;

    fn policy(first_ms: u64, factor: f64) -> BackoffPolicy {
        BackoffPolicy {
            first: Duration::from_millis(first_ms),
            max: Duration::from_secs(30),
            factor,
            jitter: JitterPolicy::None,
        }
    }

    struct CountingLog {
        lines: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Log for CountingLog {
        async fn log(&self, _level: LogLevel, message: &str) {
            self.lines.lock().unwrap().push(message.to_string());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_first_success_returns_without_sleep() {
        let retrier = Retrier::new(5, policy(100, 2.0));
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let out = retrier
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Ok::<_, BoxError>(1) }
            })
            .await
            .unwrap();

        assert_eq!(out, 1);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(started.elapsed(), Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retries_until_success_with_scheduled_delays() {
        let retrier = Retrier::new(5, policy(100, 2.0));
        let calls = AtomicU32::new(0);

        let started = Instant::now();
        let out = retrier
            .run(|| {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                async move {
                    if n < 3 {
                        Err::<u32, BoxError>("not yet".into())
                    } else {
                        Ok(n)
                    }
                }
            })
            .await
            .unwrap();

        assert_eq!(out, 3);
        // Two failures: slept delay(0)=100ms then delay(1)=200ms.
        assert_eq!(started.elapsed(), Duration::from_millis(300));
    }

    #[tokio::test(start_paused = true)]
    async fn test_exhaustion_preserves_last_error() {
        let log = Arc::new(CountingLog {
            lines: Mutex::new(Vec::new()),
        });
        let retrier =
            Retrier::new(3, policy(10, 1.0)).with_logger(log.clone(), LogLevel::Info);

        let err = retrier
            .run(|| async { Err::<u32, BoxError>("still broken".into()) })
            .await
            .unwrap_err();

        assert_eq!(err.as_label(), "retry_exhausted");
        match &err {
            RetryError::Exhausted { attempts, last } => {
                assert_eq!(*attempts, 3);
                assert_eq!(last.to_string(), "still broken");
            }
        }

        // One notice per failure that was followed by another attempt.
        let lines = log.lines.lock().unwrap();
        assert_eq!(lines.len(), 2, "lines: {lines:?}");
        assert!(lines[0].contains("attempt 1/3"), "got: {}", lines[0]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_zero_budget_still_runs_once() {
        let retrier = Retrier::new(0, policy(10, 1.0));
        let calls = AtomicU32::new(0);

        let err = retrier
            .run(|| {
                calls.fetch_add(1, Ordering::SeqCst);
                async { Err::<u32, BoxError>("boom".into()) }
            })
            .await
            .unwrap_err();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert!(matches!(err, RetryError::Exhausted { attempts: 1, .. }));
    }
}
