//! Error types used across the toolkit.
//!
//! Each concern gets its own enum so callers can match precisely:
//!
//! - [`BackoffError`] — a bounded backoff sequence ran out of attempts.
//! - [`WaitError`] — a predicate wait timed out.
//! - [`JobError`] — one job inside a concurrent run failed.
//! - [`CompositeError`] — aggregate of all job failures after a run completes.
//! - [`RetryError`] — a retried operation never succeeded.
//! - [`SingletonError`] — a singleton constructor failed.
//! - [`CacheError`] — a cache loader failed with no fallback available.
//!
//! All types provide `as_label()` (short stable snake_case identifier for
//! logs/metrics) and preserve the originating context: which job, which key,
//! how long was waited.

use std::time::Duration;
use thiserror::Error;

/// Boxed error payload supplied by caller code (singleton constructors,
/// cache loaders, retried operations). The source chain is preserved.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors produced by a bounded [`BackoffSequence`](crate::BackoffSequence).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum BackoffError {
    /// The configured attempt budget was used up; `reset()` is required
    /// before the sequence can emit delays again.
    #[error("backoff exhausted after {attempts} attempts")]
    Exhausted {
        /// Number of delays emitted before exhaustion.
        attempts: u32,
    },
}

impl BackoffError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            BackoffError::Exhausted { .. } => "backoff_exhausted",
        }
    }
}

/// # Errors produced by [`Waiter`](crate::Waiter).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WaitError {
    /// The predicate never became ready within the configured timeout.
    ///
    /// Carries the last observed probe result (Debug-rendered) and the
    /// total time spent waiting.
    #[error("predicate not satisfied after {elapsed:?} ({attempts} attempts; last: {last})")]
    PredicateNotSatisfied {
        /// Total time elapsed when the wait gave up.
        elapsed: Duration,
        /// Number of probe evaluations performed.
        attempts: u32,
        /// Debug rendering of the last probe result.
        last: String,
    },
}

impl WaitError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use std::time::Duration;
    /// use steadfast::WaitError;
    ///
    /// let err = WaitError::PredicateNotSatisfied {
    ///     elapsed: Duration::from_secs(1),
    ///     attempts: 4,
    ///     last: "false".into(),
    /// };
    /// assert_eq!(err.as_label(), "wait_predicate_not_satisfied");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            WaitError::PredicateNotSatisfied { .. } => "wait_predicate_not_satisfied",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WaitError::PredicateNotSatisfied {
                elapsed,
                attempts,
                last,
            } => {
                format!("gave up after {elapsed:?} ({attempts} attempts); last result: {last}")
            }
        }
    }
}

/// # Errors produced by a single job inside a concurrent run.
///
/// A job's failure is always captured and attributed to that job; it never
/// escapes the run or affects sibling jobs.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum JobError {
    /// The job body returned an error.
    #[error("job failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The job body panicked. The panic is caught at the task boundary and
    /// recorded here instead of unwinding through the run.
    #[error("job panicked: {message}")]
    Panicked {
        /// Panic payload rendered to a string, when downcastable.
        message: String,
    },

    /// The job observed cancellation and stopped early.
    #[error("job canceled")]
    Canceled,
}

impl JobError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use steadfast::JobError;
    ///
    /// let err = JobError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "job_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            JobError::Fail { .. } => "job_failed",
            JobError::Panicked { .. } => "job_panicked",
            JobError::Canceled => "job_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            JobError::Fail { error } => format!("error: {error}"),
            JobError::Panicked { message } => format!("panic: {message}"),
            JobError::Canceled => "canceled".to_string(),
        }
    }
}

/// One failed job inside a [`CompositeError`]: its id plus the original error.
#[derive(Debug)]
pub struct JobFailure {
    /// Id of the failed job.
    pub id: String,
    /// The error the job produced.
    pub error: JobError,
}

/// # Aggregate of all job failures from one concurrent run.
///
/// Raised only after every job has finished; references each failing job's
/// id together with its original [`JobError`]. Jobs that succeeded are not
/// listed here — their values remain available on the
/// [`RunReport`](crate::RunReport) the error was converted from.
#[derive(Debug)]
pub struct CompositeError {
    /// Failures ordered by job id.
    pub failures: Vec<JobFailure>,
}

impl CompositeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        "run_composite"
    }

    /// Ids of the failing jobs, in id order.
    pub fn ids(&self) -> Vec<&str> {
        self.failures.iter().map(|f| f.id.as_str()).collect()
    }
}

impl std::fmt::Display for CompositeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} job(s) failed: ", self.failures.len())?;
        for (i, failure) in self.failures.iter().enumerate() {
            if i > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", failure.id, failure.error)?;
        }
        Ok(())
    }
}

impl std::error::Error for CompositeError {}

/// # Errors produced by the [`retry`](crate::retry) helper.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RetryError {
    /// Every attempt failed; carries the final attempt's error as source.
    #[error("retry exhausted after {attempts} attempts: {last}")]
    Exhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The error from the final attempt.
        #[source]
        last: BoxError,
    },
}

impl RetryError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            RetryError::Exhausted { .. } => "retry_exhausted",
        }
    }
}

/// # Errors produced by [`Singleton`](crate::Singleton).
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum SingletonError {
    /// The resource constructor failed. The cell stays empty, so a later
    /// `acquire()` will attempt construction again.
    #[error("singleton construction failed: {source}")]
    Init {
        /// The constructor's error.
        #[source]
        source: BoxError,
    },
}

impl SingletonError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            SingletonError::Init { .. } => "singleton_init",
        }
    }
}

/// # Errors produced by [`ResilientCache`](crate::ResilientCache).
///
/// Raised only when the loader failed **and** no tier held data to fall
/// back on — a stale entry in the last tier downgrades the failure to a
/// degraded success instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CacheError {
    /// The loader failed and no fresh or stale entry was available.
    #[error("loader failed for key `{key}`: {source}")]
    Loader {
        /// The key being fetched.
        key: String,
        /// The loader's error, propagated unchanged.
        #[source]
        source: BoxError,
    },
}

impl CacheError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            CacheError::Loader { .. } => "cache_loader",
        }
    }
}
