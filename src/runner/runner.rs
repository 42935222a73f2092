//! # Concurrent runner with isolated failure capture.
//!
//! [`ConcurrentRunner`] executes a batch of independent jobs, each on its
//! own tokio task, and collects every outcome into a
//! [`RunReport`](crate::RunReport).
//!
//! ## Rules
//! - One job's failure never cancels or blocks another job.
//! - A panic inside a job body is caught at the task boundary and recorded
//!   as that job's [`JobError::Panicked`]; it never unwinds through the run
//!   and is never dropped.
//! - Cancellation observed by a job is captured the same way, as
//!   [`JobError::Canceled`] attributed to that job.
//! - The run returns only after every job has finished (full join).
//! - Outcomes are keyed by job id; completion order is not observable.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use steadfast::{ConcurrentRunner, JobError, JobFn, JobRef};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let jobs: Vec<JobRef<u32>> = vec![
//!     JobFn::arc("one", |_: CancellationToken| async { Ok(1) }),
//!     JobFn::arc("two", |_: CancellationToken| async { Ok(2) }),
//! ];
//!
//! let report = ConcurrentRunner::new().run(jobs).await;
//! let values = report.into_result().unwrap();
//! assert_eq!(values["one"] + values["two"], 3);
//! # }
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use futures::future;
use tokio::sync::Semaphore;
use tokio::task::JoinError;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;
use crate::runner::job::JobRef;
use crate::runner::report::RunReport;

/// Executes independent jobs in parallel, capturing each failure in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConcurrentRunner {
    /// Maximum number of jobs running simultaneously. `0` = unlimited.
    max_concurrent: usize,
}

impl ConcurrentRunner {
    /// Creates a runner with no concurrency limit.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a runner that admits at most `max_concurrent` jobs at once
    /// (`0` = unlimited).
    pub fn with_limit(max_concurrent: usize) -> Self {
        Self { max_concurrent }
    }

    /// Runs `jobs` under a fresh cancellation token.
    pub async fn run<T: Send + 'static>(&self, jobs: Vec<JobRef<T>>) -> RunReport<T> {
        self.run_with(&CancellationToken::new(), jobs).await
    }

    /// Runs `jobs` under a child token of `parent`.
    ///
    /// Each job gets its own child token, so cancelling `parent` reaches
    /// every job while one job's exit never cancels a sibling. Jobs that
    /// observe cancellation report [`JobError::Canceled`] in their own
    /// outcome slot; the run itself always completes with a full report.
    pub async fn run_with<T: Send + 'static>(
        &self,
        parent: &CancellationToken,
        jobs: Vec<JobRef<T>>,
    ) -> RunReport<T> {
        let semaphore = if self.max_concurrent > 0 {
            Some(Arc::new(Semaphore::new(self.max_concurrent)))
        } else {
            None
        };

        let mut ids = Vec::with_capacity(jobs.len());
        let mut handles = Vec::with_capacity(jobs.len());
        for job in jobs {
            let id = job.id().to_string();
            let ctx = parent.child_token();
            let sem = semaphore.clone();
            let handle = tokio::spawn(async move {
                let _permit = match sem {
                    Some(s) => match s.acquire_owned().await {
                        Ok(permit) => Some(permit),
                        // The semaphore is never closed while a run holds it.
                        Err(_) => return Err(JobError::Canceled),
                    },
                    None => None,
                };
                job.run(ctx).await
            });
            ids.push(id);
            handles.push(handle);
        }

        let mut outcomes = BTreeMap::new();
        let joined = future::join_all(handles).await;
        for (id, joined) in ids.into_iter().zip(joined) {
            let outcome = match joined {
                Ok(result) => result,
                Err(join_err) => Err(capture_join_error(join_err)),
            };
            outcomes.insert(id, outcome);
        }
        RunReport::from_outcomes(outcomes)
    }
}

/// Maps a task-boundary failure to the owning job's error slot.
fn capture_join_error(err: JoinError) -> JobError {
    if err.is_cancelled() {
        return JobError::Canceled;
    }
    match err.try_into_panic() {
        Ok(payload) => JobError::Panicked {
            message: panic_message(payload.as_ref()),
        },
        Err(err) => JobError::Fail {
            error: err.to_string(),
        },
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use crate::runner::job::JobFn;

    #[tokio::test]
    async fn test_failures_are_isolated_and_ok_value_survives() {
        let jobs: Vec<JobRef<u32>> = vec![
            JobFn::arc("ok", |_: CancellationToken| async { Ok(7) }),
            JobFn::arc("bad_value", |_: CancellationToken| async {
                Err(JobError::Fail { error: "bad value".into() })
            }),
            JobFn::arc("interrupted", |_: CancellationToken| async {
                if true {
                    panic!("interrupt while running");
                }
                Ok(0)
            }),
        ];

        let report = ConcurrentRunner::new().run(jobs).await;
        assert_eq!(report.len(), 3, "every job has an outcome");
        assert!(matches!(report.get("ok"), Some(Ok(7))));
        assert!(matches!(
            report.get("interrupted"),
            Some(Err(JobError::Panicked { message })) if message.contains("interrupt")
        ));

        let err = report.into_result().unwrap_err();
        assert_eq!(err.ids(), vec!["bad_value", "interrupted"]);
    }

    #[tokio::test]
    async fn test_outcomes_ordered_by_id_not_completion() {
        let jobs: Vec<JobRef<&'static str>> = vec![
            JobFn::arc("z_fast", |_: CancellationToken| async { Ok("first done") }),
            JobFn::arc("a_slow", |_: CancellationToken| async {
                tokio::time::sleep(Duration::from_millis(20)).await;
                Ok("last done")
            }),
        ];

        let report = ConcurrentRunner::new().run(jobs).await;
        let ids: Vec<&str> = report.outcomes().keys().map(String::as_str).collect();
        assert_eq!(ids, vec!["a_slow", "z_fast"]);
    }

    #[tokio::test]
    async fn test_one_failure_never_blocks_siblings() {
        let jobs: Vec<JobRef<u32>> = vec![
            JobFn::arc("fails_fast", |_: CancellationToken| async {
                Err(JobError::Fail { error: "early".into() })
            }),
            JobFn::arc("keeps_going", |_: CancellationToken| async {
                tokio::time::sleep(Duration::from_millis(30)).await;
                Ok(1)
            }),
        ];

        let report = ConcurrentRunner::new().run(jobs).await;
        assert!(matches!(report.get("keeps_going"), Some(Ok(1))));
    }

    #[tokio::test]
    async fn test_parent_cancellation_captured_per_job() {
        let parent = CancellationToken::new();
        parent.cancel();

        let jobs: Vec<JobRef<u32>> = vec![JobFn::arc("worker", |ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(JobError::Canceled);
            }
            Ok(1)
        })];

        let report = ConcurrentRunner::new().run_with(&parent, jobs).await;
        assert!(matches!(report.get("worker"), Some(Err(JobError::Canceled))));
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_limit_bounds_parallelism() {
        static RUNNING: AtomicUsize = AtomicUsize::new(0);
        static PEAK: AtomicUsize = AtomicUsize::new(0);
        RUNNING.store(0, Ordering::SeqCst);
        PEAK.store(0, Ordering::SeqCst);

        let jobs: Vec<JobRef<()>> = (0..6)
            .map(|i| {
                JobFn::arc(format!("job-{i}"), |_: CancellationToken| async {
                    let now = RUNNING.fetch_add(1, Ordering::SeqCst) + 1;
                    PEAK.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(20)).await;
                    RUNNING.fetch_sub(1, Ordering::SeqCst);
                    Ok(())
                }) as JobRef<()>
            })
            .collect();

        let report = ConcurrentRunner::with_limit(2).run(jobs).await;
        assert!(report.is_success());
        assert!(
            PEAK.load(Ordering::SeqCst) <= 2,
            "peak concurrency {} exceeded limit",
            PEAK.load(Ordering::SeqCst)
        );
    }
}
