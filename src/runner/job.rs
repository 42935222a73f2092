//! # Job abstraction and function-backed implementation.
//!
//! This module defines the [`Job`] trait (async, cancelable, value-producing)
//! and a convenient function-backed implementation [`JobFn`]. The common
//! handle type is [`JobRef`], an `Arc<dyn Job<T>>` suitable for handing to a
//! [`ConcurrentRunner`](crate::ConcurrentRunner).
//!
//! A job receives a [`CancellationToken`] and should periodically check it to
//! stop cooperatively when the run is cancelled.

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::JobError;

/// Shared handle to a job producing values of type `T`.
pub type JobRef<T> = Arc<dyn Job<T>>;

/// # Asynchronous, cancelable unit producing a value.
///
/// A `Job` has a stable [`id`](Job::id) and an async [`run`](Job::run)
/// method that receives a [`CancellationToken`]. Implementors should check
/// cancellation at convenient points and return [`JobError::Canceled`]
/// promptly when it fires.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use steadfast::{Job, JobError};
///
/// struct Fetch;
///
/// #[async_trait]
/// impl Job<u32> for Fetch {
///     fn id(&self) -> &str { "fetch" }
///
///     async fn run(&self, ctx: CancellationToken) -> Result<u32, JobError> {
///         if ctx.is_cancelled() {
///             return Err(JobError::Canceled);
///         }
///         Ok(7)
///     }
/// }
/// ```
#[async_trait]
pub trait Job<T>: Send + Sync + 'static
where
    T: Send + 'static,
{
    /// Returns a stable, human-readable job id. Ids must be unique within
    /// one run; outcomes are keyed by id.
    fn id(&self) -> &str;

    /// Executes the job until completion or cancellation.
    async fn run(&self, ctx: CancellationToken) -> Result<T, JobError>;
}

/// Function-backed job implementation.
///
/// Wraps a closure that *creates* a new future per run, so there is no
/// hidden shared mutable state between runs; if shared state is needed,
/// capture an `Arc<...>` explicitly inside the closure.
#[derive(Debug)]
pub struct JobFn<F> {
    id: Cow<'static, str>,
    f: F,
}

impl<F> JobFn<F> {
    /// Creates a new function-backed job.
    ///
    /// Prefer [`JobFn::arc`] when you immediately need a [`JobRef`].
    pub fn new(id: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { id: id.into(), f }
    }

    /// Creates the job and returns it as a shared handle.
    ///
    /// ## Example
    /// ```rust
    /// use tokio_util::sync::CancellationToken;
    /// use steadfast::{JobFn, JobRef, JobError};
    ///
    /// let j: JobRef<u32> = JobFn::arc("answer", |_ctx: CancellationToken| async {
    ///     Ok::<_, JobError>(42)
    /// });
    /// assert_eq!(j.id(), "answer");
    /// ```
    pub fn arc(id: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(id, f))
    }
}

#[async_trait]
impl<F, Fut, T> Job<T> for JobFn<F>
where
    F: Fn(CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<T, JobError>> + Send + 'static,
    T: Send + 'static,
{
    fn id(&self) -> &str {
        &self.id
    }

    async fn run(&self, ctx: CancellationToken) -> Result<T, JobError> {
        (self.f)(ctx).await
    }
}
