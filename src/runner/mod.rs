//! Concurrent execution with isolated failure capture.
//!
//! This module provides the batch-execution primitives:
//! - [`Job`] - trait for async cancelable value-producing units
//! - [`JobFn`] - function-backed job implementation
//! - [`JobRef`] - shared handle to a job (`Arc<dyn Job<T>>`)
//! - [`ConcurrentRunner`] - runs a batch, one tokio task per job
//! - [`RunReport`] / [`Outcome`] - per-job results, ordered by id

mod job;
mod report;
#[allow(clippy::module_inception)]
mod runner;

pub use job::{Job, JobFn, JobRef};
pub use report::{Outcome, RunReport};
pub use runner::ConcurrentRunner;
