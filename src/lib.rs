//! # steadfast
//!
//! **Steadfast** is a resilience and concurrency toolkit for async Rust.
//!
//! It provides small, composable primitives for the unglamorous parts of
//! talking to unreliable things: pacing retries, waiting on conditions,
//! fanning out independent work, sharing one lazily-built resource, and
//! keeping serving data when the upstream is down.
//!
//! ## Architecture
//! ```text
//!   ┌────────────────┐     ┌────────────────┐
//!   │ BackoffPolicy  │────►│ BackoffSequence│  delay(n) = first·factor^n,
//!   │ (+ jitter)     │     │ (stateful)     │  clamped to max
//!   └────────────────┘     └───────┬────────┘
//!                                  │ paces
//!              ┌───────────────────┼────────────────────┐
//!              ▼                   ▼                    ▼
//!      ┌──────────────┐    ┌──────────────┐     ┌──────────────┐
//!      │   Retrier    │    │    Waiter    │     │   WaitIter   │
//!      │ (bounded     │    │ (poll until  │     │ (same loop,  │
//!      │  attempts)   │    │  ready/out   │     │  step by     │
//!      └──────────────┘    │  of time)    │     │  step)       │
//!                          └──────────────┘     └──────────────┘
//!
//!   ┌─────────────────┐        ┌─────────────────────────────────────┐
//!   │ ConcurrentRunner│        │ ResilientCache                      │
//!   │  job ─► task    │        │  tier 0 (fast) ─► tier n (slow)     │
//!   │  job ─► task    │        │      │ backfill ◄──────┘ hit        │
//!   │  job ─► task    │        │      ▼                              │
//!   │  (join all,     │        │  loader ── Err ─► stale in last     │
//!   │   failures      │        │                   tier? degraded    │
//!   │   captured      │        │                   success : error   │
//!   │   per job)      │        └─────────────────────────────────────┘
//!   └─────────────────┘
//!
//!   ┌─────────────────┐
//!   │ Singleton<T>    │  construct-at-most-once + counted RAII guards
//!   └─────────────────┘
//! ```
//!
//! ## Features
//! | Area           | Description                                              | Key types                                  |
//! |----------------|----------------------------------------------------------|--------------------------------------------|
//! | **Pacing**     | Deterministic or jittered delay schedules.               | [`BackoffPolicy`], [`BackoffSequence`]     |
//! | **Retry**      | Bounded attempts with per-failure logging.               | [`Retrier`]                                |
//! | **Waiting**    | Poll a predicate until ready or timed out.               | [`Waiter`], [`WaitConfig`], [`WaitIter`]   |
//! | **Fan-out**    | Run independent jobs, capture every failure in place.    | [`ConcurrentRunner`], [`JobFn`], [`RunReport`] |
//! | **Sharing**    | One lazily-built resource, reconciled scoped acquisition.| [`Singleton`], [`SingletonGuard`]          |
//! | **Caching**    | Expiring tiers, backfill, stale-data fallback.           | [`TimeCache`], [`ResilientCache`]          |
//! | **Errors**     | One enum per concern, context preserved.                 | [`WaitError`], [`JobError`], [`CacheError`] |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`StdoutLog`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use steadfast::{ConcurrentRunner, JobError, JobFn, JobRef, WaitConfig, Waiter};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Fan out two independent jobs; failures would be captured per job.
//!     let jobs: Vec<JobRef<u32>> = vec![
//!         JobFn::arc("left", |_: CancellationToken| async { Ok(20) }),
//!         JobFn::arc("right", |_: CancellationToken| async { Ok(22) }),
//!     ];
//!     let values = ConcurrentRunner::new().run(jobs).await.into_result()?;
//!
//!     // Wait (briefly) for a condition that is already true.
//!     let waiter = Waiter::new(WaitConfig::timeout(Duration::from_secs(1)));
//!     let total = values["left"] + values["right"];
//!     waiter.wait(|| total == 42).await?;
//!     Ok(())
//! }
//! ```

mod cache;
mod error;
mod log;
mod policies;
mod retry;
mod runner;
mod sync;
mod waiting;

// ---- Public re-exports ----

pub use cache::{FetchSource, Fetched, Lookup, ResilientCache, TimeCache};
pub use error::{
    BackoffError, BoxError, CacheError, CompositeError, JobError, JobFailure, RetryError,
    SingletonError, WaitError,
};
pub use log::{Log, LogLevel, NullLog};
pub use policies::{BackoffPolicy, BackoffSequence, JitterPolicy};
pub use retry::Retrier;
pub use runner::{ConcurrentRunner, Job, JobFn, JobRef, Outcome, RunReport};
pub use sync::{Singleton, SingletonGuard};
pub use waiting::{Ready, WaitConfig, WaitIter, WaitStep, Waiter};

// Optional: expose a simple built-in stdout logger (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use log::StdoutLog;
