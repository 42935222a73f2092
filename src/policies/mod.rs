//! Delay policies.
//!
//! This module groups the knobs that control **how long** to wait between
//! attempts, shared by the waiter and the retry helper.
//!
//! ## Contents
//! - [`BackoffPolicy`] how delays evolve (first / factor / max + jitter)
//! - [`BackoffSequence`] stateful cursor over a policy, with optional
//!   attempt limit and `reset()`
//! - [`JitterPolicy`] randomization strategy to avoid thundering herd
//!
//! ## Defaults
//! - `BackoffPolicy::default()` → first=100ms, factor=2.0, max=30s, jitter=None.
//! - `JitterPolicy::None` by default; consider `Equal` when many callers
//!   share one upstream.

mod backoff;
mod jitter;

pub use backoff::{BackoffPolicy, BackoffSequence};
pub use jitter::JitterPolicy;
