//! Predicate waiting.
//!
//! This module provides the blocking-wait primitives:
//! - [`Waiter`] - polls a probe until ready or timed out
//! - [`WaitConfig`] - timeout / pacing / logging knobs for a session
//! - [`WaitIter`] / [`WaitStep`] - the same loop as a lazy step iterator
//! - [`Ready`] - what "the probe is satisfied" means per result type

mod config;
mod iter;
mod ready;
mod waiter;

pub use config::WaitConfig;
pub use iter::{WaitIter, WaitStep};
pub use ready::Ready;
pub use waiter::Waiter;
