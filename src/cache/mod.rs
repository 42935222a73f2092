//! Expiring caches.
//!
//! - [`TimeCache`] - single tier, per-entry TTL, stale entries retained
//! - [`Lookup`] - fresh / stale / absent probe result
//! - [`ResilientCache`] - ordered tier chain with backfill and stale fallback
//! - [`Fetched`] / [`FetchSource`] - value provenance, including degraded hits

mod resilient;
mod time_cache;

pub use resilient::{FetchSource, Fetched, ResilientCache};
pub use time_cache::{Lookup, TimeCache};
