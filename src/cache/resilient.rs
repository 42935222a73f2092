//! # Tiered cache with backfill and stale fallback.
//!
//! [`ResilientCache`] chains [`TimeCache`] tiers, ordered fastest/shortest
//! TTL first, in front of a caller-supplied loader. Reads degrade gracefully:
//!
//! ```text
//! get(key, loader)
//!   ├─► fresh hit at tier i     ─► return; backfill tiers 0..i (their own TTLs)
//!   ├─► all tiers miss          ─► loader()
//!   │        ├─ Ok(v)           ─► store tier 0 (all tiers if propagate_on_load)
//!   │        └─ Err(e)          ─► stale entry in the LAST tier?
//!   │             ├─ yes        ─► degraded success (StaleFallback)
//!   │             └─ no         ─► propagate e unchanged
//! ```
//!
//! ## Rules
//! - Backfill writes tiers *in front of* the hit tier only; the hit tier is
//!   left untouched so a hit never triggers a refresh storm.
//! - Only the last (slowest, longest-TTL) tier's staleness qualifies for
//!   fallback; a stale middle tier is not a hit of any kind.
//! - No cross-tier lock: each tier synchronizes itself and backfill is
//!   best-effort. A backfill lost to a concurrent write costs warmth, never
//!   correctness of the returned value.
//! - The three outcomes stay distinguishable: fresh hit (`Tier`/`Loader`),
//!   degraded success (`StaleFallback`), hard failure ([`CacheError`]).

use std::fmt::Display;
use std::future::Future;
use std::hash::Hash;
use std::sync::Arc;

use crate::cache::time_cache::{Lookup, TimeCache};
use crate::error::{BoxError, CacheError};

/// Where a fetched value came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FetchSource {
    /// Fresh hit at the given tier index (0 = fastest).
    Tier(usize),
    /// All tiers missed; the loader produced the value.
    Loader,
    /// The loader failed; this is the last tier's expired entry.
    StaleFallback,
}

/// A value plus its provenance, so callers can tell degraded data apart.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Fetched<V> {
    /// The fetched value.
    pub value: V,
    /// How it was obtained.
    pub source: FetchSource,
}

impl<V> Fetched<V> {
    /// Whether the value is known to be past its expiry (degraded success).
    pub fn is_degraded(&self) -> bool {
        self.source == FetchSource::StaleFallback
    }
}

/// Ordered chain of cache tiers in front of a fallible loader.
pub struct ResilientCache<K, V> {
    tiers: Vec<Arc<TimeCache<K, V>>>,
    propagate_on_load: bool,
}

impl<K, V> ResilientCache<K, V>
where
    K: Eq + Hash + Clone + Display,
    V: Clone,
{
    /// Creates a chain over `tiers`, index 0 = fastest/shortest-TTL.
    ///
    /// The chain is fixed at construction. With no tiers at all, every get
    /// goes straight to the loader and there is nothing to fall back on.
    pub fn new(tiers: Vec<Arc<TimeCache<K, V>>>) -> Self {
        Self {
            tiers,
            propagate_on_load: false,
        }
    }

    /// Store loader results into every tier instead of only tier 0.
    pub fn propagate_on_load(mut self, propagate: bool) -> Self {
        self.propagate_on_load = propagate;
        self
    }

    /// Number of tiers in the chain.
    pub fn tier_count(&self) -> usize {
        self.tiers.len()
    }

    /// Fetches `key` through the tier chain, falling back to `loader`.
    ///
    /// See the module docs for the full decision tree. The loader's error
    /// is propagated unchanged (as the [`CacheError::Loader`] source) only
    /// when no tier holds the key fresh *or* stale-in-last-position.
    pub async fn get<F, Fut>(&self, key: &K, loader: F) -> Result<Fetched<V>, CacheError>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, BoxError>>,
    {
        for (i, tier) in self.tiers.iter().enumerate() {
            if let Lookup::Fresh(value) = tier.lookup(key).await {
                // Warm the faster tiers with their own (short) default TTLs;
                // the hit tier keeps its original entry.
                for warmer in &self.tiers[..i] {
                    warmer.put(key.clone(), value.clone()).await;
                }
                return Ok(Fetched {
                    value,
                    source: FetchSource::Tier(i),
                });
            }
        }

        match loader().await {
            Ok(value) => {
                if self.propagate_on_load {
                    for tier in &self.tiers {
                        tier.put(key.clone(), value.clone()).await;
                    }
                } else if let Some(first) = self.tiers.first() {
                    first.put(key.clone(), value.clone()).await;
                }
                Ok(Fetched {
                    value,
                    source: FetchSource::Loader,
                })
            }
            Err(source) => {
                if let Some(last) = self.tiers.last() {
                    if let Lookup::Stale(value) = last.lookup(key).await {
                        return Ok(Fetched {
                            value,
                            source: FetchSource::StaleFallback,
                        });
                    }
                }
                Err(CacheError::Loader {
                    key: key.to_string(),
                    source,
                })
            }
        }
    }

    /// Removes `key` from every tier.
    pub async fn invalidate(&self, key: &K) {
        for tier in &self.tiers {
            tier.invalidate(key).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use tokio::time::advance;

    fn chain() -> (Arc<TimeCache<String, u32>>, Arc<TimeCache<String, u32>>, ResilientCache<String, u32>) {
        let fast = Arc::new(TimeCache::new(Duration::from_secs(1)));
        let slow = Arc::new(TimeCache::new(Duration::from_secs(100)));
        let cache = ResilientCache::new(vec![fast.clone(), slow.clone()]);
        (fast, slow, cache)
    }

    fn failing_loader() -> impl FnOnce() -> std::future::Ready<Result<u32, BoxError>> {
        || std::future::ready(Err("upstream down".into()))
    }

    #[tokio::test(start_paused = true)]
    async fn test_fresh_hit_skips_loader() {
        let (fast, _slow, cache) = chain();
        fast.put("k".to_string(), 1).await;

        let fetched = cache.get(&"k".to_string(), failing_loader()).await.unwrap();
        assert_eq!(fetched.value, 1);
        assert_eq!(fetched.source, FetchSource::Tier(0));
        assert!(!fetched.is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_tier_hit_backfills_faster_tiers() {
        let (fast, slow, cache) = chain();
        slow.put("k".to_string(), 9).await;

        let fetched = cache.get(&"k".to_string(), failing_loader()).await.unwrap();
        assert_eq!(fetched.source, FetchSource::Tier(1));

        // Tier 0 got warmed with its own 1s TTL; tier 1 was left untouched.
        assert_eq!(fast.get(&"k".to_string()).await, Some(9));
        advance(Duration::from_millis(1_500)).await;
        assert!(fast.lookup(&"k".to_string()).await.is_stale());
        assert_eq!(slow.get(&"k".to_string()).await, Some(9));
    }

    #[tokio::test(start_paused = true)]
    async fn test_all_miss_loads_and_stores_tier_zero() {
        let (fast, slow, cache) = chain();

        let fetched = cache
            .get(&"k".to_string(), || std::future::ready(Ok(5)))
            .await
            .unwrap();
        assert_eq!(fetched.source, FetchSource::Loader);
        assert_eq!(fast.get(&"k".to_string()).await, Some(5));
        assert!(slow.is_empty().await, "no propagation by default");
    }

    #[tokio::test(start_paused = true)]
    async fn test_propagate_on_load_fills_every_tier() {
        let fast = Arc::new(TimeCache::new(Duration::from_secs(1)));
        let slow = Arc::new(TimeCache::new(Duration::from_secs(100)));
        let cache =
            ResilientCache::new(vec![fast.clone(), slow.clone()]).propagate_on_load(true);

        cache
            .get(&"k".to_string(), || std::future::ready(Ok(5)))
            .await
            .unwrap();
        assert_eq!(fast.get(&"k".to_string()).await, Some(5));
        assert_eq!(slow.get(&"k".to_string()).await, Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_last_tier_is_degraded_success() {
        let (_fast, slow, cache) = chain();
        slow.put("k".to_string(), 9).await;

        // Let every tier expire, then break the loader.
        advance(Duration::from_secs(200)).await;

        let fetched = cache.get(&"k".to_string(), failing_loader()).await.unwrap();
        assert_eq!(fetched.value, 9);
        assert_eq!(fetched.source, FetchSource::StaleFallback);
        assert!(fetched.is_degraded());
    }

    #[tokio::test(start_paused = true)]
    async fn test_stale_middle_tier_does_not_qualify() {
        let (fast, _slow, cache) = chain();
        fast.put("k".to_string(), 3).await;
        advance(Duration::from_secs(2)).await;

        // Tier 0 holds a stale entry, the last tier holds nothing: that is
        // a hard failure, not a fallback.
        let err = cache
            .get(&"k".to_string(), failing_loader())
            .await
            .unwrap_err();
        assert_eq!(err.as_label(), "cache_loader");
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_data_anywhere_propagates_loader_error() {
        let (_fast, _slow, cache) = chain();

        let err = cache
            .get(&"users:7".to_string(), failing_loader())
            .await
            .unwrap_err();
        match &err {
            CacheError::Loader { key, source } => {
                assert_eq!(key, "users:7");
                assert_eq!(source.to_string(), "upstream down");
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalidate_clears_all_tiers() {
        let (fast, slow, cache) = chain();
        fast.put("k".to_string(), 1).await;
        slow.put("k".to_string(), 1).await;

        cache.invalidate(&"k".to_string()).await;
        assert!(fast.is_empty().await);
        assert!(slow.is_empty().await);
    }
}
