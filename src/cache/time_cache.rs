//! # Single-tier cache with per-entry expiry.
//!
//! [`TimeCache`] stores values with a creation timestamp and a TTL. An entry
//! is valid iff `now < created_at + ttl`. Expired entries read as misses but
//! are **retained** until overwritten, invalidated, or explicitly purged —
//! [`ResilientCache`](crate::ResilientCache) relies on that retention for
//! stale fallback, so expiry never deletes eagerly.
//!
//! ## Rules
//! - `get` answers fresh entries only; [`lookup`](TimeCache::lookup) also
//!   distinguishes stale-but-present from absent.
//! - Overwriting a key resets its timestamp (and TTL, if given).
//! - Each cache carries a `default_ttl` used by plain [`put`](TimeCache::put)
//!   and by tier backfill.

use std::collections::HashMap;
use std::hash::Hash;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::time::Instant;

/// Stored value plus its validity window.
#[derive(Clone, Debug)]
struct Entry<V> {
    value: V,
    created_at: Instant,
    ttl: Duration,
}

impl<V> Entry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now < self.created_at + self.ttl
    }
}

/// Result of probing a key: fresh hit, stale-but-present, or nothing at all.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Lookup<V> {
    /// Present and within its TTL.
    Fresh(V),
    /// Present but past its TTL.
    Stale(V),
    /// No entry for the key.
    Absent,
}

impl<V> Lookup<V> {
    /// The value if fresh, otherwise `None`.
    pub fn fresh(self) -> Option<V> {
        match self {
            Lookup::Fresh(value) => Some(value),
            _ => None,
        }
    }

    /// Whether the entry is present but expired.
    pub fn is_stale(&self) -> bool {
        matches!(self, Lookup::Stale(_))
    }
}

/// Key/value store where every entry expires on its own clock.
pub struct TimeCache<K, V> {
    entries: RwLock<HashMap<K, Entry<V>>>,
    default_ttl: Duration,
}

impl<K, V> TimeCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    /// Creates a cache whose plain `put` uses `default_ttl`.
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// The TTL applied by [`put`](TimeCache::put) (and by tier backfill).
    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    /// Returns the value if present and not expired.
    pub async fn get(&self, key: &K) -> Option<V> {
        self.lookup(key).await.fresh()
    }

    /// Probes the key, distinguishing fresh, stale, and absent.
    pub async fn lookup(&self, key: &K) -> Lookup<V> {
        let now = Instant::now();
        let entries = self.entries.read().await;
        match entries.get(key) {
            Some(entry) if entry.is_fresh(now) => Lookup::Fresh(entry.value.clone()),
            Some(entry) => Lookup::Stale(entry.value.clone()),
            None => Lookup::Absent,
        }
    }

    /// Stores `value` under the cache's default TTL, resetting the
    /// timestamp of any existing entry.
    pub async fn put(&self, key: K, value: V) {
        self.put_with_ttl(key, value, self.default_ttl).await;
    }

    /// Stores `value` with an explicit TTL.
    pub async fn put_with_ttl(&self, key: K, value: V, ttl: Duration) {
        let entry = Entry {
            value,
            created_at: Instant::now(),
            ttl,
        };
        self.entries.write().await.insert(key, entry);
    }

    /// Removes the entry (fresh or stale). Returns whether one existed.
    pub async fn invalidate(&self, key: &K) -> bool {
        self.entries.write().await.remove(key).is_some()
    }

    /// Drops every expired entry, returning how many were removed.
    ///
    /// Call deliberately; stale fallback only works for entries that have
    /// not been purged.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, entry| entry.is_fresh(now));
        before - entries.len()
    }

    /// Number of entries, fresh and stale.
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    /// Whether the cache holds no entries at all.
    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
