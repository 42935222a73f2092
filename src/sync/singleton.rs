//! # Synchronized lazy singleton.
//!
//! [`Singleton`] guards one lazily-constructed shared resource. The first
//! successful [`acquire`](Singleton::acquire) runs the async constructor;
//! every later or concurrent acquisition observes the already-constructed
//! resource without reconstruction.
//!
//! Scoped acquisition is expressed as an RAII [`SingletonGuard`]: the guard
//! is the acquire, its `Drop` is the release. Ownership bookkeeping is a
//! plain counter reconciled on every exit path — early return, `?`, panic
//! unwind — so any mix of failing and succeeding acquisitions leaves
//! [`held`](Singleton::held) at 0 once all guards are gone, and no lock
//! stays held behind them.
//!
//! ## Rules
//! - Construction happens at most once; the internal lock is held only for
//!   the construct-or-check step, never while guards are alive.
//! - A failed construction leaves the cell empty (a later `acquire` retries)
//!   and counts nothing.
//! - After construction, `acquire` takes no lock at all, so a fresh
//!   `acquire` cannot deadlock behind unwound acquisitions.
//!
//! ## Example
//! ```rust
//! use steadfast::Singleton;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let pool = Singleton::new(|| async { Ok("connected".to_string()) });
//!
//! let guard = pool.acquire().await.unwrap();
//! assert_eq!(&*guard, "connected");
//! assert_eq!(pool.held(), 1);
//! drop(guard);
//! assert_eq!(pool.held(), 0);
//! # }
//! ```

use std::future::Future;
use std::ops::Deref;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tokio::sync::OnceCell;

use crate::error::{BoxError, SingletonError};

type InitFuture<T> = Pin<Box<dyn Future<Output = Result<T, BoxError>> + Send>>;
type InitFn<T> = Box<dyn Fn() -> InitFuture<T> + Send + Sync>;

/// One lazily-constructed shared resource behind counted scoped acquisition.
pub struct Singleton<T> {
    cell: OnceCell<Arc<T>>,
    init: InitFn<T>,
    held: AtomicUsize,
}

impl<T: Send + Sync + 'static> Singleton<T> {
    /// Creates a singleton around an async, fallible constructor.
    ///
    /// The constructor runs at most once per successful initialization; it
    /// is retried by a later `acquire` only if it failed.
    pub fn new<F, Fut>(init: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, BoxError>> + Send + 'static,
    {
        Self {
            cell: OnceCell::new(),
            init: Box::new(move || Box::pin(init())),
            held: AtomicUsize::new(0),
        }
    }

    /// Acquires the resource, constructing it on the first success.
    ///
    /// Returns an RAII guard whose `Drop` releases the acquisition. On
    /// constructor failure nothing is counted and the cell stays empty, so
    /// the error reconciles itself: no release is owed for a failed entry.
    pub async fn acquire(&self) -> Result<SingletonGuard<'_, T>, SingletonError> {
        let resource = self
            .cell
            .get_or_try_init(|| async {
                (self.init)()
                    .await
                    .map(Arc::new)
                    .map_err(|source| SingletonError::Init { source })
            })
            .await?
            .clone();

        self.held.fetch_add(1, Ordering::SeqCst);
        Ok(SingletonGuard {
            owner: self,
            resource,
        })
    }

    /// Number of currently live guards.
    pub fn held(&self) -> usize {
        self.held.load(Ordering::SeqCst)
    }

    /// Whether the resource has been constructed.
    pub fn is_initialized(&self) -> bool {
        self.cell.initialized()
    }
}

impl<T> std::fmt::Debug for Singleton<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Singleton")
            .field("initialized", &self.cell.initialized())
            .field("held", &self.held.load(Ordering::SeqCst))
            .finish()
    }
}

/// Scoped acquisition of a [`Singleton`] resource.
///
/// Dereferences to the resource; dropping it is the matching release.
pub struct SingletonGuard<'a, T> {
    owner: &'a Singleton<T>,
    resource: Arc<T>,
}

impl<T> std::fmt::Debug for SingletonGuard<'_, T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SingletonGuard").finish_non_exhaustive()
    }
}

impl<T> SingletonGuard<'_, T> {
    /// A shared handle to the resource that outlives the guard.
    ///
    /// The handle keeps the resource alive but does not count as an
    /// acquisition.
    pub fn shared(&self) -> Arc<T> {
        self.resource.clone()
    }
}

impl<T> Deref for SingletonGuard<'_, T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.resource
    }
}

impl<T> Drop for SingletonGuard<'_, T> {
    fn drop(&mut self) {
        self.owner.held.fetch_sub(1, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use futures::future;

    #[tokio::test]
    async fn test_constructs_once_across_concurrent_acquires() {
        let constructions = Arc::new(AtomicUsize::new(0));
        let counted = constructions.clone();
        let singleton = Arc::new(Singleton::new(move || {
            let counted = counted.clone();
            async move {
                counted.fetch_add(1, Ordering::SeqCst);
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(vec![1u8, 2, 3])
            }
        }));

        let tasks: Vec<_> = (0..10)
            .map(|_| {
                let s = singleton.clone();
                tokio::spawn(async move {
                    let guard = s.acquire().await.unwrap();
                    guard.shared()
                })
            })
            .collect();

        let handles: Vec<Arc<Vec<u8>>> = future::join_all(tasks)
            .await
            .into_iter()
            .map(|r| r.unwrap())
            .collect();

        assert_eq!(constructions.load(Ordering::SeqCst), 1, "constructed once");
        for h in &handles[1..] {
            assert!(Arc::ptr_eq(&handles[0], h), "all observe the same resource");
        }
        assert_eq!(singleton.held(), 0, "all guards released");
    }

    #[tokio::test]
    async fn test_failed_construction_is_retried_and_counts_nothing() {
        let attempts = Arc::new(AtomicUsize::new(0));
        let counted = attempts.clone();
        let singleton = Singleton::new(move || {
            let counted = counted.clone();
            async move {
                if counted.fetch_add(1, Ordering::SeqCst) == 0 {
                    Err("backend not up yet".into())
                } else {
                    Ok(7u32)
                }
            }
        });

        let err = singleton.acquire().await.unwrap_err();
        assert_eq!(err.as_label(), "singleton_init");
        assert_eq!(singleton.held(), 0);
        assert!(!singleton.is_initialized());

        let guard = singleton.acquire().await.unwrap();
        assert_eq!(*guard, 7);
        assert_eq!(attempts.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_partial_failures_reconcile_to_zero_without_deadlock() {
        let singleton = Arc::new(Singleton::new(|| async { Ok(0u64) }));

        let tasks: Vec<_> = (0..10)
            .map(|i| {
                let s = singleton.clone();
                tokio::spawn(async move {
                    let _guard = s.acquire().await.unwrap();
                    // Several acquirers blow up mid-scope; their guards must
                    // still release during unwind.
                    if i % 3 == 0 {
                        panic!("entry failed for task {i}");
                    }
                    tokio::time::sleep(Duration::from_millis(2)).await;
                })
            })
            .collect();

        let results = future::join_all(tasks).await;
        assert_eq!(results.iter().filter(|r| r.is_err()).count(), 4);

        assert_eq!(singleton.held(), 0, "ownership fully reconciled");

        // A fresh scoped acquisition must not block behind the wreckage.
        let fresh = tokio::time::timeout(Duration::from_millis(100), singleton.acquire())
            .await
            .expect("acquire deadlocked")
            .unwrap();
        assert_eq!(*fresh, 0);
    }

    #[tokio::test]
    async fn test_nested_guards_count_and_release_in_any_order() {
        let singleton = Singleton::new(|| async { Ok("shared".to_string()) });

        let a = singleton.acquire().await.unwrap();
        let b = singleton.acquire().await.unwrap();
        let c = singleton.acquire().await.unwrap();
        assert_eq!(singleton.held(), 3);

        drop(b);
        assert_eq!(singleton.held(), 2);
        drop(a);
        drop(c);
        assert_eq!(singleton.held(), 0);
    }
}
