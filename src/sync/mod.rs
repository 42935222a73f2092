//! Synchronization primitives.
//!
//! - [`Singleton`] - lazily-constructed shared resource behind counted
//!   scoped acquisition
//! - [`SingletonGuard`] - RAII handle; drop is the release

mod singleton;

pub use singleton::{Singleton, SingletonGuard};
