//! # Probe outcomes.
//!
//! A wait probe may express readiness as a plain `bool` or as an
//! `Option<T>` carrying the value that became available. [`Ready`] unifies
//! the two so [`Waiter::wait`](crate::Waiter::wait) can hand the final,
//! satisfied outcome back to the caller instead of collapsing it to `()`.

/// Outcome of one probe evaluation.
///
/// `bool` is ready when `true`; `Option<T>` is ready when `Some`.
pub trait Ready {
    /// Whether this outcome satisfies the wait.
    fn is_ready(&self) -> bool;
}

impl Ready for bool {
    fn is_ready(&self) -> bool {
        *self
    }
}

impl<T> Ready for Option<T> {
    fn is_ready(&self) -> bool {
        self.is_some()
    }
}
