//! Injected logging seam.
//!
//! The toolkit never logs on its own; components that emit periodic notices
//! (the waiter's "still waiting" message, the retry helper's per-attempt
//! message) call an injected [`Log`] trait object with a [`LogLevel`] and a
//! message. Wire it to whatever logging backend the host application uses.
//!
//! [`NullLog`] discards everything and is the default. A simple
//! [`StdoutLog`] is available behind the `logging` feature for demos.

use async_trait::async_trait;

/// Severity attached to a message handed to [`Log`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    /// Diagnostic chatter (default for periodic wait notices).
    Debug,
    /// Normal progress information.
    Info,
    /// Something is taking longer than expected.
    Warn,
    /// A failure worth surfacing.
    Error,
}

impl LogLevel {
    /// Returns a short stable label (snake_case) for use in log output.
    pub fn as_label(&self) -> &'static str {
        match self {
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}

/// # Logging collaborator.
///
/// Accepts a level and a message; everything else (formatting, filtering,
/// routing) is the implementor's business.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use steadfast::{Log, LogLevel};
///
/// struct Stderr;
///
/// #[async_trait]
/// impl Log for Stderr {
///     async fn log(&self, level: LogLevel, message: &str) {
///         eprintln!("{}: {}", level.as_label(), message);
///     }
/// }
/// ```
#[async_trait]
pub trait Log: Send + Sync {
    /// Records one message at the given level.
    async fn log(&self, level: LogLevel, message: &str);
}

/// Logger that discards every message. Default collaborator.
pub struct NullLog;

#[async_trait]
impl Log for NullLog {
    async fn log(&self, _level: LogLevel, _message: &str) {}
}

/// Logger that prints to stdout.
///
/// Enabled via the `logging` feature. Useful for demos and debugging.
#[cfg(feature = "logging")]
pub struct StdoutLog;

#[cfg(feature = "logging")]
#[async_trait]
impl Log for StdoutLog {
    async fn log(&self, level: LogLevel, message: &str) {
        println!("[{}] {}", level.as_label(), message);
    }
}
