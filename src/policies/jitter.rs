//! # Jitter for backoff delays.
//!
//! When many callers retry on the same schedule they hammer the upstream in
//! lockstep. [`JitterPolicy`] randomizes each delay to spread the load:
//!
//! - [`JitterPolicy::None`] — exact delays, fully deterministic
//! - [`JitterPolicy::Full`] — random in `[0, delay]`
//! - [`JitterPolicy::Equal`] — `delay/2 + random[0, delay/2]`
//!
//! Jitter is applied to the clamped base delay only; the randomized result
//! is never used to derive the next attempt's base.

use rand::Rng;
use std::time::Duration;

/// Randomization strategy for retry delays.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum JitterPolicy {
    /// Use the exact backoff delay. Deterministic; the right choice when a
    /// single caller retries or when tests need exact timing.
    #[default]
    None,

    /// Random delay in `[0, delay]`. Maximum spreading; can shorten delays
    /// down to zero.
    Full,

    /// `delay/2` plus random in `[0, delay/2]`. Keeps at least half of the
    /// scheduled delay while still decorrelating callers.
    Equal,
}

impl JitterPolicy {
    /// Applies this policy to the given delay.
    pub fn apply(&self, delay: Duration) -> Duration {
        match self {
            JitterPolicy::None => delay,
            JitterPolicy::Full => full_jitter(delay),
            JitterPolicy::Equal => equal_jitter(delay),
        }
    }
}

/// Random in `[0, delay]`.
fn full_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    Duration::from_millis(rand::rng().random_range(0..=ms))
}

/// `delay/2 + random[0, delay/2]`.
fn equal_jitter(delay: Duration) -> Duration {
    let ms = delay.as_millis() as u64;
    if ms == 0 {
        return Duration::ZERO;
    }
    let half = ms / 2;
    let spread = if half == 0 {
        0
    } else {
        rand::rng().random_range(0..=half)
    };
    Duration::from_millis(half + spread)
}
