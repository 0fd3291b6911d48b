//! Retry policy and the injectable delay capability.

use std::time::Duration;

use async_trait::async_trait;

/// Bounded retry schedule for rate-limited requests.
///
/// The delay doubles per attempt: `base_delay * 2^attempt`, where `attempt`
/// is the 0-based index of the attempt that just failed. With the defaults
/// this gives 1000ms after the first 429 and 2000ms after the second; the
/// third 429 exhausts the budget with no further sleep.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total number of requests allowed per call, including the first.
    pub max_attempts: u32,
    /// Delay before the first retry.
    pub base_delay: Duration,
}

impl RetryPolicy {
    /// Returns the backoff delay after the given failed attempt (0-based).
    pub fn delay_for(&self, attempt: u32) -> Duration {
        self.base_delay * 2u32.saturating_pow(attempt)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(1000),
        }
    }
}

/// Async delay capability, injected so tests can observe backoff without
/// actually sleeping.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Suspends the current task for the given duration.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}
