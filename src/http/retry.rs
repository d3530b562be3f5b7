//! Retry budget and exponential backoff timing for remote calls.

use async_trait::async_trait;
use std::time::Duration;

/// Default number of attempts per logical operation (including the first).
pub const MAX_ATTEMPTS: usize = 3;

/// Base unit of the exponential backoff in milliseconds.
pub const BASE_DELAY_MS: u64 = 1000;

// Keeps `1 << attempt` well inside u32.
const MAX_BACKOFF_EXPONENT: usize = 16;

/// How many times an operation may be attempted and how long to wait in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    pub base_delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: MAX_ATTEMPTS,
            base_delay: Duration::from_millis(BASE_DELAY_MS),
        }
    }
}

impl RetryPolicy {
    /// Creates a policy. A budget of zero attempts is raised to one.
    pub fn new(max_attempts: usize, base_delay: Duration) -> Self {
        Self {
            max_attempts: max_attempts.max(1),
            base_delay,
        }
    }

    /// Whether another attempt may follow the failed attempt `attempt` (1-based).
    pub fn should_retry(&self, attempt: usize) -> bool {
        attempt < self.max_attempts
    }

    /// Delay to wait after the failed attempt `attempt` (1-based): `2^attempt * base`.
    ///
    /// With the default base this gives 2s, 4s, 8s, ...
    pub fn delay_after(&self, attempt: usize) -> Duration {
        let exponent = attempt.min(MAX_BACKOFF_EXPONENT) as u32;
        self.base_delay.saturating_mul(1u32 << exponent)
    }
}

/// Suspends the caller between attempts.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Sleeper: Send + Sync {
    async fn sleep(&self, duration: Duration);
}

/// Sleeps on the tokio timer.
#[derive(Debug, Clone, Copy, Default)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.base_delay, Duration::from_millis(1000));
    }

    #[test]
    fn test_delay_doubles_per_attempt() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.delay_after(1), Duration::from_millis(2000));
        assert_eq!(policy.delay_after(2), Duration::from_millis(4000));
        assert_eq!(policy.delay_after(3), Duration::from_millis(8000));
    }

    #[test]
    fn test_delay_is_monotonic() {
        let policy = RetryPolicy::new(40, Duration::from_millis(1000));
        let delays: Vec<Duration> = (1..40).map(|a| policy.delay_after(a)).collect();
        assert!(delays.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn test_delay_uses_custom_base() {
        let policy = RetryPolicy::new(3, Duration::from_millis(5));
        assert_eq!(policy.delay_after(1), Duration::from_millis(10));
        assert_eq!(policy.delay_after(2), Duration::from_millis(20));
    }

    #[test]
    fn test_should_retry_respects_budget() {
        let policy = RetryPolicy::new(3, Duration::ZERO);
        assert!(policy.should_retry(1));
        assert!(policy.should_retry(2));
        assert!(!policy.should_retry(3));
    }

    #[test]
    fn test_zero_attempts_is_raised_to_one() {
        let policy = RetryPolicy::new(0, Duration::ZERO);
        assert_eq!(policy.max_attempts, 1);
        assert!(!policy.should_retry(1));
    }

    #[tokio::test]
    async fn test_tokio_sleeper_waits() {
        let start = std::time::Instant::now();
        TokioSleeper.sleep(Duration::from_millis(20)).await;
        assert!(start.elapsed() >= Duration::from_millis(20));
    }
}
