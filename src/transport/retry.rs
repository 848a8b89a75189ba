//! Attempt budget and backoff schedule for outbound sends.

use std::time::Duration;

/// How many times a send is attempted and how long to wait in between.
///
/// The wait after failed attempt `n` (1-indexed) is
/// `min(base_delay * 2^(n-1), max_delay)`. No jitter is added, so two sends
/// that fail the same way back off identically.
///
/// # Example
///
/// ```
/// use bmp_gateway::transport::RetryPolicy;
/// use std::time::Duration;
///
/// let policy = RetryPolicy::default();
/// assert_eq!(policy.delay_after(1), Duration::from_secs(1));
/// assert_eq!(policy.delay_after(2), Duration::from_secs(2));
/// assert_eq!(policy.delay_after(6), Duration::from_secs(5));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts, the first one included. Never below 1.
    pub max_attempts: u32,
    /// Wait after the first failed attempt.
    pub base_delay: Duration,
    /// Ceiling for any single wait.
    pub max_delay: Duration,
}

impl RetryPolicy {
    /// Attempts made when nothing is configured.
    pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;

    /// Smallest accepted attempt budget.
    pub const MIN_MAX_ATTEMPTS: u32 = 1;

    /// Wait after the first failure.
    pub const BASE_DELAY: Duration = Duration::from_secs(1);

    /// Longest wait between two attempts.
    pub const MAX_DELAY: Duration = Duration::from_secs(5);

    /// Creates the platform's default policy: 3 attempts, 1 s doubling up to 5 s.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: Self::DEFAULT_MAX_ATTEMPTS,
            base_delay: Self::BASE_DELAY,
            max_delay: Self::MAX_DELAY,
        }
    }

    /// Sets the attempt budget; values below 1 are raised to 1.
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = if max_attempts < Self::MIN_MAX_ATTEMPTS {
            Self::MIN_MAX_ATTEMPTS
        } else {
            max_attempts
        };
        self
    }

    /// Sets the first wait and the ceiling.
    #[must_use]
    pub const fn with_delays(mut self, base_delay: Duration, max_delay: Duration) -> Self {
        self.base_delay = base_delay;
        self.max_delay = max_delay;
        self
    }

    /// Wait before the attempt that follows failed attempt `attempt` (1-indexed).
    #[must_use]
    pub fn delay_after(&self, attempt: u32) -> Duration {
        let doublings = attempt.saturating_sub(1);
        let factor = 1u32.checked_shl(doublings).unwrap_or(u32::MAX);

        self.base_delay
            .checked_mul(factor)
            .map_or(self.max_delay, |delay| delay.min(self.max_delay))
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}
