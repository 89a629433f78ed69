//! Retry policy for cart persistence writes.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Strategy for retrying failed storage writes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PersistRetry {
    /// Maximum number of attempts, including the first one.
    pub max_attempts: u32,
    /// Base delay between attempts in milliseconds.
    pub base_delay_ms: u64,
    /// Whether to use exponential backoff.
    pub exponential_backoff: bool,
    /// Maximum delay between attempts in milliseconds.
    pub max_delay_ms: u64,
}

impl PersistRetry {
    /// Creates a retry policy with the given attempt budget.
    pub fn new(max_attempts: u32) -> Self {
        Self {
            max_attempts,
            base_delay_ms: 50,
            exponential_backoff: true,
            max_delay_ms: 1_000,
        }
    }

    /// Disables retries.
    pub fn no_retry() -> Self {
        Self {
            max_attempts: 1,
            base_delay_ms: 0,
            exponential_backoff: false,
            max_delay_ms: 0,
        }
    }

    /// Sets the base delay.
    #[must_use]
    pub fn with_base_delay(mut self, ms: u64) -> Self {
        self.base_delay_ms = ms;
        self
    }

    /// Enables or disables exponential backoff.
    #[must_use]
    pub fn with_exponential_backoff(mut self, enabled: bool) -> Self {
        self.exponential_backoff = enabled;
        self
    }

    /// Calculates the delay after a failed attempt (1-based).
    pub fn delay_for_attempt(&self, attempt: u32) -> Duration {
        let delay = if self.exponential_backoff {
            let factor = 2u64.saturating_pow(attempt.saturating_sub(1));
            self.base_delay_ms.saturating_mul(factor)
        } else {
            self.base_delay_ms
        };

        Duration::from_millis(delay.min(self.max_delay_ms))
    }

    /// Returns true if another attempt is allowed after `attempt` failures.
    pub fn allows_another(&self, attempt: u32) -> bool {
        attempt < self.max_attempts
    }
}

impl Default for PersistRetry {
    fn default() -> Self {
        Self::new(3)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exponential_backoff() {
        let retry = PersistRetry::default();

        assert_eq!(retry.delay_for_attempt(1), Duration::from_millis(50));
        assert_eq!(retry.delay_for_attempt(2), Duration::from_millis(100));
        assert_eq!(retry.delay_for_attempt(3), Duration::from_millis(200));
    }

    #[test]
    fn test_max_delay_cap() {
        let retry = PersistRetry::new(10).with_base_delay(300);
        assert_eq!(retry.delay_for_attempt(5), Duration::from_millis(1_000));
        assert_eq!(retry.delay_for_attempt(64), Duration::from_millis(1_000));
    }

    #[test]
    fn test_linear_delay() {
        let retry = PersistRetry::new(3).with_exponential_backoff(false);
        assert_eq!(retry.delay_for_attempt(3), Duration::from_millis(50));
    }

    #[test]
    fn test_attempt_budget() {
        let retry = PersistRetry::no_retry();
        assert!(!retry.allows_another(1));

        let retry = PersistRetry::default();
        assert!(retry.allows_another(2));
        assert!(!retry.allows_another(3));
    }
}
