//! Retry policy for generation attempts.

use std::time::Duration;

/// Bounded retry with linear backoff.
///
/// Attempt `i` (0-indexed) that fails waits `initial_delay * (i + 1)` before
/// the next attempt, capped at `max_delay`. There is no wait after the last
/// attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts per request (default: 3)
    pub max_attempts: usize,
    /// Base delay in milliseconds (default: 1000)
    pub initial_delay_ms: u64,
    /// Upper bound for any single wait, including provider `retry-after` (default: 30000)
    pub max_delay_ms: u64,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            initial_delay_ms: 1000,
            max_delay_ms: 30_000,
        }
    }
}

impl RetryPolicy {
    pub fn new(max_attempts: usize, initial_delay_ms: u64, max_delay_ms: u64) -> Self {
        Self {
            max_attempts,
            initial_delay_ms,
            max_delay_ms,
        }
    }

    /// Policy that retries without sleeping. Used by tests and dry runs.
    pub fn immediate(max_attempts: usize) -> Self {
        Self::new(max_attempts, 0, 0)
    }

    /// Attempts actually made; never zero.
    pub fn attempts(&self) -> usize {
        self.max_attempts.max(1)
    }

    /// Delay after failed attempt `attempt` (0-indexed).
    pub fn delay_for_attempt(&self, attempt: usize) -> Duration {
        let delay_ms = self
            .initial_delay_ms
            .saturating_mul(attempt as u64 + 1)
            .min(self.max_delay_ms);
        Duration::from_millis(delay_ms)
    }

    /// Clamp a provider-suggested wait to the policy maximum.
    pub fn clamp(&self, wait: Duration) -> Duration {
        wait.min(Duration::from_millis(self.max_delay_ms))
    }

    /// Whether another attempt follows attempt `attempt` (0-indexed).
    pub fn has_next(&self, attempt: usize) -> bool {
        attempt + 1 < self.attempts()
    }
}
