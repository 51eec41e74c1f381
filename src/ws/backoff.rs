//! Reconnect backoff
//!
//! Exponential delay between reconnect attempts: start at `initial`,
//! double per failure, cap at `max`. Reset once a session delivers data so
//! a single drop after hours of streaming reconnects quickly.

use std::time::Duration;

/// Lower bound for every reconnect delay
pub const MIN_RECONNECT_DELAY: Duration = Duration::from_millis(1);

#[derive(Debug, Clone)]
pub struct ReconnectBackoff {
    initial: Duration,
    max: Duration,
    current: Duration,
    attempts: u64,
}

impl ReconnectBackoff {
    pub fn new(initial: Duration, max: Duration) -> Self {
        let max = max.max(MIN_RECONNECT_DELAY);
        let initial = initial.clamp(MIN_RECONNECT_DELAY, max);
        Self {
            initial,
            max,
            current: initial,
            attempts: 0,
        }
    }

    /// Delay to wait before the next attempt
    pub fn next_delay(&mut self) -> Duration {
        let delay = self.current;
        self.current = std::cmp::min(self.current.saturating_mul(2), self.max);
        self.attempts += 1;
        delay
    }

    /// Reset after a successful session
    pub fn reset(&mut self) {
        self.current = self.initial;
        self.attempts = 0;
    }

    /// Consecutive attempts since the last reset
    #[inline]
    pub fn attempts(&self) -> u64 {
        self.attempts
    }
}

impl Default for ReconnectBackoff {
    fn default() -> Self {
        Self::new(Duration::from_secs(1), Duration::from_secs(60))
    }
}
