use std::time::Duration;

use serde::{Deserialize, Serialize};

/// When to retry a failed refresh.
///
/// Retries are only armed after a failure. With `max_attempts == 0` (the
/// default) a failed refresh waits for the next manual refresh.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryPolicy {
    pub max_attempts: u32,
    pub initial_delay_secs: u64,
    pub max_delay_secs: u64,
    pub multiplier: u32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 0,
            initial_delay_secs: 60,
            max_delay_secs: 3600,
            multiplier: 2,
        }
    }
}

impl RetryPolicy {
    pub fn disabled() -> Self {
        Self::default()
    }

    /// Retry up to `max_attempts` times, starting at `initial_delay`.
    pub fn exponential(max_attempts: u32, initial_delay: Duration) -> Self {
        Self {
            max_attempts,
            initial_delay_secs: initial_delay.as_secs(),
            ..Self::default()
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.max_attempts > 0
    }

    /// Delay before retry number `attempt` (1-based), or `None` once the
    /// attempts are used up.
    pub fn delay_for(&self, attempt: u32) -> Option<Duration> {
        if attempt == 0 || attempt > self.max_attempts {
            return None;
        }
        let factor = u64::from(self.multiplier)
            .checked_pow(attempt - 1)
            .unwrap_or(u64::MAX);
        let secs = self
            .initial_delay_secs
            .saturating_mul(factor)
            .min(self.max_delay_secs);
        Some(Duration::from_secs(secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_disabled_never_retries() {
        let policy = RetryPolicy::disabled();
        assert!(!policy.is_enabled());
        assert_eq!(policy.delay_for(1), None);
    }

    #[test]
    fn test_exponential_delays_are_capped() {
        let policy = RetryPolicy {
            max_attempts: 5,
            initial_delay_secs: 10,
            max_delay_secs: 60,
            multiplier: 2,
        };
        let delays: Vec<Option<u64>> = (0..=6)
            .map(|attempt| policy.delay_for(attempt).map(|d| d.as_secs()))
            .collect();
        assert_eq!(
            delays,
            vec![None, Some(10), Some(20), Some(40), Some(60), Some(60), None]
        );
    }

    #[test]
    fn test_large_attempts_saturate() {
        let policy = RetryPolicy {
            max_attempts: u32::MAX,
            initial_delay_secs: 1,
            max_delay_secs: 300,
            multiplier: 10,
        };
        assert_eq!(policy.delay_for(200), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let policy: RetryPolicy = serde_json::from_str(r#"{"max_attempts": 3}"#).unwrap();
        assert_eq!(policy.max_attempts, 3);
        assert_eq!(policy.initial_delay_secs, 60);
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(120)));
    }

    #[test]
    fn test_exponential_constructor() {
        let policy = RetryPolicy::exponential(2, Duration::from_secs(5));
        assert!(policy.is_enabled());
        assert_eq!(policy.delay_for(1), Some(Duration::from_secs(5)));
        assert_eq!(policy.delay_for(2), Some(Duration::from_secs(10)));
        assert_eq!(policy.delay_for(3), None);
    }
}
