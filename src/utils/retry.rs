//! Retry configuration for transport-level retries.

use backon::ExponentialBuilder;
use std::time::Duration;

/// Configuration for transport-level retry behavior.
///
/// This governs re-issuing a single provider call after a transient failure.
/// It is unrelated to the acquisition loop's round budget, which bounds how
/// often the search/purchase sweep restarts when numbers were lost to racing
/// buyers.
///
/// ```rust
/// use number_acquirer::RetryConfig;
/// use std::time::Duration;
///
/// let config = RetryConfig::default()
///     .with_min_delay(Duration::from_millis(500))
///     .with_max_delay(Duration::from_secs(60))
///     .with_factor(1.5)
///     .with_max_retries(5)
///     .with_jitter(true);
/// ```
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Minimum delay between retries (default: 1 second).
    pub min_delay: Duration,
    /// Maximum delay between retries (default: 30 seconds).
    pub max_delay: Duration,
    /// Exponential backoff factor (default: 2.0).
    pub factor: f32,
    /// Maximum number of retry attempts (default: 3).
    pub max_retries: usize,
    /// Whether to add random jitter to each delay (default: false).
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            min_delay: Duration::from_secs(1),
            max_delay: Duration::from_secs(30),
            factor: 2.0,
            max_retries: 3,
            jitter: false,
        }
    }
}

impl RetryConfig {
    /// Set the minimum delay between retries.
    pub fn with_min_delay(mut self, delay: Duration) -> Self {
        self.min_delay = delay;
        self
    }

    /// Set the maximum delay between retries.
    pub fn with_max_delay(mut self, delay: Duration) -> Self {
        self.max_delay = delay;
        self
    }

    /// Set the exponential backoff factor.
    pub fn with_factor(mut self, factor: f32) -> Self {
        self.factor = factor;
        self
    }

    /// Set the maximum number of retry attempts.
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Enable or disable random jitter on retry delays.
    pub fn with_jitter(mut self, jitter: bool) -> Self {
        self.jitter = jitter;
        self
    }

    /// Build a backoff strategy from this configuration.
    pub fn build_strategy(&self) -> ExponentialBuilder {
        let builder = ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(self.factor)
            .with_max_times(self.max_retries);

        if self.jitter {
            builder.with_jitter()
        } else {
            builder
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retry_config_default() {
        let config = RetryConfig::default();
        assert_eq!(config.min_delay, Duration::from_secs(1));
        assert_eq!(config.max_delay, Duration::from_secs(30));
        assert_eq!(config.factor, 2.0);
        assert_eq!(config.max_retries, 3);
        assert!(!config.jitter);
    }

    #[test]
    fn test_retry_config_builders() {
        let config = RetryConfig::default()
            .with_min_delay(Duration::from_millis(100))
            .with_max_delay(Duration::from_secs(5))
            .with_factor(1.5)
            .with_max_retries(7)
            .with_jitter(true);

        assert_eq!(config.min_delay, Duration::from_millis(100));
        assert_eq!(config.max_delay, Duration::from_secs(5));
        assert_eq!(config.factor, 1.5);
        assert_eq!(config.max_retries, 7);
        assert!(config.jitter);
    }
}
