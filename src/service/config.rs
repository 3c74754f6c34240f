//! Service configuration types.

use crate::types::SearchFilter;
use isocountry::CountryCode;

/// Default number of extra rounds after the first one.
///
/// Bounds backfill against a possibly-exhausted market: with the default,
/// an acquisition runs at most four search/purchase rounds.
pub const DEFAULT_MAX_RETRY_ROUNDS: u32 = 3;

/// Configuration for the acquisition service.
///
/// Controls where numbers are searched, what the default filter looks like,
/// and how many backfill rounds may run when purchases are lost to racing
/// buyers.
#[derive(Debug, Clone)]
pub struct AcquireServiceConfig {
    /// Country whose local numbers are searched.
    pub country: CountryCode,
    /// Filter applied when the caller supplies none.
    pub default_filter: SearchFilter,
    /// Extra search/purchase rounds allowed after the initial one.
    pub max_retry_rounds: u32,
}

impl Default for AcquireServiceConfig {
    fn default() -> Self {
        Self {
            country: CountryCode::USA,
            default_filter: SearchFilter::default(),
            max_retry_rounds: DEFAULT_MAX_RETRY_ROUNDS,
        }
    }
}

impl AcquireServiceConfig {
    /// Create a new builder for AcquireServiceConfig.
    ///
    /// # Example
    ///
    /// ```rust
    /// use number_acquirer::AcquireServiceConfig;
    /// use isocountry::CountryCode;
    ///
    /// let config = AcquireServiceConfig::builder()
    ///     .country(CountryCode::CAN)
    ///     .max_retry_rounds(1)
    ///     .build();
    ///
    /// assert_eq!(config.country, CountryCode::CAN);
    /// assert_eq!(config.max_retry_rounds, 1);
    /// ```
    pub fn builder() -> AcquireServiceConfigBuilder {
        AcquireServiceConfigBuilder::default()
    }

    /// Create a new config with a custom country.
    pub fn with_country(mut self, country: CountryCode) -> Self {
        self.country = country;
        self
    }

    /// Create a new config with a custom default filter.
    pub fn with_default_filter(mut self, filter: SearchFilter) -> Self {
        self.default_filter = filter;
        self
    }

    /// Create a new config with a custom retry-round budget.
    pub fn with_max_retry_rounds(mut self, rounds: u32) -> Self {
        self.max_retry_rounds = rounds;
        self
    }
}

/// Builder for AcquireServiceConfig.
///
/// Provides a fluent API for configuring the acquisition service.
#[derive(Debug, Clone)]
pub struct AcquireServiceConfigBuilder {
    pub(crate) country: CountryCode,
    pub(crate) default_filter: SearchFilter,
    pub(crate) max_retry_rounds: u32,
}

impl Default for AcquireServiceConfigBuilder {
    fn default() -> Self {
        let config = AcquireServiceConfig::default();
        Self {
            country: config.country,
            default_filter: config.default_filter,
            max_retry_rounds: config.max_retry_rounds,
        }
    }
}

impl AcquireServiceConfigBuilder {
    /// Create a new builder with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the country whose local numbers are searched.
    ///
    /// Default: US
    pub fn country(mut self, country: CountryCode) -> Self {
        self.country = country;
        self
    }

    /// Set the filter applied when the caller supplies none.
    pub fn default_filter(mut self, filter: SearchFilter) -> Self {
        self.default_filter = filter;
        self
    }

    /// Set the extra rounds allowed after the initial one.
    ///
    /// Default: 3
    pub fn max_retry_rounds(mut self, rounds: u32) -> Self {
        self.max_retry_rounds = rounds;
        self
    }

    /// Build the AcquireServiceConfig.
    pub fn build(self) -> AcquireServiceConfig {
        AcquireServiceConfig {
            country: self.country,
            default_filter: self.default_filter,
            max_retry_rounds: self.max_retry_rounds,
        }
    }
}
