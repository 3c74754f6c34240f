//! Retryable provider wrapper.

use super::traits::NumberProvider;
use crate::errors::UnavailableError;
use crate::types::{CandidateNumber, PhoneNumber, PurchasedNumber, SearchFilter};
use crate::utils::retry::RetryConfig;
use backon::Retryable;
use isocountry::CountryCode;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Callback type for retry notifications.
///
/// Invoked each time a transient failure triggers a retry, with the error
/// that caused it and the delay until the next attempt.
pub type OnRetryCallback<E> = Arc<dyn Fn(&E, Duration) + Send + Sync>;

/// Wrapper that adds automatic transport-level retry to any provider.
///
/// This wrapper implements the same [`NumberProvider`] trait but re-issues
/// calls that fail with an error classified `is_retryable()` (network
/// timeouts, rate limits, provider 5xx), with exponential backoff.
///
/// Purchase failures classified `is_unavailable()` are never retried here:
/// the number is gone, and re-sending the same purchase cannot bring it
/// back. That condition belongs to the acquisition loop, which searches for
/// replacement candidates instead.
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::{NumberProvider, RetryableNumberProvider, RetryConfig};
/// use number_acquirer::twilio::TwilioProvider;
/// use std::time::Duration;
///
/// let base_provider = TwilioProvider::new(client);
///
/// // With default retry config
/// let provider = RetryableNumberProvider::new(base_provider.clone());
///
/// // With custom retry config
/// let custom_config = RetryConfig::default()
///     .with_max_retries(5)
///     .with_min_delay(Duration::from_millis(500));
/// let provider = RetryableNumberProvider::with_config(base_provider, custom_config);
/// ```
pub struct RetryableNumberProvider<P: NumberProvider> {
    inner: Arc<P>,
    retry_config: RetryConfig,
    on_retry: Option<OnRetryCallback<P::Error>>,
}

impl<P: NumberProvider> Clone for RetryableNumberProvider<P> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            retry_config: self.retry_config.clone(),
            on_retry: self.on_retry.clone(),
        }
    }
}

impl<P: NumberProvider + Debug> Debug for RetryableNumberProvider<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetryableNumberProvider")
            .field("inner", &self.inner)
            .field("retry_config", &self.retry_config)
            .field("on_retry", &self.on_retry.as_ref().map(|_| "..."))
            .finish()
    }
}

impl<P: NumberProvider> RetryableNumberProvider<P> {
    /// Wrap a provider with default retry logic.
    pub fn new(inner: P) -> Self {
        Self {
            inner: Arc::new(inner),
            retry_config: RetryConfig::default(),
            on_retry: None,
        }
    }

    /// Wrap a provider with custom retry configuration.
    pub fn with_config(inner: P, retry_config: RetryConfig) -> Self {
        Self {
            inner: Arc::new(inner),
            retry_config,
            on_retry: None,
        }
    }

    /// Set a callback to be invoked on each retry attempt.
    ///
    /// The callback receives the error that caused the retry and the delay
    /// until the next attempt.
    pub fn with_on_retry<F>(mut self, callback: F) -> Self
    where
        F: Fn(&P::Error, Duration) + Send + Sync + 'static,
    {
        self.on_retry = Some(Arc::new(callback));
        self
    }

    /// Get reference to the inner provider.
    pub fn inner(&self) -> &P {
        &self.inner
    }

    /// Get reference to the retry configuration.
    pub fn retry_config(&self) -> &RetryConfig {
        &self.retry_config
    }
}

impl<P: NumberProvider> NumberProvider for RetryableNumberProvider<P>
where
    P::Error: Debug,
{
    type Error = P::Error;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableNumberProvider::search_local",
            skip_all,
            fields(country = %country.alpha2(), limit = %filter.limit)
        )
    )]
    async fn search_local(
        &self,
        country: CountryCode,
        filter: &SearchFilter,
    ) -> Result<Vec<CandidateNumber>, Self::Error> {
        let inner = Arc::clone(&self.inner);
        let on_retry = self.on_retry.clone();
        let filter = filter.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let filter = filter.clone();
            async move { inner.search_local(country, &filter).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &Self::Error| err.is_retryable())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                country = %country.alpha2(),
                retry_after_secs = %duration.as_secs_f64(),
                "Retrying search_local"
            );
        })
        .await
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "RetryableNumberProvider::purchase",
            skip_all,
            fields(phone_number = %phone_number)
        )
    )]
    async fn purchase(&self, phone_number: &PhoneNumber) -> Result<PurchasedNumber, Self::Error> {
        let inner = Arc::clone(&self.inner);
        let number_owned = phone_number.clone();
        let number_for_notify = phone_number.clone();
        let on_retry = self.on_retry.clone();
        (|| {
            let inner = Arc::clone(&inner);
            let number = number_owned.clone();
            async move { inner.purchase(&number).await }
        })
        .retry(self.retry_config.build_strategy())
        .when(|err: &Self::Error| err.is_retryable())
        .notify(move |err, duration| {
            if let Some(ref callback) = on_retry {
                callback(err, duration);
            }

            #[cfg(feature = "tracing")]
            debug!(
                error = ?err,
                phone_number = %number_for_notify,
                retry_after_secs = %duration.as_secs_f64(),
                "Retrying purchase"
            );
        })
        .await
    }
}
