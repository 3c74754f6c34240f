//! Main service implementation.

use super::config::{AcquireServiceConfig, AcquireServiceConfigBuilder};
use super::error::{AcquireServiceError, AcquireStage};
use super::traits::AcquireServiceTrait;
use crate::errors::UnavailableError;
use crate::providers::traits::NumberProvider;
use crate::types::{
    AcquireRequest, AcquisitionResult, PurchasedNumber, SearchFilter,
};
use isocountry::CountryCode;

#[cfg(feature = "tracing")]
use tracing::{debug, info, warn};

/// Generic acquisition service that works with any provider implementation.
///
/// This service purchases a requested quantity of local phone numbers by
/// running bounded search/purchase rounds against the provider:
///
/// 1. Search for as many candidates as are still outstanding.
/// 2. Attempt to purchase each candidate in listing order. A candidate lost
///    to a racing buyer is skipped; any other purchase failure aborts.
/// 3. If the quantity is still short and the round budget is not exhausted,
///    search again for the remainder.
///
/// The round budget (initial round + [`max_retry_rounds`] retries) prevents
/// unbounded retry storms against an exhausted inventory, so the result may
/// legitimately be shorter than requested.
///
/// [`max_retry_rounds`]: AcquireServiceConfig::max_retry_rounds
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::{AcquireService, AcquireServiceConfig, AcquireServiceTrait, SearchFilter};
/// use number_acquirer::twilio::{TwilioClient, TwilioProvider};
///
/// let client = TwilioClient::with_credentials("ACxxxx", "auth_token")?;
/// let provider = TwilioProvider::new(client);
/// let service = AcquireService::with_provider(provider);
///
/// let result = service.acquire(&SearchFilter::default(), 3).await?;
/// for number in result.numbers() {
///     println!("Bought {} (sid {})", number.phone_number, number.sid);
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AcquireService<P: NumberProvider> {
    provider: P,
    config: AcquireServiceConfig,
}

impl<P: NumberProvider> AcquireService<P> {
    /// Create a new acquisition service with a provider and configuration.
    pub fn new(provider: P, config: AcquireServiceConfig) -> Self {
        Self { provider, config }
    }

    /// Create a new acquisition service with default configuration.
    pub fn with_provider(provider: P) -> Self {
        Self::new(provider, AcquireServiceConfig::default())
    }

    /// Create a new builder for AcquireService.
    pub fn builder(provider: P) -> AcquireServiceBuilder<P> {
        AcquireServiceBuilder::new(provider)
    }

    /// Get reference to the underlying provider.
    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// Get reference to the service configuration.
    pub fn config(&self) -> &AcquireServiceConfig {
        &self.config
    }

    /// Update the service configuration.
    pub fn set_config(&mut self, config: AcquireServiceConfig) {
        self.config = config;
    }

    /// Run one purchase sweep over `candidates`, appending successes to
    /// `purchased` until `target_quantity` is reached.
    ///
    /// Candidates that were claimed by a racing buyer are skipped; any other
    /// purchase failure aborts the whole acquisition.
    async fn purchase_sweep(
        &self,
        candidates: Vec<crate::types::CandidateNumber>,
        purchased: &mut Vec<PurchasedNumber>,
        target_quantity: u32,
    ) -> Result<(), AcquireServiceError> {
        for candidate in candidates {
            // Search may over-return; never buy past the target.
            if purchased.len() as u32 >= target_quantity {
                break;
            }

            match self.provider.purchase(&candidate.phone_number).await {
                Ok(number) => {
                    #[cfg(feature = "tracing")]
                    debug!(
                        phone_number = %number.phone_number,
                        sid = %number.sid,
                        "Candidate purchased"
                    );
                    purchased.push(number);
                }
                Err(e) if e.is_unavailable() => {
                    #[cfg(feature = "tracing")]
                    warn!(
                        phone_number = %candidate.phone_number,
                        "Candidate no longer available, skipping"
                    );
                }
                Err(e) => {
                    return Err(AcquireServiceError::provider(AcquireStage::Purchase, e));
                }
            }
        }

        Ok(())
    }
}

impl<P: NumberProvider> AcquireServiceTrait for AcquireService<P> {
    type Error = AcquireServiceError;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "acquire_service.acquire",
            skip_all,
            fields(target = %target_quantity, country = %self.config.country.alpha2())
        )
    )]
    async fn acquire(
        &self,
        filter: &SearchFilter,
        target_quantity: u32,
    ) -> Result<AcquisitionResult, Self::Error> {
        if target_quantity == 0 {
            return Ok(AcquisitionResult::new(Vec::new(), 0));
        }

        let mut purchased: Vec<PurchasedNumber> = Vec::with_capacity(target_quantity as usize);
        let mut rounds = 0u32;

        loop {
            rounds += 1;
            let outstanding = target_quantity - purchased.len() as u32;

            #[cfg(feature = "tracing")]
            debug!(round = rounds, outstanding, "Starting acquisition round");

            let round_filter = filter.clone().with_limit(outstanding);
            let candidates = self
                .provider
                .search_local(self.config.country, &round_filter)
                .await
                .map_err(|e| AcquireServiceError::provider(AcquireStage::Search, e))?;

            self.purchase_sweep(candidates, &mut purchased, target_quantity)
                .await?;

            let outstanding = target_quantity - purchased.len() as u32;
            // An empty or fruitless round still consumes round budget.
            if outstanding == 0 || rounds > self.config.max_retry_rounds {
                #[cfg(feature = "tracing")]
                info!(
                    purchased = purchased.len(),
                    target = target_quantity,
                    rounds,
                    "Acquisition finished"
                );
                return Ok(AcquisitionResult::new(purchased, rounds));
            }
        }
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "acquire_service.handle",
            skip_all,
            fields(limit = %request.limit)
        )
    )]
    async fn handle(&self, request: &AcquireRequest) -> Result<AcquisitionResult, Self::Error> {
        let filter = request
            .phone_number_settings
            .clone()
            .unwrap_or_else(|| self.config.default_filter.clone());

        self.acquire(&filter, request.limit).await
    }
}

/// Builder for AcquireService.
///
/// Provides a fluent API for constructing an acquisition service with a
/// provider and custom configuration.
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::AcquireService;
/// use isocountry::CountryCode;
///
/// let service = AcquireService::builder(provider)
///     .country(CountryCode::CAN)
///     .max_retry_rounds(1)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AcquireServiceBuilder<P: NumberProvider> {
    provider: P,
    config_builder: AcquireServiceConfigBuilder,
}

impl<P: NumberProvider> AcquireServiceBuilder<P> {
    /// Create a new builder with the given provider.
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            config_builder: AcquireServiceConfigBuilder::default(),
        }
    }

    /// Set the country whose local numbers are searched.
    ///
    /// Default: US
    pub fn country(mut self, country: CountryCode) -> Self {
        self.config_builder = self.config_builder.country(country);
        self
    }

    /// Set the filter applied when a request carries none.
    pub fn default_filter(mut self, filter: SearchFilter) -> Self {
        self.config_builder = self.config_builder.default_filter(filter);
        self
    }

    /// Set the extra rounds allowed after the initial one.
    ///
    /// Default: 3
    pub fn max_retry_rounds(mut self, rounds: u32) -> Self {
        self.config_builder = self.config_builder.max_retry_rounds(rounds);
        self
    }

    /// Set the full configuration.
    pub fn config(mut self, config: AcquireServiceConfig) -> Self {
        self.config_builder = AcquireServiceConfigBuilder {
            country: config.country,
            default_filter: config.default_filter,
            max_retry_rounds: config.max_retry_rounds,
        };
        self
    }

    /// Build the AcquireService.
    pub fn build(self) -> AcquireService<P> {
        AcquireService::new(self.provider, self.config_builder.build())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Capabilities, CandidateNumber, PhoneNumber, Sid};
    use std::collections::HashSet;
    use std::sync::{Arc, Mutex};
    use thiserror::Error;

    #[derive(Debug, Clone, Error)]
    enum StubError {
        #[error("number no longer available")]
        Unavailable,
        #[error("search backend exploded")]
        SearchFailed,
        #[error("purchase backend exploded")]
        PurchaseFailed,
    }

    impl UnavailableError for StubError {
        fn is_unavailable(&self) -> bool {
            matches!(self, StubError::Unavailable)
        }
    }

    #[derive(Default)]
    struct StubState {
        /// Available numbers in listing order.
        pool: Vec<String>,
        /// Numbers whose purchase fails as lost-to-racing-buyer.
        unavailable: HashSet<String>,
        /// Numbers whose purchase fails fatally.
        poisoned: HashSet<String>,
        /// Numbers already claimed (by us or by the simulated racing buyer).
        claimed: HashSet<String>,
        /// When true, search ignores the limit and returns the whole pool.
        over_return: bool,
        /// When true, every search fails fatally.
        search_poisoned: bool,
        /// Limit of each search call, in order.
        search_limits: Vec<u32>,
        /// Filters seen by search, in order.
        search_filters: Vec<SearchFilter>,
        /// Every purchase attempt, in order.
        purchase_attempts: Vec<String>,
    }

    /// In-process provider driving the loop from a scripted number pool.
    #[derive(Clone, Default)]
    struct StubProvider {
        state: Arc<Mutex<StubState>>,
    }

    impl StubProvider {
        fn with_pool(numbers: &[&str]) -> Self {
            let provider = Self::default();
            provider.state.lock().unwrap().pool =
                numbers.iter().map(|n| n.to_string()).collect();
            provider
        }

        fn mark_unavailable(&self, number: &str) {
            self.state
                .lock()
                .unwrap()
                .unavailable
                .insert(number.to_string());
        }

        fn poison_purchase(&self, number: &str) {
            self.state
                .lock()
                .unwrap()
                .poisoned
                .insert(number.to_string());
        }

        fn poison_search(&self) {
            self.state.lock().unwrap().search_poisoned = true;
        }

        fn set_over_return(&self) {
            self.state.lock().unwrap().over_return = true;
        }

        fn search_limits(&self) -> Vec<u32> {
            self.state.lock().unwrap().search_limits.clone()
        }

        fn search_filters(&self) -> Vec<SearchFilter> {
            self.state.lock().unwrap().search_filters.clone()
        }

        fn purchase_attempts(&self) -> Vec<String> {
            self.state.lock().unwrap().purchase_attempts.clone()
        }

        fn candidate(number: &str) -> CandidateNumber {
            CandidateNumber {
                phone_number: PhoneNumber::new(number).unwrap(),
                friendly_name: number.to_string(),
                locality: None,
                region: None,
                iso_country: "US".to_string(),
                capabilities: Capabilities::default(),
                beta: false,
            }
        }
    }

    impl NumberProvider for StubProvider {
        type Error = StubError;

        async fn search_local(
            &self,
            _country: CountryCode,
            filter: &SearchFilter,
        ) -> Result<Vec<CandidateNumber>, Self::Error> {
            let mut state = self.state.lock().unwrap();
            state.search_limits.push(filter.limit);
            state.search_filters.push(filter.clone());

            if state.search_poisoned {
                return Err(StubError::SearchFailed);
            }

            let limit = if state.over_return {
                usize::MAX
            } else {
                filter.limit as usize
            };

            Ok(state
                .pool
                .iter()
                .filter(|n| !state.claimed.contains(*n))
                .take(limit)
                .map(|n| Self::candidate(n))
                .collect())
        }

        async fn purchase(
            &self,
            phone_number: &PhoneNumber,
        ) -> Result<PurchasedNumber, Self::Error> {
            let mut state = self.state.lock().unwrap();
            let number = phone_number.to_string();
            state.purchase_attempts.push(number.clone());

            if state.poisoned.contains(&number) {
                return Err(StubError::PurchaseFailed);
            }
            if state.unavailable.contains(&number) {
                // The racing buyer owns it now; it stops showing up in
                // searches.
                state.claimed.insert(number);
                return Err(StubError::Unavailable);
            }

            state.claimed.insert(number.clone());
            Ok(PurchasedNumber {
                sid: Sid::new(format!("PN{}", phone_number.digits())),
                phone_number: phone_number.clone(),
                friendly_name: number,
                status: "in-use".to_string(),
                date_created: "Mon, 16 Aug 2010 23:31:04 +0000".to_string(),
                capabilities: Capabilities::default(),
            })
        }
    }

    fn service(provider: StubProvider) -> AcquireService<StubProvider> {
        AcquireService::with_provider(provider)
    }

    #[tokio::test]
    async fn test_unlimited_inventory_returns_exactly_target() {
        let provider = StubProvider::with_pool(&[
            "+14155550001",
            "+14155550002",
            "+14155550003",
            "+14155550004",
            "+14155550005",
        ]);
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 4).await.unwrap();

        assert_eq!(result.len(), 4);
        assert_eq!(result.rounds(), 1);
        assert_eq!(provider.search_limits(), vec![4]);

        // Purchase order matches listing order
        let numbers: Vec<_> = result
            .numbers()
            .iter()
            .map(|n| n.phone_number.to_string())
            .collect();
        assert_eq!(
            numbers,
            vec![
                "+14155550001",
                "+14155550002",
                "+14155550003",
                "+14155550004"
            ]
        );
    }

    #[tokio::test]
    async fn test_all_unavailable_stops_after_four_rounds_without_error() {
        // Enough fresh candidates that every round finds some, and every
        // purchase loses the race.
        let numbers: Vec<String> = (0..8).map(|i| format!("+1415555100{i}")).collect();
        let refs: Vec<&str> = numbers.iter().map(|s| s.as_str()).collect();
        let provider = StubProvider::with_pool(&refs);
        for number in &numbers {
            provider.mark_unavailable(number);
        }
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 2).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rounds(), 4); // initial + 3 retries
        assert_eq!(provider.search_limits(), vec![2, 2, 2, 2]);
        assert_eq!(provider.purchase_attempts().len(), 8);
    }

    #[tokio::test]
    async fn test_empty_search_counts_toward_round_budget() {
        let provider = StubProvider::with_pool(&[]);
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 3).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rounds(), 4);
        assert_eq!(provider.search_limits(), vec![3, 3, 3, 3]);
        assert!(provider.purchase_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_unexpected_purchase_failure_aborts_immediately() {
        let provider =
            StubProvider::with_pool(&["+14155550001", "+14155550002", "+14155550003"]);
        provider.poison_purchase("+14155550002");
        let service = service(provider.clone());

        let error = service
            .acquire(&SearchFilter::default(), 3)
            .await
            .unwrap_err();

        assert_eq!(error.stage(), AcquireStage::Purchase);
        // The third candidate was never attempted, and no further round ran
        assert_eq!(
            provider.purchase_attempts(),
            vec!["+14155550001", "+14155550002"]
        );
        assert_eq!(provider.search_limits(), vec![3]);
    }

    #[tokio::test]
    async fn test_search_failure_aborts_with_search_stage() {
        let provider = StubProvider::with_pool(&["+14155550001"]);
        provider.poison_search();
        let service = service(provider.clone());

        let error = service
            .acquire(&SearchFilter::default(), 1)
            .await
            .unwrap_err();

        assert_eq!(error.stage(), AcquireStage::Search);
        assert!(provider.purchase_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_backfill_scenario_one_candidate_lost() {
        let provider = StubProvider::with_pool(&[
            "+14155550001",
            "+14155550002",
            "+14155550003",
            "+14155550004",
        ]);
        // The second candidate is claimed by a racing buyer
        provider.mark_unavailable("+14155550002");
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 3).await.unwrap();

        assert_eq!(result.len(), 3);
        assert_eq!(result.rounds(), 2);
        // Round 1 asks for 3, round 2 backfills the single missing number
        assert_eq!(provider.search_limits(), vec![3, 1]);

        let numbers: Vec<_> = result
            .numbers()
            .iter()
            .map(|n| n.phone_number.to_string())
            .collect();
        assert_eq!(
            numbers,
            vec!["+14155550001", "+14155550003", "+14155550004"]
        );
    }

    #[tokio::test]
    async fn test_never_purchases_past_target_on_over_return() {
        let provider =
            StubProvider::with_pool(&["+14155550001", "+14155550002", "+14155550003"]);
        provider.set_over_return();
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 1).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(provider.purchase_attempts(), vec!["+14155550001"]);
    }

    #[tokio::test]
    async fn test_zero_target_is_a_noop() {
        let provider = StubProvider::with_pool(&["+14155550001"]);
        let service = service(provider.clone());

        let result = service.acquire(&SearchFilter::default(), 0).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rounds(), 0);
        assert!(provider.search_limits().is_empty());
        assert!(provider.purchase_attempts().is_empty());
    }

    #[tokio::test]
    async fn test_search_idempotent_without_purchases() {
        let provider = StubProvider::with_pool(&["+14155550001", "+14155550002"]);
        let filter = SearchFilter::default().with_limit(2);

        let first = provider
            .search_local(CountryCode::USA, &filter)
            .await
            .unwrap();
        let second = provider
            .search_local(CountryCode::USA, &filter)
            .await
            .unwrap();

        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn test_custom_round_budget() {
        let numbers: Vec<String> = (0..4).map(|i| format!("+1415555200{i}")).collect();
        let refs: Vec<&str> = numbers.iter().map(|s| s.as_str()).collect();
        let provider = StubProvider::with_pool(&refs);
        for number in &numbers {
            provider.mark_unavailable(number);
        }

        let service = AcquireService::builder(provider.clone())
            .max_retry_rounds(1)
            .build();

        let result = service.acquire(&SearchFilter::default(), 1).await.unwrap();

        assert!(result.is_empty());
        assert_eq!(result.rounds(), 2); // initial + 1 retry
    }

    #[tokio::test]
    async fn test_handle_defaults_to_single_number() {
        let provider = StubProvider::with_pool(&["+14155550001", "+14155550002"]);
        let service = service(provider.clone());

        let request: AcquireRequest = serde_json::from_str("{}").unwrap();
        let result = service.handle(&request).await.unwrap();

        assert_eq!(result.len(), 1);
        assert_eq!(provider.search_limits(), vec![1]);
        // Default filter reached the provider
        let filters = provider.search_filters();
        assert!(filters[0].sms_enabled);
        assert!(!filters[0].beta);
    }

    #[tokio::test]
    async fn test_handle_honors_settings_override() {
        let provider = StubProvider::with_pool(&["+14155550001", "+14155550002"]);
        let service = service(provider.clone());

        let request: AcquireRequest = serde_json::from_str(
            r#"{"limit": 2, "phoneNumberSettings": {"smsEnabled": false, "beta": true}}"#,
        )
        .unwrap();
        let result = service.handle(&request).await.unwrap();

        assert_eq!(result.len(), 2);
        let filters = provider.search_filters();
        assert!(!filters[0].sms_enabled);
        assert!(filters[0].beta);
        // Fields absent from the override keep their defaults
        assert!(filters[0].mms_enabled);
    }
}
