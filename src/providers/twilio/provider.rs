//! Twilio provider implementation.

use super::client::TwilioClient;
use super::errors::{Result, TwilioError};
use super::types::{AvailablePhoneNumber, IncomingPhoneNumber, WireCapabilities};
use crate::providers::traits::NumberProvider;
use crate::types::{Capabilities, CandidateNumber, PhoneNumber, PurchasedNumber, SearchFilter};
use isocountry::CountryCode;

#[cfg(feature = "tracing")]
use tracing::debug;

/// Twilio provider implementation.
///
/// Wraps the [`TwilioClient`] and implements the generic [`NumberProvider`]
/// trait, mapping the REST wire types to the crate's domain types.
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::twilio::{TwilioClient, TwilioProvider};
/// use number_acquirer::{AcquireService, RetryableNumberProvider};
///
/// // Create client and provider
/// let client = TwilioClient::with_credentials("ACxxxx", "auth_token")?;
/// let provider = TwilioProvider::new(client);
///
/// // Optionally wrap with transport-level retry
/// let retryable = RetryableNumberProvider::new(provider);
///
/// // Drive the acquisition loop with it
/// let service = AcquireService::with_provider(retryable);
/// let result = service.acquire(&Default::default(), 3).await?;
/// ```
#[derive(Debug, Clone)]
pub struct TwilioProvider {
    client: TwilioClient,
}

impl TwilioProvider {
    /// Create a new Twilio provider.
    pub fn new(client: TwilioClient) -> Self {
        Self { client }
    }

    /// Get reference to the inner client.
    pub fn client(&self) -> &TwilioClient {
        &self.client
    }
}

fn map_capabilities(wire: WireCapabilities) -> Capabilities {
    Capabilities {
        voice: wire.voice,
        sms: wire.sms,
        mms: wire.mms,
    }
}

fn map_candidate(wire: AvailablePhoneNumber) -> CandidateNumber {
    CandidateNumber {
        phone_number: wire.phone_number,
        friendly_name: wire.friendly_name,
        locality: wire.locality,
        region: wire.region,
        iso_country: wire.iso_country,
        capabilities: map_capabilities(wire.capabilities),
        beta: wire.beta,
    }
}

fn map_purchased(wire: IncomingPhoneNumber) -> PurchasedNumber {
    PurchasedNumber {
        sid: wire.sid,
        phone_number: wire.phone_number,
        friendly_name: wire.friendly_name,
        status: wire.status,
        date_created: wire.date_created,
        capabilities: map_capabilities(wire.capabilities),
    }
}

impl NumberProvider for TwilioProvider {
    type Error = TwilioError;

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TwilioProvider::search_local",
            skip_all,
            fields(country = %country.alpha2(), limit = %filter.limit)
        )
    )]
    async fn search_local(
        &self,
        country: CountryCode,
        filter: &SearchFilter,
    ) -> Result<Vec<CandidateNumber>> {
        let page = self.client.list_available_local(country, filter).await?;

        #[cfg(feature = "tracing")]
        debug!(
            candidates = page.available_phone_numbers.len(),
            "Search returned candidates"
        );

        Ok(page
            .available_phone_numbers
            .into_iter()
            .map(map_candidate)
            .collect())
    }

    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TwilioProvider::purchase",
            skip_all,
            fields(phone_number = %phone_number)
        )
    )]
    async fn purchase(&self, phone_number: &PhoneNumber) -> Result<PurchasedNumber> {
        let purchased = self.client.create_incoming_number(phone_number).await?;

        #[cfg(feature = "tracing")]
        debug!(sid = %purchased.sid, "Number purchased");

        Ok(map_purchased(purchased))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::UnavailableError;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn create_test_provider(mock_server: &MockServer) -> TwilioProvider {
        let client = TwilioClient::new(mock_server.uri(), "AC123", "token").unwrap();
        TwilioProvider::new(client)
    }

    #[tokio::test]
    async fn test_search_local_maps_candidates() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/2010-04-01/Accounts/AC123/AvailablePhoneNumbers/US/Local.json"))
            .and(query_param("PageSize", "2"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "available_phone_numbers": [
                    {
                        "friendly_name": "(415) 555-2671",
                        "phone_number": "+14155552671",
                        "locality": "San Francisco",
                        "region": "CA",
                        "iso_country": "US",
                        "capabilities": {"voice": true, "SMS": true, "MMS": false},
                        "beta": false
                    },
                    {
                        "friendly_name": "(808) 925-1571",
                        "phone_number": "+18089251571",
                        "iso_country": "US",
                        "capabilities": {"voice": true, "SMS": true, "MMS": true},
                        "beta": true
                    }
                ]
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let candidates = provider
            .search_local(CountryCode::USA, &SearchFilter::default().with_limit(2))
            .await
            .unwrap();

        assert_eq!(candidates.len(), 2);
        assert_eq!(candidates[0].phone_number.as_str(), "+14155552671");
        assert_eq!(candidates[0].locality.as_deref(), Some("San Francisco"));
        assert!(!candidates[0].capabilities.mms);
        assert!(candidates[1].beta);
        assert!(candidates[1].locality.is_none());
    }

    #[tokio::test]
    async fn test_search_local_empty_inventory() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "available_phone_numbers": []
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let candidates = provider
            .search_local(CountryCode::USA, &SearchFilter::default())
            .await
            .unwrap();

        assert!(candidates.is_empty());
    }

    #[tokio::test]
    async fn test_purchase_maps_confirmation() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/2010-04-01/Accounts/AC123/IncomingPhoneNumbers.json"))
            .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({
                "sid": "PNabc",
                "phone_number": "+14155552671",
                "friendly_name": "(415) 555-2671",
                "status": "in-use",
                "date_created": "Mon, 16 Aug 2010 23:31:04 +0000",
                "capabilities": {"voice": true, "sms": true, "mms": true}
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let number = PhoneNumber::new("+14155552671").unwrap();
        let purchased = provider.purchase(&number).await.unwrap();

        assert_eq!(purchased.sid.as_ref(), "PNabc");
        assert_eq!(purchased.phone_number, number);
        assert_eq!(purchased.status, "in-use");
    }

    #[tokio::test]
    async fn test_purchase_race_is_classified_unavailable() {
        let mock_server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(400).set_body_json(serde_json::json!({
                "code": 21422,
                "message": "PhoneNumber is not available",
                "more_info": "https://www.twilio.com/docs/errors/21422",
                "status": 400
            })))
            .mount(&mock_server)
            .await;

        let provider = create_test_provider(&mock_server);
        let number = PhoneNumber::new("+14155552671").unwrap();
        let error = provider.purchase(&number).await.unwrap_err();

        assert!(error.is_unavailable());
        assert!(!error.is_retryable());
    }
}
