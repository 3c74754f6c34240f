//! Twilio HTTP client.

use super::errors::{Result, TwilioError};
use super::response::TwilioResponse;
use super::types::{AvailablePhoneNumbersPage, IncomingPhoneNumber};
use crate::types::{PhoneNumber, SearchFilter};
use isocountry::CountryCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use secrecy::{ExposeSecret, SecretString};
use url::Url;

#[cfg(feature = "tracing")]
use opentelemetry::trace::Status;
#[cfg(feature = "tracing")]
use tracing::Span;
#[cfg(feature = "tracing")]
use tracing_opentelemetry::OpenTelemetrySpanExt;

/// Default Twilio REST API base URL.
pub const DEFAULT_API_URL: &str = "https://api.twilio.com";

/// Version prefix of the REST API surface this client speaks.
const API_VERSION: &str = "2010-04-01";

/// Twilio HTTP client.
///
/// Handles communication with the Twilio REST API for searching available
/// local phone numbers and purchasing them. Requests authenticate with HTTP
/// basic auth using the account SID and auth token.
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::twilio::TwilioClient;
/// use number_acquirer::SearchFilter;
/// use isocountry::CountryCode;
///
/// let client = TwilioClient::with_credentials("ACxxxx", "auth_token")?;
///
/// // Search for up to 5 available US local numbers
/// let page = client
///     .list_available_local(CountryCode::USA, &SearchFilter::default().with_limit(5))
///     .await?;
///
/// // Purchase the first candidate
/// let first = &page.available_phone_numbers[0];
/// let purchased = client.create_incoming_number(&first.phone_number).await?;
/// println!("Bought {} (sid {})", purchased.phone_number, purchased.sid);
/// ```
#[derive(Clone)]
pub struct TwilioClient {
    http_client: ClientWithMiddleware,
    account_sid: String,
    auth_token: SecretString,
    endpoint: Url,
}

impl std::fmt::Debug for TwilioClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioClient")
            .field("endpoint", &self.endpoint)
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"[REDACTED]")
            .finish()
    }
}

/// Builder for configuring a [`TwilioClient`].
pub struct TwilioClientBuilder {
    account_sid: String,
    auth_token: String,
    endpoint: Option<Url>,
    http_client: Option<ClientWithMiddleware>,
}

impl TwilioClientBuilder {
    /// Create a new builder with the given credentials.
    pub fn new(account_sid: impl Into<String>, auth_token: impl Into<String>) -> Self {
        Self {
            account_sid: account_sid.into(),
            auth_token: auth_token.into(),
            endpoint: None,
            http_client: None,
        }
    }

    /// Set a custom API endpoint.
    pub fn endpoint(mut self, endpoint: Url) -> Self {
        self.endpoint = Some(endpoint);
        self
    }

    /// Set a custom HTTP client with middleware.
    pub fn http_client(mut self, client: ClientWithMiddleware) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Build the [`TwilioClient`].
    pub fn build(self) -> Result<TwilioClient> {
        let endpoint = self
            .endpoint
            .unwrap_or_else(|| Url::parse(DEFAULT_API_URL).expect("Invalid default URL"));

        let http_client = match self.http_client {
            Some(client) => client,
            None => {
                let client = reqwest::Client::builder()
                    .build()
                    .map_err(TwilioError::BuildHttpClient)?;
                ClientBuilder::new(client).build()
            }
        };

        Ok(TwilioClient {
            http_client,
            account_sid: self.account_sid,
            auth_token: SecretString::from(self.auth_token),
            endpoint,
        })
    }
}

impl TwilioClient {
    /// Create a new Twilio client against a custom endpoint.
    ///
    /// # Arguments
    /// * `endpoint` - Base URL for the Twilio API
    /// * `account_sid` - Account SID for authentication
    /// * `auth_token` - Auth token for authentication
    pub fn new(
        endpoint: impl AsRef<str>,
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        let url = Url::parse(endpoint.as_ref()).map_err(|e| {
            TwilioError::BuildRequestUrl(serde_urlencoded::ser::Error::Custom(
                std::borrow::Cow::Owned(e.to_string()),
            ))
        })?;

        Self::builder(account_sid, auth_token).endpoint(url).build()
    }

    /// Create a new client against the default API URL.
    pub fn with_credentials(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> Result<Self> {
        Self::builder(account_sid, auth_token).build()
    }

    /// Create a builder for configuring the client.
    pub fn builder(
        account_sid: impl Into<String>,
        auth_token: impl Into<String>,
    ) -> TwilioClientBuilder {
        TwilioClientBuilder::new(account_sid, auth_token)
    }

    /// Build a request URL under this account with query parameters.
    fn build_request_url(&self, path: &str, params: Vec<(&str, String)>) -> Result<Url> {
        let mut endpoint = self.endpoint.clone();
        endpoint.set_path(&format!(
            "/{}/Accounts/{}/{}",
            API_VERSION, self.account_sid, path
        ));

        if !params.is_empty() {
            endpoint.set_query(Some(
                &serde_urlencoded::to_string(&params).map_err(TwilioError::BuildRequestUrl)?,
            ));
        }

        Ok(endpoint)
    }

    /// Send a GET request and return the status with the response text.
    async fn send_get(&self, url: Url) -> Result<(reqwest::StatusCode, String)> {
        let response = self
            .http_client
            .get(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .send()
            .await
            .map_err(TwilioError::HttpRequest)?;

        let status = response.status();
        let body = response.text().await.map_err(TwilioError::ParseResponse)?;
        Ok((status, body))
    }

    /// Send a POST request with a form body, returning status and text.
    async fn send_post_form(
        &self,
        url: Url,
        form: &[(&str, &str)],
    ) -> Result<(reqwest::StatusCode, String)> {
        let response = self
            .http_client
            .post(url)
            .basic_auth(&self.account_sid, Some(self.auth_token.expose_secret()))
            .form(form)
            .send()
            .await
            .map_err(TwilioError::HttpRequest)?;

        let status = response.status();
        let body = response.text().await.map_err(TwilioError::ParseResponse)?;
        Ok((status, body))
    }

    /// List available local phone numbers in a country.
    ///
    /// # Arguments
    /// * `country` - Country to search in
    /// * `filter` - Search options; `filter.limit` becomes the page size
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TwilioClient::list_available_local",
            skip_all,
            fields(country = %country.alpha2(), limit = %filter.limit)
        )
    )]
    pub async fn list_available_local(
        &self,
        country: CountryCode,
        filter: &SearchFilter,
    ) -> Result<AvailablePhoneNumbersPage> {
        let url = self.build_request_url(
            &format!("AvailablePhoneNumbers/{}/Local.json", country.alpha2()),
            vec![
                ("SmsEnabled", filter.sms_enabled.to_string()),
                ("MmsEnabled", filter.mms_enabled.to_string()),
                ("VoiceEnabled", filter.voice_enabled.to_string()),
                (
                    "ExcludeAllAddressRequired",
                    filter.exclude_all_address_required.to_string(),
                ),
                (
                    "ExcludeLocalAddressRequired",
                    filter.exclude_local_address_required.to_string(),
                ),
                (
                    "ExcludeForeignAddressRequired",
                    filter.exclude_foreign_address_required.to_string(),
                ),
                ("Beta", filter.beta.to_string()),
                ("PageSize", filter.limit.to_string()),
            ],
        )?;

        let (status, body) = self.send_get(url).await?;

        let response = TwilioResponse::<AvailablePhoneNumbersPage>::from_parts(status, &body)
            .map_err(TwilioError::DeserializeJson)?;

        let page = response.into_result().map_err(TwilioError::Api)?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("candidates", page.available_phone_numbers.len())
                .set_status(Status::Ok);
        }

        Ok(page)
    }

    /// Purchase a phone number by creating an IncomingPhoneNumber resource.
    ///
    /// Fails with [`TwilioErrorCode::PhoneNumberNotAvailable`] when the
    /// number was claimed by another buyer after it was listed as available.
    ///
    /// [`TwilioErrorCode::PhoneNumberNotAvailable`]: super::errors::TwilioErrorCode::PhoneNumberNotAvailable
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "TwilioClient::create_incoming_number",
            skip_all,
            fields(phone_number = %phone_number)
        )
    )]
    pub async fn create_incoming_number(
        &self,
        phone_number: &PhoneNumber,
    ) -> Result<IncomingPhoneNumber> {
        let url = self.build_request_url("IncomingPhoneNumbers.json", Vec::new())?;

        let (status, body) = self
            .send_post_form(url, &[("PhoneNumber", phone_number.as_str())])
            .await?;

        let response = TwilioResponse::<IncomingPhoneNumber>::from_parts(status, &body)
            .map_err(TwilioError::DeserializeJson)?;

        let purchased = response.into_result().map_err(TwilioError::Api)?;

        #[cfg(feature = "tracing")]
        {
            Span::current()
                .record("sid", purchased.sid.as_ref())
                .set_status(Status::Ok);
        }

        Ok(purchased)
    }
}
