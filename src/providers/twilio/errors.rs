//! Error types for the Twilio provider.

use crate::errors::UnavailableError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt::{self, Display, Formatter};
use thiserror::Error;

#[cfg(feature = "tracing")]
use tracing::warn;

/// Error codes returned by the Twilio REST API.
///
/// Twilio reports errors as a JSON envelope carrying a numeric code; the
/// codes relevant to number acquisition are mapped to variants, everything
/// else lands in `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TwilioErrorCode {
    // === Expected purchase race ===
    /// The number was claimed by another buyer between search and purchase.
    PhoneNumberNotAvailable,

    // === Transient / server errors (retryable) ===
    /// Too many requests; the API asked to slow down.
    TooManyRequests,

    // === Fatal / client errors ===
    /// Authentication failed (bad account SID or auth token).
    AuthenticationFailed,
    /// The requested resource was not found.
    NotFound,
    /// The phone number is not syntactically valid.
    InvalidPhoneNumber,

    /// Any other error code from the API.
    Unknown { code: u32 },
}

impl TwilioErrorCode {
    /// Map a numeric API error code to a variant.
    pub fn from_code(code: u32) -> Self {
        match code {
            21422 => Self::PhoneNumberNotAvailable,
            20429 => Self::TooManyRequests,
            20003 => Self::AuthenticationFailed,
            20404 => Self::NotFound,
            21421 => Self::InvalidPhoneNumber,
            other => Self::Unknown { code: other },
        }
    }

    /// The numeric code as the API reports it.
    pub fn code(&self) -> u32 {
        match self {
            Self::PhoneNumberNotAvailable => 21422,
            Self::TooManyRequests => 20429,
            Self::AuthenticationFailed => 20003,
            Self::NotFound => 20404,
            Self::InvalidPhoneNumber => 21421,
            Self::Unknown { code } => *code,
        }
    }

    /// Returns human-readable description.
    pub fn description(&self) -> String {
        match self {
            Self::PhoneNumberNotAvailable => "Phone number is not available".to_string(),
            Self::TooManyRequests => "Too many requests".to_string(),
            Self::AuthenticationFailed => "Authentication failed".to_string(),
            Self::NotFound => "Resource not found".to_string(),
            Self::InvalidPhoneNumber => "Phone number is invalid".to_string(),
            Self::Unknown { code } => format!("Unknown error code {}", code),
        }
    }

    /// Returns true if this code means the number was lost to a racing buyer.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::PhoneNumberNotAvailable)
    }

    /// Returns true if the same call may succeed when retried.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::TooManyRequests)
    }
}

impl Display for TwilioErrorCode {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl Serialize for TwilioErrorCode {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_u32(self.code())
    }
}

impl<'de> Deserialize<'de> for TwilioErrorCode {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let code = u32::deserialize(deserializer)?;
        Ok(Self::from_code(code))
    }
}

/// Error envelope returned by the Twilio REST API.
#[derive(Debug, Clone, Error, Serialize, Deserialize)]
#[error("Twilio API error: code={code}, status={status}, message={message}")]
pub struct TwilioApiError {
    /// Error code from the API.
    pub code: TwilioErrorCode,
    /// Human-readable message from the API.
    pub message: String,
    /// Link to the error documentation, when provided.
    #[serde(default)]
    pub more_info: Option<String>,
    /// HTTP status of the response.
    pub status: u16,
}

impl TwilioApiError {
    /// Build an error for a non-success response whose body was not the
    /// documented JSON envelope.
    pub fn unstructured(status: u16, body: &str) -> Self {
        Self {
            code: TwilioErrorCode::Unknown { code: 0 },
            message: body.trim().to_string(),
            more_info: None,
            status,
        }
    }

    /// Returns true if the number was lost to a racing buyer.
    pub fn is_unavailable(&self) -> bool {
        self.code.is_unavailable()
    }

    /// Returns true if the same call may succeed when retried.
    ///
    /// Server-side failures (5xx) are retryable regardless of code.
    pub fn is_retryable(&self) -> bool {
        self.code.is_retryable() || self.status >= 500
    }
}

/// Parse the Twilio error envelope from a non-success response body.
pub(crate) fn parse_twilio_error(status: u16, body: &str) -> TwilioApiError {
    let error = serde_json::from_str::<TwilioApiError>(body)
        .unwrap_or_else(|_| TwilioApiError::unstructured(status, body));

    #[cfg(feature = "tracing")]
    warn!(
        code = %error.code,
        status = %error.status,
        message = %error.message,
        "Twilio API returned error"
    );

    error
}

/// Main error type for Twilio client operations.
#[derive(Debug, Error)]
pub enum TwilioError {
    /// Failed to build HTTP client.
    #[error("Failed to build HTTP client: {0}")]
    BuildHttpClient(#[source] reqwest::Error),

    /// Error building the request URL.
    #[error("Error building Twilio request URL: {0}")]
    BuildRequestUrl(#[source] serde_urlencoded::ser::Error),

    /// Failed to send HTTP request.
    #[error("Failed to send HTTP request: {0}")]
    HttpRequest(#[from] reqwest_middleware::Error),

    /// Failed to read the response body.
    #[error("Failed to read response body: {0}")]
    ParseResponse(#[source] reqwest::Error),

    /// Twilio API error.
    #[error("Twilio API error: {0}")]
    Api(#[source] TwilioApiError),

    /// Failed to deserialize a JSON response body.
    #[error("Failed to deserialize JSON response: {0}")]
    DeserializeJson(#[source] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, TwilioError>;

impl UnavailableError for TwilioError {
    fn is_unavailable(&self) -> bool {
        match self {
            TwilioError::Api(error) => error.is_unavailable(),
            TwilioError::BuildHttpClient(_)
            | TwilioError::BuildRequestUrl(_)
            | TwilioError::HttpRequest(_)
            | TwilioError::ParseResponse(_)
            | TwilioError::DeserializeJson(_) => false,
        }
    }

    fn is_retryable(&self) -> bool {
        match self {
            // Rate limits and 5xx responses
            TwilioError::Api(error) => error.is_retryable(),
            // Network-level failures
            TwilioError::HttpRequest(_) => true,
            // Permanent configuration or logic errors
            TwilioError::BuildHttpClient(_)
            | TwilioError::BuildRequestUrl(_)
            | TwilioError::ParseResponse(_)
            | TwilioError::DeserializeJson(_) => false,
        }
    }
}
