//! Response parsing for the Twilio REST API.

use super::errors::{TwilioApiError, parse_twilio_error};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

/// Unified response type for Twilio API calls.
///
/// Twilio returns JSON bodies on success and a JSON error envelope with a
/// non-success HTTP status on failure; an occasional gateway failure returns
/// a non-JSON body, which degrades to an unstructured API error.
#[derive(Debug)]
pub enum TwilioResponse<T> {
    Success(T),
    Error(TwilioApiError),
}

impl<T> TwilioResponse<T> {
    /// Convert response into a Result for ergonomic error handling.
    pub fn into_result(self) -> Result<T, TwilioApiError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Error(e) => Err(e),
        }
    }

    /// Check if response is successful without consuming.
    #[allow(dead_code)]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

impl<T: DeserializeOwned> TwilioResponse<T> {
    /// Parse a Twilio response from its HTTP status and body text.
    pub fn from_parts(status: StatusCode, body: &str) -> Result<Self, serde_json::Error> {
        if status.is_success() {
            let data = serde_json::from_str::<T>(body)?;
            return Ok(Self::Success(data));
        }

        Ok(Self::Error(parse_twilio_error(status.as_u16(), body)))
    }
}
