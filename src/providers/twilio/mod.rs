//! Twilio REST API provider.

pub(crate) mod client;
pub(crate) mod errors;
pub(crate) mod response;
pub(crate) mod types;

mod provider;

pub use client::{DEFAULT_API_URL, TwilioClient, TwilioClientBuilder};
pub use errors::{TwilioApiError, TwilioError, TwilioErrorCode};
pub use provider::TwilioProvider;
pub use types::{AvailablePhoneNumber, AvailablePhoneNumbersPage, IncomingPhoneNumber};
