//! # Number Acquirer
//!
//! A phone number acquisition library with provider abstraction and fluent builder pattern.
//!
//! This library purchases local phone numbers from telephony providers. It
//! searches for available candidates, purchases them, and backfills numbers
//! lost to racing buyers with bounded retry rounds.
//!
//! ## Supported Providers
//!
//! | Provider | Feature | Website |
//! |----------|---------|---------|
//! | Twilio | `twilio` (default) | <https://www.twilio.com> |
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use number_acquirer::{
//!     AcquireService, AcquireServiceTrait, SearchFilter,
//!     providers::twilio::{TwilioClient, TwilioProvider},
//!     RetryableNumberProvider, RetryConfig,
//! };
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Create provider with account credentials
//!     let client = TwilioClient::with_credentials("ACxxxx", "auth_token")?;
//!     let provider = TwilioProvider::new(client);
//!
//!     // Wrap with transport-level retry logic
//!     let retryable = RetryableNumberProvider::new(provider);
//!
//!     // Create service
//!     let service = AcquireService::with_provider(retryable);
//!
//!     // Buy three SMS-capable US numbers
//!     let result = service.acquire(&SearchFilter::default(), 3).await?;
//!     for number in result.numbers() {
//!         println!("Bought {} (sid {})", number.phone_number, number.sid);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! AcquireService<P>
//!         │
//!         ▼
//! RetryableNumberProvider<P>  (optional retry wrapper)
//!         │
//!         ▼
//!     NumberProvider          (trait: TwilioProvider, etc.)
//! ```
//!
//! ## Features
//!
//! - `twilio` - Twilio provider support (enabled by default)
//! - `tracing` - OpenTelemetry tracing instrumentation (enabled by default)

pub mod errors;
pub mod providers;
pub mod service;
pub mod types;
pub mod utils;

// Re-export commonly used types at the crate root
#[cfg(feature = "twilio")]
pub use providers::twilio;

pub use errors::UnavailableError;
pub use isocountry::CountryCode;
pub use providers::{NumberProvider, RetryableNumberProvider};
pub use service::{
    AcquireService, AcquireServiceConfig, AcquireServiceError, AcquireServiceTrait, AcquireStage,
};
pub use types::{
    AcquireRequest, AcquisitionResult, CandidateNumber, Capabilities, PhoneNumber,
    PurchasedNumber, SearchFilter, Sid,
};
pub use utils::retry::RetryConfig;
