//! Number provider implementations.

pub(crate) mod retryable;
pub(crate) mod traits;

#[cfg(feature = "twilio")]
pub mod twilio;

pub use retryable::RetryableNumberProvider;
pub use traits::NumberProvider;
