//! Provider trait definition.

use crate::errors::UnavailableError;
use crate::types::{CandidateNumber, PhoneNumber, PurchasedNumber, SearchFilter};
use isocountry::CountryCode;
use std::error::Error as StdError;
use std::future::Future;

/// Core trait that all number providers must implement.
///
/// This trait defines the two operations the acquisition loop consumes:
/// - Searching for available local numbers matching a filter
/// - Purchasing one of the returned candidates
///
/// # Note on async methods
///
/// All async methods in this trait return `Send` futures, making them
/// compatible with multi-threaded executors.
///
/// # Example
///
/// ```rust,ignore
/// use number_acquirer::{
///     CandidateNumber, NumberProvider, PhoneNumber, PurchasedNumber, SearchFilter,
/// };
/// use isocountry::CountryCode;
///
/// #[derive(Clone)]
/// struct MyProvider { /* ... */ }
///
/// impl NumberProvider for MyProvider {
///     type Error = MyError;
///
///     async fn search_local(
///         &self,
///         country: CountryCode,
///         filter: &SearchFilter,
///     ) -> Result<Vec<CandidateNumber>, Self::Error> {
///         // List available local numbers matching the filter
///     }
///
///     async fn purchase(
///         &self,
///         phone_number: &PhoneNumber,
///     ) -> Result<PurchasedNumber, Self::Error> {
///         // Buy the number, or fail with an unavailable-classified error
///         // when a racing party claimed it first
///     }
/// }
/// ```
#[allow(async_fn_in_trait)]
pub trait NumberProvider: Send + Sync + Clone {
    /// Error type returned by provider operations.
    type Error: StdError + UnavailableError + Send + Sync + 'static;

    /// Search for available local phone numbers in the given country.
    ///
    /// # Arguments
    /// * `country` - Country to search in
    /// * `filter` - Search options; `filter.limit` caps how many candidates
    ///   are returned
    ///
    /// # Returns
    /// Up to `filter.limit` candidates. An empty list means the inventory
    /// matching the filter is currently exhausted; that is not an error.
    fn search_local(
        &self,
        country: CountryCode,
        filter: &SearchFilter,
    ) -> impl Future<Output = Result<Vec<CandidateNumber>, Self::Error>> + Send;

    /// Purchase the given phone number.
    ///
    /// # Arguments
    /// * `phone_number` - E.164 number of a candidate returned by
    ///   `search_local`
    ///
    /// # Returns
    /// The provider's confirmation record for the purchased number.
    ///
    /// # Errors
    /// Fails with an error classified `is_unavailable()` when the number was
    /// claimed by someone else between search and purchase; any other error
    /// is unexpected.
    fn purchase(
        &self,
        phone_number: &PhoneNumber,
    ) -> impl Future<Output = Result<PurchasedNumber, Self::Error>> + Send;
}
