//! Service trait definition.

use crate::errors::UnavailableError;
use crate::types::{AcquireRequest, AcquisitionResult, SearchFilter};
use std::error::Error as StdError;

/// Trait for number acquisition service implementations.
///
/// This trait abstracts the service interface, allowing different
/// service implementations to be used interchangeably.
#[allow(async_fn_in_trait)]
pub trait AcquireServiceTrait: Send + Sync {
    /// The error type for this service.
    type Error: StdError + UnavailableError;

    /// Purchase up to `target_quantity` numbers matching `filter`.
    ///
    /// Runs bounded search/purchase rounds: candidates lost to racing buyers
    /// are replaced by searching again for the outstanding quantity, up to
    /// the configured round budget.
    ///
    /// # Arguments
    ///
    /// * `filter` - Search options; its `limit` field is overwritten each
    ///   round with the quantity still outstanding
    /// * `target_quantity` - How many numbers to purchase
    ///
    /// # Returns
    ///
    /// The purchased numbers in purchase order. The result is shorter than
    /// `target_quantity` when availability was exhausted within the round
    /// budget; that is not an error.
    async fn acquire(
        &self,
        filter: &SearchFilter,
        target_quantity: u32,
    ) -> Result<AcquisitionResult, Self::Error>;

    /// Serve an [`AcquireRequest`]: resolve the limit (default 1) and the
    /// filter (caller override, else the configured default), then
    /// [`acquire`](Self::acquire).
    async fn handle(&self, request: &AcquireRequest) -> Result<AcquisitionResult, Self::Error>;
}
