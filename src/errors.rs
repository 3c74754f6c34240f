//! Error traits for phone number acquisition.

/// Trait for errors that can be classified for the acquisition flow.
///
/// Two independent classifications are needed:
///
/// 1. **Unavailable** (`is_unavailable`): the purchase target was claimed by
///    a third party between search and purchase. This is the expected race
///    on a shared number inventory; the acquisition loop skips the candidate
///    and moves on to the next one.
///
/// 2. **Retryable** (`is_retryable`): a transient transport failure where
///    re-issuing the *same* call may succeed (network timeouts, rate limits,
///    provider 5xx). Used by the [`RetryableNumberProvider`] wrapper, never
///    by the acquisition loop itself.
///
/// Any error that is neither unavailable nor retryable is fatal: the
/// acquisition aborts immediately and the error propagates to the caller.
///
/// [`RetryableNumberProvider`]: crate::providers::RetryableNumberProvider
///
/// # Examples
///
/// ```rust
/// use number_acquirer::UnavailableError;
///
/// enum MyError {
///     NumberTaken,      // Lost the race; try the next candidate
///     RequestTimeout,   // Transient; same call may be retried
///     InvalidApiKey,    // Fatal; abort the acquisition
/// }
///
/// impl UnavailableError for MyError {
///     fn is_unavailable(&self) -> bool {
///         matches!(self, MyError::NumberTaken)
///     }
///
///     fn is_retryable(&self) -> bool {
///         matches!(self, MyError::RequestTimeout)
///     }
/// }
/// ```
pub trait UnavailableError {
    /// Returns true if this error means the requested number was no longer
    /// available at purchase time.
    ///
    /// The acquisition loop treats this as a skip, not a failure.
    fn is_unavailable(&self) -> bool;

    /// Returns true if this error represents a transient failure that
    /// might succeed when the same call is retried.
    ///
    /// Examples: network timeouts, rate limits, temporary service outage.
    ///
    /// Default implementation returns false.
    fn is_retryable(&self) -> bool {
        false
    }
}
