//! Core types for phone number acquisition.

use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use std::fmt::{self, Display, Formatter};
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// PhoneNumber
// =============================================================================

/// Error when parsing a phone number.
#[derive(Debug, Clone, Error)]
pub enum PhoneNumberError {
    /// Number is empty.
    #[error("phone number cannot be empty")]
    Empty,
    /// Number does not start with '+'.
    #[error("phone number must start with '+'")]
    MissingPlus,
    /// Number contains non-digit characters after the '+'.
    #[error("phone number must contain only digits after '+'")]
    NonDigit,
    /// Number has invalid length.
    #[error("phone number must be between 7 and 15 digits")]
    InvalidLength,
}

/// Phone number in E.164 format (e.g., "+14155552671").
///
/// This is the canonical identifier the provider uses for both available
/// and purchased numbers.
///
/// # Validation Rules
///
/// - Must start with '+'
/// - Must contain only digits after the '+'
/// - Must be between 7 and 15 digits
///
/// # Example
///
/// ```rust
/// use number_acquirer::PhoneNumber;
///
/// let number = PhoneNumber::new("+14155552671").unwrap();
/// assert_eq!(number.as_str(), "+14155552671");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    /// Create a new PhoneNumber from an E.164 string.
    pub fn new(s: impl AsRef<str>) -> Result<Self, PhoneNumberError> {
        let s = s.as_ref().trim();
        if s.is_empty() {
            return Err(PhoneNumberError::Empty);
        }
        let digits = s.strip_prefix('+').ok_or(PhoneNumberError::MissingPlus)?;
        if !digits.chars().all(|c| c.is_ascii_digit()) {
            return Err(PhoneNumberError::NonDigit);
        }
        if !(7..=15).contains(&digits.len()) {
            return Err(PhoneNumberError::InvalidLength);
        }
        Ok(Self(s.to_string()))
    }

    /// Get the number as a string slice, including the leading '+'.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Get the digits without the leading '+'.
    pub fn digits(&self) -> &str {
        &self.0[1..]
    }
}

impl FromStr for PhoneNumber {
    type Err = PhoneNumberError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl Display for PhoneNumber {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl<'de> Deserialize<'de> for PhoneNumber {
    fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(d)?;
        PhoneNumber::new(raw).map_err(de::Error::custom)
    }
}

impl Serialize for PhoneNumber {
    fn serialize<S: Serializer>(&self, s: S) -> Result<S::Ok, S::Error> {
        s.serialize_str(&self.0)
    }
}

// =============================================================================
// Sid
// =============================================================================

/// Provider-assigned identifier for a purchased number record.
///
/// Returned by the provider when a number is purchased and used to reference
/// the number in subsequent provider API calls.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Sid(String);

impl Sid {
    /// Create a new Sid from a string.
    pub fn new(sid: impl Into<String>) -> Self {
        Self(sid.into())
    }
}

impl Display for Sid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<str> for Sid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<String> for Sid {
    fn from(sid: String) -> Self {
        Self(sid)
    }
}

impl From<&str> for Sid {
    fn from(sid: &str) -> Self {
        Self(sid.to_string())
    }
}

// =============================================================================
// SearchFilter
// =============================================================================

/// Search options for available local phone numbers.
///
/// Field names deserialize from the camelCase settings object accepted at
/// the request boundary, so a partial override like
/// `{"smsEnabled": true, "beta": true}` fills the remaining fields with
/// defaults.
///
/// # Defaults
///
/// Every capability and address-exclusion flag defaults to `true`; `beta`
/// defaults to `false`; `limit` defaults to 1. The acquisition loop
/// overwrites `limit` each round with the quantity still outstanding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SearchFilter {
    /// Only return numbers that can receive SMS.
    pub sms_enabled: bool,
    /// Only return numbers that can receive MMS.
    pub mms_enabled: bool,
    /// Only return numbers that can receive voice calls.
    pub voice_enabled: bool,
    /// Exclude numbers that require an address anywhere.
    pub exclude_all_address_required: bool,
    /// Exclude numbers that require a local address.
    pub exclude_local_address_required: bool,
    /// Exclude numbers that require a foreign address.
    pub exclude_foreign_address_required: bool,
    /// Include numbers new to the provider's platform.
    pub beta: bool,
    /// Maximum number of candidates a single search returns.
    pub limit: u32,
}

impl Default for SearchFilter {
    fn default() -> Self {
        Self {
            sms_enabled: true,
            mms_enabled: true,
            voice_enabled: true,
            exclude_all_address_required: true,
            exclude_local_address_required: true,
            exclude_foreign_address_required: true,
            beta: false,
            limit: 1,
        }
    }
}

impl SearchFilter {
    /// Create a filter with the documented defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a copy of this filter with a different candidate limit.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }
}

// =============================================================================
// Capabilities
// =============================================================================

/// Messaging and voice capabilities of a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Capabilities {
    /// Number can receive voice calls.
    pub voice: bool,
    /// Number can receive SMS.
    pub sms: bool,
    /// Number can receive MMS.
    pub mms: bool,
}

// =============================================================================
// CandidateNumber
// =============================================================================

/// An available-for-purchase number returned by a search.
///
/// Candidates are ephemeral: a candidate is valid only until someone
/// (possibly a racing party) purchases it. A purchase attempt for a
/// candidate that was claimed in the meantime fails with the provider's
/// distinguished "not available" condition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateNumber {
    /// The number in E.164 format.
    pub phone_number: PhoneNumber,
    /// Human-readable rendering of the number.
    pub friendly_name: String,
    /// City or locality of the number, when known.
    pub locality: Option<String>,
    /// State or region of the number, when known.
    pub region: Option<String>,
    /// ISO country code of the number.
    pub iso_country: String,
    /// Messaging and voice capabilities.
    pub capabilities: Capabilities,
    /// Whether the number is new to the provider's platform.
    pub beta: bool,
}

// =============================================================================
// PurchasedNumber
// =============================================================================

/// The provider's confirmation record for a successfully purchased number.
///
/// Immutable once created; owned by the caller after the acquisition loop
/// returns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchasedNumber {
    /// Provider identifier for the purchased record.
    pub sid: Sid,
    /// The number in E.164 format.
    pub phone_number: PhoneNumber,
    /// Human-readable rendering of the number.
    pub friendly_name: String,
    /// Provider-side status of the number (e.g., "in-use").
    pub status: String,
    /// When the record was created, as reported by the provider.
    pub date_created: String,
    /// Messaging and voice capabilities.
    pub capabilities: Capabilities,
}

// =============================================================================
// AcquisitionResult
// =============================================================================

/// Outcome of an acquisition: the purchased numbers, in purchase order.
///
/// The list is never longer than the requested quantity; it is shorter when
/// availability was exhausted within the round budget.
#[derive(Debug, Clone, Default)]
pub struct AcquisitionResult {
    numbers: Vec<PurchasedNumber>,
    rounds: u32,
}

impl AcquisitionResult {
    pub(crate) fn new(numbers: Vec<PurchasedNumber>, rounds: u32) -> Self {
        Self { numbers, rounds }
    }

    /// The purchased numbers, insertion order = purchase order.
    pub fn numbers(&self) -> &[PurchasedNumber] {
        &self.numbers
    }

    /// Number of purchased numbers.
    pub fn len(&self) -> usize {
        self.numbers.len()
    }

    /// True if nothing was purchased.
    pub fn is_empty(&self) -> bool {
        self.numbers.is_empty()
    }

    /// How many search/purchase rounds ran.
    pub fn rounds(&self) -> u32 {
        self.rounds
    }

    /// Consume the result, yielding the purchased numbers.
    pub fn into_numbers(self) -> Vec<PurchasedNumber> {
        self.numbers
    }
}

impl IntoIterator for AcquisitionResult {
    type Item = PurchasedNumber;
    type IntoIter = std::vec::IntoIter<PurchasedNumber>;

    fn into_iter(self) -> Self::IntoIter {
        self.numbers.into_iter()
    }
}

// =============================================================================
// AcquireRequest
// =============================================================================

fn default_request_limit() -> u32 {
    1
}

/// Request accepted at the acquisition boundary.
///
/// Mirrors the provisioning request shape: an optional `limit` (how many
/// numbers to purchase, default 1) and an optional `phoneNumberSettings`
/// object overriding the default [`SearchFilter`].
///
/// # Example
///
/// ```rust
/// use number_acquirer::AcquireRequest;
///
/// let request: AcquireRequest = serde_json::from_str(
///     r#"{"limit": 3, "phoneNumberSettings": {"beta": true}}"#,
/// ).unwrap();
/// assert_eq!(request.limit, 3);
/// assert!(request.phone_number_settings.unwrap().beta);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AcquireRequest {
    /// How many numbers to purchase.
    #[serde(default = "default_request_limit")]
    pub limit: u32,
    /// Search filter override; defaults apply when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone_number_settings: Option<SearchFilter>,
}

impl Default for AcquireRequest {
    fn default() -> Self {
        Self::new(default_request_limit())
    }
}

impl AcquireRequest {
    /// Create a request for `limit` numbers with default search settings.
    pub fn new(limit: u32) -> Self {
        Self {
            limit,
            phone_number_settings: None,
        }
    }

    /// Set the search filter override.
    pub fn with_settings(mut self, settings: SearchFilter) -> Self {
        self.phone_number_settings = Some(settings);
        self
    }
}
