//! Wire types for Twilio REST API responses.

use crate::types::{PhoneNumber, Sid};
use serde::{Deserialize, Serialize};

/// Capabilities object as Twilio serializes it.
///
/// The AvailablePhoneNumbers resource uses `"SMS"`/`"MMS"` keys while the
/// IncomingPhoneNumbers resource uses lowercase; aliases accept both.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct WireCapabilities {
    /// Number can receive voice calls.
    #[serde(default)]
    pub voice: bool,
    /// Number can receive SMS.
    #[serde(default, alias = "SMS")]
    pub sms: bool,
    /// Number can receive MMS.
    #[serde(default, alias = "MMS")]
    pub mms: bool,
    /// Number can receive faxes. Not surfaced in the domain model.
    #[serde(default)]
    pub fax: bool,
}

/// One entry of the AvailablePhoneNumbers > Local listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailablePhoneNumber {
    /// The number in E.164 format.
    pub phone_number: PhoneNumber,
    /// Human-readable rendering of the number.
    pub friendly_name: String,
    /// City or locality, when known.
    #[serde(default)]
    pub locality: Option<String>,
    /// State or region, when known.
    #[serde(default)]
    pub region: Option<String>,
    /// ISO country code.
    pub iso_country: String,
    /// Postal code, when known.
    #[serde(default)]
    pub postal_code: Option<String>,
    /// Capabilities of the number.
    #[serde(default)]
    pub capabilities: WireCapabilities,
    /// Whether the number is new to the Twilio platform.
    #[serde(default)]
    pub beta: bool,
}

/// Response page from the AvailablePhoneNumbers > Local listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AvailablePhoneNumbersPage {
    /// The candidates on this page.
    pub available_phone_numbers: Vec<AvailablePhoneNumber>,
    /// URI of this page.
    #[serde(default)]
    pub uri: Option<String>,
}

/// An IncomingPhoneNumber resource, returned when a number is purchased.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IncomingPhoneNumber {
    /// Identifier of the purchased record.
    pub sid: Sid,
    /// Owning account SID.
    #[serde(default)]
    pub account_sid: Option<String>,
    /// The number in E.164 format.
    pub phone_number: PhoneNumber,
    /// Human-readable rendering of the number.
    pub friendly_name: String,
    /// Status of the number (e.g., "in-use").
    pub status: String,
    /// When the record was created (RFC 2822).
    pub date_created: String,
    /// Capabilities of the number.
    #[serde(default)]
    pub capabilities: WireCapabilities,
}
