//! Types for OTP service results

use serde::{Deserialize, Serialize};

/// Outcome of handing a message to the SMS provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// The provider accepted the message
    Delivered { message_id: String },
    /// No provider is configured; nothing was sent
    NotConfigured,
    /// The provider refused because of trial-account restrictions
    /// (e.g. the recipient is not a verified number)
    TrialRestricted { reason: String },
    /// Any other provider or transport failure
    Failed { reason: String },
}

/// Explanatory note attached to a successful send without real delivery
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DeliveryNote {
    /// No provider configured; the code was only logged
    #[serde(rename = "log-only")]
    LogOnly,
    /// The provider refused because of a trial-account restriction
    #[serde(rename = "provider_trial_unverified")]
    ProviderTrialUnverified,
    /// Delivery failed outside production; the code was only logged
    #[serde(rename = "dev_fallback")]
    DevFallback,
}

impl DeliveryNote {
    pub fn as_str(&self) -> &'static str {
        match self {
            DeliveryNote::LogOnly => "log-only",
            DeliveryNote::ProviderTrialUnverified => "provider_trial_unverified",
            DeliveryNote::DevFallback => "dev_fallback",
        }
    }
}

impl std::fmt::Display for DeliveryNote {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of sending a verification code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendCodeResult {
    /// Normalized phone number the code was issued for
    pub phone: String,
    /// Set when the code was not actually delivered by the provider
    pub note: Option<DeliveryNote>,
    /// Provider message identifier, when delivered
    pub message_id: Option<String>,
    /// Validity window in milliseconds
    pub ttl_ms: i64,
    /// The plaintext code, only when code exposure is enabled
    pub code: Option<String>,
}
