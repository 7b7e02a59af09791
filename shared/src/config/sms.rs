//! SMS provider configuration

use serde::{Deserialize, Serialize};

use super::{non_empty, parse_or};

/// Default Twilio REST API base URL
pub const DEFAULT_TWILIO_API_BASE: &str = "https://api.twilio.com";

/// SMS provider configuration
///
/// Credentials are optional: when any of them is missing the service runs
/// in log-only mode instead of refusing to start.
#[derive(Clone, Deserialize, Serialize)]
pub struct SmsConfig {
    /// Twilio Account SID
    pub account_sid: Option<String>,
    /// Twilio Auth Token
    pub auth_token: Option<String>,
    /// Sender: a Twilio number, messaging service SID or alphanumeric ID
    pub from_number: Option<String>,
    /// Base URL of the provider API
    pub api_base: String,
    /// Upper bound for a single dispatch, in seconds
    pub dispatch_timeout_secs: u64,
}

/// Complete set of provider credentials
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmsCredentials<'a> {
    pub account_sid: &'a str,
    pub auth_token: &'a str,
    pub from_number: &'a str,
}

impl Default for SmsConfig {
    fn default() -> Self {
        Self {
            account_sid: None,
            auth_token: None,
            from_number: None,
            api_base: DEFAULT_TWILIO_API_BASE.to_string(),
            dispatch_timeout_secs: 10,
        }
    }
}

impl SmsConfig {
    /// Load from `TWILIO_*` variables and `SMS_DISPATCH_TIMEOUT_SECS`
    pub fn from_source<F>(lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            account_sid: non_empty(lookup, "TWILIO_ACCOUNT_SID"),
            auth_token: non_empty(lookup, "TWILIO_AUTH_TOKEN"),
            from_number: non_empty(lookup, "TWILIO_FROM_NUMBER")
                .or_else(|| non_empty(lookup, "TWILIO_FROM")),
            api_base: non_empty(lookup, "TWILIO_API_BASE").unwrap_or(defaults.api_base),
            dispatch_timeout_secs: parse_or(
                lookup,
                "SMS_DISPATCH_TIMEOUT_SECS",
                defaults.dispatch_timeout_secs,
            ),
        }
    }

    /// Returns the credentials only when all three are present
    pub fn credentials(&self) -> Option<SmsCredentials<'_>> {
        Some(SmsCredentials {
            account_sid: self.account_sid.as_deref()?,
            auth_token: self.auth_token.as_deref()?,
            from_number: self.from_number.as_deref()?,
        })
    }
}

// Hand-written so the auth token never ends up in logs.
impl std::fmt::Debug for SmsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SmsConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &self.auth_token.as_ref().map(|_| "<redacted>"))
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .field("dispatch_timeout_secs", &self.dispatch_timeout_secs)
            .finish()
    }
}
