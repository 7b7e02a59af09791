//! OTP lifetime and store configuration

use serde::{Deserialize, Serialize};

use super::{parse_or, Environment};

/// Longest accepted code lifetime (one day); larger values are clamped
pub const MAX_TTL_SECONDS: u64 = 86_400;

/// OTP issuing and verification settings
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OtpConfig {
    /// Validity window of an issued code, in seconds
    pub ttl_seconds: u64,
    /// Verification attempts allowed per code; the attempt after the last one is rejected
    pub max_attempts: u32,
    /// Upper bound on live records held in memory
    pub max_entries: usize,
    /// Interval of the background expiry sweep, in seconds
    pub sweep_interval_secs: u64,
    /// Whether send responses include the plaintext code (`otpToken`)
    pub expose_code: bool,
}

impl Default for OtpConfig {
    fn default() -> Self {
        Self {
            ttl_seconds: 300,
            max_attempts: 5,
            max_entries: 10_000,
            sweep_interval_secs: 60,
            expose_code: false,
        }
    }
}

impl OtpConfig {
    /// Load from `OTP_*` variables; `OTP_EXPOSE_CODE` defaults to on outside production
    pub fn from_source<F>(environment: Environment, lookup: &F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let expose_default = !environment.is_production();

        Self {
            ttl_seconds: parse_or(lookup, "OTP_TTL_SECONDS", defaults.ttl_seconds)
                .clamp(1, MAX_TTL_SECONDS),
            max_attempts: parse_or(lookup, "OTP_MAX_ATTEMPTS", defaults.max_attempts),
            max_entries: parse_or(lookup, "OTP_MAX_ENTRIES", defaults.max_entries).max(1),
            sweep_interval_secs: parse_or(
                lookup,
                "OTP_SWEEP_INTERVAL_SECS",
                defaults.sweep_interval_secs,
            )
            .max(1),
            expose_code: lookup("OTP_EXPOSE_CODE")
                .and_then(|value| parse_flag(&value))
                .unwrap_or(expose_default),
        }
    }
}

fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Some(true),
        "0" | "false" | "no" | "off" => Some(false),
        _ => None,
    }
}
