//! Configuration for the OTP service

use std::time::Duration;

use pv_shared::config::otp::MAX_TTL_SECONDS;
use pv_shared::config::AppConfig;

use crate::domain::entities::otp_record::{DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_SECONDS};

/// Configuration for the OTP service
#[derive(Debug, Clone)]
pub struct OtpServiceConfig {
    /// Validity window of an issued code
    pub ttl: chrono::Duration,
    /// Maximum number of verification attempts allowed
    pub max_attempts: u32,
    /// Production mode disables the lenient fallbacks
    pub is_production: bool,
    /// Whether send results carry the plaintext code
    pub expose_code: bool,
    /// Upper bound on a single SMS dispatch
    pub dispatch_timeout: Duration,
}

impl Default for OtpServiceConfig {
    fn default() -> Self {
        Self {
            ttl: chrono::Duration::seconds(DEFAULT_TTL_SECONDS),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            is_production: true,
            expose_code: false,
            dispatch_timeout: Duration::from_secs(10),
        }
    }
}

impl OtpServiceConfig {
    /// Derive the service settings from the application configuration
    pub fn from_app_config(config: &AppConfig) -> Self {
        Self {
            ttl: chrono::Duration::seconds(config.otp.ttl_seconds.min(MAX_TTL_SECONDS) as i64),
            max_attempts: config.otp.max_attempts,
            is_production: config.is_production(),
            expose_code: config.otp.expose_code,
            dispatch_timeout: Duration::from_secs(config.sms.dispatch_timeout_secs.max(1)),
        }
    }

    /// TTL in milliseconds, as reported to clients
    pub fn ttl_ms(&self) -> i64 {
        self.ttl.num_milliseconds()
    }

    /// Whole minutes of validity, for the message text
    pub fn ttl_minutes(&self) -> i64 {
        (self.ttl.num_seconds() + 59) / 60
    }
}
