//! Configuration module with business-specific sub-modules
//!
//! This module organizes configuration into logical areas:
//! - `environment` - Environment detection (production vs. non-production)
//! - `otp` - Passcode lifetime, attempt limit and store sizing
//! - `server` - HTTP server bind address and CORS settings
//! - `sms` - SMS provider credentials and timeouts
//!
//! Every loader has a `from_env` constructor and a `from_source` constructor
//! that takes a lookup function, so tests can supply variables without
//! touching the process environment.

pub mod environment;
pub mod otp;
pub mod server;
pub mod sms;

use serde::{Deserialize, Serialize};
use std::str::FromStr;

pub use environment::Environment;
pub use otp::OtpConfig;
pub use server::{CorsConfig, ServerConfig};
pub use sms::SmsConfig;

/// Complete application configuration combining all sub-configurations
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AppConfig {
    /// Environment configuration
    pub environment: Environment,

    /// Server configuration
    pub server: ServerConfig,

    /// SMS provider configuration
    pub sms: SmsConfig,

    /// OTP issuing and verification configuration
    pub otp: OtpConfig,
}

impl AppConfig {
    /// Load configuration from the process environment, reading `.env` first if present
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self::from_source(|key| std::env::var(key).ok())
    }

    /// Load configuration from an arbitrary variable lookup
    pub fn from_source<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let environment = Environment::from_source(&lookup);

        Self {
            environment,
            server: ServerConfig::from_source(&lookup),
            sms: SmsConfig::from_source(&lookup),
            otp: OtpConfig::from_source(environment, &lookup),
        }
    }

    pub fn is_production(&self) -> bool {
        self.environment.is_production()
    }
}

/// Parse a variable, falling back to `default` when it is unset or malformed
pub(crate) fn parse_or<T, F>(lookup: &F, key: &str, default: T) -> T
where
    T: FromStr,
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .and_then(|value| value.trim().parse().ok())
        .unwrap_or(default)
}

/// Read a variable, treating blank values as unset
pub(crate) fn non_empty<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
