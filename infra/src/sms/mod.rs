//! SMS Service Module
//!
//! This module provides SMS dispatcher implementations for delivering
//! verification codes.
//!
//! ## Features
//!
//! - **Twilio Support**: Production SMS via the Twilio REST API
//! - **Log-only Implementation**: Used when no provider is configured
//! - **Security**: Phone number masking in logs

use std::sync::Arc;

use pv_core::services::otp::SmsDispatcher;
use pv_shared::config::SmsConfig;

pub mod log_only;
pub mod twilio;

// Re-export commonly used types
pub use log_only::LogOnlyDispatcher;
pub use twilio::{classify_error, TwilioConfig, TwilioDispatcher};

/// Create an SMS dispatcher based on configuration
///
/// Returns the Twilio dispatcher when credentials are complete,
/// otherwise the log-only dispatcher. Missing or broken credentials never
/// abort startup.
pub fn create_dispatcher(config: &SmsConfig) -> Arc<dyn SmsDispatcher> {
    if config.credentials().is_none() {
        tracing::warn!("SMS provider credentials not set, running in log-only mode");
        return Arc::new(LogOnlyDispatcher::new());
    }

    match TwilioConfig::from_sms_config(config).and_then(TwilioDispatcher::new) {
        Ok(dispatcher) => Arc::new(dispatcher),
        Err(e) => {
            tracing::error!("Failed to initialize Twilio SMS service: {}", e);
            tracing::warn!("Falling back to log-only SMS dispatcher");
            Arc::new(LogOnlyDispatcher::new())
        }
    }
}
