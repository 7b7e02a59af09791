//! # Infrastructure Layer
//!
//! This crate implements the infrastructure layer for the PhoneVerify service,
//! following Clean Architecture principles. It provides concrete
//! implementations of the traits declared in `pv_core`:
//!
//! - **SMS**: Twilio dispatcher and a log-only dispatcher for unconfigured setups
//! - **Cache**: In-memory OTP store with an entry cap and a background expiry sweep

// Re-export core types for convenience
pub use pv_core::errors::*;

/// SMS service module - External SMS providers
pub mod sms;

/// Cache module - In-process OTP storage
pub mod cache;

/// Infrastructure-specific error types
#[derive(Debug, thiserror::Error)]
pub enum InfrastructureError {
    /// HTTP request error for external services
    #[error("HTTP request error: {0}")]
    Http(#[from] reqwest::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}
