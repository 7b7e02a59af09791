//! Shared utilities and common types for the PhoneVerify server
//!
//! This crate provides common functionality used across all server modules:
//! - Configuration types loaded from the environment
//! - Utility functions (phone normalization and masking)

pub mod config;
pub mod utils;

// Re-export commonly used items at crate root
pub use config::{AppConfig, Environment, OtpConfig, ServerConfig, SmsConfig};
pub use utils::phone;
