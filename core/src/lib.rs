//! # PhoneVerify Core
//!
//! Core business logic and domain layer for the PhoneVerify backend.
//! This crate contains the OTP record entity, the OTP service, the traits
//! its collaborators implement (SMS dispatcher, record store, clock) and the
//! domain error type.

pub mod domain;
pub mod errors;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::*;
pub use errors::*;
pub use services::*;
