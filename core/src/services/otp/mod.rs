//! OTP service module for phone-number verification
//!
//! This module provides the complete passcode workflow:
//! - Code generation and storage (one active code per phone number)
//! - Dispatch through a pluggable SMS provider with tiered fallback
//! - Verification with expiry and attempt tracking

mod clock;
mod config;
mod service;
mod traits;
mod types;


pub use clock::{Clock, SystemClock};
pub use config::OtpServiceConfig;
pub use service::{OtpService, DEV_FALLBACK_CODE};
pub use traits::{OtpStore, SmsDispatcher};
pub use types::{DeliveryNote, DispatchOutcome, SendCodeResult};
