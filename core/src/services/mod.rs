//! Business services containing domain logic and use cases.

pub mod otp;

// Re-export commonly used types
pub use otp::{
    Clock, DeliveryNote, DispatchOutcome, OtpService, OtpServiceConfig, OtpStore,
    SendCodeResult, SmsDispatcher, SystemClock,
};
