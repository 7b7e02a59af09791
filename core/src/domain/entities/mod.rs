//! Domain entities representing core business objects.

pub mod otp_record;

// Re-export commonly used types
pub use otp_record::{
    AttemptOutcome, OtpRecord, CODE_LENGTH, DEFAULT_MAX_ATTEMPTS, DEFAULT_TTL_SECONDS,
};
