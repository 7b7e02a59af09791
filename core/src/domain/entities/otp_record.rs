//! OTP record entity for phone-number verification.

use chrono::{DateTime, Duration, Utc};
use constant_time_eq::constant_time_eq;
use rand::{rngs::OsRng, Rng};
use serde::{Deserialize, Serialize};

/// Default number of verification attempts allowed per code
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Length of the verification code
pub const CODE_LENGTH: usize = 6;

/// Default validity window for a code (5 minutes)
pub const DEFAULT_TTL_SECONDS: i64 = 300;

/// A single outstanding passcode, keyed by normalized phone number
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtpRecord {
    /// Digit-only phone number this code belongs to
    pub phone: String,

    /// The 6-digit verification code
    pub code: String,

    /// Timestamp when the code was issued
    pub created_at: DateTime<Utc>,

    /// Timestamp after which the code is no longer accepted
    pub expires_at: DateTime<Utc>,

    /// Number of verification attempts made against this code
    pub attempts: u32,
}

/// Result of checking a submitted code against a stored record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptOutcome {
    /// No record exists for the phone number
    NotFound,
    /// The code has passed its expiry time; the record must be dropped
    Expired,
    /// The attempt limit was exceeded; the record must be dropped
    Exhausted,
    /// Wrong code; the record stays so the caller can retry
    Mismatch { remaining: u32 },
    /// Correct code; the record has been consumed
    Verified,
}

impl AttemptOutcome {
    /// Whether the record should be deleted after this outcome
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            AttemptOutcome::Expired | AttemptOutcome::Exhausted | AttemptOutcome::Verified
        )
    }
}

impl OtpRecord {
    /// Creates a record with a freshly generated code
    pub fn issue(phone: impl Into<String>, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self::with_code(phone, Self::generate_code(), now, ttl)
    }

    /// Creates a record with a caller-provided code
    pub fn with_code(
        phone: impl Into<String>,
        code: impl Into<String>,
        now: DateTime<Utc>,
        ttl: Duration,
    ) -> Self {
        Self {
            phone: phone.into(),
            code: code.into(),
            created_at: now,
            expires_at: now.checked_add_signed(ttl).unwrap_or(DateTime::<Utc>::MAX_UTC),
            attempts: 0,
        }
    }

    /// Generates a 6-digit code from the operating system CSPRNG
    ///
    /// The first digit is never zero, so the code survives clients that
    /// treat it as a number.
    pub fn generate_code() -> String {
        let code: u32 = OsRng.gen_range(100_000..1_000_000);
        code.to_string()
    }

    /// Checks if the code has expired at `now`
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        now > self.expires_at
    }

    /// Registers one verification attempt
    ///
    /// Expiry is checked before the attempt is counted. The attempt counter
    /// is incremented before the limit check, so with a limit of 5 the
    /// sixth attempt is rejected even if it carries the right code.
    pub fn register_attempt(
        &mut self,
        submitted: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> AttemptOutcome {
        if self.is_expired(now) {
            return AttemptOutcome::Expired;
        }

        self.attempts = self.attempts.saturating_add(1);
        if self.attempts > max_attempts {
            return AttemptOutcome::Exhausted;
        }

        if constant_time_eq(self.code.as_bytes(), submitted.as_bytes()) {
            AttemptOutcome::Verified
        } else {
            AttemptOutcome::Mismatch {
                remaining: max_attempts - self.attempts,
            }
        }
    }
}
