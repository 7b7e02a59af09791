//! Traits for SMS dispatch and record storage

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::entities::otp_record::{AttemptOutcome, OtpRecord};

use super::types::DispatchOutcome;

/// Trait for SMS provider integration
///
/// Provider failures are reported through [`DispatchOutcome`] rather than an
/// error, so the service can apply its fallback policy per outcome.
#[async_trait]
pub trait SmsDispatcher: Send + Sync {
    /// Send `body` to the digit-only phone number `phone`
    async fn dispatch(&self, phone: &str, body: &str) -> DispatchOutcome;

    /// Name of the provider, for logs
    fn provider_name(&self) -> &str;
}

/// Trait for OTP record storage
///
/// Every method that reads and then mutates a record must do so atomically
/// with respect to other calls for the same phone number.
#[async_trait]
pub trait OtpStore: Send + Sync {
    /// Store a record, replacing any previous record for the same phone
    async fn put(&self, record: OtpRecord) -> Result<(), String>;

    /// Register a verification attempt and drop the record on terminal outcomes
    async fn attempt(
        &self,
        phone: &str,
        submitted: &str,
        now: DateTime<Utc>,
        max_attempts: u32,
    ) -> Result<AttemptOutcome, String>;

    /// Fetch a copy of the record for a phone number
    async fn get(&self, phone: &str) -> Result<Option<OtpRecord>, String>;

    /// Remove the record for a phone number, returning whether one existed
    async fn remove(&self, phone: &str) -> Result<bool, String>;

    /// Drop every record that has expired at `now`, returning how many were dropped
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<usize, String>;

    /// Number of records currently held
    async fn len(&self) -> Result<usize, String>;
}
