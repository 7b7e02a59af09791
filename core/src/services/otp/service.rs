//! Main OTP service implementation

use std::sync::Arc;

use pv_shared::phone::normalize_phone_number;

use crate::domain::entities::otp_record::{AttemptOutcome, OtpRecord};
use crate::errors::{DomainError, DomainResult};

use super::clock::Clock;
use super::config::OtpServiceConfig;
use super::traits::{OtpStore, SmsDispatcher};
use super::types::{DeliveryNote, DispatchOutcome, SendCodeResult};

/// Code returned when sending fails internally outside production
pub const DEV_FALLBACK_CODE: &str = "123456";

/// OTP service issuing and verifying passcodes for phone numbers
pub struct OtpService {
    /// SMS provider used to deliver codes
    dispatcher: Arc<dyn SmsDispatcher>,
    /// Storage for outstanding codes
    store: Arc<dyn OtpStore>,
    /// Time source
    clock: Arc<dyn Clock>,
    /// Service configuration
    config: OtpServiceConfig,
}

impl OtpService {
    /// Create a new OTP service
    pub fn new(
        dispatcher: Arc<dyn SmsDispatcher>,
        store: Arc<dyn OtpStore>,
        clock: Arc<dyn Clock>,
        config: OtpServiceConfig,
    ) -> Self {
        Self {
            dispatcher,
            store,
            clock,
            config,
        }
    }

    /// Issue a new code for a phone number and try to deliver it
    ///
    /// Returns `Validation` for a missing or digit-less phone. Provider
    /// failures only surface as errors in production; elsewhere the code is
    /// logged and the call succeeds with a [`DeliveryNote`].
    pub async fn send_code(&self, raw_phone: Option<&str>) -> DomainResult<SendCodeResult> {
        let raw_phone = match raw_phone.map(str::trim) {
            Some(value) if !value.is_empty() => value,
            _ => return Err(DomainError::validation("Missing phone")),
        };

        let phone = normalize_phone_number(raw_phone);
        if phone.is_empty() {
            return Err(DomainError::validation("Invalid phone"));
        }

        match self.issue_and_dispatch(&phone).await {
            Err(DomainError::Internal { message }) if !self.config.is_production => {
                tracing::warn!(
                    error = %message,
                    code = DEV_FALLBACK_CODE,
                    event = "otp_dev_fallback",
                    "[DEV FALLBACK] OTP => {}",
                    DEV_FALLBACK_CODE
                );
                Ok(self.success(&phone, Some(DeliveryNote::DevFallback), None, DEV_FALLBACK_CODE))
            }
            other => other,
        }
    }

    /// Check a submitted code for a phone number
    ///
    /// A successful check consumes the code. The code is compared exactly as
    /// submitted, without trimming.
    pub async fn verify_code(&self, raw_phone: Option<&str>, code: Option<&str>) -> DomainResult<()> {
        let raw_phone = raw_phone.map(str::trim).unwrap_or_default();
        let code = code.unwrap_or_default();
        if raw_phone.is_empty() || code.is_empty() {
            return Err(DomainError::validation("Missing phone/code"));
        }

        let phone = normalize_phone_number(raw_phone);
        let outcome = self
            .store
            .attempt(&phone, code, self.clock.now(), self.config.max_attempts)
            .await
            .map_err(|e| {
                tracing::error!(
                    phone = %phone,
                    error = %e,
                    event = "otp_store_failed",
                    "Failed to check verification code"
                );
                DomainError::internal(format!("Failed to check verification code: {}", e))
            })?;

        match outcome {
            AttemptOutcome::Verified => {
                tracing::info!(phone = %phone, event = "otp_verified", "Verification code accepted");
                Ok(())
            }
            AttemptOutcome::NotFound => Err(DomainError::NotFound),
            AttemptOutcome::Expired => {
                tracing::info!(phone = %phone, event = "otp_expired", "Verification code expired");
                Err(DomainError::Expired)
            }
            AttemptOutcome::Exhausted => {
                tracing::warn!(
                    phone = %phone,
                    event = "otp_attempts_exhausted",
                    "Verification attempts exceeded, code discarded"
                );
                Err(DomainError::TooManyAttempts)
            }
            AttemptOutcome::Mismatch { remaining } => {
                tracing::info!(
                    phone = %phone,
                    remaining_attempts = remaining,
                    event = "otp_mismatch",
                    "Invalid verification code submitted"
                );
                Err(DomainError::Mismatch)
            }
        }
    }

    async fn issue_and_dispatch(&self, phone: &str) -> DomainResult<SendCodeResult> {
        let record = OtpRecord::issue(phone, self.clock.now(), self.config.ttl);
        let code = record.code.clone();

        self.store.put(record).await.map_err(|e| {
            tracing::error!(
                phone = phone,
                error = %e,
                event = "otp_storage_failed",
                "Failed to store verification code"
            );
            DomainError::internal(format!("Failed to store verification code: {}", e))
        })?;

        tracing::info!(phone = phone, event = "otp_generated", "Generated new verification code");

        let body = format!(
            "Your verification code is {}. It expires in {} minutes.",
            code,
            self.config.ttl_minutes()
        );

        let outcome = match tokio::time::timeout(
            self.config.dispatch_timeout,
            self.dispatcher.dispatch(phone, &body),
        )
        .await
        {
            Ok(outcome) => outcome,
            Err(_) => DispatchOutcome::Failed {
                reason: format!(
                    "{} dispatch timed out after {:?}",
                    self.dispatcher.provider_name(),
                    self.config.dispatch_timeout
                ),
            },
        };

        match outcome {
            DispatchOutcome::NotConfigured => {
                tracing::info!(
                    phone = phone,
                    code = %code,
                    event = "otp_log_only",
                    "[OTP LOG-ONLY] {} => {}",
                    phone,
                    code
                );
                Ok(self.success(phone, Some(DeliveryNote::LogOnly), None, &code))
            }
            DispatchOutcome::Delivered { message_id } => {
                tracing::info!(
                    phone = phone,
                    message_id = %message_id,
                    provider = self.dispatcher.provider_name(),
                    event = "otp_sent",
                    "Verification code sent"
                );
                Ok(self.success(phone, None, Some(message_id), &code))
            }
            DispatchOutcome::TrialRestricted { reason } => {
                tracing::warn!(
                    phone = phone,
                    code = %code,
                    reason = %reason,
                    event = "otp_trial_restricted",
                    "[OTP TRIAL LOG-ONLY] {} => {}",
                    phone,
                    code
                );
                Ok(self.success(phone, Some(DeliveryNote::ProviderTrialUnverified), None, &code))
            }
            DispatchOutcome::Failed { reason } if !self.config.is_production => {
                tracing::warn!(
                    phone = phone,
                    code = %code,
                    error = %reason,
                    event = "otp_send_dev_fallback",
                    "[OTP SEND ERROR DEV-FALLBACK] {} => {}",
                    phone,
                    code
                );
                Ok(self.success(phone, Some(DeliveryNote::DevFallback), None, &code))
            }
            DispatchOutcome::Failed { reason } => {
                tracing::error!(
                    phone = phone,
                    error = %reason,
                    provider = self.dispatcher.provider_name(),
                    event = "otp_send_failed",
                    "Failed to send verification code"
                );
                Err(DomainError::DispatchFailed { reason })
            }
        }
    }

    fn success(
        &self,
        phone: &str,
        note: Option<DeliveryNote>,
        message_id: Option<String>,
        code: &str,
    ) -> SendCodeResult {
        SendCodeResult {
            phone: phone.to_string(),
            note,
            message_id,
            ttl_ms: self.config.ttl_ms(),
            code: self.config.expose_code.then(|| code.to_string()),
        }
    }
}
