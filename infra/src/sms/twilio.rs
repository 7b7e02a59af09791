//! Twilio SMS Service Implementation
//!
//! Sends messages through the Twilio Programmable Messaging REST API and
//! classifies provider errors into [`DispatchOutcome`] values.
//!
//! ## Features
//!
//! - Basic-auth form POST to `/2010-04-01/Accounts/{sid}/Messages.json`
//! - Request timeout from configuration
//! - Trial-account restrictions (error 21608) reported separately from failures
//! - Security: Phone number masking in logs

use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

use pv_core::services::otp::{DispatchOutcome, SmsDispatcher};
use pv_shared::config::SmsConfig;
use pv_shared::phone::{mask_phone_number, to_e164};

use crate::InfrastructureError;

/// Twilio error code for "unverified recipient on a trial account"
pub const TRIAL_UNVERIFIED_CODE: u32 = 21608;

/// Markers (error code, or HTTP status when no code is given) treated as trial restrictions
const TRIAL_MARKERS: [u32; 2] = [TRIAL_UNVERIFIED_CODE, 400];

/// Twilio caps message bodies at 1600 characters
const MAX_BODY_CHARS: usize = 1600;

/// Twilio SMS service configuration
#[derive(Clone)]
pub struct TwilioConfig {
    /// Twilio Account SID
    pub account_sid: String,
    /// Twilio Auth Token
    pub auth_token: String,
    /// Sender, passed to Twilio as configured
    pub from_number: String,
    /// REST API base URL
    pub api_base: String,
    /// Timeout for API requests in seconds
    pub request_timeout_secs: u64,
}

impl TwilioConfig {
    /// Build from the shared SMS configuration
    ///
    /// Fails when credentials are incomplete. The sender is not validated
    /// locally; Twilio rejects a bad one at send time.
    pub fn from_sms_config(config: &SmsConfig) -> Result<Self, InfrastructureError> {
        let credentials = config.credentials().ok_or_else(|| {
            InfrastructureError::Config(
                "TWILIO_ACCOUNT_SID, TWILIO_AUTH_TOKEN and TWILIO_FROM_NUMBER must all be set"
                    .to_string(),
            )
        })?;

        Ok(Self {
            account_sid: credentials.account_sid.to_string(),
            auth_token: credentials.auth_token.to_string(),
            from_number: credentials.from_number.to_string(),
            api_base: config.api_base.trim_end_matches('/').to_string(),
            request_timeout_secs: config.dispatch_timeout_secs.max(1),
        })
    }
}

impl std::fmt::Debug for TwilioConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TwilioConfig")
            .field("account_sid", &self.account_sid)
            .field("auth_token", &"<redacted>")
            .field("from_number", &self.from_number)
            .field("api_base", &self.api_base)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .finish()
    }
}

/// Message id reported when a 2xx body carries no readable SID
pub const UNKNOWN_MESSAGE_ID: &str = "unknown";

/// Successful message creation response (only the fields we use)
#[derive(Debug, Deserialize)]
struct TwilioMessage {
    sid: String,
}

/// Twilio REST error body
#[derive(Debug, Default, Deserialize)]
pub struct TwilioErrorBody {
    pub code: Option<u32>,
    pub message: Option<String>,
    pub status: Option<u16>,
    pub more_info: Option<String>,
}

/// Twilio dispatcher
pub struct TwilioDispatcher {
    client: reqwest::Client,
    config: TwilioConfig,
}

impl TwilioDispatcher {
    /// Create a new Twilio dispatcher
    pub fn new(config: TwilioConfig) -> Result<Self, InfrastructureError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        info!(
            "Twilio SMS service initialized with from number: {}",
            mask_phone_number(&config.from_number)
        );

        Ok(Self { client, config })
    }

    fn messages_url(&self) -> String {
        format!(
            "{}/2010-04-01/Accounts/{}/Messages.json",
            self.config.api_base, self.config.account_sid
        )
    }

    async fn send(&self, to: &str, body: &str) -> Result<DispatchOutcome, InfrastructureError> {
        let response = self
            .client
            .post(self.messages_url())
            .basic_auth(&self.config.account_sid, Some(&self.config.auth_token))
            .form(&[
                ("To", to),
                ("From", self.config.from_number.as_str()),
                ("Body", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            // Twilio accepted the message; an unreadable body must not turn that into a failure
            let text = response.text().await.unwrap_or_default();
            let message_id = match serde_json::from_str::<TwilioMessage>(&text) {
                Ok(message) => message.sid,
                Err(e) => {
                    warn!("Twilio returned HTTP {} with an unreadable body: {}", status.as_u16(), e);
                    UNKNOWN_MESSAGE_ID.to_string()
                }
            };
            return Ok(DispatchOutcome::Delivered { message_id });
        }

        let text = response.text().await.unwrap_or_default();
        Ok(classify_error(status.as_u16(), &text))
    }
}

/// Map a Twilio error response to a dispatch outcome
///
/// The error code decides when present; the HTTP status is used otherwise.
pub fn classify_error(http_status: u16, body: &str) -> DispatchOutcome {
    let error: TwilioErrorBody = serde_json::from_str(body).unwrap_or_default();
    let marker = error
        .code
        .unwrap_or_else(|| u32::from(error.status.unwrap_or(http_status)));

    let reason = match (&error.code, &error.message) {
        (Some(code), Some(message)) => format!("Twilio error {} (HTTP {}): {}", code, http_status, message),
        (None, Some(message)) => format!("Twilio HTTP {}: {}", http_status, message),
        (Some(code), None) => format!("Twilio error {} (HTTP {})", code, http_status),
        (None, None) => format!("Twilio HTTP {}", http_status),
    };

    if TRIAL_MARKERS.contains(&marker) {
        DispatchOutcome::TrialRestricted { reason }
    } else {
        DispatchOutcome::Failed { reason }
    }
}

#[async_trait]
impl SmsDispatcher for TwilioDispatcher {
    async fn dispatch(&self, phone: &str, body: &str) -> DispatchOutcome {
        let to = to_e164(phone);

        if body.chars().count() > MAX_BODY_CHARS {
            return DispatchOutcome::Failed {
                reason: format!("Message exceeds maximum length of {} characters", MAX_BODY_CHARS),
            };
        }

        debug!("Sending SMS to {} via Twilio", mask_phone_number(&to));

        match self.send(&to, body).await {
            Ok(DispatchOutcome::Delivered { message_id }) => {
                info!(
                    "SMS sent successfully to {} with SID: {}",
                    mask_phone_number(&to),
                    message_id
                );
                DispatchOutcome::Delivered { message_id }
            }
            Ok(DispatchOutcome::TrialRestricted { reason }) => {
                warn!(
                    "Twilio refused {} due to trial restrictions: {}",
                    mask_phone_number(&to),
                    reason
                );
                DispatchOutcome::TrialRestricted { reason }
            }
            Ok(other) => {
                error!("Twilio rejected SMS to {}: {:?}", mask_phone_number(&to), other);
                other
            }
            Err(e) => {
                error!("Failed to send SMS to {}: {}", mask_phone_number(&to), e);
                DispatchOutcome::Failed {
                    reason: e.to_string(),
                }
            }
        }
    }

    fn provider_name(&self) -> &str {
        "Twilio"
    }
}
