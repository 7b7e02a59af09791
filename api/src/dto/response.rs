use serde::{Deserialize, Serialize};

use pv_core::services::otp::SendCodeResult;

/// Envelope for every OTP endpoint response
///
/// Optional fields are omitted from the JSON when unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OtpResponse {
    pub ok: bool,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub sid: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub ttl_ms: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub otp_token: Option<String>,
}

impl OtpResponse {
    pub fn success() -> Self {
        Self {
            ok: true,
            ..Default::default()
        }
    }

    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            ok: false,
            error: Some(error.into()),
            ..Default::default()
        }
    }
}

impl From<SendCodeResult> for OtpResponse {
    fn from(result: SendCodeResult) -> Self {
        Self {
            ok: true,
            error: None,
            note: result.note.map(|note| note.as_str().to_string()),
            sid: result.message_id,
            ttl_ms: Some(result.ttl_ms),
            otp_token: result.code,
        }
    }
}

/// Body of `GET /health`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub ok: bool,
    pub timestamp: String,
}
