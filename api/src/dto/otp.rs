use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::Validate;

use pv_core::errors::{DomainError, DomainResult};

/// Body of `POST /otp/send`
///
/// `phone` may arrive as a JSON string or number, e.g. `"+1 (555) 123-4567"`
/// or `15551234567`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SendOtpRequest {
    #[serde(default)]
    pub phone: Option<Value>,
}

/// Body of `POST /otp/verify`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct VerifyOtpRequest {
    #[serde(default)]
    pub phone: Option<Value>,

    #[serde(default)]
    pub code: Option<Value>,
}

/// Send input after scalar conversion, ready for validation
#[derive(Debug, Clone, Validate)]
pub struct SendOtpInput {
    /// Raw input, at most 32 characters before normalization
    #[validate(length(max = 32))]
    pub phone: Option<String>,
}

/// Verify input after scalar conversion, ready for validation
#[derive(Debug, Clone, Validate)]
pub struct VerifyOtpInput {
    #[validate(length(max = 32))]
    pub phone: Option<String>,

    pub code: Option<String>,
}

impl SendOtpRequest {
    /// Convert and validate the request body
    pub fn parse(self) -> DomainResult<SendOtpInput> {
        let input = SendOtpInput {
            phone: scalar_text(self.phone, "Invalid phone")?,
        };
        input
            .validate()
            .map_err(|_| DomainError::validation("Invalid phone"))?;
        Ok(input)
    }
}

impl VerifyOtpRequest {
    /// Convert and validate the request body
    pub fn parse(self) -> DomainResult<VerifyOtpInput> {
        let input = VerifyOtpInput {
            phone: scalar_text(self.phone, "Invalid phone")?,
            code: scalar_text(self.code, "Invalid code")?,
        };
        input
            .validate()
            .map_err(|_| DomainError::validation("Invalid phone"))?;
        Ok(input)
    }
}

/// Text form of a JSON scalar; `null` counts as absent
fn scalar_text(value: Option<Value>, invalid: &str) -> DomainResult<Option<String>> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(text)) => Ok(Some(text)),
        Some(Value::Number(number)) => Ok(Some(number.to_string())),
        Some(_) => Err(DomainError::validation(invalid)),
    }
}
