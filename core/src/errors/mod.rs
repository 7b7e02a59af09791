//! Domain-specific error types and error handling.

use thiserror::Error;

/// Core domain errors
///
/// The display text of the client-facing variants is the message returned
/// to API callers, so keep it short and free of internal detail.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Missing or malformed input
    #[error("{message}")]
    Validation { message: String },

    /// No active code for the phone number
    #[error("Code not found")]
    NotFound,

    /// The code has expired and was discarded
    #[error("Code expired")]
    Expired,

    /// Attempt limit exceeded; the code was discarded
    #[error("Too many attempts")]
    TooManyAttempts,

    /// Wrong code; further attempts are possible
    #[error("Invalid code")]
    Mismatch,

    /// The SMS provider rejected or failed the message
    #[error("SMS dispatch failed: {reason}")]
    DispatchFailed { reason: String },

    /// Unexpected fault (store failure and the like)
    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl DomainError {
    pub fn validation(message: impl Into<String>) -> Self {
        DomainError::Validation {
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        DomainError::Internal {
            message: message.into(),
        }
    }

    /// Whether the error was caused by the caller rather than the server
    pub fn is_client_error(&self) -> bool {
        !matches!(
            self,
            DomainError::DispatchFailed { .. } | DomainError::Internal { .. }
        )
    }
}

pub type DomainResult<T> = Result<T, DomainError>;
