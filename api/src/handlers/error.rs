//! Mapping from domain errors to HTTP responses
//!
//! Every failure is rendered as `{ "ok": false, "error": "..." }`. Client
//! errors carry the domain message; server errors carry a fixed message per
//! operation and are logged with their detail instead.

use actix_web::{error::JsonPayloadError, HttpRequest, HttpResponse};

use pv_core::errors::DomainError;

use crate::dto::OtpResponse;

/// Message returned when the JSON body cannot be parsed
pub const INVALID_BODY_MESSAGE: &str = "Invalid request body";

/// The endpoint an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Send,
    Verify,
}

impl Operation {
    /// Body text for 500 responses
    pub fn failure_message(&self) -> &'static str {
        match self {
            Operation::Send => "OTP send failed",
            Operation::Verify => "OTP verify failed",
        }
    }
}

/// Convert a domain error into the HTTP response for `operation`
pub fn handle_domain_error(error: &DomainError, operation: Operation) -> HttpResponse {
    match error {
        DomainError::Validation { .. }
        | DomainError::NotFound
        | DomainError::Expired
        | DomainError::Mismatch => {
            tracing::debug!(error = %error, ?operation, "Rejected OTP request");
            HttpResponse::BadRequest().json(OtpResponse::failure(error.to_string()))
        }
        DomainError::TooManyAttempts => {
            tracing::info!(?operation, "OTP attempt limit exceeded");
            HttpResponse::TooManyRequests().json(OtpResponse::failure(error.to_string()))
        }
        DomainError::DispatchFailed { .. } | DomainError::Internal { .. } => {
            tracing::error!(error = %error, ?operation, "OTP request failed");
            HttpResponse::InternalServerError()
                .json(OtpResponse::failure(operation.failure_message()))
        }
    }
}

/// `JsonConfig` error handler turning extractor failures into a 400 envelope
pub fn json_error_handler(error: JsonPayloadError, req: &HttpRequest) -> actix_web::Error {
    tracing::debug!(error = %error, path = req.path(), "Malformed request body");
    let response = HttpResponse::BadRequest().json(OtpResponse::failure(INVALID_BODY_MESSAGE));
    actix_web::error::InternalError::from_response(error, response).into()
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;

    #[test]
    fn test_client_errors_are_bad_request() {
        for error in [
            DomainError::validation("Missing phone"),
            DomainError::NotFound,
            DomainError::Expired,
            DomainError::Mismatch,
        ] {
            let response = handle_domain_error(&error, Operation::Verify);
            assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        }
    }

    #[test]
    fn test_too_many_attempts_status() {
        let response = handle_domain_error(&DomainError::TooManyAttempts, Operation::Verify);
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }

    #[test]
    fn test_server_errors_status() {
        let dispatch = DomainError::DispatchFailed {
            reason: "HTTP 503".to_string(),
        };
        assert_eq!(
            handle_domain_error(&dispatch, Operation::Send).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            handle_domain_error(&DomainError::internal("lock poisoned"), Operation::Verify).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_failure_messages() {
        assert_eq!(Operation::Send.failure_message(), "OTP send failed");
        assert_eq!(Operation::Verify.failure_message(), "OTP verify failed");
    }
}
