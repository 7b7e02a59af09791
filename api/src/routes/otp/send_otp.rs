use actix_web::{web, HttpResponse};

use crate::dto::{OtpResponse, SendOtpRequest};
use crate::handlers::error::{handle_domain_error, Operation};

use super::AppState;

/// Handler for `POST /otp/send`
///
/// # Request Body
///
/// ```json
/// { "phone": "+1 555-123-4567" }
/// ```
///
/// # Response
///
/// ```json
/// { "ok": true, "note": "log-only", "ttlMs": 300000, "otpToken": "482913" }
/// ```
///
/// `note` is absent when the provider accepted the message; `sid` then
/// carries the provider message id. `otpToken` is only present when code
/// exposure is enabled.
pub async fn send_otp(
    state: web::Data<AppState>,
    request: web::Json<SendOtpRequest>,
) -> HttpResponse {
    let input = match request.into_inner().parse() {
        Ok(input) => input,
        Err(error) => return handle_domain_error(&error, Operation::Send),
    };

    match state.otp_service.send_code(input.phone.as_deref()).await {
        Ok(result) => HttpResponse::Ok().json(OtpResponse::from(result)),
        Err(error) => handle_domain_error(&error, Operation::Send),
    }
}
