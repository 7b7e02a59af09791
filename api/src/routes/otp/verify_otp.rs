use actix_web::{web, HttpResponse};

use crate::dto::{OtpResponse, VerifyOtpRequest};
use crate::handlers::error::{handle_domain_error, Operation};

use super::AppState;

/// Handler for `POST /otp/verify`
///
/// Responds `{ "ok": true }` when the code matches. The code is consumed, so
/// a second verify with the same code fails with "Code not found".
pub async fn verify_otp(
    state: web::Data<AppState>,
    request: web::Json<VerifyOtpRequest>,
) -> HttpResponse {
    let input = match request.into_inner().parse() {
        Ok(input) => input,
        Err(error) => return handle_domain_error(&error, Operation::Verify),
    };

    match state
        .otp_service
        .verify_code(input.phone.as_deref(), input.code.as_deref())
        .await
    {
        Ok(()) => HttpResponse::Ok().json(OtpResponse::success()),
        Err(error) => handle_domain_error(&error, Operation::Verify),
    }
}
