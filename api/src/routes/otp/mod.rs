//! OTP route handlers
//!
//! - `POST /otp/send`: issue a code and dispatch it by SMS
//! - `POST /otp/verify`: check a submitted code

pub mod send_otp;
pub mod verify_otp;

use std::sync::Arc;

use pv_core::services::otp::OtpService;

/// Application state that holds shared services
pub struct AppState {
    pub otp_service: Arc<OtpService>,
}

impl AppState {
    pub fn new(otp_service: Arc<OtpService>) -> Self {
        Self { otp_service }
    }
}
