//! Route handlers
//!
//! The same routes are served from the root and under `/api`.

pub mod health;
pub mod otp;

use actix_web::web;

pub use otp::AppState;

/// Register the health and OTP routes on `cfg`
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health_check))
        .service(
            web::scope("/otp")
                .route("/send", web::post().to(otp::send_otp::send_otp))
                .route("/verify", web::post().to(otp::verify_otp::verify_otp)),
        );
}
