//! Application state and factory
//!
//! This module wires the OTP service from configuration and provides the
//! factory for creating the Actix-web application.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{
    body::MessageBody,
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App, HttpResponse,
};
use tokio::task::JoinHandle;
use tracing_actix_web::TracingLogger;

use pv_core::services::otp::{Clock, OtpService, OtpServiceConfig, OtpStore, SystemClock};
use pv_infra::cache::{spawn_expiry_sweeper, InMemoryOtpStore};
use pv_infra::sms::create_dispatcher;
use pv_shared::config::AppConfig;

use crate::dto::OtpResponse;
use crate::handlers::error::json_error_handler;
use crate::middleware::{cors::create_cors, security::SecurityMiddleware};
use crate::routes::{self, AppState};

/// Largest JSON body accepted by the OTP endpoints
const JSON_BODY_LIMIT: usize = 4 * 1024;

/// Shared state plus the handle of the background expiry sweep
pub struct AppComponents {
    pub state: web::Data<AppState>,
    pub sweeper: JoinHandle<()>,
}

/// Build the OTP service and start the expiry sweeper
///
/// Must be called from within a Tokio runtime.
pub fn build_components(config: &AppConfig) -> AppComponents {
    let dispatcher = create_dispatcher(&config.sms);
    let store: Arc<dyn OtpStore> = Arc::new(InMemoryOtpStore::new(config.otp.max_entries));
    let clock: Arc<dyn Clock> = Arc::new(SystemClock);

    tracing::info!(
        provider = dispatcher.provider_name(),
        environment = ?config.environment,
        ttl_seconds = config.otp.ttl_seconds,
        max_attempts = config.otp.max_attempts,
        expose_code = config.otp.expose_code,
        "OTP service configured"
    );

    let service = OtpService::new(
        dispatcher,
        store.clone(),
        clock.clone(),
        OtpServiceConfig::from_app_config(config),
    );

    let sweeper = spawn_expiry_sweeper(
        store,
        clock,
        Duration::from_secs(config.otp.sweep_interval_secs),
    );

    AppComponents {
        state: web::Data::new(AppState::new(Arc::new(service))),
        sweeper,
    }
}

/// Create and configure the application
pub fn create_app(
    app_state: web::Data<AppState>,
    config: &AppConfig,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let json_config = web::JsonConfig::default()
        .limit(JSON_BODY_LIMIT)
        .error_handler(json_error_handler);

    App::new()
        .app_data(app_state)
        .app_data(json_config)
        // Middleware runs in reverse registration order: request logging outermost
        .wrap(SecurityMiddleware::for_environment(config.environment))
        .wrap(create_cors(config))
        .wrap(TracingLogger::default())
        .route("/", web::get().to(api_documentation))
        .service(web::scope("/api").configure(routes::configure))
        .configure(routes::configure)
        .default_service(web::route().to(not_found))
}

/// API documentation endpoint
async fn api_documentation() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "message": "PhoneVerify API",
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "health": {
                "path": "/health",
                "method": "GET",
                "description": "Liveness check"
            },
            "send": {
                "path": "/otp/send",
                "method": "POST",
                "description": "Issue a verification code and send it by SMS",
                "request_body": {
                    "phone": "string or number"
                },
                "responses": {
                    "200": "Code issued",
                    "400": "Missing or invalid phone",
                    "500": "OTP send failed"
                }
            },
            "verify": {
                "path": "/otp/verify",
                "method": "POST",
                "description": "Verify a previously issued code",
                "request_body": {
                    "phone": "string or number",
                    "code": "string or number"
                },
                "responses": {
                    "200": "Code verified",
                    "400": "Missing fields, unknown, expired or wrong code",
                    "429": "Too many attempts",
                    "500": "OTP verify failed"
                }
            }
        },
        "prefixes": ["/", "/api"]
    }))
}

/// Default 404 handler
async fn not_found() -> HttpResponse {
    HttpResponse::NotFound().json(OtpResponse::failure("Not found"))
}
