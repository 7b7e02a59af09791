//! CORS middleware configuration for cross-origin requests.
//!
//! Outside production any origin may call the API, which keeps local web
//! clients and tooling working. In production only the origins listed in
//! `ALLOWED_ORIGINS` are accepted.

use actix_cors::Cors;
use actix_web::http::{header, Method};

use pv_shared::config::AppConfig;

/// Creates a CORS middleware instance configured for the current environment.
pub fn create_cors(config: &AppConfig) -> Cors {
    let max_age = config.server.cors.max_age;

    if config.is_production() {
        create_production_cors(&config.server.cors.allowed_origins, max_age)
    } else {
        create_development_cors(max_age)
    }
}

fn create_development_cors(max_age: usize) -> Cors {
    tracing::info!("Configuring CORS for development environment");

    Cors::default()
        .allow_any_origin()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![
            header::ACCEPT,
            header::CONTENT_TYPE,
            header::ORIGIN,
            header::USER_AGENT,
            header::HeaderName::from_static("x-requested-with"),
        ])
        .max_age(max_age)
}

fn create_production_cors(allowed_origins: &[String], max_age: usize) -> Cors {
    tracing::info!("Configuring CORS for production environment");

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::OPTIONS])
        .allowed_headers(vec![header::ACCEPT, header::CONTENT_TYPE])
        .max_age(max_age);

    for origin in allowed_origins {
        tracing::info!("Adding allowed origin: {}", origin);
        cors = cors.allowed_origin(origin);
    }

    cors
}
