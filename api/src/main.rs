use actix_web::HttpServer;
use anyhow::Context;
use tracing::info;
use tracing_subscriber::EnvFilter;

use pv_api::app::{build_components, create_app};
use pv_shared::config::AppConfig;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Reads .env before anything else so RUST_LOG from the file applies
    let config = AppConfig::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    info!("Starting PhoneVerify API Server");

    let bind_address = config.server.bind_address();
    info!("Server will bind to: {}", bind_address);

    let components = build_components(&config);
    let state = components.state.clone();
    let app_config = config.clone();

    let mut server = HttpServer::new(move || create_app(state.clone(), &app_config));
    if config.server.workers > 0 {
        server = server.workers(config.server.workers);
    }

    let result = server
        .bind(&bind_address)
        .with_context(|| format!("failed to bind {}", bind_address))?
        .run()
        .await
        .context("HTTP server terminated with an error");

    components.sweeper.abort();
    info!("Server stopped");
    result
}
