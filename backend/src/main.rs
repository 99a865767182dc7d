use std::sync::Arc;

use tower_http::trace::TraceLayer;
use tracing::{info, Level};

mod audit;
mod client;
mod config;
mod domain;
mod rest;
mod view;

use audit::ErrorLog;
use client::WorldBankClient;
use config::AppConfig;
use domain::CountryService;
use rest::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_max_level(Level::INFO)
        .init();

    let config = AppConfig::from_env()?;
    info!("Using country data provider at {}", config.api_base_url);

    // Wire up the client, service, and audit log
    let error_log = ErrorLog::new();
    let client = WorldBankClient::new(&config)?;
    let country_service = CountryService::new(Arc::new(client), error_log.clone());
    let state = AppState::new(country_service, error_log);

    let app = rest::router(state).layer(TraceLayer::new_for_http());

    // Start the server
    info!("Starting server on {}", config.bind_addr);
    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}
