//! Web server for the clinic ticket queue.
//!
//! Exposes the command/query surface over JSON HTTP and pushes state-change
//! events to display and operator clients over `/ws`.

mod config;
mod error;
mod routes;
mod state;
mod ws;

use std::sync::Arc;

use axum::http::HeaderValue;
use broadcast_hub::BroadcastHub;
use database::Database;
use queue_core::QueueService;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

use crate::config::Config;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt::init();

    // Load configuration
    let config = Config::from_env()?;
    info!(addr = %config.addr, "Starting queue web server");

    // Connect to database
    let db = Database::connect(&config.database_url).await?;
    db.migrate().await?;

    // Event fan-out and queue service
    let hub = Arc::new(BroadcastHub::new());
    let service = QueueService::load(Arc::new(db), hub.clone()).await?;

    // Build application state
    let state = AppState::new(Arc::new(service), hub);

    // Build router
    let cors = cors_layer(&config)?;
    let app = routes::router().layer(cors).with_state(state);

    // Start server
    info!(addr = %config.addr, "Queue web server listening");
    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(config: &Config) -> Result<CorsLayer, Box<dyn std::error::Error>> {
    if config.cors_origin == "*" {
        return Ok(CorsLayer::permissive());
    }
    Ok(CorsLayer::new()
        .allow_origin(config.cors_origin.parse::<HeaderValue>()?)
        .allow_methods(Any)
        .allow_headers(Any))
}
