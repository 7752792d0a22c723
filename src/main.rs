// SPDX-License-Identifier: MIT

//! Codeleague API Server
//!
//! Serves the weekly leaderboard read path and the scheduled league rollover
//! for the coding-education platform.

use codeleague::{
    config::Config,
    db::Db,
    services::{LeaderboardService, RolloverConfig},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize structured JSON logging
    init_logging();

    // Load configuration from environment
    let config = Config::from_env().expect("Failed to load configuration");
    tracing::info!(port = config.port, "Starting Codeleague API");

    // Connect to Postgres and run migrations
    let db = Db::connect(&config.database_url)
        .await
        .expect("Failed to connect to Postgres");

    let leaderboard_service = LeaderboardService::new(db.clone());

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        db,
        leaderboard_service,
        rollover_config: RolloverConfig::default(),
    });

    // Build router
    let app = codeleague::routes::create_router(state);

    // Start server
    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("codeleague=debug".parse().unwrap())
                .add_directive("info".parse().unwrap()),
        )
        .with(format)
        .init();
}
