//! Stock analytics service entry point
//!
//! Orchestrates:
//! 1. Environment + logging initialization
//! 2. Config loading (config.yaml + env overrides)
//! 3. Upstream credentials
//! 4. TokenManager → PriceFetcher
//! 5. axum HTTP server with Ctrl+C graceful shutdown

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info};

use stock_analytics::config::{init_logging, load_service_config, Credentials};
use stock_analytics::server::{self, AppState};
use stock_analytics::upstream::PriceFetcher;
use stock_analytics::AppError;

const CONFIG_PATH: &str = "config.yaml";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // =========================================================================
    // 1. Environment + logging
    // =========================================================================
    dotenvy::dotenv().ok();
    init_logging();

    info!("=== Stock Analytics Service ===");

    // =========================================================================
    // 2. Config
    // =========================================================================
    let config = load_service_config(Path::new(CONFIG_PATH))?;
    config.log_summary();

    // =========================================================================
    // 3. Credentials
    // =========================================================================
    let credentials = Credentials::from_env().map_err(|e| {
        error!(error = %e, "Upstream credentials are not configured");
        AppError::from(e)
    })?;

    // =========================================================================
    // 4. Upstream client + state
    // =========================================================================
    let fetcher = PriceFetcher::from_config(&config, credentials);
    let state = AppState::new(
        Arc::new(fetcher),
        config.analytics.default_lookback_minutes,
    );

    // =========================================================================
    // 5. Serve
    // =========================================================================
    server::start_server(state, &config.server.bind, config.server.port).await?;

    info!("Shutdown complete");
    Ok(())
}
