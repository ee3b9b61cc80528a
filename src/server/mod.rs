//! HTTP API server for the analytics endpoints.
//!
//! Uses `axum` for routing with CORS and request tracing layers.

pub mod error;
pub mod handlers;

use std::sync::Arc;

use axum::{routing::get, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::upstream::PriceSource;

pub use error::ApiError;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Cached upstream market data
    pub source: Arc<dyn PriceSource>,
    /// Lookback used when a request omits `minutes`
    pub default_lookback_minutes: u32,
}

impl AppState {
    pub fn new(source: Arc<dyn PriceSource>, default_lookback_minutes: u32) -> Self {
        Self {
            source,
            default_lookback_minutes,
        }
    }
}

/// Build the application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health_handler))
        .route("/stocks", get(handlers::list_handler))
        .route("/stocks/:ticker", get(handlers::average_handler))
        .route("/stockcorrelation", get(handlers::correlation_handler))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Start the HTTP server.
///
/// Blocks until Ctrl+C, then drains in-flight requests.
pub async fn start_server(state: AppState, bind: &str, port: u16) -> crate::error::Result<()> {
    let addr = format!("{}:{}", bind, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!(address = %addr, "Starting analytics API server");

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            warn!(error = %e, "Failed to listen for Ctrl+C, running until killed");
            std::future::pending::<()>().await;
        }
    }
}
