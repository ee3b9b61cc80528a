//! Upstream stock-exchange API client
//!
//! This module provides:
//! - Bearer token acquisition and caching (`TokenManager`)
//! - Per-ticker price series fetching and caching (`PriceFetcher`)
//! - The `PriceSource` seam consumed by the HTTP layer

pub mod auth;
pub mod errors;
pub mod fetcher;
pub mod traits;
pub mod types;

// Re-export commonly used types for convenience
pub use auth::TokenManager;
pub use errors::{AuthError, AuthResult, FetchError, FetchResult};
pub use fetcher::PriceFetcher;
pub use traits::PriceSource;
pub use types::{AuthResponse, StockDataResponse, StockListResponse};

use std::time::Duration;

/// Shared HTTP client for every upstream call
pub fn build_http_client(request_timeout: Duration) -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(request_timeout)
        .connect_timeout(request_timeout)
        .pool_idle_timeout(Duration::from_secs(60))
        .tcp_keepalive(Duration::from_secs(30))
        .build()
        .unwrap_or_else(|_| reqwest::Client::new())
}
