//! Configuration types for service settings
//!
//! This module defines all configuration structs that are loaded from YAML.
//! Every section falls back to its `Default` so an empty file (or no file at
//! all) yields a runnable configuration.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::AppError;
use crate::upstream::auth::MAX_TOKEN_TTL_SECS;

/// Default upstream stock-exchange API root
pub const DEFAULT_UPSTREAM_BASE_URL: &str = "http://20.244.56.144/evaluation-service";

/// Upper bound for `cache.series_ttl_secs` and `cache.listing_ttl_secs` (1 hour)
pub const MAX_DATA_TTL_SECS: u64 = 60 * 60;

// ============================================================================
// Configuration Structs
// ============================================================================

/// HTTP server settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Interface to bind (e.g., "0.0.0.0")
    pub bind: String,
    /// HTTP port
    pub port: u16,
}

/// Upstream stock-exchange API settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// API root, without trailing slash
    pub base_url: String,
    /// Timeout applied to every outbound request
    pub request_timeout_secs: u64,
}

/// Cache lifetimes
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Upper bound on how long an auth token is reused
    pub token_ttl_secs: u64,
    /// Lifetime of a cached price series
    pub series_ttl_secs: u64,
    /// Lifetime of the cached stock listing
    pub listing_ttl_secs: u64,
}

/// Analytics endpoint defaults
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Lookback window used when a request omits `minutes`
    pub default_lookback_minutes: u32,
}

/// Root application configuration
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerConfig,
    pub upstream: UpstreamConfig,
    pub cache: CacheConfig,
    pub analytics: AnalyticsConfig,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE_URL.to_string(),
            request_timeout_secs: 10,
        }
    }
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            token_ttl_secs: 3500,
            series_ttl_secs: 30,
            listing_ttl_secs: 300,
        }
    }
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            default_lookback_minutes: 60,
        }
    }
}

impl UpstreamConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

impl CacheConfig {
    pub fn token_ttl(&self) -> Duration {
        Duration::from_secs(self.token_ttl_secs)
    }

    pub fn series_ttl(&self) -> Duration {
        Duration::from_secs(self.series_ttl_secs)
    }

    pub fn listing_ttl(&self) -> Duration {
        Duration::from_secs(self.listing_ttl_secs)
    }
}

impl AppConfig {
    /// Validate all configuration rules
    pub fn validate(&self) -> Result<(), AppError> {
        if self.server.port == 0 {
            return Err(AppError::Config("server.port must be non-zero".to_string()));
        }

        let base_url = self.upstream.base_url.trim();
        if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
            return Err(AppError::Config(format!(
                "upstream.base_url must start with http:// or https:// (got '{}')",
                self.upstream.base_url
            )));
        }

        if self.upstream.request_timeout_secs == 0 {
            return Err(AppError::Config(
                "upstream.request_timeout_secs must be > 0".to_string(),
            ));
        }

        for (name, value, max) in [
            ("cache.token_ttl_secs", self.cache.token_ttl_secs, MAX_TOKEN_TTL_SECS),
            ("cache.series_ttl_secs", self.cache.series_ttl_secs, MAX_DATA_TTL_SECS),
            ("cache.listing_ttl_secs", self.cache.listing_ttl_secs, MAX_DATA_TTL_SECS),
        ] {
            if value == 0 || value > max {
                return Err(AppError::Config(format!(
                    "{} must be between 1 and {} (got {})",
                    name, max, value
                )));
            }
        }

        if self.analytics.default_lookback_minutes == 0 {
            return Err(AppError::Config(
                "analytics.default_lookback_minutes must be > 0".to_string(),
            ));
        }

        Ok(())
    }

    /// Apply environment variable overrides on top of file values
    ///
    /// - `PORT`: server port
    /// - `BIND_ADDRESS`: server interface
    /// - `STOCK_API_BASE_URL`: upstream API root
    ///
    /// Unparseable or empty values are ignored.
    pub fn with_env_overrides(mut self) -> Self {
        if let Some(port) = env_value("PORT").and_then(|p| p.parse().ok()) {
            self.server.port = port;
        }
        if let Some(bind) = env_value("BIND_ADDRESS") {
            self.server.bind = bind;
        }
        if let Some(base_url) = env_value("STOCK_API_BASE_URL") {
            self.upstream.base_url = base_url;
        }
        self.upstream.base_url = self.upstream.base_url.trim_end_matches('/').to_string();
        self
    }

    /// Log the effective configuration
    pub fn log_summary(&self) {
        info!(
            bind = %self.server.bind,
            port = self.server.port,
            upstream = %self.upstream.base_url,
            token_ttl_secs = self.cache.token_ttl_secs,
            series_ttl_secs = self.cache.series_ttl_secs,
            listing_ttl_secs = self.cache.listing_ttl_secs,
            default_lookback_minutes = self.analytics.default_lookback_minutes,
            "Effective configuration"
        );
    }
}

fn env_value(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

// ============================================================================
// Tests
// ============================================================================
