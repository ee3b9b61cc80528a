//! Configuration module for service settings, credentials and logging
//!
//! This module provides:
//! - Configuration types (`AppConfig`, `ServerConfig`, `UpstreamConfig`, `CacheConfig`)
//! - YAML loading functionality (`load_config`)
//! - Upstream credentials from environment variables (`Credentials`)
//! - Logging initialization (`init_logging`)

pub mod credentials;
mod loader;
pub mod logging;
mod types;

// Re-export types
pub use types::{AnalyticsConfig, AppConfig, CacheConfig, ServerConfig, UpstreamConfig};

// Re-export loader functions
pub use loader::{load_config, load_config_from_str, load_service_config};

pub use credentials::{Credentials, CredentialsError};
pub use logging::init_logging;
