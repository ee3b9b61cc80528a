//! Application-wide error types using thiserror
//!
//! Startup and configuration failures are wrapped in AppError. Request-time
//! failures live in `upstream::errors` and are mapped to HTTP responses by
//! `server::error::ApiError`.

use crate::config::CredentialsError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Credentials error: {0}")]
    Credentials(#[from] CredentialsError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_credentials_error_converts_to_app_error() {
        let err = CredentialsError::MissingEnvVar("STOCK_API_EMAIL".into());
        let app_err: AppError = err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("Credentials error"), "Got: {}", msg);
        assert!(msg.contains("STOCK_API_EMAIL"), "Got: {}", msg);
    }

    #[test]
    fn test_io_error_converts_to_app_error() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file missing");
        let app_err: AppError = io_err.into();
        let msg = app_err.to_string();
        assert!(msg.contains("IO error"), "Got: {}", msg);
        assert!(msg.contains("file missing"), "Got: {}", msg);
    }

    #[test]
    fn test_config_error_display() {
        let err = AppError::Config("port must be non-zero".into());
        assert_eq!(err.to_string(), "Configuration error: port must be non-zero");
    }
}
