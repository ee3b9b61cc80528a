//! YAML configuration loading
//!
//! `config.yaml` is optional: every section has defaults, and environment
//! overrides are layered on top before validation.

use std::io::ErrorKind;
use std::path::Path;

use tracing::{info, warn};

use crate::error::AppError;

use super::types::AppConfig;

/// Load and validate a configuration file
///
/// A missing file is an error here; see [`load_service_config`] for the
/// startup path that falls back to defaults.
pub fn load_config(path: &Path) -> Result<AppConfig, AppError> {
    let content = read_config_file(path)?;
    let config = parse_yaml(&content, Some(path))?;
    config.validate()?;
    Ok(config)
}

/// Parse and validate YAML content
pub fn load_config_from_str(yaml_content: &str) -> Result<AppConfig, AppError> {
    let config = parse_yaml(yaml_content, None)?;
    config.validate()?;
    Ok(config)
}

/// Startup configuration: file (if present), then env overrides, then validation
///
/// Validation runs last so an override can repair a file value.
pub fn load_service_config(path: &Path) -> Result<AppConfig, AppError> {
    let config = match read_config_file(path) {
        Ok(content) => {
            info!(path = %path.display(), "Config loaded");
            parse_yaml(&content, Some(path))?
        }
        Err(AppError::Config(_)) => {
            warn!(path = %path.display(), "Config file not found, using defaults");
            AppConfig::default()
        }
        Err(e) => return Err(e),
    };

    let config = config.with_env_overrides();
    config.validate()?;
    Ok(config)
}

fn read_config_file(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => {
            AppError::Config(format!("Configuration file not found: {}", path.display()))
        }
        _ => AppError::Io(e),
    })
}

fn parse_yaml(content: &str, origin: Option<&Path>) -> Result<AppConfig, AppError> {
    serde_yaml::from_str(content).map_err(|e| match origin {
        Some(path) => AppError::Config(format!("YAML parse error in '{}': {}", path.display(), e)),
        None => AppError::Config(format!("YAML parse error: {}", e)),
    })
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const VALID_CONFIG_YAML: &str = r#"
server:
  bind: 127.0.0.1
  port: 8080
upstream:
  base_url: http://localhost:9000/evaluation-service
  request_timeout_secs: 5
cache:
  token_ttl_secs: 3500
  series_ttl_secs: 30
  listing_ttl_secs: 300
analytics:
  default_lookback_minutes: 30
"#;

    #[test]
    fn test_load_config_from_str_valid() {
        let config = load_config_from_str(VALID_CONFIG_YAML).unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.upstream.request_timeout_secs, 5);
        assert_eq!(config.analytics.default_lookback_minutes, 30);
    }

    #[test]
    fn test_load_config_from_str_invalid_yaml() {
        let result = load_config_from_str("invalid: yaml: content: [");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("YAML parse error"));
    }

    #[test]
    fn test_load_config_from_str_validation_failure() {
        let yaml = r#"
upstream:
  base_url: ftp://example.com
"#;
        let result = load_config_from_str(yaml);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("upstream.base_url"));
    }

    #[test]
    fn test_load_config_from_str_rejects_oversized_token_ttl() {
        let result = load_config_from_str("cache:\n  token_ttl_secs: 10000000000000\n");
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("cache.token_ttl_secs"));
    }

    #[test]
    fn test_load_config_file_not_found() {
        let result = load_config(Path::new("/nonexistent/path/config.yaml"));
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Configuration file not found"));
    }

    #[test]
    fn test_load_config_from_file_valid() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(VALID_CONFIG_YAML.as_bytes()).unwrap();
        temp_file.flush().unwrap();

        let config = load_config(temp_file.path()).unwrap();
        assert_eq!(config.server.bind, "127.0.0.1");
        assert_eq!(config.cache.listing_ttl_secs, 300);
    }

    #[test]
    #[serial(env)]
    fn test_service_config_defaults_when_file_missing() {
        std::env::remove_var("PORT");
        std::env::remove_var("BIND_ADDRESS");
        std::env::remove_var("STOCK_API_BASE_URL");

        let config = load_service_config(Path::new("/nonexistent/path/config.yaml")).unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.analytics.default_lookback_minutes, 60);
    }

    #[test]
    #[serial(env)]
    fn test_service_config_override_repairs_file_value() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file
            .write_all(b"upstream:\n  base_url: not-a-url\n")
            .unwrap();
        temp_file.flush().unwrap();

        assert!(load_config(temp_file.path()).is_err());

        std::env::set_var("STOCK_API_BASE_URL", "http://localhost:9000/api/");
        let result = load_service_config(temp_file.path());
        std::env::remove_var("STOCK_API_BASE_URL");

        assert_eq!(result.unwrap().upstream.base_url, "http://localhost:9000/api");
    }

    #[test]
    fn test_load_config_from_file_invalid_yaml() {
        let mut temp_file = NamedTempFile::new().unwrap();
        temp_file.write_all(b"invalid: [yaml: content").unwrap();
        temp_file.flush().unwrap();

        let result = load_config(temp_file.path());
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("YAML parse error"));
    }
}
