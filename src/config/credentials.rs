//! Upstream API credentials
//!
//! Loads the stock-exchange API registration from environment variables.
//! The whole struct is posted as the body of the `/auth` request.

use serde::Serialize;
use thiserror::Error;
use tracing::info;

/// Errors for credential loading
#[derive(Debug, Error)]
pub enum CredentialsError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Registration details exchanged for a bearer token
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub name: String,
    #[serde(rename = "rollNo")]
    pub roll_no: String,
    #[serde(rename = "accessCode")]
    pub access_code: String,
    #[serde(rename = "clientID")]
    pub client_id: String,
    #[serde(rename = "clientSecret")]
    pub client_secret: String,
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("name", &self.name)
            .field("roll_no", &self.roll_no)
            .field("access_code", &"[REDACTED]")
            .field("client_id", &self.client_id)
            .field("client_secret", &"[REDACTED]")
            .finish()
    }
}

fn required_env(name: &str) -> Result<String, CredentialsError> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
        .ok_or_else(|| CredentialsError::MissingEnvVar(name.to_string()))
}

impl Credentials {
    /// Load credentials from environment variables
    ///
    /// Required env vars:
    /// - `STOCK_API_EMAIL`
    /// - `STOCK_API_NAME`
    /// - `STOCK_API_ROLL_NO`
    /// - `STOCK_API_ACCESS_CODE`
    /// - `STOCK_API_CLIENT_ID`
    /// - `STOCK_API_CLIENT_SECRET`
    pub fn from_env() -> Result<Self, CredentialsError> {
        let credentials = Self {
            email: required_env("STOCK_API_EMAIL")?,
            name: required_env("STOCK_API_NAME")?,
            roll_no: required_env("STOCK_API_ROLL_NO")?,
            access_code: required_env("STOCK_API_ACCESS_CODE")?,
            client_id: required_env("STOCK_API_CLIENT_ID")?,
            client_secret: required_env("STOCK_API_CLIENT_SECRET")?,
        };

        info!(email = %credentials.email, client_id = %credentials.client_id, "Upstream credentials loaded");

        Ok(credentials)
    }

    /// Create credentials for testing
    #[cfg(test)]
    pub fn new_for_test() -> Self {
        Self {
            email: "analyst@example.com".to_string(),
            name: "analyst".to_string(),
            roll_no: "42".to_string(),
            access_code: "access".to_string(),
            client_id: "client-id".to_string(),
            client_secret: "client-secret".to_string(),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
