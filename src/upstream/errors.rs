//! Upstream error types
//!
//! `AuthError` covers the `/auth` exchange, `FetchError` every data request.
//! Neither is retried automatically.

use thiserror::Error;

/// Failure to obtain a bearer token
#[derive(Error, Debug)]
pub enum AuthError {
    /// Request could not be sent or the body could not be read
    #[error("Auth request failed: {0}")]
    Request(String),

    /// Upstream answered with a non-2xx status
    #[error("Authentication rejected ({status}): {body}")]
    Status { status: u16, body: String },

    /// 2xx answer whose body is not a token response
    #[error("Invalid auth response: {0}")]
    InvalidResponse(String),
}

/// Failure to obtain market data
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Authentication failed: {0}")]
    Auth(#[from] AuthError),

    /// Request could not be sent or the body could not be read
    #[error("Request failed: {0}")]
    Request(String),

    /// Upstream rejected the bearer token; the cached token has been dropped
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Upstream answered with a non-2xx status
    #[error("Upstream returned {status}: {body}")]
    Status { status: u16, body: String },

    /// 2xx answer in an unexpected shape
    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Result type alias for token operations
pub type AuthResult<T> = std::result::Result<T, AuthError>;

/// Result type alias for data operations
pub type FetchResult<T> = std::result::Result<T, FetchError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auth_status_display() {
        let err = AuthError::Status {
            status: 401,
            body: "bad credentials".to_string(),
        };
        assert_eq!(err.to_string(), "Authentication rejected (401): bad credentials");
    }

    #[test]
    fn test_auth_error_converts_to_fetch_error() {
        let err: FetchError = AuthError::Request("connection refused".to_string()).into();
        let msg = err.to_string();
        assert!(msg.contains("Authentication failed"), "Got: {}", msg);
        assert!(msg.contains("connection refused"), "Got: {}", msg);
    }

    #[test]
    fn test_fetch_status_display() {
        let err = FetchError::Status {
            status: 503,
            body: "maintenance".to_string(),
        };
        assert_eq!(err.to_string(), "Upstream returned 503: maintenance");
    }

    #[test]
    fn test_invalid_response_display() {
        let err = FetchError::InvalidResponse("malformed JSON".to_string());
        assert_eq!(err.to_string(), "Invalid response: malformed JSON");
    }
}
