//! HTTP error responses
//!
//! Every failed request answers with `{ "error": <message> }`. Upstream
//! causes are logged here and never leak into the response body.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::upstream::FetchError;

#[derive(Error, Debug)]
pub enum ApiError {
    /// Malformed or missing query parameters (400)
    #[error("{0}")]
    Validation(String),

    /// Upstream had no usable data for the request (404)
    #[error("{0}")]
    NotFound(String),

    /// Upstream call failed; `message` is what the client sees (500)
    #[error("{message}")]
    Upstream {
        message: &'static str,
        #[source]
        source: FetchError,
    },
}

impl ApiError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound(message.into())
    }

    pub fn upstream(message: &'static str, source: FetchError) -> Self {
        Self::Upstream { message, source }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let Self::Upstream { message, source } = &self {
            error!(error = %source, "{}", message);
        }

        let status = self.status();
        let body = json!({ "error": self.to_string() });
        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::upstream::AuthError;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::validation("bad").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::not_found("none").status(), StatusCode::NOT_FOUND);
        assert_eq!(
            ApiError::upstream("Failed", FetchError::Request("timeout".into())).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_upstream_message_hides_cause() {
        let err = ApiError::upstream(
            "Failed to fetch stock price data",
            FetchError::Auth(AuthError::Status {
                status: 401,
                body: "secret detail".into(),
            }),
        );
        assert_eq!(err.to_string(), "Failed to fetch stock price data");
    }

    #[test]
    fn test_into_response_sets_status() {
        let response = ApiError::validation("Missing aggregation-average parameter").into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let response = ApiError::upstream("Failed to fetch stock list", FetchError::Request("x".into()))
            .into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
