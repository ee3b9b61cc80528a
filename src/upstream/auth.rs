//! Bearer token management for the upstream API
//!
//! One token is shared by every request. It is reused until its lifetime
//! (the advertised `expires_in`, capped by configuration) runs out, then a
//! fresh one is requested from `POST /auth`.

use std::time::Duration;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::Credentials;
use crate::core::{AuthToken, TtlSlot};

use super::errors::{AuthError, AuthResult};
use super::types::AuthResponse;

/// Token type assumed when the upstream omits `token_type`
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Hard ceiling on token reuse, whatever the caller configures (1 day)
pub const MAX_TOKEN_TTL_SECS: u64 = 24 * 60 * 60;

/// Owns the upstream credentials and the cached token
pub struct TokenManager {
    http_client: reqwest::Client,
    auth_url: String,
    credentials: Credentials,
    max_ttl: Duration,
    slot: TtlSlot<AuthToken>,
}

impl TokenManager {
    /// Create a manager posting to `{base_url}/auth`
    ///
    /// `max_ttl` bounds how long any token is reused, whatever the upstream advertises.
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        credentials: Credentials,
        max_ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            auth_url: format!("{}/auth", base_url.trim_end_matches('/')),
            credentials,
            max_ttl,
            slot: TtlSlot::new(),
        }
    }

    /// Return the cached token, authenticating first if there is none or it expired
    ///
    /// On failure nothing is cached. Concurrent callers that miss together
    /// each authenticate; the last response wins.
    pub async fn get_token(&self) -> AuthResult<AuthToken> {
        if let Some(token) = self.slot.get().await {
            debug!(expires_at = %token.expires_at, "Using cached auth token");
            return Ok(token);
        }

        let (token, ttl) = self.authenticate().await?;
        self.slot.set(token.clone(), ttl).await;
        Ok(token)
    }

    /// Drop the cached token so the next call re-authenticates
    pub async fn invalidate(&self) {
        self.slot.clear().await;
        warn!("Cached auth token invalidated");
    }

    async fn authenticate(&self) -> AuthResult<(AuthToken, Duration)> {
        debug!(url = %self.auth_url, "Requesting auth token");

        let response = self
            .http_client
            .post(&self.auth_url)
            .json(&self.credentials)
            .send()
            .await
            .map_err(|e| AuthError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| AuthError::Request(format!("Failed to read response: {}", e)))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "Authentication rejected by upstream");
            return Err(AuthError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        let body: AuthResponse = serde_json::from_str(&text)
            .map_err(|e| AuthError::InvalidResponse(format!("{} - {}", e, text)))?;

        if body.access_token.trim().is_empty() {
            return Err(AuthError::InvalidResponse("Empty access_token".to_string()));
        }

        let ttl = self.effective_ttl(body.expires_in);
        let now = Utc::now();
        let expires_at = chrono::Duration::from_std(ttl)
            .ok()
            .and_then(|lifetime| now.checked_add_signed(lifetime))
            .unwrap_or_else(|| now + chrono::Duration::seconds(MAX_TOKEN_TTL_SECS as i64));

        info!(
            ttl_secs = ttl.as_secs(),
            expires_at = %expires_at,
            "Auth token obtained"
        );

        let token = AuthToken {
            access_token: body.access_token,
            token_type: body
                .token_type
                .unwrap_or_else(|| DEFAULT_TOKEN_TYPE.to_string()),
            expires_at,
        };

        Ok((token, ttl))
    }

    /// Advertised lifetime capped at `max_ttl`; `max_ttl` when none is advertised
    fn effective_ttl(&self, expires_in: Option<u64>) -> Duration {
        let cap = self.max_ttl.min(Duration::from_secs(MAX_TOKEN_TTL_SECS));
        match expires_in {
            Some(secs) => Duration::from_secs(secs).min(cap),
            None => cap,
        }
    }
}
