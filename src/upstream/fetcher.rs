//! Cached price series fetching
//!
//! Series are cached per (ticker, lookback minutes). Nothing is cached on
//! failure, and no lock is held while a request is in flight.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use crate::config::{AppConfig, Credentials};
use crate::core::{PriceSeries, SeriesKey, StockListing, TtlCache, TtlSlot};

use super::auth::TokenManager;
use super::build_http_client;
use super::errors::{FetchError, FetchResult};
use super::traits::PriceSource;
use super::types::{StockDataResponse, StockListResponse};

/// Upstream client serving price series and the stock listing from cache
pub struct PriceFetcher {
    http_client: reqwest::Client,
    base_url: String,
    tokens: Arc<TokenManager>,
    series: TtlCache<SeriesKey, PriceSeries>,
    listing: TtlSlot<StockListing>,
    listing_ttl: Duration,
}

impl PriceFetcher {
    pub fn new(
        http_client: reqwest::Client,
        base_url: &str,
        tokens: Arc<TokenManager>,
        series_ttl: Duration,
        listing_ttl: Duration,
    ) -> Self {
        Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            tokens,
            series: TtlCache::new(series_ttl),
            listing: TtlSlot::new(),
            listing_ttl,
        }
    }

    /// Build the fetcher and its token manager from configuration
    ///
    /// Both share one HTTP client with the configured request timeout.
    pub fn from_config(config: &AppConfig, credentials: Credentials) -> Self {
        let http_client = build_http_client(config.upstream.request_timeout());
        let tokens = Arc::new(TokenManager::new(
            http_client.clone(),
            &config.upstream.base_url,
            credentials,
            config.cache.token_ttl(),
        ));

        Self::new(
            http_client,
            &config.upstream.base_url,
            tokens,
            config.cache.series_ttl(),
            config.cache.listing_ttl(),
        )
    }

    /// Authorized GET returning the raw body of a 2xx response
    ///
    /// A 401 drops the cached token so the next request re-authenticates.
    async fn authorized_get(&self, url: &str, query: &[(&str, String)]) -> FetchResult<String> {
        let token = self.tokens.get_token().await?;

        let response = self
            .http_client
            .get(url)
            .query(query)
            .header("Authorization", token.authorization_header())
            .send()
            .await
            .map_err(|e| FetchError::Request(e.to_string()))?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| FetchError::Request(format!("Failed to read response: {}", e)))?;

        if status == reqwest::StatusCode::UNAUTHORIZED {
            self.tokens.invalidate().await;
            return Err(FetchError::Unauthorized(text));
        }

        if !status.is_success() {
            warn!(url = %url, status = status.as_u16(), "Upstream request failed");
            return Err(FetchError::Status {
                status: status.as_u16(),
                body: text,
            });
        }

        Ok(text)
    }

    async fn fetch_series(&self, ticker: &str, lookback_minutes: u32) -> FetchResult<PriceSeries> {
        let url = format!("{}/stocks/{}", self.base_url, ticker);
        let text = self
            .authorized_get(&url, &[("minutes", lookback_minutes.to_string())])
            .await?;

        let response: StockDataResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::InvalidResponse(format!("Unexpected response format: {}", e))
        })?;

        Ok(PriceSeries::from(response))
    }

    async fn fetch_listing(&self) -> FetchResult<StockListing> {
        let url = format!("{}/stocks", self.base_url);
        let text = self.authorized_get(&url, &[]).await?;

        let response: StockListResponse = serde_json::from_str(&text).map_err(|e| {
            FetchError::InvalidResponse(format!("Unexpected response format: {}", e))
        })?;

        Ok(response.stocks)
    }
}

#[async_trait]
impl PriceSource for PriceFetcher {
    async fn get_series(&self, ticker: &str, lookback_minutes: u32) -> FetchResult<PriceSeries> {
        let key = SeriesKey::new(ticker, lookback_minutes);

        if let Some(series) = self.series.get(&key).await {
            debug!(ticker, lookback_minutes, "Series cache hit");
            return Ok(series);
        }

        let series = self.fetch_series(ticker, lookback_minutes).await?;
        self.series.insert(key, series.clone()).await;

        let cached_series = self.series.len().await;
        info!(
            ticker,
            lookback_minutes,
            points = series.len(),
            cached_series,
            "Fetched price series"
        );
        Ok(series)
    }

    async fn list_stocks(&self) -> FetchResult<StockListing> {
        if let Some(listing) = self.listing.get().await {
            debug!("Stock listing cache hit");
            return Ok(listing);
        }

        let listing = self.fetch_listing().await?;
        info!(stocks = listing.len(), "Fetched stock listing");

        self.listing.set(listing.clone(), self.listing_ttl).await;
        Ok(listing)
    }
}
