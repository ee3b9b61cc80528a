//! Upstream wire types
//!
//! Response bodies are decoded here and normalized into core types before
//! leaving the `upstream` module.

use serde::Deserialize;

use crate::core::{PricePoint, PriceSeries, StockListing};

/// Body of a successful `POST /auth`
#[derive(Debug, Clone, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    #[serde(default)]
    pub token_type: Option<String>,
    /// Advertised token lifetime in seconds
    #[serde(default)]
    pub expires_in: Option<u64>,
}

/// Body of `GET /stocks/{ticker}`
///
/// With `minutes` the upstream returns the price history as an array;
/// without it a single current price wrapped in `{ "stock": ... }`.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum StockDataResponse {
    History(Vec<PricePoint>),
    Current { stock: PricePoint },
}

impl From<StockDataResponse> for PriceSeries {
    fn from(response: StockDataResponse) -> Self {
        match response {
            StockDataResponse::History(points) => PriceSeries::new(points),
            StockDataResponse::Current { stock } => PriceSeries::new(vec![stock]),
        }
    }
}

/// Body of `GET /stocks`
#[derive(Debug, Clone, Deserialize)]
pub struct StockListResponse {
    pub stocks: StockListing,
}
