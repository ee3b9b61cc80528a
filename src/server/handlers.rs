//! Request handlers for the analytics endpoints.
//!
//! Query strings are read as raw key/value pairs: `aggregation-average` is a
//! bare flag and `ticker` may repeat, neither of which maps onto a struct.

use axum::extract::{Path, Query, State};
use axum::response::Json;
use chrono::{SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use tracing::debug;

use crate::core::{align, average, pearson, round_to, PriceSeries, StockListing};

use super::error::ApiError;
use super::AppState;

const AGGREGATION_AVERAGE_FLAG: &str = "aggregation-average";
const MAX_TICKER_LEN: usize = 16;
/// Decimal places of the reported correlation
const CORRELATION_PLACES: u32 = 4;

type QueryPairs = Vec<(String, String)>;

// =============================================================================
// Response bodies
// =============================================================================

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AverageResponse {
    pub average_stock_price: f64,
    pub price_history: PriceSeries,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockSummary {
    pub average_price: f64,
    pub price_history: PriceSeries,
}

#[derive(Debug, Serialize)]
pub struct CorrelationResponse {
    /// `None` when either aligned series has zero variance
    pub correlation: Option<f64>,
    pub stocks: TickerSummaries,
}

/// Per-ticker summaries, serialized as a JSON object in request order
#[derive(Debug, Default)]
pub struct TickerSummaries(Vec<(String, StockSummary)>);

impl TickerSummaries {
    /// Add `ticker` unless already present; a repeated ticker keeps its first summary
    pub fn insert(&mut self, ticker: &str, summary: StockSummary) {
        if self.get(ticker).is_none() {
            self.0.push((ticker.to_string(), summary));
        }
    }

    pub fn get(&self, ticker: &str) -> Option<&StockSummary> {
        self.0
            .iter()
            .find(|(name, _)| name == ticker)
            .map(|(_, summary)| summary)
    }
}

impl Serialize for TickerSummaries {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(ticker, summary)| (ticker, summary)))
    }
}

#[derive(Debug, Serialize)]
pub struct StockListingResponse {
    pub stocks: StockListing,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}

// =============================================================================
// Handlers
// =============================================================================

/// GET /stocks/:ticker?minutes=<m>&aggregation-average
pub async fn average_handler(
    State(state): State<AppState>,
    Path(ticker): Path<String>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<AverageResponse>, ApiError> {
    if !has_flag(&params, AGGREGATION_AVERAGE_FLAG) {
        return Err(ApiError::validation("Missing aggregation-average parameter"));
    }
    validate_ticker(&ticker)?;
    let minutes = lookback_minutes(&params, state.default_lookback_minutes)?;

    let series = state
        .source
        .get_series(&ticker, minutes)
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch stock price data", e))?;

    if series.is_empty() {
        return Err(ApiError::not_found(
            "No price data available for the specified stock and time range",
        ));
    }

    let average_stock_price = average(&series.prices());
    debug!(ticker = %ticker, minutes, average_stock_price, "Average computed");

    Ok(Json(AverageResponse {
        average_stock_price,
        price_history: series,
    }))
}

/// GET /stockcorrelation?minutes=<m>&ticker=<A>&ticker=<B>
pub async fn correlation_handler(
    State(state): State<AppState>,
    Query(params): Query<QueryPairs>,
) -> Result<Json<CorrelationResponse>, ApiError> {
    let tickers = tickers(&params);
    let [first, second] = tickers.as_slice() else {
        return Err(ApiError::validation(
            "Exactly 2 stock tickers are required for correlation calculation",
        ));
    };
    validate_ticker(first)?;
    validate_ticker(second)?;
    let minutes = lookback_minutes(&params, state.default_lookback_minutes)?;

    let (series_a, series_b) = tokio::try_join!(
        state.source.get_series(first, minutes),
        state.source.get_series(second, minutes),
    )
    .map_err(|e| ApiError::upstream("Failed to calculate stock correlation", e))?;

    if series_a.is_empty() || series_b.is_empty() {
        return Err(ApiError::not_found(
            "Insufficient price data available for the specified stocks and time range",
        ));
    }

    let aligned = align(series_a.points(), series_b.points());
    if aligned.len() < 2 {
        return Err(ApiError::not_found(
            "Insufficient overlapping data points for correlation calculation",
        ));
    }

    let correlation = pearson(&aligned.a, &aligned.b).map(|r| round_to(r, CORRELATION_PLACES));
    debug!(
        first = %first,
        second = %second,
        minutes,
        aligned = aligned.len(),
        ?correlation,
        "Correlation computed"
    );

    let mut stocks = TickerSummaries::default();
    for (ticker, series) in [(*first, series_a), (*second, series_b)] {
        stocks.insert(
            ticker,
            StockSummary {
                average_price: average(&series.prices()),
                price_history: series,
            },
        );
    }

    Ok(Json(CorrelationResponse {
        correlation,
        stocks,
    }))
}

/// GET /stocks
pub async fn list_handler(
    State(state): State<AppState>,
) -> Result<Json<StockListingResponse>, ApiError> {
    let stocks = state
        .source
        .list_stocks()
        .await
        .map_err(|e| ApiError::upstream("Failed to fetch stock list", e))?;

    Ok(Json(StockListingResponse { stocks }))
}

/// GET /health
pub async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "UP",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
    })
}

// =============================================================================
// Query parsing
// =============================================================================

fn has_flag(params: &[(String, String)], name: &str) -> bool {
    params.iter().any(|(key, _)| key == name)
}

/// First `minutes` value, or `default` when absent
fn lookback_minutes(params: &[(String, String)], default: u32) -> Result<u32, ApiError> {
    match params.iter().find(|(key, _)| key == "minutes") {
        None => Ok(default),
        Some((_, raw)) => match raw.trim().parse::<u32>() {
            Ok(minutes) if minutes > 0 => Ok(minutes),
            _ => Err(ApiError::validation("Invalid minutes parameter")),
        },
    }
}

fn tickers(params: &[(String, String)]) -> Vec<&str> {
    params
        .iter()
        .filter(|(key, _)| key == "ticker")
        .map(|(_, value)| value.as_str())
        .collect()
}

fn validate_ticker(ticker: &str) -> Result<(), ApiError> {
    let well_formed = !ticker.is_empty()
        && ticker.len() <= MAX_TICKER_LEN
        && ticker
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '.' || c == '-');

    if well_formed {
        Ok(())
    } else {
        Err(ApiError::validation("Invalid ticker symbol"))
    }
}
