//! Core data types shared by the upstream client and the HTTP layer.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// =============================================================================
// Price Point
// =============================================================================

/// A single observed price for one ticker.
///
/// Wire form: `{ "price": 231.5, "lastUpdatedAt": "2025-05-09T02:04:22.464Z" }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub price: f64,
    #[serde(rename = "lastUpdatedAt", with = "timestamp")]
    pub observed_at: DateTime<Utc>,
}

impl PricePoint {
    pub fn new(price: f64, observed_at: DateTime<Utc>) -> Self {
        Self { price, observed_at }
    }
}

/// `lastUpdatedAt` codec.
///
/// The upstream emits both offset-qualified RFC 3339 strings and naive
/// timestamps with up to ten fractional digits; naive values are read as UTC.
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
    use serde::{de, Deserialize, Deserializer, Serializer};

    const NAIVE_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.f";

    pub fn serialize<S: Serializer>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&value.to_rfc3339_opts(SecondsFormat::AutoSi, true))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("invalid lastUpdatedAt: {}", raw)))
    }

    pub(super) fn parse(raw: &str) -> Option<DateTime<Utc>> {
        let raw = raw.trim();
        if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
            return Some(dt.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, NAIVE_FORMAT)
            .ok()
            .map(|naive| naive.and_utc())
    }
}

// =============================================================================
// Price Series
// =============================================================================

/// Price points for one ticker over a lookback window, in arrival order.
///
/// Serializes as the bare JSON array of points (`priceHistory`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    pub fn new(points: Vec<PricePoint>) -> Self {
        Self { points }
    }

    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Raw prices in arrival order
    pub fn prices(&self) -> Vec<f64> {
        self.points.iter().map(|p| p.price).collect()
    }
}

impl From<Vec<PricePoint>> for PriceSeries {
    fn from(points: Vec<PricePoint>) -> Self {
        Self::new(points)
    }
}

/// Series cache key: one entry per (ticker, lookback window)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SeriesKey {
    pub ticker: String,
    pub lookback_minutes: u32,
}

impl SeriesKey {
    pub fn new(ticker: &str, lookback_minutes: u32) -> Self {
        Self {
            ticker: ticker.to_string(),
            lookback_minutes,
        }
    }
}

// =============================================================================
// Auth Token
// =============================================================================

/// Bearer credential issued by the upstream `/auth` endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthToken {
    pub access_token: String,
    pub token_type: String,
    /// Wall-clock time after which the token is no longer served from cache
    pub expires_at: DateTime<Utc>,
}

impl AuthToken {
    /// Value for the `Authorization` header: `<token_type> <access_token>`
    pub fn authorization_header(&self) -> String {
        format!("{} {}", self.token_type, self.access_token)
    }
}

// =============================================================================
// Stock Listing
// =============================================================================

/// Company name → ticker map published by the upstream `/stocks` endpoint.
pub type StockListing = BTreeMap<String, String>;
