//! Price source trait definition
//!
//! The HTTP layer only depends on `PriceSource`, so handlers can be driven
//! by the real upstream client or by an in-memory mock in tests.

use async_trait::async_trait;

use crate::core::{PriceSeries, StockListing};
use crate::upstream::errors::FetchResult;

/// Market data provider consumed by the request handlers
///
/// # Example Implementation
///
/// ```ignore
/// use async_trait::async_trait;
///
/// struct FixedSource(PriceSeries);
///
/// #[async_trait]
/// impl PriceSource for FixedSource {
///     async fn get_series(&self, _ticker: &str, _minutes: u32) -> FetchResult<PriceSeries> {
///         Ok(self.0.clone())
///     }
///     async fn list_stocks(&self) -> FetchResult<StockListing> {
///         Ok(StockListing::new())
///     }
/// }
/// ```
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Price history for `ticker` over the trailing `lookback_minutes`
    async fn get_series(&self, ticker: &str, lookback_minutes: u32) -> FetchResult<PriceSeries>;

    /// Every listed company name with its ticker
    async fn list_stocks(&self) -> FetchResult<StockListing>;
}
