//! Core module - price data types, TTL caches, alignment and correlation math
//!
//! This module uses **explicit re-exports** instead of glob exports so the
//! public API stays visible in one place.
//!
//! ## Usage
//! ```ignore
//! use crate::core::{align, average, pearson, PriceSeries};
//! ```

pub mod alignment;
pub mod cache;
pub mod stats;
pub mod types;

pub use alignment::{align, AlignedPrices, MAX_ALIGNMENT_GAP_SECS};
pub use cache::{CacheEntry, TtlCache, TtlSlot};
pub use stats::{average, pearson, round_to};
pub use types::{AuthToken, PricePoint, PriceSeries, SeriesKey, StockListing};
