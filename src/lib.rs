//! Stock Analytics Service
//!
//! HTTP microservice in front of a remote stock-exchange API:
//! - Upstream client with cached bearer token and per-ticker price series
//! - Time-series alignment and Pearson correlation across two tickers
//! - axum REST API for average price, correlation and health

pub mod config;
pub mod core;
pub mod error;
pub mod server;
pub mod upstream;

pub use error::AppError;
