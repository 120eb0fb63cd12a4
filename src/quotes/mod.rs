//! Quote source abstraction for seeding generator reference prices.

use crate::domain::Instrument;
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod http;
pub mod mock;
pub mod resolve;

pub use http::HttpQuoteSource;
pub use mock::MockQuoteSource;
pub use resolve::{
    default_reference_price, resolve_reference_prices, static_reference_prices,
    FetchFailurePolicy, ResolvedPrices,
};

/// Quote source trait for fetching a current price per instrument.
///
/// Implementations make a single attempt per call; callers decide how to
/// degrade when it fails.
#[async_trait]
pub trait QuoteSource: Send + Sync + fmt::Debug {
    /// Fetch the current price for an instrument.
    ///
    /// # Returns
    /// A strictly positive price, or an error describing why none is available
    async fn fetch_price(&self, instrument: &Instrument) -> Result<f64, QuoteError>;
}

/// Error type for quote fetches.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QuoteError {
    /// The call did not complete within its time budget
    #[error("Timed out")]
    Timeout,
    /// Network error (e.g., connection refused, DNS failure)
    #[error("Network error: {0}")]
    NetworkError(String),
    /// Non-success HTTP status
    #[error("HTTP error {status}: {message}")]
    HttpError { status: u16, message: String },
    /// Invalid JSON or no usable price in the response
    #[error("Parse error: {0}")]
    ParseError(String),
    /// The source has no quote for this symbol
    #[error("No quote for {0}")]
    Unavailable(String),
}
