//! Mock quote source for testing without network calls.

use super::{QuoteError, QuoteSource};
use crate::domain::Instrument;
use async_trait::async_trait;
use std::collections::HashMap;
use std::time::Duration;

/// Mock quote source that returns predefined prices and failures.
#[derive(Debug, Clone, Default)]
pub struct MockQuoteSource {
    prices: HashMap<String, f64>,
    failures: HashMap<String, QuoteError>,
    delays: HashMap<String, Duration>,
}

impl MockQuoteSource {
    /// Create a new mock with no quotes; every fetch fails as unavailable.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return `price` for `symbol`.
    pub fn with_price(mut self, symbol: &str, price: f64) -> Self {
        self.prices.insert(symbol.to_string(), price);
        self
    }

    /// Fail every fetch for `symbol` with `error`.
    pub fn with_failure(mut self, symbol: &str, error: QuoteError) -> Self {
        self.failures.insert(symbol.to_string(), error);
        self
    }

    /// Sleep for `delay` before answering for `symbol`.
    pub fn with_delay(mut self, symbol: &str, delay: Duration) -> Self {
        self.delays.insert(symbol.to_string(), delay);
        self
    }
}

#[async_trait]
impl QuoteSource for MockQuoteSource {
    async fn fetch_price(&self, instrument: &Instrument) -> Result<f64, QuoteError> {
        let symbol = instrument.as_str();
        if let Some(delay) = self.delays.get(symbol) {
            tokio::time::sleep(*delay).await;
        }
        if let Some(err) = self.failures.get(symbol) {
            return Err(err.clone());
        }
        self.prices
            .get(symbol)
            .copied()
            .ok_or_else(|| QuoteError::Unavailable(symbol.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_returns_price() {
        let mock = MockQuoteSource::new().with_price("AAPL", 190.0);
        let price = mock.fetch_price(&Instrument::new("AAPL")).await.unwrap();
        assert_eq!(price, 190.0);
    }

    #[tokio::test]
    async fn test_mock_failure_overrides_price() {
        let mock = MockQuoteSource::new()
            .with_price("AAPL", 190.0)
            .with_failure("AAPL", QuoteError::Timeout);
        let result = mock.fetch_price(&Instrument::new("AAPL")).await;
        assert_eq!(result, Err(QuoteError::Timeout));
    }

    #[tokio::test]
    async fn test_mock_unknown_symbol_unavailable() {
        let mock = MockQuoteSource::new();
        let result = mock.fetch_price(&Instrument::new("MSFT")).await;
        assert_eq!(result, Err(QuoteError::Unavailable("MSFT".to_string())));
    }
}
