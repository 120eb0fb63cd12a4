//! HTTP quote source reading the Yahoo Finance chart endpoint.

use super::{QuoteError, QuoteSource};
use crate::domain::Instrument;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

/// Live quote source using the public chart API.
#[derive(Debug, Clone)]
pub struct HttpQuoteSource {
    client: Client,
    base_url: String,
}

impl HttpQuoteSource {
    /// Create a new quote source whose every call is bounded by `timeout`.
    pub fn new(base_url: String, timeout: Duration) -> Result<Self, QuoteError> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuoteError::NetworkError(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn chart_url(&self, instrument: &Instrument) -> String {
        format!(
            "{}/v8/finance/chart/{}?interval=1d&range=1d",
            self.base_url,
            instrument.as_str()
        )
    }
}

#[async_trait]
impl QuoteSource for HttpQuoteSource {
    async fn fetch_price(&self, instrument: &Instrument) -> Result<f64, QuoteError> {
        let url = self.chart_url(instrument);
        debug!("Fetching quote for instrument={}", instrument);

        let response = self.client.get(&url).send().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout
            } else {
                QuoteError::NetworkError(e.to_string())
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(QuoteError::HttpError {
                status: status.as_u16(),
                message: status
                    .canonical_reason()
                    .unwrap_or("Unexpected status")
                    .to_string(),
            });
        }

        let json = response.json::<serde_json::Value>().await.map_err(|e| {
            if e.is_timeout() {
                QuoteError::Timeout
            } else {
                QuoteError::ParseError(e.to_string())
            }
        })?;

        parse_chart_price(&json)
    }
}

fn parse_chart_price(json: &serde_json::Value) -> Result<f64, QuoteError> {
    if let Some(err) = json.pointer("/chart/error").filter(|v| !v.is_null()) {
        let description = err
            .get("description")
            .and_then(|v| v.as_str())
            .unwrap_or("unknown chart error");
        return Err(QuoteError::ParseError(description.to_string()));
    }

    let price = json
        .pointer("/chart/result/0/meta/regularMarketPrice")
        .and_then(|v| v.as_f64())
        .ok_or_else(|| QuoteError::ParseError("Missing regularMarketPrice".to_string()))?;

    if !price.is_finite() || price <= 0.0 {
        return Err(QuoteError::ParseError(format!("Invalid price: {}", price)));
    }
    Ok(price)
}
