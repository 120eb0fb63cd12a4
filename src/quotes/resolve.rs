//! Reference price resolution with per-instrument failure isolation.

use super::{QuoteError, QuoteSource};
use crate::domain::{Instrument, PriceSource, ReferencePrice};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, warn};

/// Price used for instruments with no configured fallback.
pub const UNKNOWN_INSTRUMENT_PRICE: f64 = 1000.0;

/// What to do with an instrument whose live quote failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchFailurePolicy {
    /// Keep the instrument using its static fallback price.
    Fallback,
    /// Drop the instrument from this run.
    Omit,
}

impl FromStr for FetchFailurePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fallback" => Ok(FetchFailurePolicy::Fallback),
            "omit" => Ok(FetchFailurePolicy::Omit),
            other => Err(format!("must be fallback or omit, got {}", other)),
        }
    }
}

/// Outcome of resolving reference prices for a list of instruments.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct ResolvedPrices {
    pub prices: Vec<ReferencePrice>,
    pub omitted: Vec<Instrument>,
}

/// Static reference price for an instrument.
pub fn default_reference_price(instrument: &Instrument) -> f64 {
    match instrument.as_str() {
        "BTC-USD" | "XBT-USD" => 60000.0,
        "ETH-USD" => 4000.0,
        "ZEC-USD" => 620.0,
        "DAX-USD" => 16000.0,
        _ => UNKNOWN_INSTRUMENT_PRICE,
    }
}

/// Reference prices from the static table only, no network.
pub fn static_reference_prices(instruments: &[Instrument]) -> ResolvedPrices {
    ResolvedPrices {
        prices: instruments
            .iter()
            .map(|i| ReferencePrice {
                instrument: i.clone(),
                price: default_reference_price(i),
                source: PriceSource::Fallback,
            })
            .collect(),
        omitted: Vec::new(),
    }
}

/// Fetch a live reference price per instrument.
///
/// Instruments are fetched one after another with a single attempt each,
/// bounded by `timeout`. A failed instrument is handled according to
/// `policy` and never affects the others.
pub async fn resolve_reference_prices(
    source: &dyn QuoteSource,
    instruments: &[Instrument],
    policy: FetchFailurePolicy,
    timeout: Duration,
) -> ResolvedPrices {
    let mut resolved = ResolvedPrices::default();

    for instrument in instruments {
        let result = match tokio::time::timeout(timeout, source.fetch_price(instrument)).await {
            Ok(inner) => inner,
            Err(_) => Err(QuoteError::Timeout),
        };

        match result {
            Ok(price) => {
                debug!("Live quote for {}: {}", instrument, price);
                resolved.prices.push(ReferencePrice {
                    instrument: instrument.clone(),
                    price,
                    source: PriceSource::Live,
                });
            }
            Err(e) => match policy {
                FetchFailurePolicy::Fallback => {
                    let price = default_reference_price(instrument);
                    warn!(
                        "Quote fetch failed for {}: {}; using fallback price {}",
                        instrument, e, price
                    );
                    resolved.prices.push(ReferencePrice {
                        instrument: instrument.clone(),
                        price,
                        source: PriceSource::Fallback,
                    });
                }
                FetchFailurePolicy::Omit => {
                    warn!("Quote fetch failed for {}: {}; omitting", instrument, e);
                    resolved.omitted.push(instrument.clone());
                }
            },
        }
    }

    resolved
}
