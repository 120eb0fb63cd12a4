//! Position types and the distance-to-liquidation formula.

use crate::domain::{Address, AssetClass, Instrument, Side};
use serde::{Deserialize, Serialize};

/// Signed distance from the current mark to the liquidation price, in percent
/// of the current mark.
///
/// Longs use `liq - current`, shorts `current - liq`. Proximity is the
/// magnitude; a value of zero means the mark sits on the liquidation price.
/// Returns `None` when the current price is zero or any input is not finite.
pub fn distance_pct(side: Side, liquidation_price: f64, current_price: f64) -> Option<f64> {
    if !liquidation_price.is_finite() || !current_price.is_finite() || current_price == 0.0 {
        return None;
    }
    let gap = match side {
        Side::Long => liquidation_price - current_price,
        Side::Short => current_price - liquidation_price,
    };
    Some(gap / current_price * 100.0)
}

/// Round to a fixed number of decimal places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// A fully specified position, as produced by the generator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub instrument: Instrument,
    pub asset_class: AssetClass,
    pub address: Address,
    pub side: Side,
    pub entry_price: f64,
    pub liquidation_price: f64,
    pub current_price: f64,
    pub leverage: u32,
    pub size: f64,
}

impl Position {
    /// Distance to liquidation, always derived from the stored prices.
    pub fn distance_pct(&self) -> Option<f64> {
        distance_pct(self.side, self.liquidation_price, self.current_price)
    }

    /// View this position as a canonical table record.
    pub fn to_record(&self) -> PositionRecord {
        PositionRecord {
            instrument: Some(self.instrument.clone()),
            asset_class: Some(self.asset_class),
            address: Some(self.address.clone()),
            side: Some(self.side),
            entry_price: Some(self.entry_price),
            liquidation_price: Some(self.liquidation_price),
            current_price: Some(self.current_price),
            leverage: Some(self.leverage),
            size: Some(self.size),
            supplied_distance_pct: None,
        }
    }
}

/// One row of a position table in canonical form.
///
/// Fields are `None` when the source had no matching column, an empty cell,
/// or a value that failed to parse. Missing prices are never coerced to zero.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PositionRecord {
    pub instrument: Option<Instrument>,
    pub asset_class: Option<AssetClass>,
    pub address: Option<Address>,
    pub side: Option<Side>,
    pub entry_price: Option<f64>,
    pub liquidation_price: Option<f64>,
    pub current_price: Option<f64>,
    pub leverage: Option<u32>,
    pub size: Option<f64>,
    /// Distance column as supplied by the source; only consulted when it
    /// cannot be recomputed from side and prices.
    pub supplied_distance_pct: Option<f64>,
}

impl PositionRecord {
    /// Distance to liquidation: recomputed from side and prices when all are
    /// known, otherwise the supplied value.
    pub fn distance_pct(&self) -> Option<f64> {
        match (self.side, self.liquidation_price, self.current_price) {
            (Some(side), Some(liq), Some(current)) => distance_pct(side, liq, current),
            _ => self.supplied_distance_pct,
        }
    }

    /// Asset class as recorded, falling back to inference from the symbol.
    pub fn effective_asset_class(&self) -> Option<AssetClass> {
        self.asset_class
            .or_else(|| self.instrument.as_ref().map(Instrument::asset_class))
    }
}
