//! Alias to canonical column mapping.

use std::fmt;

/// Canonical position table columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Column {
    Instrument,
    AssetClass,
    Address,
    Side,
    EntryPrice,
    LiquidationPrice,
    CurrentPrice,
    DistancePct,
    Leverage,
    Size,
}

/// Accepted header names per canonical column, compared case-insensitively.
pub const ALIASES: &[(Column, &[&str])] = &[
    (Column::Instrument, &["pair", "symbol", "instrument"]),
    (Column::AssetClass, &["asset_class", "class", "type"]),
    (Column::Address, &["address", "wallet", "addr"]),
    (Column::Side, &["side"]),
    (Column::EntryPrice, &["entry", "entry_price"]),
    (
        Column::LiquidationPrice,
        &["liq", "liquidation", "liq_price", "liquidation_price"],
    ),
    (
        Column::CurrentPrice,
        &["current", "mark", "price", "current_price"],
    ),
    (Column::DistancePct, &["distance_pct", "distance", "dist"]),
    (Column::Leverage, &["leverage"]),
    (Column::Size, &["size", "position_size", "qty"]),
];

impl Column {
    /// Resolve a header to its canonical column.
    pub fn from_header(header: &str) -> Option<Column> {
        let key = header.trim().to_ascii_lowercase();
        ALIASES
            .iter()
            .find(|(_, names)| names.contains(&key.as_str()))
            .map(|(column, _)| *column)
    }

    /// Canonical name of the column.
    pub fn name(&self) -> &'static str {
        match self {
            Column::Instrument => "pair",
            Column::AssetClass => "asset_class",
            Column::Address => "address",
            Column::Side => "side",
            Column::EntryPrice => "entry",
            Column::LiquidationPrice => "liq",
            Column::CurrentPrice => "current",
            Column::DistancePct => "distance_pct",
            Column::Leverage => "leverage",
            Column::Size => "size",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}
