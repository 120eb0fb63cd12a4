//! Coercion of raw tables into canonical position records.

use super::aliases::Column;
use super::raw::RawTable;
use crate::domain::{Address, AssetClass, Instrument, PositionRecord, Side};
use std::collections::BTreeMap;
use tracing::debug;

/// Position table in canonical form.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NormalizedTable {
    pub records: Vec<PositionRecord>,
    /// Canonical columns present in the source, with the header that supplied each.
    pub columns: BTreeMap<Column, String>,
    /// Source headers that matched no canonical column.
    pub unmapped: Vec<String>,
}

impl NormalizedTable {
    pub fn from_records(records: Vec<PositionRecord>) -> Self {
        Self {
            records,
            columns: BTreeMap::new(),
            unmapped: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Map each header to a canonical column; the first header claiming a column wins.
fn map_headers(headers: &[String]) -> (Vec<Option<Column>>, BTreeMap<Column, String>, Vec<String>) {
    let mut slots = Vec::with_capacity(headers.len());
    let mut columns = BTreeMap::new();
    let mut unmapped = Vec::new();

    for header in headers {
        match Column::from_header(header) {
            Some(column) if !columns.contains_key(&column) => {
                columns.insert(column, header.clone());
                slots.push(Some(column));
            }
            Some(column) => {
                debug!(
                    "Ignoring header {:?}: column {} already supplied by {:?}",
                    header, column, columns[&column]
                );
                slots.push(None);
            }
            None => {
                unmapped.push(header.clone());
                slots.push(None);
            }
        }
    }

    (slots, columns, unmapped)
}

fn non_empty(cell: &str) -> Option<&str> {
    let trimmed = cell.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Parse a real number; unparseable or non-finite values are undefined.
fn parse_number(cell: &str) -> Option<f64> {
    let cell = non_empty(cell)?;
    let cell = cell.strip_suffix('%').unwrap_or(cell).trim();
    cell.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parse a leverage such as `10`, `10.0` or `10x`; must be a whole number >= 1.
fn parse_leverage(cell: &str) -> Option<u32> {
    let cell = non_empty(cell)?;
    let cell = cell
        .strip_suffix('x')
        .or_else(|| cell.strip_suffix('X'))
        .unwrap_or(cell)
        .trim();
    let value = cell.parse::<f64>().ok()?;
    if value.is_finite() && value >= 1.0 && value.fract() == 0.0 && value <= u32::MAX as f64 {
        Some(value as u32)
    } else {
        None
    }
}

/// Coerce a raw table to canonical records.
///
/// Rows are never dropped: empty or unparseable cells become `None`.
pub fn normalize(raw: &RawTable) -> NormalizedTable {
    let (slots, columns, unmapped) = map_headers(&raw.headers);

    let records = raw
        .rows
        .iter()
        .map(|row| {
            let mut record = PositionRecord::default();
            for (slot, cell) in slots.iter().zip(row) {
                let Some(column) = slot else { continue };
                match column {
                    Column::Instrument => {
                        record.instrument = non_empty(cell).map(Instrument::new);
                    }
                    Column::AssetClass => {
                        record.asset_class =
                            non_empty(cell).and_then(|c| c.parse::<AssetClass>().ok());
                    }
                    Column::Address => record.address = non_empty(cell).map(Address::new),
                    Column::Side => {
                        record.side = non_empty(cell).and_then(|c| c.parse::<Side>().ok());
                    }
                    Column::EntryPrice => record.entry_price = parse_number(cell),
                    Column::LiquidationPrice => record.liquidation_price = parse_number(cell),
                    Column::CurrentPrice => record.current_price = parse_number(cell),
                    Column::DistancePct => record.supplied_distance_pct = parse_number(cell),
                    Column::Leverage => record.leverage = parse_leverage(cell),
                    Column::Size => record.size = parse_number(cell),
                }
            }
            record
        })
        .collect();

    NormalizedTable {
        records,
        columns,
        unmapped,
    }
}
