//! Risk ranking view: filter a position table and order it by proximity to
//! liquidation.

use crate::domain::{Address, AssetClass, Instrument, PositionRecord, Side};
use crate::table::{Column, NormalizedTable};
use std::cmp::Ordering;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RankingError {
    #[error("required column {0} is undefined for every row")]
    MissingColumn(&'static str),
    #[error("invalid max distance: {0}")]
    InvalidMaxDistance(String),
}

/// Filters and limits applied to a position table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankingQuery {
    pub instrument: Option<Instrument>,
    pub asset_class: Option<AssetClass>,
    pub side: Option<Side>,
    /// Keep rows with `|distance_pct| <= max_distance`.
    pub max_distance: f64,
    pub top_n: usize,
}

impl Default for RankingQuery {
    fn default() -> Self {
        Self {
            instrument: None,
            asset_class: None,
            side: None,
            max_distance: f64::INFINITY,
            top_n: DEFAULT_TOP_N,
        }
    }
}

/// One ranked row: the record and its derived distance.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedRow {
    pub record: PositionRecord,
    pub distance_pct: f64,
}

impl RankedRow {
    pub fn abs_distance(&self) -> f64 {
        self.distance_pct.abs()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SideCounts {
    pub long: usize,
    pub short: usize,
}

/// Filtered, ranked view of a position table.
#[derive(Debug, Clone, PartialEq)]
pub struct RankedView {
    /// All rows passing the filters, closest to liquidation first.
    pub rows: Vec<RankedRow>,
    /// The first `top_n` of `rows`.
    pub top: Vec<RankedRow>,
    /// Counts by side over `rows`.
    pub counts: SideCounts,
}

impl RankedView {
    /// Addresses of the first `n` ranked rows that carry one.
    pub fn top_addresses(&self, n: usize) -> Vec<Address> {
        self.rows
            .iter()
            .filter_map(|r| r.record.address.clone())
            .take(n)
            .collect()
    }
}

/// Reject tables where a required field is undefined across every row.
///
/// An empty table is valid and ranks to an empty view.
pub fn validate(table: &NormalizedTable) -> Result<(), RankingError> {
    if table.is_empty() {
        return Ok(());
    }
    let required: [(Column, fn(&PositionRecord) -> bool); 3] = [
        (Column::LiquidationPrice, |r| r.liquidation_price.is_some()),
        (Column::CurrentPrice, |r| r.current_price.is_some()),
        (Column::Address, |r| r.address.is_some()),
    ];
    for (column, present) in required {
        if !table.records.iter().any(present) {
            return Err(RankingError::MissingColumn(column.name()));
        }
    }
    Ok(())
}

fn matches(record: &PositionRecord, query: &RankingQuery) -> bool {
    if let Some(instrument) = &query.instrument {
        if record.instrument.as_ref() != Some(instrument) {
            return false;
        }
    }
    if let Some(class) = query.asset_class {
        if record.effective_asset_class() != Some(class) {
            return false;
        }
    }
    if let Some(side) = query.side {
        if record.side != Some(side) {
            return false;
        }
    }
    true
}

/// Stable sort ascending by `|distance_pct|`; equal distances keep input order.
pub fn sort_by_proximity(rows: &mut [RankedRow]) {
    rows.sort_by(|a, b| {
        a.abs_distance()
            .partial_cmp(&b.abs_distance())
            .unwrap_or(Ordering::Equal)
    });
}

/// Validate, filter and rank a table.
///
/// Filters run in order: instrument / asset class, side, then distance.
/// Rows with no derivable distance never pass the distance filter.
pub fn rank(table: &NormalizedTable, query: &RankingQuery) -> Result<RankedView, RankingError> {
    if query.max_distance.is_nan() || query.max_distance < 0.0 {
        return Err(RankingError::InvalidMaxDistance(query.max_distance.to_string()));
    }
    validate(table)?;

    let mut rows: Vec<RankedRow> = table
        .records
        .iter()
        .filter(|r| matches(r, query))
        .filter_map(|r| {
            let distance_pct = r.distance_pct()?;
            (distance_pct.abs() <= query.max_distance).then(|| RankedRow {
                record: r.clone(),
                distance_pct,
            })
        })
        .collect();

    sort_by_proximity(&mut rows);

    let counts = rows.iter().fold(SideCounts::default(), |mut acc, row| {
        match row.record.side {
            Some(Side::Long) => acc.long += 1,
            Some(Side::Short) => acc.short += 1,
            None => {}
        }
        acc
    });
    let top = rows.iter().take(query.top_n).cloned().collect();

    debug!(
        "Ranked {} of {} rows (long={}, short={})",
        rows.len(),
        table.len(),
        counts.long,
        counts.short
    );

    Ok(RankedView { rows, top, counts })
}
