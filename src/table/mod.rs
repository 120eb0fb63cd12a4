//! Ingestion of externally supplied position tables.
//!
//! Input is CSV or JSON with loosely named columns; output is a
//! [`NormalizedTable`] of strongly typed records.

use thiserror::Error;
use tracing::warn;

pub mod aliases;
pub mod normalize;
pub mod raw;

pub use aliases::{Column, ALIASES};
pub use normalize::{normalize, NormalizedTable};
pub use raw::RawTable;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    #[error("input is empty")]
    Empty,
    #[error("input has no header row")]
    NoHeader,
    #[error("csv parse error: {0}")]
    Csv(String),
    #[error("json parse error: {0}")]
    Json(String),
}

/// Parse CSV or JSON bytes into a raw table.
///
/// Input whose first non-whitespace byte is `[` is read as a JSON array of
/// objects; anything else as CSV with a header row.
pub fn parse_table(bytes: &[u8]) -> Result<RawTable, TableError> {
    let first = bytes.iter().position(|b| !b.is_ascii_whitespace());
    match first {
        None => Err(TableError::Empty),
        Some(i) if bytes[i] == b'[' => RawTable::from_json(&bytes[i..]),
        Some(i) => RawTable::from_csv(&bytes[i..]),
    }
}

/// Parse and normalize in one step.
pub fn load_table(bytes: &[u8]) -> Result<NormalizedTable, TableError> {
    parse_table(bytes).map(|raw| normalize(&raw))
}

/// Like [`load_table`], but an unparseable input yields an empty table.
///
/// Only for callers that explicitly prefer an empty view to an error.
pub fn load_table_or_default(bytes: &[u8]) -> NormalizedTable {
    load_table(bytes).unwrap_or_else(|e| {
        warn!("Failed to parse position table, using empty table: {}", e);
        NormalizedTable::default()
    })
}
