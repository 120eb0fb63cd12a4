//! Domain types for position risk.
//!
//! This module provides:
//! - Primitives: Instrument, AssetClass, Address, Side
//! - Position (fully specified) and PositionRecord (canonical table row)
//! - The distance-to-liquidation formula shared by generator and ranking
//! - PositionSnapshot, the immutable output of one generation run

pub mod position;
pub mod primitives;
pub mod snapshot;

pub use position::{distance_pct, round_to, Position, PositionRecord};
pub use primitives::{Address, AssetClass, Instrument, ParseEnumError, Side};
pub use snapshot::{PositionSnapshot, PriceSource, ReferencePrice};
