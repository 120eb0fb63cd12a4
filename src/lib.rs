pub mod api;
pub mod calculators;
pub mod config;
pub mod db;
pub mod domain;
pub mod error;
pub mod generator;
pub mod leads;
pub mod quotes;
pub mod ranking;
pub mod signals;
pub mod table;

pub use config::Config;
pub use domain::{
    Address, AssetClass, Instrument, Position, PositionRecord, PositionSnapshot, Side,
};
pub use error::AppError;
pub use generator::{generate_positions, generate_snapshot, GeneratorParams};
pub use leads::{LeadStore, MemoryLeadStore, SqliteLeadStore};
pub use quotes::{HttpQuoteSource, MockQuoteSource, QuoteError, QuoteSource};
pub use ranking::{rank, RankedView, RankingQuery};
pub use table::{load_table, NormalizedTable};
