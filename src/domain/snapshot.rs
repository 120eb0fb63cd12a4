//! Immutable result of a single generation run.

use crate::domain::{Instrument, Position};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Where an instrument's reference price came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PriceSource {
    Live,
    Fallback,
}

/// Reference price used to seed an instrument's positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReferencePrice {
    pub instrument: Instrument,
    pub price: f64,
    pub source: PriceSource,
}

/// A generated position table together with the inputs that produced it.
///
/// Each refresh builds a new snapshot; nothing mutates one after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PositionSnapshot {
    pub id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub seed: u64,
    pub reference_prices: Vec<ReferencePrice>,
    /// Instruments dropped because their quote failed and no fallback applied.
    pub omitted: Vec<Instrument>,
    pub positions: Vec<Position>,
}

impl PositionSnapshot {
    pub fn new(
        seed: u64,
        reference_prices: Vec<ReferencePrice>,
        omitted: Vec<Instrument>,
        positions: Vec<Position>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            generated_at: Utc::now(),
            seed,
            reference_prices,
            omitted,
            positions,
        }
    }

    /// Content digest over the positions, independent of `id` and timestamp.
    ///
    /// Two runs with the same seed, parameters and reference prices produce
    /// the same digest.
    pub fn digest(&self) -> String {
        use sha2::{Digest, Sha256};

        fn hash_var(hasher: &mut Sha256, data: &str) {
            hasher.update((data.len() as u32).to_le_bytes());
            hasher.update(data.as_bytes());
        }

        let mut hasher = Sha256::new();
        for p in &self.positions {
            hash_var(&mut hasher, p.instrument.as_str());
            hash_var(&mut hasher, p.address.as_str());
            hash_var(&mut hasher, &p.side.to_string());
            hasher.update(p.entry_price.to_bits().to_le_bytes());
            hasher.update(p.liquidation_price.to_bits().to_le_bytes());
            hasher.update(p.current_price.to_bits().to_le_bytes());
            hasher.update(p.leverage.to_le_bytes());
            hasher.update(p.size.to_bits().to_le_bytes());
        }
        hex::encode(hasher.finalize())
    }

    pub fn len(&self) -> usize {
        self.positions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}
