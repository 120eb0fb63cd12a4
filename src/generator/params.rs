//! Generator parameters and their validation.

use rand::Rng;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeneratorError {
    #[error("leverage table is empty")]
    EmptyLeverageTable,
    #[error("leverage choices and weights differ in length ({choices} vs {weights})")]
    LeverageWeightsMismatch { choices: usize, weights: usize },
    #[error("leverage must be >= 1")]
    ZeroLeverage,
    #[error("invalid leverage weights: {0}")]
    InvalidWeights(String),
    #[error("invalid noise std for {0}: must be finite and > 0")]
    InvalidNoise(&'static str),
    #[error("invalid liquidation band [{low}, {high}]: need 0 < low < high")]
    InvalidBand { low: f64, high: f64 },
    #[error("liquidation band high {high} must be below the smallest leverage {min_leverage}")]
    BandExceedsLeverage { high: f64, min_leverage: u32 },
    #[error("long probability must be within [0, 1], got {0}")]
    InvalidProbability(f64),
    #[error("invalid position count range {min}..={max}")]
    InvalidCount { min: usize, max: usize },
    #[error("invalid size model: {0}")]
    InvalidSize(String),
}

/// How many positions to generate per instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountSpec {
    Fixed(usize),
    /// Inclusive on both ends.
    Range { min: usize, max: usize },
}

impl CountSpec {
    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> usize {
        match *self {
            CountSpec::Fixed(n) => n,
            CountSpec::Range { min, max } => rng.random_range(min..=max),
        }
    }
}

/// Multiplier band applied to the leverage-implied liquidation distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LiqBand {
    pub low: f64,
    pub high: f64,
}

impl Default for LiqBand {
    fn default() -> Self {
        Self {
            low: 0.85,
            high: 1.55,
        }
    }
}

impl LiqBand {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.low.is_finite() && self.high.is_finite() && self.low > 0.0 && self.low < self.high
        {
            Ok(())
        } else {
            Err(GeneratorError::InvalidBand {
                low: self.low,
                high: self.high,
            })
        }
    }
}

/// Distribution of notional position sizes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SizeModel {
    /// Uniform over `[min, max]`.
    Uniform { min: f64, max: f64 },
    /// 90% small (0.01..5), 9% medium (5..50), 1% very large (50..500).
    HeavyTail,
}

impl SizeModel {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        match *self {
            SizeModel::Uniform { min, max } => {
                if min.is_finite() && max.is_finite() && min >= 0.0 && min <= max {
                    Ok(())
                } else {
                    Err(GeneratorError::InvalidSize(format!(
                        "uniform range [{}, {}]",
                        min, max
                    )))
                }
            }
            SizeModel::HeavyTail => Ok(()),
        }
    }

    pub fn draw<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        match *self {
            SizeModel::Uniform { min, max } => rng.random_range(min..=max),
            SizeModel::HeavyTail => {
                let bucket: f64 = rng.random();
                if bucket < 0.90 {
                    rng.random_range(0.01..5.0)
                } else if bucket < 0.99 {
                    rng.random_range(5.0..50.0)
                } else {
                    rng.random_range(50.0..500.0)
                }
            }
        }
    }
}

/// Parameters of the position generator.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorParams {
    pub positions_per_instrument: CountSpec,
    pub long_probability: f64,
    /// Relative std of entry price around the reference price.
    pub entry_noise_std: f64,
    /// Relative std of the current mark around the entry price.
    pub mark_noise_std: f64,
    pub leverage_choices: Vec<u32>,
    pub leverage_weights: Vec<f64>,
    pub liq_band: LiqBand,
    pub size_model: SizeModel,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            positions_per_instrument: CountSpec::Fixed(50),
            long_probability: 0.6,
            entry_noise_std: 0.02,
            mark_noise_std: 0.015,
            leverage_choices: vec![5, 10, 20, 50, 75, 100, 125, 200],
            leverage_weights: vec![0.10, 0.15, 0.20, 0.20, 0.15, 0.10, 0.06, 0.04],
            liq_band: LiqBand::default(),
            size_model: SizeModel::HeavyTail,
        }
    }
}

impl GeneratorParams {
    pub fn validate(&self) -> Result<(), GeneratorError> {
        if self.leverage_choices.is_empty() {
            return Err(GeneratorError::EmptyLeverageTable);
        }
        if self.leverage_choices.len() != self.leverage_weights.len() {
            return Err(GeneratorError::LeverageWeightsMismatch {
                choices: self.leverage_choices.len(),
                weights: self.leverage_weights.len(),
            });
        }
        if self.leverage_choices.contains(&0) {
            return Err(GeneratorError::ZeroLeverage);
        }
        if self
            .leverage_weights
            .iter()
            .any(|w| !w.is_finite() || *w <= 0.0)
        {
            return Err(GeneratorError::InvalidWeights(
                "weights must be finite and > 0".to_string(),
            ));
        }
        if !(self.entry_noise_std.is_finite() && self.entry_noise_std > 0.0) {
            return Err(GeneratorError::InvalidNoise("entry"));
        }
        if !(self.mark_noise_std.is_finite() && self.mark_noise_std > 0.0) {
            return Err(GeneratorError::InvalidNoise("mark"));
        }
        if !(0.0..=1.0).contains(&self.long_probability) {
            return Err(GeneratorError::InvalidProbability(self.long_probability));
        }
        if let CountSpec::Range { min, max } = self.positions_per_instrument {
            if min > max {
                return Err(GeneratorError::InvalidCount { min, max });
            }
        }
        self.liq_band.validate()?;
        // factor >= leverage would put a long's liquidation at or below zero
        if let Some(&min_leverage) = self.leverage_choices.iter().min() {
            if self.liq_band.high >= min_leverage as f64 {
                return Err(GeneratorError::BandExceedsLeverage {
                    high: self.liq_band.high,
                    min_leverage,
                });
            }
        }
        self.size_model.validate()
    }
}
