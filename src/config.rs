use crate::domain::Instrument;
use crate::generator::{CountSpec, GeneratorParams, LiqBand};
use crate::quotes::FetchFailurePolicy;
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

pub const DEFAULT_INSTRUMENTS: &[&str] = &["BTC-USD", "ETH-USD", "ZEC-USD", "DAX-USD"];

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub database_path: String,
    pub quote_api_url: String,
    pub quote_timeout: Duration,
    pub live_quotes: bool,
    /// Serve `GET /v1/leads`; off unless explicitly enabled.
    pub lead_listing: bool,
    pub fetch_failure_policy: FetchFailurePolicy,
    pub instruments: Vec<Instrument>,
    pub positions_per_instrument: usize,
    pub generator_seed: u64,
    pub liq_band: LiqBand,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

fn parse_or<T: std::str::FromStr>(
    env_map: &HashMap<String, String>,
    key: &str,
    default: &str,
    expected: &str,
) -> Result<T, ConfigError> {
    env_map
        .get(key)
        .map(|s| s.trim())
        .unwrap_or(default)
        .parse::<T>()
        .map_err(|_| ConfigError::InvalidValue(key.to_string(), format!("must be {}", expected)))
}

fn parse_flag(env_map: &HashMap<String, String>, key: &str) -> Result<bool, ConfigError> {
    match env_map
        .get(key)
        .map(|s| s.trim().to_ascii_lowercase())
        .as_deref()
        .unwrap_or("false")
    {
        "1" | "true" | "yes" => Ok(true),
        "0" | "false" | "no" => Ok(false),
        other => Err(ConfigError::InvalidValue(
            key.to_string(),
            format!("must be true or false, got {}", other),
        )),
    }
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port: u16 = parse_or(&env_map, "PORT", "8080", "a valid u16")?;

        let database_path = env_map
            .get("DATABASE_PATH")
            .cloned()
            .unwrap_or_else(|| "data/leads.db".to_string());

        let quote_api_url = env_map
            .get("QUOTE_API_URL")
            .cloned()
            .unwrap_or_else(|| "https://query1.finance.yahoo.com".to_string());

        let quote_timeout_ms: u64 =
            parse_or(&env_map, "QUOTE_TIMEOUT_MS", "5000", "a valid u64")?;
        if quote_timeout_ms == 0 {
            return Err(ConfigError::InvalidValue(
                "QUOTE_TIMEOUT_MS".to_string(),
                "must be > 0".to_string(),
            ));
        }

        let live_quotes = parse_flag(&env_map, "LIVE_QUOTES")?;
        let lead_listing = parse_flag(&env_map, "LEAD_LISTING")?;

        let fetch_failure_policy = env_map
            .get("FETCH_FAILURE_POLICY")
            .map(|s| s.as_str())
            .unwrap_or("fallback")
            .parse::<FetchFailurePolicy>()
            .map_err(|e| ConfigError::InvalidValue("FETCH_FAILURE_POLICY".to_string(), e))?;

        let instruments = parse_instruments_from_map(&env_map)?;

        let positions_per_instrument: usize =
            parse_or(&env_map, "POSITIONS_PER_INSTRUMENT", "50", "a valid usize")?;
        let generator_seed: u64 = parse_or(&env_map, "GENERATOR_SEED", "42", "a valid u64")?;

        let liq_band = LiqBand {
            low: parse_or(&env_map, "LIQ_BAND_LOW", "0.85", "a number")?,
            high: parse_or(&env_map, "LIQ_BAND_HIGH", "1.55", "a number")?,
        };
        liq_band.validate().map_err(|e| {
            ConfigError::InvalidValue("LIQ_BAND_LOW/LIQ_BAND_HIGH".to_string(), e.to_string())
        })?;

        let config = Config {
            port,
            database_path,
            quote_api_url,
            quote_timeout: Duration::from_millis(quote_timeout_ms),
            live_quotes,
            lead_listing,
            fetch_failure_policy,
            instruments,
            positions_per_instrument,
            generator_seed,
            liq_band,
        };
        config.generator_params().validate().map_err(|e| {
            ConfigError::InvalidValue("LIQ_BAND_HIGH".to_string(), e.to_string())
        })?;
        Ok(config)
    }

    /// Generator parameters with the configured count and liquidation band.
    pub fn generator_params(&self) -> GeneratorParams {
        GeneratorParams {
            positions_per_instrument: CountSpec::Fixed(self.positions_per_instrument),
            liq_band: self.liq_band,
            ..Default::default()
        }
    }
}

fn split_instruments<'a>(items: impl Iterator<Item = &'a str>) -> Vec<Instrument> {
    items
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .map(Instrument::new)
        .collect()
}

fn parse_instruments_from_map(
    env_map: &HashMap<String, String>,
) -> Result<Vec<Instrument>, ConfigError> {
    let instruments = if let Some(list) = env_map.get("INSTRUMENTS") {
        split_instruments(list.split(','))
    } else if let Some(file_path) = env_map.get("INSTRUMENTS_FILE") {
        let content = std::fs::read_to_string(file_path).map_err(|_| {
            ConfigError::InvalidValue(
                "INSTRUMENTS_FILE".to_string(),
                "file not found or unreadable".to_string(),
            )
        })?;
        split_instruments(content.lines())
    } else {
        split_instruments(DEFAULT_INSTRUMENTS.iter().copied())
    };

    if instruments.is_empty() {
        return Err(ConfigError::InvalidValue(
            "INSTRUMENTS".to_string(),
            "must list at least one instrument".to_string(),
        ));
    }
    Ok(instruments)
}
