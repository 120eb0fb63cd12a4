//! Domain primitives: Instrument, AssetClass, Address, Side.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use thiserror::Error;

/// Crypto base assets recognised when inferring an asset class from a symbol.
const CRYPTO_BASES: &[&str] = &[
    "BTC", "XBT", "ETH", "ZEC", "SOL", "XRP", "ADA", "DOGE", "LTC", "BNB", "AVAX", "DOT",
    "LINK", "MATIC",
];

/// Instrument identifier (e.g., "BTC-USD", "AAPL", "EURUSD=X").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Instrument(pub String);

impl Instrument {
    /// Create an Instrument from a string.
    pub fn new(symbol: impl Into<String>) -> Self {
        Instrument(symbol.into())
    }

    /// Get the symbol as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Best-effort asset class for this symbol.
    pub fn asset_class(&self) -> AssetClass {
        AssetClass::infer(self.as_str())
    }
}

impl std::fmt::Display for Instrument {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asset class of an instrument.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AssetClass {
    Stock,
    Crypto,
    Forex,
}

impl AssetClass {
    /// Infer the asset class from a symbol.
    ///
    /// `BASE-USD`/`BASE-USDT` with a known crypto base is crypto, six-letter
    /// currency pairs and Yahoo-style `=X` symbols are forex, anything else is
    /// treated as a stock or index.
    pub fn infer(symbol: &str) -> AssetClass {
        let upper = symbol.trim().to_ascii_uppercase();
        if upper.ends_with("=X") {
            return AssetClass::Forex;
        }
        if let Some((base, quote)) = upper.split_once('-') {
            if (quote == "USD" || quote == "USDT") && CRYPTO_BASES.contains(&base) {
                return AssetClass::Crypto;
            }
        }
        if upper.len() == 6 && upper.chars().all(|c| c.is_ascii_alphabetic()) {
            return AssetClass::Forex;
        }
        AssetClass::Stock
    }
}

impl FromStr for AssetClass {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "stock" | "stocks" | "equity" => Ok(AssetClass::Stock),
            "crypto" => Ok(AssetClass::Crypto),
            "forex" | "fx" => Ok(AssetClass::Forex),
            other => Err(ParseEnumError::AssetClass(other.to_string())),
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AssetClass::Stock => write!(f, "STOCK"),
            AssetClass::Crypto => write!(f, "CRYPTO"),
            AssetClass::Forex => write!(f, "FOREX"),
        }
    }
}

/// Opaque identifier of a position holder (usually a hex wallet address).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Address(pub String);

impl Address {
    /// Create an Address from a string.
    pub fn new(addr: impl Into<String>) -> Self {
        Address(addr.into())
    }

    /// Build a `0x`-prefixed address from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        Address(format!("0x{}", hex::encode(bytes)))
    }

    /// Get the address as a string reference.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for Address {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Position direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    /// Profits when price rises.
    Long,
    /// Profits when price falls.
    Short,
}

impl Side {
    /// Get the signed multiplier for this side (+1 for Long, -1 for Short).
    pub fn sign(&self) -> f64 {
        match self {
            Side::Long => 1.0,
            Side::Short => -1.0,
        }
    }
}

impl FromStr for Side {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" | "buy" | "l" => Ok(Side::Long),
            "short" | "sell" | "s" => Ok(Side::Short),
            other => Err(ParseEnumError::Side(other.to_string())),
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::Long => write!(f, "LONG"),
            Side::Short => write!(f, "SHORT"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseEnumError {
    #[error("invalid side: {0}")]
    Side(String),
    #[error("invalid asset class: {0}")]
    AssetClass(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_side_sign() {
        assert_eq!(Side::Long.sign(), 1.0);
        assert_eq!(Side::Short.sign(), -1.0);
    }

    #[test]
    fn test_side_parse_aliases() {
        assert_eq!("LONG".parse::<Side>().unwrap(), Side::Long);
        assert_eq!(" buy ".parse::<Side>().unwrap(), Side::Long);
        assert_eq!("Short".parse::<Side>().unwrap(), Side::Short);
        assert_eq!("s".parse::<Side>().unwrap(), Side::Short);
        assert!("flat".parse::<Side>().is_err());
    }

    #[test]
    fn test_side_serialization() {
        assert_eq!(serde_json::to_string(&Side::Long).unwrap(), "\"LONG\"");
        assert_eq!(serde_json::to_string(&Side::Short).unwrap(), "\"SHORT\"");
    }

    #[test]
    fn test_asset_class_inference() {
        assert_eq!(AssetClass::infer("BTC-USD"), AssetClass::Crypto);
        assert_eq!(AssetClass::infer("eth-usdt"), AssetClass::Crypto);
        assert_eq!(AssetClass::infer("EURUSD"), AssetClass::Forex);
        assert_eq!(AssetClass::infer("EURUSD=X"), AssetClass::Forex);
        assert_eq!(AssetClass::infer("AAPL"), AssetClass::Stock);
        assert_eq!(AssetClass::infer("DAX-USD"), AssetClass::Stock);
    }

    #[test]
    fn test_address_from_bytes() {
        let addr = Address::from_bytes(&[0xde, 0xad, 0xbe, 0xef]);
        assert_eq!(addr.as_str(), "0xdeadbeef");
    }
}
