//! Stateless trading calculators.
//!
//! Each returns `CalcError::NotApplicable` instead of dividing by zero or
//! propagating non-finite input.

use crate::domain::Side;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const UNITS_PER_STANDARD_LOT: f64 = 100_000.0;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CalcError {
    #[error("not applicable: {0}")]
    NotApplicable(String),
}

fn finite(name: &str, value: f64) -> Result<f64, CalcError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NotApplicable(format!("{} must be finite", name)))
    }
}

fn positive(name: &str, value: f64) -> Result<f64, CalcError> {
    if finite(name, value)? > 0.0 {
        Ok(value)
    } else {
        Err(CalcError::NotApplicable(format!("{} must be > 0", name)))
    }
}

/// Knock-out level: the price at which the posted margin is gone.
pub fn ko_level(entry: f64, leverage: f64, side: Side) -> Result<f64, CalcError> {
    let entry = positive("entry price", entry)?;
    let leverage = positive("leverage", leverage)?;
    let offset = entry / leverage;
    Ok(match side {
        Side::Long => entry - offset,
        Side::Short => entry + offset,
    })
}

/// Rough probability (in percent) that a knock-out is hit today.
pub fn ko_probability(leverage: u32) -> u32 {
    (50 + leverage / 2).min(99)
}

pub fn pnl(entry: f64, exit: f64, size: f64, side: Side) -> Result<f64, CalcError> {
    let move_ = finite("exit price", exit)? - finite("entry price", entry)?;
    Ok(move_ * finite("size", size)? * side.sign())
}

/// Units to trade so that hitting the stop loses `risk_pct` of the account.
pub fn position_size(account: f64, risk_pct: f64, entry: f64, stop: f64) -> Result<f64, CalcError> {
    let risk_amount = positive("account", account)? * positive("risk %", risk_pct)? / 100.0;
    let per_unit = (finite("entry price", entry)? - finite("stop price", stop)?).abs();
    if per_unit == 0.0 {
        return Err(CalcError::NotApplicable(
            "entry and stop are equal".to_string(),
        ));
    }
    Ok(risk_amount / per_unit)
}

pub fn risk_reward(entry: f64, stop: f64, target: f64) -> Result<f64, CalcError> {
    let entry = finite("entry price", entry)?;
    let risk = (entry - finite("stop price", stop)?).abs();
    let reward = (finite("target price", target)? - entry).abs();
    if risk == 0.0 {
        return Err(CalcError::NotApplicable(
            "entry and stop are equal".to_string(),
        ));
    }
    Ok(reward / risk)
}

/// Pip size of a currency pair: 0.01 for JPY-quoted pairs, 0.0001 otherwise.
pub fn pip_size(pair: &str) -> f64 {
    let pair = pair.trim().trim_end_matches("=X").to_ascii_uppercase();
    if pair.ends_with("JPY") {
        0.01
    } else {
        0.0001
    }
}

/// Value of one pip in account currency.
///
/// `quote_to_account` converts the pair's quote currency to the account
/// currency: 1.0 for EURUSD in a USD account, `1 / price` for USDJPY.
pub fn pip_value(pair: &str, lots: f64, quote_to_account: f64) -> Result<f64, CalcError> {
    let lots = positive("lots", lots)?;
    let rate = positive("conversion rate", quote_to_account)?;
    Ok(pip_size(pair) * lots * UNITS_PER_STANDARD_LOT * rate)
}

/// Funding paid (positive) or received (negative) over `periods` intervals.
pub fn funding_cost(notional: f64, rate_pct: f64, periods: u32) -> Result<f64, CalcError> {
    Ok(finite("notional", notional)? * finite("funding rate", rate_pct)? / 100.0 * periods as f64)
}

pub fn roi_pct(initial: f64, final_value: f64) -> Result<f64, CalcError> {
    let initial = finite("initial value", initial)?;
    if initial == 0.0 {
        return Err(CalcError::NotApplicable(
            "initial value is zero".to_string(),
        ));
    }
    Ok((finite("final value", final_value)? - initial) / initial * 100.0)
}

/// A calculator request, tagged by `kind` on the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum Calculation {
    Leverage {
        entry: f64,
        leverage: f64,
        #[serde(default = "default_side")]
        side: Side,
    },
    Pnl {
        entry: f64,
        exit: f64,
        size: f64,
        #[serde(default = "default_side")]
        side: Side,
    },
    PositionSize {
        account: f64,
        risk_pct: f64,
        entry: f64,
        stop: f64,
    },
    RiskReward {
        entry: f64,
        stop: f64,
        target: f64,
    },
    PipValue {
        pair: String,
        lots: f64,
        #[serde(default = "default_rate")]
        quote_to_account: f64,
    },
    Funding {
        notional: f64,
        rate_pct: f64,
        #[serde(default = "default_periods")]
        periods: u32,
    },
    Roi {
        initial: f64,
        final_value: f64,
    },
    KoProbability {
        leverage: u32,
    },
}

fn default_side() -> Side {
    Side::Long
}

fn default_rate() -> f64 {
    1.0
}

fn default_periods() -> u32 {
    1
}

impl Calculation {
    pub fn evaluate(&self) -> Result<f64, CalcError> {
        match self {
            Calculation::Leverage {
                entry,
                leverage,
                side,
            } => ko_level(*entry, *leverage, *side),
            Calculation::Pnl {
                entry,
                exit,
                size,
                side,
            } => pnl(*entry, *exit, *size, *side),
            Calculation::PositionSize {
                account,
                risk_pct,
                entry,
                stop,
            } => position_size(*account, *risk_pct, *entry, *stop),
            Calculation::RiskReward {
                entry,
                stop,
                target,
            } => risk_reward(*entry, *stop, *target),
            Calculation::PipValue {
                pair,
                lots,
                quote_to_account,
            } => pip_value(pair, *lots, *quote_to_account),
            Calculation::Funding {
                notional,
                rate_pct,
                periods,
            } => funding_cost(*notional, *rate_pct, *periods),
            Calculation::Roi {
                initial,
                final_value,
            } => roi_pct(*initial, *final_value),
            Calculation::KoProbability { leverage } => {
                if *leverage == 0 {
                    return Err(CalcError::NotApplicable("leverage must be >= 1".to_string()));
                }
                Ok(ko_probability(*leverage) as f64)
            }
        }
    }
}
