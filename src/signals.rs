//! Dashboard signals: smart-money divergence and keyword news sentiment.

use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Headline keywords counted as bullish.
pub const DEFAULT_BULL_KEYWORDS: &[&str] = &[
    "Bundeswehr",
    "Vertrag",
    "Ukraine",
    "Großauftrag",
    "liefert",
    "gewinnt",
];

/// Headline keywords counted as bearish.
pub const DEFAULT_BEAR_KEYWORDS: &[&str] = &["Kritik", "fällt", "Gewinnwarnung"];

pub const DEFAULT_FLOW_PERIODS: usize = 30;
pub const MAX_FLOW_PERIODS: usize = 10_000;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    #[error("series lengths differ (retail {retail}, dark {dark})")]
    LengthMismatch { retail: usize, dark: usize },
    #[error("series value at index {0} is not finite")]
    NonFinite(usize),
    #[error("periods must be within 1..={max}, got {got}")]
    InvalidPeriods { got: usize, max: usize },
}

/// Indices where retail sentiment crosses up through dark-pool flow.
///
/// Index `i` is reported when `retail[i-1] < dark[i-1]` and
/// `retail[i] >= dark[i]`. Any such crossing is a short signal.
pub fn short_crossings(retail: &[f64], dark: &[f64]) -> Result<Vec<usize>, SignalError> {
    if retail.len() != dark.len() {
        return Err(SignalError::LengthMismatch {
            retail: retail.len(),
            dark: dark.len(),
        });
    }
    if let Some(i) = retail
        .iter()
        .zip(dark)
        .position(|(r, d)| !r.is_finite() || !d.is_finite())
    {
        return Err(SignalError::NonFinite(i));
    }

    Ok((1..retail.len())
        .filter(|&i| retail[i - 1] < dark[i - 1] && retail[i] >= dark[i])
        .collect())
}

/// Simulated retail and dark-pool flow series.
///
/// Retail is a cumulative sum of N(100, 10) steps; dark flow trails it by
/// N(-20, 15) per period.
pub fn simulate_flows<R: Rng + ?Sized>(
    rng: &mut R,
    periods: usize,
) -> Result<(Vec<f64>, Vec<f64>), SignalError> {
    if periods == 0 || periods > MAX_FLOW_PERIODS {
        return Err(SignalError::InvalidPeriods {
            got: periods,
            max: MAX_FLOW_PERIODS,
        });
    }
    // constant, valid parameters
    let step = Normal::new(100.0, 10.0).map_err(|_| SignalError::NonFinite(0))?;
    let lag = Normal::new(-20.0, 15.0).map_err(|_| SignalError::NonFinite(0))?;

    let mut retail = Vec::with_capacity(periods);
    let mut level = 0.0;
    for _ in 0..periods {
        level += step.sample(rng);
        retail.push(level);
    }
    let dark = retail.iter().map(|r| r + lag.sample(rng)).collect();
    Ok((retail, dark))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Sentiment {
    Bullish,
    Bearish,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentScore {
    /// Headlines containing at least one bullish keyword.
    pub bullish: usize,
    /// Headlines containing at least one bearish keyword.
    pub bearish: usize,
    pub sentiment: Sentiment,
    /// `bullish / (bullish + bearish + 1)`.
    pub bullish_share: f64,
}

/// Score headlines by keyword hits. Matching is case-sensitive substring search.
pub fn score_headlines<H, K>(headlines: &[H], bull: &[K], bear: &[K]) -> SentimentScore
where
    H: AsRef<str>,
    K: AsRef<str>,
{
    let hits = |keywords: &[K]| {
        headlines
            .iter()
            .filter(|h| keywords.iter().any(|k| h.as_ref().contains(k.as_ref())))
            .count()
    };
    let bullish = hits(bull);
    let bearish = hits(bear);

    let sentiment = match bullish.cmp(&bearish) {
        std::cmp::Ordering::Greater => Sentiment::Bullish,
        std::cmp::Ordering::Less => Sentiment::Bearish,
        std::cmp::Ordering::Equal => Sentiment::Neutral,
    };

    SentimentScore {
        bullish,
        bearish,
        sentiment,
        bullish_share: bullish as f64 / (bullish + bearish + 1) as f64,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn detects_upward_crossing_only() {
        let retail = [1.0, 2.0, 5.0, 4.0, 3.0, 6.0];
        let dark = [3.0, 3.0, 4.0, 5.0, 3.0, 5.0];
        // i=2: 2<3 then 5>=4; i=4: 4<5 then 3>=3
        assert_eq!(short_crossings(&retail, &dark).unwrap(), vec![2, 4]);
    }

    #[test]
    fn downward_crossing_is_not_a_short_signal() {
        let retail = [5.0, 1.0];
        let dark = [3.0, 3.0];
        assert!(short_crossings(&retail, &dark).unwrap().is_empty());
    }

    #[test]
    fn short_series_have_no_crossings() {
        assert!(short_crossings(&[], &[]).unwrap().is_empty());
        assert!(short_crossings(&[1.0], &[2.0]).unwrap().is_empty());
    }

    #[test]
    fn rejects_bad_series() {
        assert_eq!(
            short_crossings(&[1.0, 2.0], &[1.0]),
            Err(SignalError::LengthMismatch { retail: 2, dark: 1 })
        );
        assert_eq!(
            short_crossings(&[1.0, f64::NAN], &[1.0, 2.0]),
            Err(SignalError::NonFinite(1))
        );
    }

    #[test]
    fn simulated_flows_are_seeded() {
        let (a_retail, a_dark) = simulate_flows(&mut StdRng::seed_from_u64(4), 30).unwrap();
        let (b_retail, b_dark) = simulate_flows(&mut StdRng::seed_from_u64(4), 30).unwrap();
        assert_eq!(a_retail, b_retail);
        assert_eq!(a_dark, b_dark);
        assert_eq!(a_retail.len(), 30);
        assert_eq!(a_dark.len(), 30);
        // cumulative with a positive drift
        assert!(a_retail[29] > a_retail[0]);
        assert!(simulate_flows(&mut StdRng::seed_from_u64(4), 0).is_err());
    }

    #[test]
    fn dashboard_headlines_score_bullish() {
        let headlines = [
            "Bundeswehr erhält neuen Vertrag mit Rheinmetall",
            "Rheinmetall liefert Panzer an die Ukraine",
            "Rheinmetall gewinnt Großauftrag",
            "Kritik an Verteidigungsbudget",
            "Rheinmetall Aktie fällt nach Gewinnwarnung",
        ];
        let score = score_headlines(&headlines, DEFAULT_BULL_KEYWORDS, DEFAULT_BEAR_KEYWORDS);
        assert_eq!(score.bullish, 3);
        assert_eq!(score.bearish, 2);
        assert_eq!(score.sentiment, Sentiment::Bullish);
        assert!((score.bullish_share - 0.5).abs() < 1e-12);
    }

    #[test]
    fn balanced_or_empty_is_neutral() {
        let none: [&str; 0] = [];
        let score = score_headlines(&none, DEFAULT_BULL_KEYWORDS, DEFAULT_BEAR_KEYWORDS);
        assert_eq!(score.sentiment, Sentiment::Neutral);
        assert_eq!(score.bullish_share, 0.0);

        let score = score_headlines(&["Aktie fällt"], DEFAULT_BULL_KEYWORDS, DEFAULT_BEAR_KEYWORDS);
        assert_eq!(score.sentiment, Sentiment::Bearish);
    }

    #[test]
    fn keyword_match_is_case_sensitive() {
        let score = score_headlines(&["KRITIK wächst"], DEFAULT_BULL_KEYWORDS, DEFAULT_BEAR_KEYWORDS);
        assert_eq!(score.bearish, 0);
    }
}
