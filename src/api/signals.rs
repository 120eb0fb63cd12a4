use crate::api::AppState;
use crate::error::AppError;
use crate::signals::{
    score_headlines, short_crossings, simulate_flows, SentimentScore, DEFAULT_BEAR_KEYWORDS,
    DEFAULT_BULL_KEYWORDS, DEFAULT_FLOW_PERIODS,
};
use axum::extract::State;
use axum::Json;
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceRequest {
    pub retail: Option<Vec<f64>>,
    pub dark: Option<Vec<f64>>,
    /// Seed for simulated series when none are supplied.
    pub seed: Option<u64>,
    pub periods: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DivergenceResponse {
    pub simulated: bool,
    pub retail: Vec<f64>,
    pub dark: Vec<f64>,
    pub crossings: Vec<usize>,
    pub short_signal: bool,
}

/// Smart-money divergence: supplied series, or simulated ones from a seed.
pub async fn divergence(
    State(state): State<AppState>,
    Json(body): Json<DivergenceRequest>,
) -> Result<Json<DivergenceResponse>, AppError> {
    let (retail, dark, simulated) = match (body.retail, body.dark) {
        (Some(retail), Some(dark)) => (retail, dark, false),
        (None, None) => {
            let seed = body.seed.unwrap_or(state.config.generator_seed);
            let mut rng = StdRng::seed_from_u64(seed);
            let (retail, dark) =
                simulate_flows(&mut rng, body.periods.unwrap_or(DEFAULT_FLOW_PERIODS))?;
            (retail, dark, true)
        }
        _ => {
            return Err(AppError::BadRequest(
                "retail and dark must be supplied together".to_string(),
            ))
        }
    };

    let crossings = short_crossings(&retail, &dark)?;
    tracing::debug!(
        "Divergence over {} periods: {} crossing(s)",
        retail.len(),
        crossings.len()
    );

    Ok(Json(DivergenceResponse {
        simulated,
        short_signal: !crossings.is_empty(),
        retail,
        dark,
        crossings,
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentRequest {
    pub headlines: Vec<String>,
    pub bull_keywords: Option<Vec<String>>,
    pub bear_keywords: Option<Vec<String>>,
}

/// Keyword sentiment over headlines; keyword lists default to the dashboard's.
pub async fn sentiment(Json(body): Json<SentimentRequest>) -> Json<SentimentScore> {
    let defaults = |words: &[&str]| words.iter().map(|w| w.to_string()).collect::<Vec<_>>();
    let bull = body
        .bull_keywords
        .unwrap_or_else(|| defaults(DEFAULT_BULL_KEYWORDS));
    let bear = body
        .bear_keywords
        .unwrap_or_else(|| defaults(DEFAULT_BEAR_KEYWORDS));

    Json(score_headlines(&body.headlines, &bull, &bear))
}
