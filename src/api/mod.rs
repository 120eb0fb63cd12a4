pub mod calculators;
pub mod health;
pub mod leads;
pub mod positions;
pub mod signals;

use crate::config::Config;
use crate::leads::LeadStore;
use crate::quotes::QuoteSource;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

/// Shared handler state. Holds collaborators only; every request builds its
/// own position table.
#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub quotes: Arc<dyn QuoteSource>,
    pub leads: Arc<dyn LeadStore>,
}

impl AppState {
    pub fn new(config: Config, quotes: Arc<dyn QuoteSource>, leads: Arc<dyn LeadStore>) -> Self {
        Self {
            config,
            quotes,
            leads,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/positions", get(positions::get_positions))
        .route("/v1/positions/rank", post(positions::rank_table))
        .route("/v1/leads", post(leads::create_lead).get(leads::list_leads))
        .route("/v1/calculate", post(calculators::calculate))
        .route("/v1/signals/divergence", post(signals::divergence))
        .route("/v1/signals/sentiment", post(signals::sentiment))
        .layer(cors)
        .with_state(state)
}
