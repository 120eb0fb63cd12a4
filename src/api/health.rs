use crate::api::AppState;
use axum::extract::State;
use axum::Json;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Readiness plus the generation defaults this instance serves.
pub async fn ready(State(state): State<AppState>) -> Json<serde_json::Value> {
    let instruments: Vec<&str> = state
        .config
        .instruments
        .iter()
        .map(|i| i.as_str())
        .collect();
    Json(serde_json::json!({
        "status": "ready",
        "instruments": instruments,
        "liveQuotes": state.config.live_quotes,
    }))
}
