use crate::api::AppState;
use crate::error::AppError;
use crate::leads::{ExperienceTier, Lead, StoredLead};
use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::warn;
use uuid::Uuid;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadRequest {
    pub name: String,
    pub phone: String,
    pub level: String,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeadResponse {
    pub access_granted: bool,
    pub stored: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lead_id: Option<Uuid>,
}

/// Validate and store a lead.
///
/// Invalid input is rejected. A failing store does not block access; the
/// response reports `stored: false` instead.
pub async fn create_lead(
    State(state): State<AppState>,
    Json(body): Json<LeadRequest>,
) -> Result<Json<LeadResponse>, AppError> {
    let level = body.level.parse::<ExperienceTier>()?;
    let lead = Lead::new(&body.name, &body.phone, level)?;

    let response = match state.leads.insert(&lead).await {
        Ok(stored) => LeadResponse {
            access_granted: true,
            stored: true,
            lead_id: Some(stored.id),
        },
        Err(e) => {
            warn!("Failed to store lead: {}", e);
            LeadResponse {
                access_granted: true,
                stored: false,
                lead_id: None,
            }
        }
    };

    Ok(Json(response))
}

/// List captured leads. Served only when lead listing is enabled.
pub async fn list_leads(
    State(state): State<AppState>,
) -> Result<Json<Vec<StoredLead>>, AppError> {
    if !state.config.lead_listing {
        return Err(AppError::NotFound("lead listing is disabled".to_string()));
    }
    Ok(Json(state.leads.list().await?))
}
