use crate::calculators::{CalcError, Calculation};
use axum::Json;
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub not_applicable: Option<String>,
}

/// Evaluate one calculator. Degenerate inputs yield `notApplicable`, not an error status.
pub async fn calculate(Json(calculation): Json<Calculation>) -> Json<CalculationResponse> {
    let response = match calculation.evaluate() {
        Ok(value) => CalculationResponse {
            value: Some(value),
            not_applicable: None,
        },
        Err(CalcError::NotApplicable(reason)) => CalculationResponse {
            value: None,
            not_applicable: Some(reason),
        },
    };
    Json(response)
}
