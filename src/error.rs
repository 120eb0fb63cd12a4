use crate::generator::GeneratorError;
use crate::leads::LeadError;
use crate::ranking::RankingError;
use crate::signals::SignalError;
use crate::table::TableError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<RankingError> for AppError {
    fn from(err: RankingError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<SignalError> for AppError {
    fn from(err: SignalError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<GeneratorError> for AppError {
    fn from(err: GeneratorError) -> Self {
        AppError::Config(err.to_string())
    }
}

impl From<LeadError> for AppError {
    fn from(err: LeadError) -> Self {
        match err {
            LeadError::Invalid(msg) => AppError::BadRequest(msg),
            LeadError::Storage(msg) => AppError::Internal(msg),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}
