use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::generation::crafter::CraftError;
use crate::generation::models::{GenerationError, ValidationError};
use crate::jobs::JobSearchError;
use crate::ocr::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Generation error: {0}")]
    Generation(#[from] GenerationError),

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("Job search error: {0}")]
    JobSearch(#[from] JobSearchError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl From<CraftError> for AppError {
    fn from(err: CraftError) -> Self {
        match err {
            CraftError::Generation(e) => AppError::Generation(e),
            CraftError::Validation(e) => AppError::Validation(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::Extraction(e) => match e {
                ExtractionError::ServiceFailure(msg) => {
                    tracing::error!("OCR service failure: {msg}");
                    (StatusCode::BAD_GATEWAY, "OCR_SERVICE_FAILURE", e.to_string())
                }
                ExtractionError::Empty { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "JOB_TEXT_EMPTY",
                    e.to_string(),
                ),
                ExtractionError::Garbled { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "JOB_TEXT_GARBLED",
                    e.to_string(),
                ),
            },
            AppError::Generation(e) => match e {
                GenerationError::UpstreamModelFailure(msg) => {
                    tracing::error!("Generation backend failure: {msg}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "UPSTREAM_MODEL_FAILURE",
                        "The generation backend is unavailable".to_string(),
                    )
                }
                GenerationError::TemplateMismatch { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "TEMPLATE_MISMATCH",
                    e.to_string(),
                ),
            },
            AppError::Validation(e) => {
                tracing::error!("Generated artifact rejected: {e}");
                (
                    StatusCode::BAD_GATEWAY,
                    "ARTIFACT_REJECTED",
                    e.to_string(),
                )
            }
            AppError::JobSearch(e) => match e {
                JobSearchError::MissingApiKey => {
                    tracing::error!("Job search called without FINDWORK_API_KEY");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "CONFIGURATION_ERROR",
                        e.to_string(),
                    )
                }
                _ => {
                    tracing::error!("Job search failed: {e}");
                    (
                        StatusCode::BAD_GATEWAY,
                        "JOB_SEARCH_FAILURE",
                        "The job listing service is unavailable".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_service_failure_maps_to_bad_gateway() {
        let err = AppError::from(ExtractionError::ServiceFailure("quota".to_string()));
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }

    #[test]
    fn test_template_mismatch_maps_to_unprocessable() {
        let err = AppError::from(CraftError::Generation(GenerationError::TemplateMismatch {
            keywords_found: 1,
        }));
        assert_eq!(err.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_missing_findwork_key_maps_to_internal() {
        let err = AppError::from(JobSearchError::MissingApiKey);
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
