//! Axum route handlers for the CareerCrafter API.

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::errors::AppError;
use crate::generation::models::GenerationResult;
use crate::generation::profile::build_request;
use crate::ocr::{extract_job_posting, OcrPayload};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerCrafterRequest {
    pub job_image: String,
    #[serde(default)]
    pub user_info: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CareerCrafterResponse {
    pub cover_letter: String,
    pub interview_tips: Vec<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactRequest {
    pub job_text: String,
    #[serde(default)]
    pub user_info: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/tools/career-crafter
///
/// OCRs the job-posting image, then drafts a cover letter and interview tips.
pub async fn handle_career_crafter(
    State(state): State<AppState>,
    Json(request): Json<CareerCrafterRequest>,
) -> Result<Json<CareerCrafterResponse>, AppError> {
    let image_url = reqwest::Url::parse(request.job_image.trim())
        .map_err(|e| AppError::BadRequest(format!("jobImage must be a valid URL: {e}")))?;

    let payload = state.ocr.parse_image_url(image_url.as_str()).await?;
    let job_posting = extract_job_posting(&payload)?;
    info!(
        "Extracted {} chars of job text from {} at {} (confidence {:.2})",
        job_posting.raw_text().len(),
        image_url.host_str().unwrap_or("image"),
        job_posting.extracted_at().format("%H:%M:%S"),
        job_posting.source_confidence()
    );

    let generation_request = build_request(job_posting, &request.user_info);
    let result = state.crafter.generate(&generation_request).await?;

    Ok(Json(CareerCrafterResponse {
        cover_letter: result.cover_letter.body,
        interview_tips: result.tips.into_iter().map(|tip| tip.text).collect(),
    }))
}

/// POST /api/v1/artifacts
///
/// Same pipeline for job text that is already in hand. The text still goes through the
/// extraction adapter so it is normalized and quality-checked exactly like OCR output.
pub async fn handle_generate_artifacts(
    State(state): State<AppState>,
    Json(request): Json<ArtifactRequest>,
) -> Result<Json<GenerationResult>, AppError> {
    let job_posting = extract_job_posting(&OcrPayload::from_text(&request.job_text))?;
    let generation_request = build_request(job_posting, &request.user_info);
    let result = state.crafter.generate(&generation_request).await?;
    Ok(Json(result))
}
