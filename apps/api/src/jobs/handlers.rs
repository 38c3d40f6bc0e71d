//! Axum route handler for the job search tool.

use axum::{extract::State, Json};
use serde::Deserialize;
use tracing::info;

use crate::errors::AppError;
use crate::jobs::{JobQuery, JobSearchResponse};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct GetJobRequest {
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub skills: String,
    #[serde(default)]
    pub remote: bool,
}

/// POST /api/v1/tools/get-job
///
/// With no location the search is remote-only. With neither skills nor location there is
/// nothing to search for, so the caller is asked for more detail.
pub async fn handle_get_job(
    State(state): State<AppState>,
    Json(request): Json<GetJobRequest>,
) -> Result<Json<JobSearchResponse>, AppError> {
    if request.skills.trim().is_empty() && request.location.trim().is_empty() {
        return Err(AppError::BadRequest(
            "Provide skills, a location, or both to search for jobs".to_string(),
        ));
    }

    let query = JobQuery {
        skills: request.skills,
        location: request.location,
        remote: request.remote,
    };
    let jobs = state.jobs.search(&query).await?;
    info!("Job search returned {} listings", jobs.results.len());

    Ok(Json(jobs))
}
