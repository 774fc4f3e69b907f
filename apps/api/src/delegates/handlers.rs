use axum::{extract::State, Json};
use serde_json::Value;

use crate::delegates::{CvAnalysisRequest, JobSearchRequest};
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::state::AppState;

/// POST /analyze-cv
pub async fn handle_analyze_cv(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CvAnalysisRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.delegates.analyze_cv(&request).await?))
}

/// POST /job-search
pub async fn handle_job_search(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<JobSearchRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.delegates.search_jobs(&request).await?))
}
