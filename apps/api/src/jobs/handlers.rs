use axum::{extract::State, Json};

use crate::errors::AppError;
use crate::jobs::list_jobs;
use crate::models::job::JobListingRow;
use crate::state::AppState;

/// GET /get-all-jobs
pub async fn handle_get_all_jobs(
    State(state): State<AppState>,
) -> Result<Json<Vec<JobListingRow>>, AppError> {
    let jobs = list_jobs(&state.jobs_db).await?;
    tracing::debug!("Returning {} job listings", jobs.len());
    Ok(Json(jobs))
}
