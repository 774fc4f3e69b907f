pub mod health;

use axum::{
    routing::{get, post},
    Router,
};

use crate::advisor::handlers::handle_invoke_advisor;
use crate::delegates::handlers::{handle_analyze_cv, handle_job_search};
use crate::jobs::handlers::handle_get_all_jobs;
use crate::livekit::handlers::handle_get_livekit_token;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Advisor agent
        .route("/invoke-advisor", post(handle_invoke_advisor))
        // Delegate agents
        .route("/analyze-cv", post(handle_analyze_cv))
        .route("/job-search", post(handle_job_search))
        // Video interview rooms
        .route("/get-livekit-token", post(handle_get_livekit_token))
        // Job listings
        .route("/get-all-jobs", get(handle_get_all_jobs))
        .with_state(state)
}
