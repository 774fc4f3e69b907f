//! Axum route handlers for the advisor API.

use axum::{extract::State, Json};
use serde::Deserialize;

use crate::advisor::service::AdvisorReply;
use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::models::message::Message;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct AdvisorRequest {
    pub messages: Vec<Message>,
    pub session_id: String,
}

/// POST /invoke-advisor
///
/// Runs one advisor turn over the full conversation supplied by the caller and
/// returns the answer with the tool steps taken to reach it. Any failure aborts
/// the whole request with a 500 carrying the error text.
pub async fn handle_invoke_advisor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<AdvisorRequest>,
) -> Result<Json<AdvisorReply>, AppError> {
    if request.session_id.trim().is_empty() {
        return Err(AppError::Validation(
            "session_id cannot be empty".to_string(),
        ));
    }

    let reply = state
        .advisor
        .invoke(request.messages, &request.session_id)
        .await?;

    Ok(Json(reply))
}
