use axum::{extract::State, Json};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::errors::AppError;
use crate::extract::ApiJson;
use crate::livekit::LiveKitCredentials;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct TokenRequest {
    pub room_name: String,
    pub participant_name: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}

/// POST /get-livekit-token
pub async fn handle_get_livekit_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<TokenRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    if request.room_name.trim().is_empty() || request.participant_name.trim().is_empty() {
        return Err(AppError::Validation(
            "room_name and participant_name cannot be empty".to_string(),
        ));
    }

    let credentials = LiveKitCredentials::from_parts(
        state.config.livekit_api_key.as_deref(),
        state.config.livekit_api_secret.as_deref(),
    )?;
    let token =
        credentials.issue_room_token(&request.room_name, &request.participant_name, Utc::now())?;

    Ok(Json(TokenResponse { token }))
}
