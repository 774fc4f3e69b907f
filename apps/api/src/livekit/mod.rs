//! LiveKit room tokens — HS256 JWTs granting a participant access to one room.

pub mod handlers;

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// How long an issued token stays valid.
pub const TOKEN_TTL_HOURS: i64 = 6;

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("LiveKit credentials not set")]
    MissingCredentials,

    #[error("Failed to sign LiveKit token: {0}")]
    Signing(#[from] jsonwebtoken::errors::Error),
}

/// Room permissions carried in the `video` claim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoGrant {
    pub room_join: bool,
    pub room: String,
    pub can_publish: bool,
    pub can_subscribe: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomClaims {
    pub iss: String,
    pub sub: String,
    pub name: String,
    pub nbf: i64,
    pub exp: i64,
    pub video: VideoGrant,
}

/// API key/secret pair used to sign tokens.
#[derive(Clone)]
pub struct LiveKitCredentials {
    api_key: String,
    api_secret: String,
}

impl LiveKitCredentials {
    /// Both halves must be present.
    pub fn from_parts(
        api_key: Option<&str>,
        api_secret: Option<&str>,
    ) -> Result<Self, TokenError> {
        match (api_key, api_secret) {
            (Some(key), Some(secret)) => Ok(Self {
                api_key: key.to_string(),
                api_secret: secret.to_string(),
            }),
            _ => Err(TokenError::MissingCredentials),
        }
    }

    /// Issues a token letting `participant` join, publish and subscribe in `room`.
    pub fn issue_room_token(
        &self,
        room: &str,
        participant: &str,
        now: DateTime<Utc>,
    ) -> Result<String, TokenError> {
        let claims = RoomClaims {
            iss: self.api_key.clone(),
            sub: participant.to_string(),
            name: participant.to_string(),
            nbf: now.timestamp(),
            exp: (now + Duration::hours(TOKEN_TTL_HOURS)).timestamp(),
            video: VideoGrant {
                room_join: true,
                room: room.to_string(),
                can_publish: true,
                can_subscribe: true,
            },
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.api_secret.as_bytes()),
        )?)
    }
}
