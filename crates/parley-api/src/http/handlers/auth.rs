//! Registration and login handlers.
//!
//! Both return `{access_token, token_type, user_id, username, expires_at}`.

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::user::IssuedToken;

use crate::http::error::AppError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    pub user_id: Uuid,
    pub username: String,
    pub expires_at: DateTime<Utc>,
}

impl From<IssuedToken> for TokenResponse {
    fn from(t: IssuedToken) -> Self {
        Self {
            access_token: t.access_token,
            token_type: t.token_type,
            user_id: t.user_id,
            username: t.username,
            expires_at: t.expires_at,
        }
    }
}

/// POST /register - Create an account and sign the caller in.
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<(StatusCode, Json<TokenResponse>), AppError> {
    let user = state
        .auth_service
        .register(&req.username, &req.email, &req.password)
        .await?;
    let token = state.auth_service.issue_token(&user)?;
    Ok((StatusCode::CREATED, Json(token.into())))
}

/// POST /login - Exchange credentials for an access token.
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<TokenResponse>, AppError> {
    let token = state.auth_service.login(&req.username, &req.password).await?;
    Ok(Json(token.into()))
}
