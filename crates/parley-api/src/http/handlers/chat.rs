//! Chat turn handlers.
//!
//! POST /chat with `{sessionId, message}` (`conversationId` is accepted as
//! an alias) returns `{answer}`. A missing, malformed, or foreign session
//! id is a 400 and the model is not called.

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::handlers::parse_session_id;
use crate::state::{AppState, EphemeralState};

#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    #[serde(rename = "sessionId", alias = "conversationId")]
    pub session_id: String,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatResponse {
    pub answer: String,
}

/// POST /chat - Anonymous chat turn.
pub async fn chat(
    State(state): State<EphemeralState>,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let id = parse_session_id(&req.session_id).ok_or(AppError::InvalidSession)?;
    let answer = state
        .chat_service
        .send_message(&id, None, &req.message)
        .await
        .map_err(AppError::from_chat_turn)?;

    Ok(Json(ChatResponse { answer }))
}

/// POST /chat - Chat turn on a conversation the caller owns.
pub async fn chat_authenticated(
    State(state): State<AppState>,
    user: AuthUser,
    Json(req): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, AppError> {
    let id = parse_session_id(&req.session_id).ok_or(AppError::InvalidSession)?;
    let answer = state
        .chat_service
        .send_message(&id, Some(user.id), &req.message)
        .await
        .map_err(AppError::from_chat_turn)?;

    Ok(Json(ChatResponse { answer }))
}
