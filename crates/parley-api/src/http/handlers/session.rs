//! Session creation handlers.
//!
//! Endpoints:
//! - GET  /session - New anonymous session (ephemeral) or owned one (persistent)
//! - POST /session - New owned session with an optional `{title}` (persistent)

use axum::Json;
use axum::extract::State;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::state::{AppState, EphemeralState};

/// Anonymous sessions carry nothing but their id.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub session_id: Uuid,
}

/// Owned sessions always report `title`, `null` until one is set.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OwnedSessionResponse {
    pub session_id: Uuid,
    pub title: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct NewSessionRequest {
    #[serde(default)]
    pub title: Option<String>,
}

/// GET /session - Start an anonymous in-memory session.
pub async fn open_session(
    State(state): State<EphemeralState>,
) -> Result<Json<SessionResponse>, AppError> {
    let conversation = state.chat_service.start_conversation(None, None).await?;
    Ok(Json(SessionResponse {
        session_id: conversation.id,
    }))
}

/// GET /session - Start an untitled conversation owned by the caller.
pub async fn create_session(
    State(state): State<AppState>,
    user: AuthUser,
) -> Result<Json<OwnedSessionResponse>, AppError> {
    start_owned(&state, user, None).await
}

/// POST /session - Start a conversation owned by the caller.
///
/// The body is optional; a bodiless request behaves like `GET /session`.
pub async fn create_titled_session(
    State(state): State<AppState>,
    user: AuthUser,
    body: Option<Json<NewSessionRequest>>,
) -> Result<Json<OwnedSessionResponse>, AppError> {
    let title = body.and_then(|Json(req)| req.title);
    start_owned(&state, user, title).await
}

async fn start_owned(
    state: &AppState,
    user: AuthUser,
    title: Option<String>,
) -> Result<Json<OwnedSessionResponse>, AppError> {
    let conversation = state
        .chat_service
        .start_conversation(Some(user.id), title)
        .await?;

    Ok(Json(OwnedSessionResponse {
        session_id: conversation.id,
        title: conversation.title,
    }))
}
