//! History handlers.
//!
//! In the ephemeral deployment `GET /history/{session_id}` returns the
//! session's turns. In the persistent deployment the same path also serves
//! the caller's conversation list when the id is the caller's user id.

use axum::Json;
use axum::extract::{Path, State};
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use uuid::Uuid;

use parley_types::chat::ChatTurn;
use parley_types::error::ChatError;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::handlers::conversation::ConversationSummary;
use crate::http::handlers::parse_session_id;
use crate::state::{AppState, EphemeralState};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryResponse {
    pub session_id: Uuid,
    pub history: Vec<ChatTurn>,
}

/// GET /history/{session_id} - Turns of an anonymous session.
pub async fn session_history(
    State(state): State<EphemeralState>,
    Path(session_id): Path<String>,
) -> Result<Json<HistoryResponse>, AppError> {
    let id = parse_session_id(&session_id).ok_or(ChatError::NotFound)?;
    let history = state.chat_service.history(&id, None).await?;
    Ok(Json(HistoryResponse {
        session_id: id,
        history,
    }))
}

/// GET /history/{id} - Conversation list for the caller's own user id,
/// otherwise the turns of a conversation the caller owns.
pub async fn history(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<String>,
) -> Result<Response, AppError> {
    let id = parse_session_id(&id).ok_or(ChatError::NotFound)?;

    if id == user.id {
        let conversations: Vec<ConversationSummary> = state
            .chat_service
            .list_conversations(&user.id)
            .await?
            .into_iter()
            .map(ConversationSummary::from)
            .collect();
        return Ok(Json(conversations).into_response());
    }

    let history = state.chat_service.history(&id, Some(user.id)).await?;
    Ok(Json(HistoryResponse {
        session_id: id,
        history,
    })
    .into_response())
}
