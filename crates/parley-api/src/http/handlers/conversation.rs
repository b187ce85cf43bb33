//! Conversation handlers for the persistent deployment.
//!
//! Endpoints:
//! - GET /conversation/{session_id} - Metadata plus full history
//! - PUT /conversation/{session_id} - Rename (`{title}`)

use axum::Json;
use axum::extract::{Path, State};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use parley_types::chat::{ChatTurn, Conversation};
use parley_types::error::ChatError;

use crate::http::error::AppError;
use crate::http::extractors::auth::AuthUser;
use crate::http::handlers::parse_session_id;
use crate::state::AppState;

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversationSummary {
    pub session_id: Uuid,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Conversation> for ConversationSummary {
    fn from(c: Conversation) -> Self {
        Self {
            session_id: c.id,
            title: c.title,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ConversationDetail {
    #[serde(flatten)]
    pub summary: ConversationSummary,
    pub history: Vec<ChatTurn>,
}

#[derive(Debug, Deserialize)]
pub struct RenameRequest {
    pub title: String,
}

/// GET /conversation/{session_id}
pub async fn get_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<String>,
) -> Result<Json<ConversationDetail>, AppError> {
    let id = parse_session_id(&session_id).ok_or(ChatError::NotFound)?;
    let conversation = state.chat_service.conversation_for(&id, Some(user.id)).await?;
    let history = state.chat_service.history(&id, Some(user.id)).await?;

    Ok(Json(ConversationDetail {
        summary: conversation.into(),
        history,
    }))
}

/// PUT /conversation/{session_id}
pub async fn rename_conversation(
    State(state): State<AppState>,
    user: AuthUser,
    Path(session_id): Path<String>,
    Json(req): Json<RenameRequest>,
) -> Result<Json<ConversationSummary>, AppError> {
    let id = parse_session_id(&session_id).ok_or(ChatError::NotFound)?;
    let conversation = state
        .chat_service
        .rename_conversation(&id, Some(user.id), &req.title)
        .await?;

    Ok(Json(conversation.into()))
}
