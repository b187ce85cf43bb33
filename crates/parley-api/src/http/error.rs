//! Application error type mapping to HTTP status codes.
//!
//! Every error body has the shape `{"detail": "...", "code": "..."}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use parley_types::error::{AuthError, ChatError};
use parley_types::llm::LlmError;

/// Application-level error that maps to HTTP responses.
#[derive(Debug)]
pub enum AppError {
    /// Conversation lookups and chat turns.
    Chat(ChatError),
    /// Registration, login, and token checks.
    Auth(AuthError),
    /// `POST /chat` against a session that is missing or not the caller's.
    InvalidSession,
    /// Missing or malformed credentials.
    Unauthorized(String),
}

impl AppError {
    /// Map a chat-turn failure, folding lookup errors into `InvalidSession`.
    pub fn from_chat_turn(e: ChatError) -> Self {
        match e {
            ChatError::NotFound | ChatError::NotOwned => AppError::InvalidSession,
            other => AppError::Chat(other),
        }
    }
}

impl From<ChatError> for AppError {
    fn from(e: ChatError) -> Self {
        AppError::Chat(e)
    }
}

impl From<AuthError> for AppError {
    fn from(e: AuthError) -> Self {
        AppError::Auth(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, detail) = match &self {
            // Foreign conversations are reported exactly like missing ones.
            AppError::Chat(ChatError::NotFound | ChatError::NotOwned) => (
                StatusCode::NOT_FOUND,
                "SESSION_NOT_FOUND",
                "Session not found".to_string(),
            ),
            AppError::Chat(ChatError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Chat(ChatError::Llm(e)) => {
                tracing::error!(error = %e, "Model provider call failed");
                let detail = match e {
                    LlmError::RateLimited => "Model provider is rate limiting requests".to_string(),
                    _ => format!("Model provider error: {e}"),
                };
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", detail)
            }
            AppError::Chat(ChatError::Repository(e)) => {
                tracing::error!(error = %e, "Conversation storage failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::Auth(e @ (AuthError::UsernameTaken(_) | AuthError::EmailTaken(_))) => {
                (StatusCode::BAD_REQUEST, "ALREADY_REGISTERED", e.to_string())
            }
            AppError::Auth(AuthError::Validation(msg)) => {
                (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone())
            }
            AppError::Auth(AuthError::InvalidCredentials) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_CREDENTIALS",
                "Invalid username or password".to_string(),
            ),
            AppError::Auth(AuthError::InvalidToken) => (
                StatusCode::UNAUTHORIZED,
                "INVALID_TOKEN",
                "Invalid or expired token".to_string(),
            ),
            AppError::Auth(e) => {
                tracing::error!(error = %e, "Authentication backend failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "Internal server error".to_string(),
                )
            }
            AppError::InvalidSession => (
                StatusCode::BAD_REQUEST,
                "INVALID_SESSION",
                "Invalid session".to_string(),
            ),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        };

        (status, Json(json!({ "detail": detail, "code": code }))).into_response()
    }
}
