//! ConversationRepository trait definition.
//!
//! CRUD for conversations plus append-only access to their turn history.
//! Implemented in parley-infra by both the in-memory and SQLite stores.

use chrono::{DateTime, Utc};
use parley_types::chat::{ChatTurn, Conversation};
use parley_types::error::RepositoryError;
use uuid::Uuid;

/// Repository trait for conversation and history persistence.
///
/// Uses native async fn in traits (RPITIT, Rust 2024 edition).
pub trait ConversationRepository: Send + Sync {
    /// Register a new conversation with an empty history.
    fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<Conversation, RepositoryError>> + Send;

    /// Get a conversation by its unique ID.
    fn get_conversation(
        &self,
        id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Option<Conversation>, RepositoryError>> + Send;

    /// List a user's conversations, most recently updated first.
    fn list_conversations(
        &self,
        user_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<Conversation>, RepositoryError>> + Send;

    /// Persist title and `updated_at`. `NotFound` when the row is gone.
    fn update_conversation(
        &self,
        conversation: &Conversation,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Bump `updated_at` after a chat turn.
    ///
    /// `fallback_title` is stored only when the conversation has no title
    /// at write time, so a rename that lands mid-turn is never overwritten.
    fn touch_conversation(
        &self,
        id: &Uuid,
        updated_at: DateTime<Utc>,
        fallback_title: Option<&str>,
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Append turns to the end of a conversation's history, in slice order.
    fn append_turns(
        &self,
        conversation_id: &Uuid,
        turns: &[ChatTurn],
    ) -> impl std::future::Future<Output = Result<(), RepositoryError>> + Send;

    /// Full history, oldest first.
    fn get_turns(
        &self,
        conversation_id: &Uuid,
    ) -> impl std::future::Future<Output = Result<Vec<ChatTurn>, RepositoryError>> + Send;
}
