//! In-memory conversation repository backed by a concurrent map.
//!
//! Implements `ConversationRepository` with a `DashMap` keyed by
//! conversation id. Each entry owns its conversation record and turn list,
//! so appends to different conversations never contend.

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use parley_core::chat::repository::ConversationRepository;
use parley_types::chat::{ChatTurn, Conversation};
use parley_types::error::RepositoryError;
use uuid::Uuid;

struct ConversationEntry {
    conversation: Conversation,
    turns: Vec<ChatTurn>,
}

/// DashMap-backed implementation of `ConversationRepository`.
#[derive(Default)]
pub struct InMemoryConversationRepository {
    entries: DashMap<Uuid, ConversationEntry>,
}

impl InMemoryConversationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConversationRepository for InMemoryConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        if self.entries.contains_key(&conversation.id) {
            return Err(RepositoryError::Conflict(format!(
                "conversation {} already exists",
                conversation.id
            )));
        }
        self.entries.insert(
            conversation.id,
            ConversationEntry {
                conversation: conversation.clone(),
                turns: Vec::new(),
            },
        );
        Ok(conversation.clone())
    }

    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, RepositoryError> {
        Ok(self.entries.get(id).map(|e| e.conversation.clone()))
    }

    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<Conversation>, RepositoryError> {
        let mut conversations: Vec<Conversation> = self
            .entries
            .iter()
            .filter(|e| e.conversation.user_id == Some(*user_id))
            .map(|e| e.conversation.clone())
            .collect();
        conversations.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        Ok(conversations)
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let mut entry = self
            .entries
            .get_mut(&conversation.id)
            .ok_or(RepositoryError::NotFound)?;
        entry.conversation.title = conversation.title.clone();
        entry.conversation.updated_at = conversation.updated_at;
        Ok(())
    }

    async fn touch_conversation(
        &self,
        id: &Uuid,
        updated_at: DateTime<Utc>,
        fallback_title: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut entry = self.entries.get_mut(id).ok_or(RepositoryError::NotFound)?;
        if entry.conversation.title.is_none() {
            entry.conversation.title = fallback_title.map(str::to_string);
        }
        entry.conversation.updated_at = updated_at;
        Ok(())
    }

    async fn append_turns(
        &self,
        conversation_id: &Uuid,
        turns: &[ChatTurn],
    ) -> Result<(), RepositoryError> {
        let mut entry = self
            .entries
            .get_mut(conversation_id)
            .ok_or(RepositoryError::NotFound)?;
        entry.turns.extend_from_slice(turns);
        Ok(())
    }

    async fn get_turns(&self, conversation_id: &Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
        self.entries
            .get(conversation_id)
            .map(|e| e.turns.clone())
            .ok_or(RepositoryError::NotFound)
    }
}
