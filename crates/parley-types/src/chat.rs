//! Conversation and chat turn types for Parley.
//!
//! A conversation is an ordered, append-only sequence of turns. In the
//! ephemeral deployment conversations are anonymous; in the persistent
//! deployment every conversation is owned by a user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use std::fmt;
use std::str::FromStr;

/// Who produced a turn.
///
/// Serialized as `"human"` / `"ai"`, which is what history responses
/// expose to clients. Maps to the CHECK constraint on `chat_turns.role`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    Human,
    Ai,
}

impl fmt::Display for TurnRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TurnRole::Human => write!(f, "human"),
            TurnRole::Ai => write!(f, "ai"),
        }
    }
}

impl FromStr for TurnRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "human" => Ok(TurnRole::Human),
            "ai" => Ok(TurnRole::Ai),
            other => Err(format!("invalid turn role: '{other}'")),
        }
    }
}

/// One role-tagged message in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatTurn {
    pub role: TurnRole,
    pub content: String,
}

impl ChatTurn {
    pub fn human(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Human,
            content: content.into(),
        }
    }

    pub fn ai(content: impl Into<String>) -> Self {
        Self {
            role: TurnRole::Ai,
            content: content.into(),
        }
    }
}

/// A conversation (called a "session" by the ephemeral API).
///
/// `user_id` is `None` for anonymous conversations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub title: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Conversation {
    /// A fresh conversation with a random v4 identifier.
    pub fn new(user_id: Option<Uuid>, title: Option<String>) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            user_id,
            title,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether `caller` may read or write this conversation.
    ///
    /// Anonymous conversations are open to anonymous callers only; owned
    /// conversations only to their owner.
    pub fn is_accessible_by(&self, caller: Option<Uuid>) -> bool {
        self.user_id == caller
    }
}
