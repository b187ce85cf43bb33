//! SQLite conversation repository implementation.
//!
//! Implements `ConversationRepository` from `parley-core` using sqlx with
//! split read/write pools: raw queries, private Row structs, reader for
//! SELECTs and writer for mutations.

use chrono::{DateTime, Utc};
use parley_core::chat::repository::ConversationRepository;
use parley_types::chat::{ChatTurn, Conversation, TurnRole};
use parley_types::error::RepositoryError;
use sqlx::Row;
use uuid::Uuid;

use super::pool::DatabasePool;
use super::{format_datetime, parse_datetime};

/// SQLite-backed implementation of `ConversationRepository`.
pub struct SqliteConversationRepository {
    pool: DatabasePool,
}

impl SqliteConversationRepository {
    /// Create a new repository backed by the given database pool.
    pub fn new(pool: DatabasePool) -> Self {
        Self { pool }
    }
}

// ---------------------------------------------------------------------------
// Private Row types for SQLite-to-domain mapping
// ---------------------------------------------------------------------------

struct ConversationRow {
    id: String,
    user_id: Option<String>,
    title: Option<String>,
    created_at: String,
    updated_at: String,
}

impl ConversationRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            id: row.try_get("id")?,
            user_id: row.try_get("user_id")?,
            title: row.try_get("title")?,
            created_at: row.try_get("created_at")?,
            updated_at: row.try_get("updated_at")?,
        })
    }

    fn into_conversation(self) -> Result<Conversation, RepositoryError> {
        let id = Uuid::parse_str(&self.id)
            .map_err(|e| RepositoryError::Query(format!("invalid conversation id: {e}")))?;
        let user_id = self
            .user_id
            .as_deref()
            .map(Uuid::parse_str)
            .transpose()
            .map_err(|e| RepositoryError::Query(format!("invalid user_id: {e}")))?;

        Ok(Conversation {
            id,
            user_id,
            title: self.title,
            created_at: parse_datetime(&self.created_at)?,
            updated_at: parse_datetime(&self.updated_at)?,
        })
    }
}

struct ChatTurnRow {
    role: String,
    content: String,
}

impl ChatTurnRow {
    fn from_row(row: &sqlx::sqlite::SqliteRow) -> Result<Self, sqlx::Error> {
        Ok(Self {
            role: row.try_get("role")?,
            content: row.try_get("content")?,
        })
    }

    fn into_turn(self) -> Result<ChatTurn, RepositoryError> {
        let role: TurnRole = self
            .role
            .parse()
            .map_err(|e: String| RepositoryError::Query(e))?;
        Ok(ChatTurn {
            role,
            content: self.content,
        })
    }
}

fn query_err(e: sqlx::Error) -> RepositoryError {
    RepositoryError::Query(e.to_string())
}

// ---------------------------------------------------------------------------
// ConversationRepository implementation
// ---------------------------------------------------------------------------

impl ConversationRepository for SqliteConversationRepository {
    async fn create_conversation(
        &self,
        conversation: &Conversation,
    ) -> Result<Conversation, RepositoryError> {
        sqlx::query(
            r#"INSERT INTO conversations (id, user_id, title, created_at, updated_at)
               VALUES (?, ?, ?, ?, ?)"#,
        )
        .bind(conversation.id.to_string())
        .bind(conversation.user_id.map(|u| u.to_string()))
        .bind(&conversation.title)
        .bind(format_datetime(&conversation.created_at))
        .bind(format_datetime(&conversation.updated_at))
        .execute(&self.pool.writer)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db) = &e {
                if db.is_unique_violation() {
                    return RepositoryError::Conflict(format!(
                        "conversation {} already exists",
                        conversation.id
                    ));
                }
            }
            query_err(e)
        })?;

        Ok(conversation.clone())
    }

    async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, RepositoryError> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id.to_string())
            .fetch_optional(&self.pool.reader)
            .await
            .map_err(query_err)?;

        match row {
            Some(row) => {
                let conv_row = ConversationRow::from_row(&row).map_err(query_err)?;
                Ok(Some(conv_row.into_conversation()?))
            }
            None => Ok(None),
        }
    }

    async fn list_conversations(&self, user_id: &Uuid) -> Result<Vec<Conversation>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT * FROM conversations WHERE user_id = ? ORDER BY updated_at DESC, created_at DESC",
        )
        .bind(user_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut conversations = Vec::with_capacity(rows.len());
        for row in &rows {
            let conv_row = ConversationRow::from_row(row).map_err(query_err)?;
            conversations.push(conv_row.into_conversation()?);
        }

        Ok(conversations)
    }

    async fn update_conversation(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
        let result = sqlx::query("UPDATE conversations SET title = ?, updated_at = ? WHERE id = ?")
            .bind(&conversation.title)
            .bind(format_datetime(&conversation.updated_at))
            .bind(conversation.id.to_string())
            .execute(&self.pool.writer)
            .await
            .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn touch_conversation(
        &self,
        id: &Uuid,
        updated_at: DateTime<Utc>,
        fallback_title: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let result = sqlx::query(
            "UPDATE conversations SET updated_at = ?, title = COALESCE(title, ?) WHERE id = ?",
        )
        .bind(format_datetime(&updated_at))
        .bind(fallback_title)
        .bind(id.to_string())
        .execute(&self.pool.writer)
        .await
        .map_err(query_err)?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }

    async fn append_turns(
        &self,
        conversation_id: &Uuid,
        turns: &[ChatTurn],
    ) -> Result<(), RepositoryError> {
        let id = conversation_id.to_string();
        let now = format_datetime(&Utc::now());
        let mut tx = self.pool.writer.begin().await.map_err(query_err)?;

        let exists = sqlx::query("SELECT 1 FROM conversations WHERE id = ?")
            .bind(&id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(query_err)?;
        if exists.is_none() {
            return Err(RepositoryError::NotFound);
        }

        for turn in turns {
            sqlx::query(
                "INSERT INTO chat_turns (conversation_id, role, content, created_at) VALUES (?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(turn.role.to_string())
            .bind(&turn.content)
            .bind(&now)
            .execute(&mut *tx)
            .await
            .map_err(query_err)?;
        }

        tx.commit().await.map_err(query_err)?;
        Ok(())
    }

    async fn get_turns(&self, conversation_id: &Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
        let rows = sqlx::query(
            "SELECT role, content FROM chat_turns WHERE conversation_id = ? ORDER BY id ASC",
        )
        .bind(conversation_id.to_string())
        .fetch_all(&self.pool.reader)
        .await
        .map_err(query_err)?;

        let mut turns = Vec::with_capacity(rows.len());
        for row in &rows {
            let turn_row = ChatTurnRow::from_row(row).map_err(query_err)?;
            turns.push(turn_row.into_turn()?);
        }

        Ok(turns)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sqlite::pool::tests::temp_pool;
    use crate::sqlite::user::SqliteUserRepository;
    use chrono::Duration;
    use parley_core::auth::repository::UserRepository;
    use parley_types::user::User;

    async fn seed_user(pool: &DatabasePool, username: &str) -> Uuid {
        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email: format!("{username}@example.com"),
            password_hash: "hash".to_string(),
            created_at: Utc::now(),
        };
        SqliteUserRepository::new(pool.clone())
            .create_user(&user)
            .await
            .unwrap();
        user.id
    }

    #[tokio::test]
    async fn test_create_and_get_roundtrip() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = seed_user(&pool, "ada").await;

        let conv = Conversation::new(Some(owner), Some("Hello".to_string()));
        repo.create_conversation(&conv).await.unwrap();

        let fetched = repo.get_conversation(&conv.id).await.unwrap().unwrap();
        assert_eq!(fetched.id, conv.id);
        assert_eq!(fetched.user_id, Some(owner));
        assert_eq!(fetched.title.as_deref(), Some("Hello"));
        assert!(repo.get_turns(&conv.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_get_missing_returns_none() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        assert!(repo.get_conversation(&Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_append_turns_keeps_insertion_order() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let conv = Conversation::new(None, None);
        repo.create_conversation(&conv).await.unwrap();

        repo.append_turns(&conv.id, &[ChatTurn::human("q1"), ChatTurn::ai("a1")])
            .await
            .unwrap();
        repo.append_turns(&conv.id, &[ChatTurn::human("q2"), ChatTurn::ai("a2")])
            .await
            .unwrap();

        let turns = repo.get_turns(&conv.id).await.unwrap();
        assert_eq!(
            turns,
            vec![
                ChatTurn::human("q1"),
                ChatTurn::ai("a1"),
                ChatTurn::human("q2"),
                ChatTurn::ai("a2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_append_to_missing_conversation() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let err = repo
            .append_turns(&Uuid::new_v4(), &[ChatTurn::human("x")])
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_and_list_order() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool.clone());
        let owner = seed_user(&pool, "ada").await;
        let other = seed_user(&pool, "grace").await;

        let mut first = Conversation::new(Some(owner), Some("first".to_string()));
        first.updated_at = Utc::now() - Duration::minutes(10);
        first.created_at = first.updated_at;
        let second = Conversation::new(Some(owner), Some("second".to_string()));
        repo.create_conversation(&first).await.unwrap();
        repo.create_conversation(&second).await.unwrap();
        repo.create_conversation(&Conversation::new(Some(other), None))
            .await
            .unwrap();

        let titles = |list: Vec<Conversation>| -> Vec<String> {
            list.into_iter().filter_map(|c| c.title).collect()
        };
        assert_eq!(
            titles(repo.list_conversations(&owner).await.unwrap()),
            vec!["second", "first"]
        );

        first.title = Some("first, renamed".to_string());
        first.updated_at = Utc::now() + Duration::seconds(1);
        repo.update_conversation(&first).await.unwrap();

        assert_eq!(
            titles(repo.list_conversations(&owner).await.unwrap()),
            vec!["first, renamed", "second"]
        );
    }

    #[tokio::test]
    async fn test_touch_keeps_existing_title() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let untitled = Conversation::new(None, None);
        let mut renamed = Conversation::new(None, None);
        repo.create_conversation(&untitled).await.unwrap();
        repo.create_conversation(&renamed).await.unwrap();

        renamed.title = Some("Renamed".to_string());
        repo.update_conversation(&renamed).await.unwrap();

        let later = Utc::now() + Duration::seconds(5);
        repo.touch_conversation(&untitled.id, later, Some("Derived"))
            .await
            .unwrap();
        repo.touch_conversation(&renamed.id, later, Some("Derived"))
            .await
            .unwrap();

        let untitled = repo.get_conversation(&untitled.id).await.unwrap().unwrap();
        let renamed = repo.get_conversation(&renamed.id).await.unwrap().unwrap();
        assert_eq!(untitled.title.as_deref(), Some("Derived"));
        assert_eq!(renamed.title.as_deref(), Some("Renamed"));
        assert_eq!(format_datetime(&renamed.updated_at), format_datetime(&later));

        let err = repo
            .touch_conversation(&Uuid::new_v4(), later, None)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }

    #[tokio::test]
    async fn test_update_missing_is_not_found() {
        let (pool, _dir) = temp_pool().await;
        let repo = SqliteConversationRepository::new(pool);
        let err = repo
            .update_conversation(&Conversation::new(None, None))
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::NotFound));
    }
}
