//! Chat service orchestrating conversation lifecycle and chat turns.
//!
//! `ChatService` is the single entry point used by both deployments:
//! anonymous callers pass `caller = None`, authenticated callers pass their
//! user id. Every read or write is gated by `Conversation::is_accessible_by`.

use chrono::Utc;
use parley_types::chat::{ChatTurn, Conversation};
use parley_types::error::ChatError;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::chain::ConversationChain;
use crate::chat::repository::ConversationRepository;
use crate::chat::title::{MAX_TITLE_CHARS, derive_title};

/// Orchestrates conversation creation, chat turns, and history reads.
///
/// Generic over `ConversationRepository` so the same logic runs on the
/// in-memory and SQLite stores.
pub struct ChatService<R: ConversationRepository> {
    repo: R,
    chain: ConversationChain,
}

impl<R: ConversationRepository> ChatService<R> {
    pub fn new(repo: R, chain: ConversationChain) -> Self {
        Self { repo, chain }
    }

    // --- Conversation lifecycle ---

    /// Create a conversation with an empty history, optionally owned.
    pub async fn start_conversation(
        &self,
        owner: Option<Uuid>,
        title: Option<String>,
    ) -> Result<Conversation, ChatError> {
        let title = title.map(|t| validate_title(&t)).transpose()?;
        let conversation = Conversation::new(owner, title);
        let created = self.repo.create_conversation(&conversation).await?;
        info!(conversation_id = %created.id, owned = owner.is_some(), "Conversation started");
        Ok(created)
    }

    /// Look up a conversation the caller is allowed to see.
    pub async fn conversation_for(
        &self,
        id: &Uuid,
        caller: Option<Uuid>,
    ) -> Result<Conversation, ChatError> {
        let conversation = self
            .repo
            .get_conversation(id)
            .await?
            .ok_or(ChatError::NotFound)?;

        if !conversation.is_accessible_by(caller) {
            warn!(conversation_id = %id, "Conversation accessed by non-owner");
            return Err(ChatError::NotOwned);
        }

        Ok(conversation)
    }

    /// Conversations owned by `owner`, most recently updated first.
    pub async fn list_conversations(&self, owner: &Uuid) -> Result<Vec<Conversation>, ChatError> {
        Ok(self.repo.list_conversations(owner).await?)
    }

    /// Set a new title. Trimmed, non-empty, at most `MAX_TITLE_CHARS`.
    pub async fn rename_conversation(
        &self,
        id: &Uuid,
        caller: Option<Uuid>,
        title: &str,
    ) -> Result<Conversation, ChatError> {
        let title = validate_title(title)?;
        let mut conversation = self.conversation_for(id, caller).await?;
        conversation.title = Some(title);
        conversation.updated_at = Utc::now();
        self.repo.update_conversation(&conversation).await?;
        info!(conversation_id = %id, "Conversation renamed");
        Ok(conversation)
    }

    // --- Chat turns ---

    /// Run one chat turn and return the model's reply.
    ///
    /// Access is checked before anything else, so the model is never called
    /// for a missing or foreign conversation. The human and AI turns are
    /// appended together only after the provider succeeds.
    pub async fn send_message(
        &self,
        id: &Uuid,
        caller: Option<Uuid>,
        message: &str,
    ) -> Result<String, ChatError> {
        if message.trim().is_empty() {
            return Err(ChatError::Validation("message cannot be empty".to_string()));
        }

        self.conversation_for(id, caller).await?;
        let history = self.repo.get_turns(id).await?;

        let output = self.chain.invoke(&history, message).await?;
        self.repo.append_turns(id, &output.new_turns).await?;

        let fallback_title = derive_title(message);
        self.repo
            .touch_conversation(id, Utc::now(), fallback_title.as_deref())
            .await?;

        info!(
            conversation_id = %id,
            history_len = history.len() + output.new_turns.len(),
            "Chat turn completed"
        );
        Ok(output.reply)
    }

    /// Full ordered history of a conversation the caller may see.
    pub async fn history(
        &self,
        id: &Uuid,
        caller: Option<Uuid>,
    ) -> Result<Vec<ChatTurn>, ChatError> {
        self.conversation_for(id, caller).await?;
        Ok(self.repo.get_turns(id).await?)
    }
}

fn validate_title(title: &str) -> Result<String, ChatError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(ChatError::Validation("title cannot be empty".to_string()));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(ChatError::Validation(format!(
            "title cannot exceed {MAX_TITLE_CHARS} characters"
        )));
    }
    Ok(title.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chat::chain::{ChainSettings, PromptTemplate};
    use crate::llm::box_provider::BoxLlmProvider;
    use crate::llm::provider::LlmProvider;
    use chrono::DateTime;
    use parley_types::chat::TurnRole;
    use parley_types::error::RepositoryError;
    use parley_types::llm::{CompletionRequest, CompletionResponse, LlmError, StopReason, Usage};
    use std::collections::HashMap;
    use std::future::Future;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    // --- Test doubles ---

    type ConversationMap = Arc<Mutex<HashMap<Uuid, Conversation>>>;

    #[derive(Default)]
    struct MapRepository {
        conversations: ConversationMap,
        turns: Mutex<HashMap<Uuid, Vec<ChatTurn>>>,
    }

    impl ConversationRepository for MapRepository {
        async fn create_conversation(
            &self,
            conversation: &Conversation,
        ) -> Result<Conversation, RepositoryError> {
            self.conversations
                .lock()
                .unwrap()
                .insert(conversation.id, conversation.clone());
            self.turns.lock().unwrap().insert(conversation.id, Vec::new());
            Ok(conversation.clone())
        }

        async fn get_conversation(&self, id: &Uuid) -> Result<Option<Conversation>, RepositoryError> {
            Ok(self.conversations.lock().unwrap().get(id).cloned())
        }

        async fn list_conversations(
            &self,
            user_id: &Uuid,
        ) -> Result<Vec<Conversation>, RepositoryError> {
            let mut list: Vec<Conversation> = self
                .conversations
                .lock()
                .unwrap()
                .values()
                .filter(|c| c.user_id == Some(*user_id))
                .cloned()
                .collect();
            list.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
            Ok(list)
        }

        async fn update_conversation(&self, conversation: &Conversation) -> Result<(), RepositoryError> {
            let mut map = self.conversations.lock().unwrap();
            match map.get_mut(&conversation.id) {
                Some(existing) => {
                    *existing = conversation.clone();
                    Ok(())
                }
                None => Err(RepositoryError::NotFound),
            }
        }

        async fn touch_conversation(
            &self,
            id: &Uuid,
            updated_at: DateTime<Utc>,
            fallback_title: Option<&str>,
        ) -> Result<(), RepositoryError> {
            let mut map = self.conversations.lock().unwrap();
            let existing = map.get_mut(id).ok_or(RepositoryError::NotFound)?;
            if existing.title.is_none() {
                existing.title = fallback_title.map(str::to_string);
            }
            existing.updated_at = updated_at;
            Ok(())
        }

        async fn append_turns(
            &self,
            conversation_id: &Uuid,
            turns: &[ChatTurn],
        ) -> Result<(), RepositoryError> {
            self.turns
                .lock()
                .unwrap()
                .get_mut(conversation_id)
                .ok_or(RepositoryError::NotFound)?
                .extend_from_slice(turns);
            Ok(())
        }

        async fn get_turns(&self, conversation_id: &Uuid) -> Result<Vec<ChatTurn>, RepositoryError> {
            Ok(self
                .turns
                .lock()
                .unwrap()
                .get(conversation_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    /// Replies "reply N" and counts calls; optionally always fails.
    struct CountingProvider {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl LlmProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
            let fail = self.fail;
            async move {
                if fail {
                    return Err(LlmError::Provider {
                        message: "upstream down".to_string(),
                    });
                }
                Ok(CompletionResponse {
                    id: format!("resp-{n}"),
                    content: format!("reply {n}"),
                    model: "test-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                })
            }
        }
    }

    /// Renames every stored conversation while the "model" is thinking.
    struct RenamingProvider {
        conversations: ConversationMap,
    }

    impl LlmProvider for RenamingProvider {
        fn name(&self) -> &str {
            "renaming"
        }

        fn complete(
            &self,
            _request: &CompletionRequest,
        ) -> impl Future<Output = Result<CompletionResponse, LlmError>> + Send {
            for conversation in self.conversations.lock().unwrap().values_mut() {
                conversation.title = Some("Renamed meanwhile".to_string());
            }
            async move {
                Ok(CompletionResponse {
                    id: "resp-1".to_string(),
                    content: "done".to_string(),
                    model: "test-model".to_string(),
                    stop_reason: StopReason::EndTurn,
                    usage: Usage::default(),
                })
            }
        }
    }

    fn chain_with<P: LlmProvider + 'static>(provider: P) -> ConversationChain {
        ConversationChain::new(
            BoxLlmProvider::new(provider),
            PromptTemplate::new("be helpful"),
            ChainSettings {
                model: "test-model".to_string(),
                max_tokens: 32,
                temperature: None,
            },
        )
    }

    fn service(fail: bool) -> (ChatService<MapRepository>, Arc<AtomicUsize>) {
        let calls = Arc::new(AtomicUsize::new(0));
        let chain = chain_with(CountingProvider {
            calls: calls.clone(),
            fail,
        });
        (ChatService::new(MapRepository::default(), chain), calls)
    }

    // --- Tests ---

    #[tokio::test]
    async fn test_new_conversation_has_empty_history() {
        let (svc, _) = service(false);
        let conv = svc.start_conversation(None, None).await.unwrap();
        let history = svc.history(&conv.id, None).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn test_unknown_conversation_never_calls_model() {
        let (svc, calls) = service(false);
        let err = svc.send_message(&Uuid::new_v4(), None, "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::NotFound));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_two_messages_append_in_order() {
        let (svc, calls) = service(false);
        let conv = svc.start_conversation(None, None).await.unwrap();

        assert_eq!(svc.send_message(&conv.id, None, "first").await.unwrap(), "reply 1");
        assert_eq!(svc.send_message(&conv.id, None, "second").await.unwrap(), "reply 2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);

        let history = svc.history(&conv.id, None).await.unwrap();
        let human: Vec<&str> = history
            .iter()
            .filter(|t| t.role == TurnRole::Human)
            .map(|t| t.content.as_str())
            .collect();
        assert_eq!(human, vec!["first", "second"]);
        assert_eq!(
            history,
            vec![
                ChatTurn::human("first"),
                ChatTurn::ai("reply 1"),
                ChatTurn::human("second"),
                ChatTurn::ai("reply 2"),
            ]
        );
    }

    #[tokio::test]
    async fn test_foreign_conversation_is_rejected() {
        let (svc, calls) = service(false);
        let owner = Uuid::now_v7();
        let intruder = Uuid::now_v7();
        let conv = svc.start_conversation(Some(owner), None).await.unwrap();

        let err = svc.send_message(&conv.id, Some(intruder), "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::NotOwned));
        let err = svc.history(&conv.id, Some(intruder)).await.unwrap_err();
        assert!(matches!(err, ChatError::NotOwned));
        let err = svc.send_message(&conv.id, None, "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::NotOwned));
        assert_eq!(calls.load(Ordering::SeqCst), 0);

        svc.send_message(&conv.id, Some(owner), "hi").await.unwrap();
    }

    #[tokio::test]
    async fn test_failed_model_call_leaves_history_untouched() {
        let (svc, _) = service(true);
        let conv = svc.start_conversation(None, None).await.unwrap();

        let err = svc.send_message(&conv.id, None, "hi").await.unwrap_err();
        assert!(matches!(err, ChatError::Llm(_)));
        assert!(svc.history(&conv.id, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_blank_message_rejected() {
        let (svc, calls) = service(false);
        let conv = svc.start_conversation(None, None).await.unwrap();
        let err = svc.send_message(&conv.id, None, "   ").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_first_message_derives_title() {
        let (svc, _) = service(false);
        let conv = svc.start_conversation(None, None).await.unwrap();
        svc.send_message(&conv.id, None, "Explain borrow checking").await.unwrap();
        let conv = svc.conversation_for(&conv.id, None).await.unwrap();
        assert_eq!(conv.title.as_deref(), Some("Explain borrow checking"));
    }

    #[tokio::test]
    async fn test_rename_during_model_call_is_kept() {
        let repo = MapRepository::default();
        let chain = chain_with(RenamingProvider {
            conversations: repo.conversations.clone(),
        });
        let svc = ChatService::new(repo, chain);
        let conv = svc.start_conversation(None, None).await.unwrap();

        svc.send_message(&conv.id, None, "Explain lifetimes").await.unwrap();

        let conv = svc.conversation_for(&conv.id, None).await.unwrap();
        assert_eq!(conv.title.as_deref(), Some("Renamed meanwhile"));
        assert_eq!(svc.history(&conv.id, None).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_explicit_title_is_kept() {
        let (svc, _) = service(false);
        let conv = svc
            .start_conversation(None, Some("  Trip plans ".to_string()))
            .await
            .unwrap();
        assert_eq!(conv.title.as_deref(), Some("Trip plans"));
        svc.send_message(&conv.id, None, "Where to go?").await.unwrap();
        let conv = svc.conversation_for(&conv.id, None).await.unwrap();
        assert_eq!(conv.title.as_deref(), Some("Trip plans"));
    }

    #[tokio::test]
    async fn test_rename_validates_and_checks_owner() {
        let (svc, _) = service(false);
        let owner = Uuid::now_v7();
        let conv = svc.start_conversation(Some(owner), None).await.unwrap();

        let renamed = svc.rename_conversation(&conv.id, Some(owner), " New name ").await.unwrap();
        assert_eq!(renamed.title.as_deref(), Some("New name"));

        let err = svc.rename_conversation(&conv.id, Some(owner), "  ").await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));

        let long = "t".repeat(MAX_TITLE_CHARS + 1);
        let err = svc.rename_conversation(&conv.id, Some(owner), &long).await.unwrap_err();
        assert!(matches!(err, ChatError::Validation(_)));

        let err = svc
            .rename_conversation(&conv.id, Some(Uuid::now_v7()), "x")
            .await
            .unwrap_err();
        assert!(matches!(err, ChatError::NotOwned));
    }

    #[tokio::test]
    async fn test_list_only_returns_owned_conversations() {
        let (svc, _) = service(false);
        let alice = Uuid::now_v7();
        let bob = Uuid::now_v7();
        svc.start_conversation(Some(alice), None).await.unwrap();
        svc.start_conversation(Some(alice), None).await.unwrap();
        svc.start_conversation(Some(bob), None).await.unwrap();

        assert_eq!(svc.list_conversations(&alice).await.unwrap().len(), 2);
        assert_eq!(svc.list_conversations(&bob).await.unwrap().len(), 1);
    }
}
