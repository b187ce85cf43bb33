//! Prompt template + provider call.
//!
//! `ConversationChain::invoke` turns stored history and a new human input
//! into a completion request, calls the provider, and hands back the reply
//! together with the two turns the caller must append.

use parley_types::chat::ChatTurn;
use parley_types::llm::{CompletionRequest, LlmError, Message, MessageRole};
use tracing::debug;

use crate::llm::box_provider::BoxLlmProvider;

/// System prompt applied to every conversation.
#[derive(Debug, Clone)]
pub struct PromptTemplate {
    system: String,
}

impl PromptTemplate {
    pub fn new(system: impl Into<String>) -> Self {
        Self {
            system: system.into(),
        }
    }

    pub fn system(&self) -> &str {
        &self.system
    }

    /// Render history + input into the message list sent to the model.
    pub fn render(&self, history: &[ChatTurn], input: &str) -> Vec<Message> {
        let mut messages: Vec<Message> = history.iter().map(Message::from).collect();
        messages.push(Message {
            role: MessageRole::User,
            content: input.to_string(),
        });
        messages
    }
}

/// Sampling knobs forwarded to the provider.
#[derive(Debug, Clone)]
pub struct ChainSettings {
    pub model: String,
    pub max_tokens: u32,
    pub temperature: Option<f64>,
}

/// Result of one chain invocation.
#[derive(Debug, Clone)]
pub struct ChainOutput {
    pub reply: String,
    /// `[Human(input), Ai(reply)]`, in append order.
    pub new_turns: Vec<ChatTurn>,
}

/// Template + provider, invoked once per chat turn.
pub struct ConversationChain {
    provider: BoxLlmProvider,
    template: PromptTemplate,
    settings: ChainSettings,
}

impl ConversationChain {
    pub fn new(provider: BoxLlmProvider, template: PromptTemplate, settings: ChainSettings) -> Self {
        Self {
            provider,
            template,
            settings,
        }
    }

    /// Call the model with `history` as context. Does not touch storage.
    pub async fn invoke(&self, history: &[ChatTurn], input: &str) -> Result<ChainOutput, LlmError> {
        let request = CompletionRequest {
            model: self.settings.model.clone(),
            messages: self.template.render(history, input),
            system: Some(self.template.system().to_string()),
            max_tokens: self.settings.max_tokens,
            temperature: self.settings.temperature,
        };

        debug!(
            provider = self.provider.name(),
            model = %request.model,
            messages = request.messages.len(),
            "Invoking conversation chain"
        );

        let response = self.provider.complete(&request).await?;

        Ok(ChainOutput {
            new_turns: vec![ChatTurn::human(input), ChatTurn::ai(response.content.clone())],
            reply: response.content,
        })
    }
}
