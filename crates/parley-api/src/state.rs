//! Application state wiring services to concrete infra implementations.
//!
//! Services are generic over repository, hasher, and token traits; the
//! aliases here pin them for each deployment. Handlers receive the state
//! through axum's `State` extractor, so both structs are cheap to clone.

use std::sync::Arc;

use chrono::Duration;
use secrecy::SecretString;

use parley_core::auth::service::AuthService;
use parley_core::chat::chain::{ChainSettings, ConversationChain, PromptTemplate};
use parley_core::chat::service::ChatService;
use parley_core::llm::box_provider::BoxLlmProvider;
use parley_infra::crypto::password::Argon2PasswordHasher;
use parley_infra::crypto::token::JwtTokenIssuer;
use parley_infra::memory::conversation::InMemoryConversationRepository;
use parley_infra::sqlite::conversation::SqliteConversationRepository;
use parley_infra::sqlite::pool::DatabasePool;
use parley_infra::sqlite::user::SqliteUserRepository;
use parley_types::config::ServerConfig;

pub type EphemeralChatService = ChatService<InMemoryConversationRepository>;

pub type PersistentChatService = ChatService<SqliteConversationRepository>;

pub type ConcreteAuthService =
    AuthService<SqliteUserRepository, Argon2PasswordHasher, JwtTokenIssuer>;

/// Build the prompt chain shared by both deployments.
pub fn build_chain(provider: BoxLlmProvider, config: &ServerConfig) -> ConversationChain {
    ConversationChain::new(
        provider,
        PromptTemplate::new(config.system_prompt.clone()),
        ChainSettings {
            model: config.model.clone(),
            max_tokens: config.max_output_tokens,
            temperature: config.temperature,
        },
    )
}

/// State for the anonymous deployment: sessions live in process memory.
#[derive(Clone)]
pub struct EphemeralState {
    pub chat_service: Arc<EphemeralChatService>,
}

impl EphemeralState {
    pub fn new(provider: BoxLlmProvider, config: &ServerConfig) -> Self {
        let chat_service = ChatService::new(
            InMemoryConversationRepository::new(),
            build_chain(provider, config),
        );
        Self {
            chat_service: Arc::new(chat_service),
        }
    }
}

/// State for the authenticated deployment backed by SQLite.
#[derive(Clone)]
pub struct AppState {
    pub chat_service: Arc<PersistentChatService>,
    pub auth_service: Arc<ConcreteAuthService>,
}

impl AppState {
    /// Connect to `config.database_url`, run migrations, and wire services.
    pub async fn init(
        provider: BoxLlmProvider,
        config: &ServerConfig,
        jwt_secret: &SecretString,
    ) -> anyhow::Result<Self> {
        let db_pool = DatabasePool::new(&config.database_url).await?;
        tracing::info!(database_url = %config.database_url, "Database ready");
        Ok(Self::from_pool(
            db_pool,
            provider,
            config,
            jwt_secret,
            Argon2PasswordHasher::new(),
        ))
    }

    /// Wire services over an existing pool.
    ///
    /// Takes the hasher explicitly so tests can use cheap Argon2 parameters.
    pub fn from_pool(
        db_pool: DatabasePool,
        provider: BoxLlmProvider,
        config: &ServerConfig,
        jwt_secret: &SecretString,
        hasher: Argon2PasswordHasher,
    ) -> Self {
        let chat_service = ChatService::new(
            SqliteConversationRepository::new(db_pool.clone()),
            build_chain(provider, config),
        );
        let auth_service = AuthService::new(
            SqliteUserRepository::new(db_pool),
            hasher,
            JwtTokenIssuer::new(jwt_secret, Duration::minutes(config.token_ttl_minutes)),
        );

        Self {
            chat_service: Arc::new(chat_service),
            auth_service: Arc::new(auth_service),
        }
    }
}
