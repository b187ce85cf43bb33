//! Server configuration types for Parley.
//!
//! `ServerConfig` represents the optional `parley.toml` that tunes the
//! model, prompt, token lifetime, and database location. Secrets (API key,
//! signing secret) never live here; they come from the environment.

use serde::{Deserialize, Serialize};

/// Top-level configuration. All fields have defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Model identifier passed to the LLM provider.
    #[serde(default = "default_model")]
    pub model: String,

    /// System prompt prepended to every conversation.
    #[serde(default = "default_system_prompt")]
    pub system_prompt: String,

    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,

    #[serde(default)]
    pub temperature: Option<f64>,

    /// Access-token lifetime in minutes.
    #[serde(default = "default_token_ttl_minutes")]
    pub token_ttl_minutes: i64,

    /// SQLite URL for the persistent deployment.
    #[serde(default = "default_database_url")]
    pub database_url: String,
}

fn default_model() -> String {
    "gemini-2.5-flash".to_string()
}

fn default_system_prompt() -> String {
    "You are a helpful assistant and answer clearly.".to_string()
}

fn default_max_output_tokens() -> u32 {
    1024
}

fn default_token_ttl_minutes() -> i64 {
    60
}

fn default_database_url() -> String {
    "sqlite://parley.db?mode=rwc".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            system_prompt: default_system_prompt(),
            max_output_tokens: default_max_output_tokens(),
            temperature: None,
            token_ttl_minutes: default_token_ttl_minutes(),
            database_url: default_database_url(),
        }
    }
}
