//! Configuration loader for Parley.
//!
//! Reads an optional TOML file and deserializes it into [`ServerConfig`].
//! Falls back to defaults when the file is missing or malformed.

use std::path::Path;

use parley_types::config::ServerConfig;

/// Load configuration from `path`.
///
/// - `None` or a missing file returns [`ServerConfig::default()`].
/// - A file that fails to parse logs a warning and returns the default.
pub async fn load_config(path: Option<&Path>) -> ServerConfig {
    let Some(config_path) = path else {
        return ServerConfig::default();
    };

    let content = match tokio::fs::read_to_string(config_path).await {
        Ok(content) => content,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            tracing::debug!("No config at {}, using defaults", config_path.display());
            return ServerConfig::default();
        }
        Err(err) => {
            tracing::warn!("Failed to read {}: {err}, using defaults", config_path.display());
            return ServerConfig::default();
        }
    };

    match toml::from_str::<ServerConfig>(&content) {
        Ok(config) => config,
        Err(err) => {
            tracing::warn!(
                "Failed to parse {}: {err}, using defaults",
                config_path.display()
            );
            ServerConfig::default()
        }
    }
}
