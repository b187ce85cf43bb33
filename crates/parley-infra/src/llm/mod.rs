//! LLM provider implementations.
//!
//! Contains the Gemini implementation of the [`LlmProvider`] trait defined
//! in `parley-core`, plus a small factory returning it type-erased.
//!
//! [`LlmProvider`]: parley_core::llm::provider::LlmProvider

pub mod gemini;

use secrecy::SecretString;

use parley_core::llm::box_provider::BoxLlmProvider;
use parley_types::llm::LlmError;

use self::gemini::GeminiProvider;

/// Build the Gemini provider as a [`BoxLlmProvider`].
///
/// `base_url` overrides the public endpoint (proxies, local fakes).
pub fn create_provider(
    api_key: SecretString,
    base_url: Option<&str>,
) -> Result<BoxLlmProvider, LlmError> {
    let mut provider = GeminiProvider::new(api_key)?;
    if let Some(url) = base_url {
        provider = provider.with_base_url(url);
    }
    Ok(BoxLlmProvider::new(provider))
}
