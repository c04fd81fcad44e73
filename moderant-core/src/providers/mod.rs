//! LLM provider implementations.
//!
//! Provides the OpenAI-compatible implementation of the `LlmProvider` trait,
//! which covers OpenAI, Azure, Ollama, vLLM, and LM Studio endpoints.
//!
//! Use `create_provider()` to instantiate a provider from config.

pub mod openai_compat;

use crate::brain::LlmProvider;
use crate::config::LlmConfig;
use crate::error::LlmError;
use std::sync::Arc;

pub use openai_compat::OpenAiCompatibleProvider;

/// Create the provider described by `config`.
///
/// The API key is resolved here, once, so a missing key fails before any
/// input is read.
pub fn create_provider(config: &LlmConfig) -> Result<Arc<dyn LlmProvider>, LlmError> {
    let provider = OpenAiCompatibleProvider::new(config)?;
    tracing::debug!(
        base_url = %provider.base_url(),
        model = %config.model,
        "Created OpenAI-compatible provider"
    );
    Ok(Arc::new(provider))
}
