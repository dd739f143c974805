//! LLM provider implementations.
//!
//! One implementation covers the vast majority of backends: any
//! endpoint speaking the OpenAI chat-completions dialect (Gemini's
//! compatibility layer, OpenRouter, Ollama, vLLM, ...).

pub mod openai_compat;

use reelclaw_config::ProviderSettings;
use reelclaw_core::error::ProviderError;
use std::sync::Arc;

pub use openai_compat::OpenAiCompatProvider;

/// Build the configured provider.
pub fn build_from_settings(
    settings: &ProviderSettings,
) -> Result<Arc<dyn reelclaw_core::Provider>, ProviderError> {
    let api_key = settings
        .api_key
        .clone()
        .ok_or_else(|| ProviderError::NotConfigured("no provider API key set".into()))?;

    let provider = OpenAiCompatProvider::new(
        "gemini",
        &settings.base_url,
        api_key,
        std::time::Duration::from_secs(settings.request_timeout_secs),
    )?;

    Ok(Arc::new(provider))
}
