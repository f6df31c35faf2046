//! Model transport implementations for Remind.
//!
//! All providers implement the `remind_core::Provider` trait.
//! [`build_from_config`] picks the transport described by the config.

pub mod openai_compat;
pub mod scripted;

pub use openai_compat::OpenAiCompatProvider;
pub use scripted::ScriptedProvider;

use remind_config::AppConfig;
use remind_core::Provider;
use remind_core::error::ProviderError;
use std::sync::Arc;
use std::time::Duration;

/// Build the configured OpenAI-compatible provider.
///
/// Local endpoints (Ollama, llama.cpp) accept any key, so a missing key is
/// only an error for remote URLs.
pub fn build_from_config(config: &AppConfig) -> Result<Arc<dyn Provider>, ProviderError> {
    let is_local = config.base_url.contains("localhost") || config.base_url.contains("127.0.0.1");
    let api_key = match (&config.api_key, is_local) {
        (Some(key), _) => key.clone(),
        (None, true) => "local".to_string(),
        (None, false) => {
            return Err(ProviderError::NotConfigured(
                "no API key; set REMIND_API_KEY or OPENAI_API_KEY".into(),
            ));
        }
    };

    let provider = OpenAiCompatProvider::new(
        "openai_compat",
        &config.base_url,
        api_key,
        &config.model,
        Duration::from_secs(config.request_timeout_secs),
    )?
    .with_temperature(config.temperature)
    .with_max_tokens(config.max_tokens);

    Ok(Arc::new(provider))
}
