//! Provider trait — the abstraction over model transports.
//!
//! A Provider knows how to send one prompt to a text-generating model and
//! get the raw completion back. The agent loop never sees HTTP details.
//!
//! Implementations: OpenAI-compatible endpoints, scripted replay.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// A single generation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// The full prompt for this cycle
    pub prompt: String,

    /// Fixed system instructions
    pub system_prompt: String,

    /// Stop sequences. Generation must end before any of these is emitted.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub stop: Vec<String>,
}

impl GenerateRequest {
    /// Create a request with no stop sequences.
    pub fn new(prompt: impl Into<String>, system_prompt: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            system_prompt: system_prompt.into(),
            stop: Vec::new(),
        }
    }

    /// Add a stop sequence.
    pub fn with_stop(mut self, stop: impl Into<String>) -> Self {
        self.stop.push(stop.into());
        self
    }
}

/// The core Provider trait.
///
/// The agent loop calls `generate()` without knowing which backend is
/// answering. Implementations must honor `stop` so the model can never
/// write its own observation.
#[async_trait]
pub trait Provider: Send + Sync {
    /// A human-readable name for this provider (e.g., "openai", "scripted").
    fn name(&self) -> &str;

    /// Send a request and get the complete generated text.
    async fn generate(&self, request: GenerateRequest) -> std::result::Result<String, ProviderError>;
}

/// Cut `text` at the earliest occurrence of any stop sequence.
///
/// Useful for backends that cannot enforce stop sequences server-side.
pub fn truncate_at_stop<'a>(text: &'a str, stop: &[String]) -> &'a str {
    let cut = stop
        .iter()
        .filter(|s| !s.is_empty())
        .filter_map(|s| text.find(s.as_str()))
        .min();
    match cut {
        Some(idx) => &text[..idx],
        None => text,
    }
}
