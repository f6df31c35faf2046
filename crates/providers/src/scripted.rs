//! Scripted provider — deterministic replay of model replies.
//!
//! Each call to `generate` returns the next entry of the script. Replies are
//! cut at the request's stop sequences exactly like a real endpoint would
//! cut them. Used for tests and for replaying a recorded run offline.

use async_trait::async_trait;
use remind_core::error::{Error, ProviderError};
use remind_core::provider::{GenerateRequest, Provider, truncate_at_stop};
use std::path::Path;
use std::sync::Mutex;

/// A provider that plays back a fixed sequence of replies (or faults).
pub struct ScriptedProvider {
    script: Vec<Result<String, ProviderError>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedProvider {
    /// Create a provider that replies with `replies` in order.
    pub fn new<S: Into<String>>(replies: impl IntoIterator<Item = S>) -> Self {
        Self {
            script: replies.into_iter().map(|r| Ok(r.into())).collect(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Append a fault to the script.
    pub fn then_fail(mut self, error: ProviderError) -> Self {
        self.script.push(Err(error));
        self
    }

    /// Append a reply to the script.
    pub fn then_reply(mut self, reply: impl Into<String>) -> Self {
        self.script.push(Ok(reply.into()));
        self
    }

    /// Load replies from a JSON file holding an array of strings.
    pub fn from_json_file(path: &Path) -> Result<Self, Error> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::Config {
            message: format!("Failed to read script {}: {e}", path.display()),
        })?;
        let replies: Vec<String> = serde_json::from_str(&content)?;
        Ok(Self::new(replies))
    }

    /// Number of `generate` calls made so far.
    pub fn call_count(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Every request received, in order.
    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl Provider for ScriptedProvider {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate(&self, request: GenerateRequest) -> Result<String, ProviderError> {
        let call = {
            let mut requests = self
                .requests
                .lock()
                .map_err(|_| ProviderError::NotConfigured("script lock poisoned".into()))?;
            requests.push(request.clone());
            requests.len() - 1
        };

        match self.script.get(call) {
            Some(Ok(reply)) => Ok(truncate_at_stop(reply, &request.stop).to_string()),
            Some(Err(e)) => Err(e.clone()),
            None => Err(ProviderError::ScriptExhausted { calls: call }),
        }
    }
}
