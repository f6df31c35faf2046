//! Tool dispatch — turn a parsed action into an observation string.
//!
//! Dispatch never fails. Unknown tools, tool errors, timeouts and panics are
//! all rendered as error observations so the model can react to them on the
//! next cycle.

use futures::FutureExt;
use remind_core::error::ToolError;
use remind_core::tool::{ToolInput, ToolRegistry};
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// Looks up and invokes tools on behalf of the loop.
#[derive(Clone)]
pub struct Dispatcher {
    tools: Arc<ToolRegistry>,
    timeout: Option<Duration>,
}

impl Dispatcher {
    pub fn new(tools: Arc<ToolRegistry>) -> Self {
        Self {
            tools,
            timeout: None,
        }
    }

    /// Bound each tool invocation. `None` means no limit.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Invoke `action` with `input` and return the observation text.
    pub async fn dispatch(&self, action: &str, input: ToolInput) -> String {
        let start = std::time::Instant::now();
        let result = self.invoke(action, input).await;
        let duration_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(output) => {
                debug!(tool = action, duration_ms, "Tool succeeded");
                output
            }
            Err(e @ ToolError::NotFound { .. }) => {
                warn!(tool = action, "Model requested an unknown tool");
                format!("Error: {e}")
            }
            Err(e) => {
                warn!(tool = action, duration_ms, error = %e, "Tool failed");
                format!("Error executing tool '{action}': {}", fault_message(&e))
            }
        }
    }

    async fn invoke(&self, action: &str, input: ToolInput) -> Result<String, ToolError> {
        let tool = self.tools.get(action).ok_or_else(|| ToolError::NotFound {
            name: action.to_string(),
            available: self.tools.names().into_iter().map(String::from).collect(),
        })?;

        let call = AssertUnwindSafe(tool.execute(input)).catch_unwind();
        let outcome = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| ToolError::Timeout {
                    tool_name: action.to_string(),
                    timeout_secs: limit.as_secs(),
                })?,
            None => call.await,
        };

        outcome.map_err(|panic| ToolError::ExecutionFailed {
            tool_name: action.to_string(),
            reason: format!("tool panicked: {}", panic_message(&*panic)),
        })?
    }
}

/// The message shown to the model for a failed invocation.
fn fault_message(e: &ToolError) -> String {
    match e {
        ToolError::ExecutionFailed { reason, .. } => reason.clone(),
        other => other.to_string(),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}
