//! Shared test tools for agent tests.

use async_trait::async_trait;
use remind_core::error::ToolError;
use remind_core::tool::{Tool, ToolInput};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Returns its input text unchanged and counts invocations.
pub struct EchoTool {
    name: String,
    calls: Arc<AtomicUsize>,
}

impl EchoTool {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Invocation counter that outlives registration.
    pub fn counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.calls)
    }
}

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        &self.name
    }

    fn description(&self) -> &str {
        "Echo the input back"
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Ok(input.to_string())
    }
}

/// Always fails.
pub struct FailingTool;

#[async_trait]
impl Tool for FailingTool {
    fn name(&self) -> &str {
        "failing"
    }

    fn description(&self) -> &str {
        "Always fails"
    }

    async fn execute(&self, _input: ToolInput) -> Result<String, ToolError> {
        Err(ToolError::ExecutionFailed {
            tool_name: "failing".into(),
            reason: "deliberate failure".into(),
        })
    }
}

/// Panics on every call.
pub struct PanickingTool;

#[async_trait]
impl Tool for PanickingTool {
    fn name(&self) -> &str {
        "panicking"
    }

    fn description(&self) -> &str {
        "Panics"
    }

    async fn execute(&self, _input: ToolInput) -> Result<String, ToolError> {
        panic!("kaboom");
    }
}

/// Sleeps before answering `"finally"`.
pub struct SlowTool {
    delay: Duration,
}

impl SlowTool {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }
}

#[async_trait]
impl Tool for SlowTool {
    fn name(&self) -> &str {
        "slow"
    }

    fn description(&self) -> &str {
        "Takes its time"
    }

    async fn execute(&self, _input: ToolInput) -> Result<String, ToolError> {
        tokio::time::sleep(self.delay).await;
        Ok("finally".into())
    }
}
