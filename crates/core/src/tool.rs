//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what give the agent the ability to act: evaluate arithmetic,
//! read files, search, run code. The model names a tool in its `Action:`
//! line and the agent looks it up here by exact name.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ToolError;

/// The input handed to a tool.
///
/// Models write action inputs as free text; when the text looks like a JSON
/// object or array and decodes cleanly, it arrives here as `Structured`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ToolInput {
    /// Raw text, quotes already stripped
    Text(String),

    /// A decoded JSON object or array
    Structured(serde_json::Value),
}

impl ToolInput {
    /// The raw text, if this is a text input.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            ToolInput::Text(s) => Some(s),
            ToolInput::Structured(_) => None,
        }
    }

    /// Look up a string field, falling back to the text itself.
    ///
    /// Lets a tool accept either `2 + 2` or `{"expression": "2 + 2"}`.
    pub fn field_or_text(&self, key: &str) -> Option<&str> {
        match self {
            ToolInput::Text(s) => Some(s),
            ToolInput::Structured(v) => v.get(key).and_then(|f| f.as_str()),
        }
    }
}

impl Default for ToolInput {
    fn default() -> Self {
        ToolInput::Text(String::new())
    }
}

impl From<&str> for ToolInput {
    fn from(s: &str) -> Self {
        ToolInput::Text(s.to_string())
    }
}

impl From<String> for ToolInput {
    fn from(s: String) -> Self {
        ToolInput::Text(s)
    }
}

impl From<serde_json::Value> for ToolInput {
    fn from(v: serde_json::Value) -> Self {
        ToolInput::Structured(v)
    }
}

/// Text as-is; structured values as compact JSON.
impl fmt::Display for ToolInput {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ToolInput::Text(s) => f.write_str(s),
            ToolInput::Structured(v) => write!(f, "{v}"),
        }
    }
}

/// Name and description of a tool, as shown to the model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolDefinition {
    /// The tool name
    pub name: String,

    /// Description of what the tool does
    pub description: String,
}

/// The core Tool trait.
///
/// Each tool (calculator, file_read, ...) implements this trait and is
/// registered in a [`ToolRegistry`]. A tool that keeps mutable state
/// between calls must not be shared between concurrent runs.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "calculator").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the model).
    fn description(&self) -> &str;

    /// Execute the tool, producing the observation text.
    async fn execute(&self, input: ToolInput) -> std::result::Result<String, ToolError>;

    /// Convert this tool into a ToolDefinition for the prompt.
    fn to_definition(&self) -> ToolDefinition {
        ToolDefinition {
            name: self.name().to_string(),
            description: self.description().to_string(),
        }
    }
}

/// A registry of available tools, keyed by name.
///
/// Registration order is preserved so prompts and error listings are
/// deterministic. Build it once, then share it behind an `Arc`.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Replaces any existing tool with the same name,
    /// keeping its original position.
    pub fn register(&mut self, tool: Box<dyn Tool>) {
        let name = tool.name().to_string();
        let tool: Arc<dyn Tool> = Arc::from(tool);
        match self.index.get(&name) {
            Some(&pos) => self.tools[pos] = tool,
            None => {
                self.index.insert(name, self.tools.len());
                self.tools.push(tool);
            }
        }
    }

    /// Get a tool by exact name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.index.get(name).map(|&pos| Arc::clone(&self.tools[pos]))
    }

    /// All tool definitions, in registration order.
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools.iter().map(|t| t.to_definition()).collect()
    }

    /// All registered tool names, in registration order.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Execute a tool by name.
    pub async fn execute(
        &self,
        name: &str,
        input: ToolInput,
    ) -> std::result::Result<String, ToolError> {
        let tool = self.get(name).ok_or_else(|| ToolError::NotFound {
            name: name.to_string(),
            available: self.names().into_iter().map(String::from).collect(),
        })?;
        tool.execute(input).await
    }
}
