//! File read tool — return a text file's contents as the observation.

use async_trait::async_trait;
use remind_core::error::ToolError;
use remind_core::tool::{Tool, ToolInput};
use std::path::{Component, Path, PathBuf};

const DEFAULT_MAX_BYTES: usize = 64 * 1024;

pub struct FileReadTool {
    /// Directory that relative paths resolve against and reads are confined to.
    root: Option<PathBuf>,
    /// Longer files are truncated to this many bytes.
    max_bytes: usize,
}

impl FileReadTool {
    /// Create a file read tool with no path restrictions.
    pub fn new() -> Self {
        Self {
            root: None,
            max_bytes: DEFAULT_MAX_BYTES,
        }
    }

    /// Confine reads to `root`.
    pub fn within(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
            ..Self::new()
        }
    }

    pub fn with_max_bytes(mut self, max_bytes: usize) -> Self {
        self.max_bytes = max_bytes;
        self
    }

    fn resolve(&self, raw: &str) -> Result<PathBuf, ToolError> {
        let path = Path::new(raw.trim());
        let Some(root) = &self.root else {
            return Ok(path.to_path_buf());
        };

        if path.is_absolute() || path.components().any(|c| matches!(c, Component::ParentDir)) {
            return Err(ToolError::ExecutionFailed {
                tool_name: "file_read".into(),
                reason: format!("path '{raw}' escapes {}", root.display()),
            });
        }
        Ok(root.join(path))
    }
}

impl Default for FileReadTool {
    fn default() -> Self {
        Self::new()
    }
}

/// Cut `content` to at most `max` bytes on a char boundary.
fn truncate(mut content: String, max: usize) -> String {
    if content.len() <= max {
        return content;
    }
    let mut cut = max;
    while !content.is_char_boundary(cut) {
        cut -= 1;
    }
    let total = content.len();
    content.truncate(cut);
    content.push_str(&format!("\n[truncated: showing {cut} of {total} bytes]"));
    content
}

#[async_trait]
impl Tool for FileReadTool {
    fn name(&self) -> &str {
        "file_read"
    }

    fn description(&self) -> &str {
        "Read a UTF-8 text file. Input is a path relative to the working directory or {\"path\": \"...\"}."
    }

    async fn execute(&self, input: ToolInput) -> Result<String, ToolError> {
        let raw = input
            .field_or_text("path")
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| ToolError::InvalidArguments("Missing 'path' argument".into()))?;
        let path = self.resolve(raw)?;

        let content =
            tokio::fs::read_to_string(&path)
                .await
                .map_err(|e| ToolError::ExecutionFailed {
                    tool_name: "file_read".into(),
                    reason: format!("Failed to read {}: {e}", path.display()),
                })?;
        Ok(truncate(content, self.max_bytes))
    }
}
