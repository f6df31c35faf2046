//! Built-in tool implementations for Remind.
//!
//! Tools give the agent the ability to act: do arithmetic and read local
//! files. Embedders register their own tools (search, code execution) next
//! to these through [`ToolRegistry::register`].

pub mod calculator;
pub mod file_read;

use remind_core::tool::ToolRegistry;
use std::path::PathBuf;

pub use calculator::CalculatorTool;
pub use file_read::FileReadTool;

/// Create a default tool registry with all built-in tools.
///
/// `file_read` is confined to `file_root`.
pub fn default_registry(file_root: impl Into<PathBuf>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(CalculatorTool));
    registry.register(Box::new(FileReadTool::within(file_root)));
    registry
}
