//! # Remind Core
//!
//! Domain types, traits, and error definitions for the Remind agent.
//! This crate has **no framework dependencies**: it defines the model
//! that the provider, tool, and agent crates implement against.
//!
//! ## Design Philosophy
//!
//! The two seams of the reasoning-acting loop are traits here:
//! - [`Provider`]: the model transport (`generate(prompt, system, stop)`)
//! - [`Tool`]: a named capability the model can invoke by name
//!
//! Implementations live in their respective crates, so the loop can be
//! driven by a hosted model in production and a scripted one in tests.

pub mod error;
pub mod message;
pub mod provider;
pub mod state;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use error::{Error, ProviderError, Result, ToolError};
pub use message::{Message, Role};
pub use provider::{GenerateRequest, Provider};
pub use state::WorkflowState;
pub use tool::{Tool, ToolDefinition, ToolInput, ToolRegistry};
