//! Workflow state shared with the surrounding orchestration.
//!
//! An orchestrator sequencing several agent roles keeps one
//! `WorkflowState` for the whole workflow. Each agent run reads the current
//! values when it starts and writes its additions back exactly once when it
//! ends; a failed or cancelled run leaves the state untouched.

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// The longer-lived state an agent run reads from and commits to.
///
/// Missing keys deserialize as empty sequences, so a state file written by
/// an older orchestrator still loads.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkflowState {
    /// Every observation produced by any run, oldest first
    #[serde(default)]
    observations: Vec<String>,

    /// The workflow transcript
    #[serde(default)]
    messages: Vec<Message>,
}

impl WorkflowState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn observations(&self) -> &[String] {
        &self.observations
    }

    pub fn set_observations(&mut self, observations: Vec<String>) {
        self.observations = observations;
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn set_messages(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }
}
