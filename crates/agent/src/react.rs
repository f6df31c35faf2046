//! ReAct loop — Thought → Action → Observation until a final answer.
//!
//! Each cycle renders a prompt from the task and every prior cycle, asks the
//! model for the next step (stopping at `Observation:` so the model cannot
//! invent tool output), parses the reply and either finishes or dispatches a
//! tool. The run is bounded by a cycle budget.
//!
//! # States
//!
//! - **Running**: cycles continue.
//! - **Done**: the model gave a final answer.
//! - **Exhausted**: the budget ran out; a fixed fallback message is returned
//!   and the run is not complete.
//!
//! Tool faults never end a run. Transport faults and cancellation do, and
//! leave the caller's [`WorkflowState`] untouched: the observations and the
//! final message are committed once, only when the run reaches a terminal
//! state.

use crate::cycle::CycleRecord;
use crate::dispatch::Dispatcher;
use crate::parser::{OBSERVATION_MARKER, ParsedResponse, parse_response};
use crate::prompt::PromptBuilder;
use remind_config::AgentConfig;
use remind_core::error::{Error, Result};
use remind_core::message::Message;
use remind_core::provider::{GenerateRequest, Provider};
use remind_core::state::WorkflowState;
use remind_core::tool::ToolRegistry;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, trace, warn};
use uuid::Uuid;

/// Assistant message used when the budget runs out.
pub const FALLBACK_MESSAGE: &str =
    "I was unable to complete the task within the maximum number of iterations.";

pub const DEFAULT_MAX_CYCLES: usize = 10;

const DEFAULT_INSTRUCTIONS: &str = "You are a helpful assistant. Reason step by step and use \
                                    the available tools when they help answer the question.";

/// Lifecycle of a single run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Running,
    Done,
    Exhausted,
}

/// The result of a finished run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub run_id: Uuid,
    /// The user task followed by exactly one assistant message.
    pub messages: Vec<Message>,
    /// Every completed cycle, in order.
    pub cycles: Vec<CycleRecord>,
    /// True only when the model produced a final answer.
    pub is_complete: bool,
    pub status: RunStatus,
}

impl RunOutcome {
    /// The closing assistant message: the final answer or the fallback.
    pub fn answer(&self) -> &str {
        self.messages
            .last()
            .map(|m| m.content.as_str())
            .unwrap_or_default()
    }
}

/// State owned by one in-flight run.
struct RunState {
    run_id: Uuid,
    messages: Vec<Message>,
    cycles: Vec<CycleRecord>,
    observations: Vec<String>,
    status: RunStatus,
}

impl RunState {
    fn start(run_id: Uuid, task: &str, prior_observations: &[String]) -> Self {
        Self {
            run_id,
            messages: vec![Message::user(task)],
            cycles: Vec::new(),
            observations: prior_observations.to_vec(),
            status: RunStatus::Running,
        }
    }

    fn record(&mut self, cycle: CycleRecord) {
        self.observations.push(cycle.observation.clone());
        self.cycles.push(cycle);
    }

    fn finish(&mut self, answer: String) {
        self.messages.push(Message::assistant(answer));
        self.status = RunStatus::Done;
    }

    fn exhaust(&mut self) {
        self.messages.push(Message::assistant(FALLBACK_MESSAGE));
        self.status = RunStatus::Exhausted;
    }

    /// Write observations and the closing message back, then build the outcome.
    fn commit(self, state: &mut WorkflowState) -> RunOutcome {
        state.set_observations(self.observations);

        let mut messages = state.messages().to_vec();
        if let Some(last) = self.messages.last() {
            messages.push(last.clone());
        }
        state.set_messages(messages);

        RunOutcome {
            run_id: self.run_id,
            is_complete: self.status == RunStatus::Done,
            messages: self.messages,
            cycles: self.cycles,
            status: self.status,
        }
    }
}

/// A bounded reasoning-acting agent.
pub struct ReactAgent {
    /// Model transport.
    provider: Arc<dyn Provider>,
    /// Tool lookup and invocation.
    dispatcher: Dispatcher,
    /// Prompt renderer; its instructions double as the system prompt.
    prompt: PromptBuilder,
    /// Maximum cycles per run.
    max_cycles: usize,
    /// Whether a model-call timeout is recorded as a cycle instead of failing.
    recover_transport_timeouts: bool,
}

impl ReactAgent {
    /// Create a new ReAct agent over a fixed tool set.
    pub fn new(provider: Arc<dyn Provider>, tools: Arc<ToolRegistry>) -> Self {
        let prompt = PromptBuilder::new(DEFAULT_INSTRUCTIONS, tools.definitions());
        Self {
            provider,
            dispatcher: Dispatcher::new(tools),
            prompt,
            max_cycles: DEFAULT_MAX_CYCLES,
            recover_transport_timeouts: false,
        }
    }

    /// Create an agent configured from the `[agent]` config section.
    pub fn from_config(
        provider: Arc<dyn Provider>,
        tools: Arc<ToolRegistry>,
        config: &AgentConfig,
    ) -> Self {
        Self::new(provider, tools)
            .with_instructions(config.instructions.clone())
            .with_max_cycles(config.max_cycles)
            .with_tool_timeout(config.tool_timeout_secs.map(Duration::from_secs))
            .with_transport_timeout_recovery(config.recover_transport_timeouts)
    }

    /// Set the base instructions.
    pub fn with_instructions(mut self, instructions: impl Into<String>) -> Self {
        self.prompt = PromptBuilder::new(instructions, self.dispatcher.tools().definitions());
        self
    }

    /// Set the cycle budget.
    pub fn with_max_cycles(mut self, max: usize) -> Self {
        self.max_cycles = max;
        self
    }

    /// Bound each tool invocation.
    pub fn with_tool_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.dispatcher = self.dispatcher.with_timeout(timeout);
        self
    }

    /// Record model-call timeouts as error observations instead of failing.
    pub fn with_transport_timeout_recovery(mut self, enabled: bool) -> Self {
        self.recover_transport_timeouts = enabled;
        self
    }

    pub fn max_cycles(&self) -> usize {
        self.max_cycles
    }

    /// Run the loop on `task`.
    pub async fn run(&self, task: &str, state: &mut WorkflowState) -> Result<RunOutcome> {
        self.run_with_cancellation(task, state, &CancellationToken::new())
            .await
    }

    /// Run the loop on `task`, stopping at the next cycle boundary once
    /// `cancel` fires.
    ///
    /// Returns [`Error::Cancelled`] for a cancelled run and
    /// [`Error::Provider`] for a fatal transport fault. In both cases `state`
    /// is left as it was.
    pub async fn run_with_cancellation(
        &self,
        task: &str,
        state: &mut WorkflowState,
        cancel: &CancellationToken,
    ) -> Result<RunOutcome> {
        let run_id = Uuid::new_v4();
        let span = info_span!("react_run", %run_id, provider = %self.provider.name());

        async move {
            info!(max_cycles = self.max_cycles, "ReAct loop starting");
            let mut run = RunState::start(run_id, task, state.observations());

            while run.status == RunStatus::Running {
                if run.cycles.len() >= self.max_cycles {
                    warn!(max_cycles = self.max_cycles, "ReAct: cycle budget exhausted");
                    run.exhaust();
                    break;
                }
                if cancel.is_cancelled() {
                    info!(cycles = run.cycles.len(), "ReAct run cancelled");
                    return Err(Error::Cancelled);
                }

                let cycle = run.cycles.len() + 1;
                debug!(cycle, "ReAct cycle");

                let request = GenerateRequest::new(
                    self.prompt.build(task, &run.cycles),
                    self.prompt.instructions(),
                )
                .with_stop(OBSERVATION_MARKER);

                let reply = match self.provider.generate(request).await {
                    Ok(reply) => reply,
                    Err(e) if e.is_timeout() && self.recover_transport_timeouts => {
                        warn!(cycle, error = %e, "Model call timed out, continuing");
                        run.record(CycleRecord {
                            observation: format!("Error: {e}"),
                            ..CycleRecord::default()
                        });
                        continue;
                    }
                    Err(e) => {
                        warn!(cycle, error = %e, "Model call failed, aborting run");
                        return Err(e.into());
                    }
                };

                trace!(cycle, reply = %reply, "Model reply");

                match parse_response(&reply) {
                    ParsedResponse::FinalAnswer { answer, thought } => {
                        debug!(cycle, thought = thought.as_deref().unwrap_or(""), "Final answer");
                        run.finish(answer);
                    }
                    ParsedResponse::Step(step) => {
                        let action = step.action.unwrap_or_default();
                        let action_input = step.action_input.unwrap_or_default();
                        let observation = self
                            .dispatcher
                            .dispatch(&action, action_input.clone())
                            .await;
                        debug!(
                            cycle,
                            action = %action,
                            observation_len = observation.len(),
                            "Observation recorded"
                        );
                        run.record(CycleRecord {
                            thought: step.thought.unwrap_or_default(),
                            action,
                            action_input,
                            observation,
                        });
                    }
                }
            }

            info!(
                cycles = run.cycles.len(),
                status = ?run.status,
                "ReAct loop finished"
            );
            Ok(run.commit(state))
        }
        .instrument(span)
        .await
    }
}
