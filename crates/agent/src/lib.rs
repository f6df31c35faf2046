//! The reasoning-acting loop: the heart of Remind.
//!
//! The agent follows a **Thought → Action → Observation** cycle:
//!
//! 1. **Build** a prompt from the task and every prior cycle
//! 2. **Ask** the model for the next step, stopping at `Observation:`
//! 3. **Parse** the labeled-line reply
//! 4. **If final answer**: stop and return it
//! 5. **Otherwise**: dispatch the named tool and record its output as the
//!    observation, then loop back to step 1
//!
//! The loop ends on a final answer or when the cycle budget is spent.

pub mod cycle;
pub mod dispatch;
pub mod parser;
pub mod prompt;
pub mod react;

#[cfg(test)]
mod test_helpers;

pub use cycle::CycleRecord;
pub use dispatch::Dispatcher;
pub use parser::{ParsedResponse, ParsedStep, decode_action_input, parse_response};
pub use prompt::PromptBuilder;
pub use react::{DEFAULT_MAX_CYCLES, FALLBACK_MESSAGE, ReactAgent, RunOutcome, RunStatus};
