//! Prompt builder — renders the per-cycle prompt text.
//!
//! The prompt is a pure function of the instructions, the tool list, the task
//! and the prior cycles. Identical inputs always produce identical text, which
//! keeps scripted replays stable.

use crate::cycle::CycleRecord;
use crate::parser::{
    ACTION_INPUT_MARKER, ACTION_MARKER, FINAL_ANSWER_MARKER, OBSERVATION_MARKER, THOUGHT_MARKER,
};
use remind_core::tool::ToolDefinition;
use std::fmt::Write;

/// Builds the prompt sent to the model each cycle.
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    instructions: String,
    tools: Vec<ToolDefinition>,
}

impl PromptBuilder {
    pub fn new(instructions: impl Into<String>, tools: Vec<ToolDefinition>) -> Self {
        Self {
            instructions: instructions.into(),
            tools,
        }
    }

    /// The base instructions, also sent as the system prompt.
    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Render the prompt for the next cycle.
    pub fn build(&self, task: &str, cycles: &[CycleRecord]) -> String {
        let mut out = String::with_capacity(self.instructions.len() + 512);

        out.push_str(self.instructions.trim_end());
        out.push_str("\n\nAvailable tools:\n");
        for tool in &self.tools {
            let _ = writeln!(out, "- {}: {}", tool.name, tool.description);
        }

        let _ = writeln!(out, "\nHuman query: {task}");
        self.write_format_rules(&mut out);

        if !cycles.is_empty() {
            out.push('\n');
            for cycle in cycles {
                let _ = writeln!(out, "{THOUGHT_MARKER} {}", cycle.thought);
                let _ = writeln!(out, "{ACTION_MARKER} {}", cycle.action);
                let _ = writeln!(out, "{ACTION_INPUT_MARKER} {}", cycle.action_input);
                let _ = writeln!(out, "{OBSERVATION_MARKER} {}", cycle.observation);
            }
        }

        out
    }

    fn write_format_rules(&self, out: &mut String) {
        let names = self
            .tools
            .iter()
            .map(|t| t.name.as_str())
            .collect::<Vec<_>>()
            .join(", ");

        out.push_str("Follow this format:\n");
        let _ = writeln!(
            out,
            "{THOUGHT_MARKER} Think about the current situation and what to do"
        );
        let _ = writeln!(
            out,
            "{ACTION_MARKER} The action to take (must be one of: {names})"
        );
        let _ = writeln!(
            out,
            "{ACTION_INPUT_MARKER} The input to the action (a string or a JSON object)"
        );
        let _ = writeln!(out, "{OBSERVATION_MARKER} The result of the action");
        out.push_str("... (this Thought/Action/Action Input/Observation cycle can repeat)\n");
        let _ = writeln!(out, "{THOUGHT_MARKER} I now know the final answer");
        let _ = writeln!(
            out,
            "{FINAL_ANSWER_MARKER} The final answer to the original question"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use remind_core::tool::ToolInput;

    fn builder() -> PromptBuilder {
        PromptBuilder::new(
            "You answer questions.",
            vec![
                ToolDefinition {
                    name: "calculator".into(),
                    description: "Evaluate arithmetic".into(),
                },
                ToolDefinition {
                    name: "file_read".into(),
                    description: "Read a file".into(),
                },
            ],
        )
    }

    fn cycle(n: u32) -> CycleRecord {
        CycleRecord {
            thought: format!("thought {n}"),
            action: "calculator".into(),
            action_input: ToolInput::Text(format!("{n}+{n}")),
            observation: format!("{}", n * 2),
        }
    }

    #[test]
    fn prompt_contains_every_section_in_order() {
        let prompt = builder().build("What is 2+2?", &[]);

        let instructions = prompt.find("You answer questions.").unwrap();
        let tools = prompt.find("Available tools:").unwrap();
        let query = prompt.find("Human query: What is 2+2?").unwrap();
        let format = prompt.find("Follow this format:").unwrap();
        assert!(instructions < tools && tools < query && query < format);

        assert!(prompt.contains("- calculator: Evaluate arithmetic\n- file_read: Read a file\n"));
        assert!(prompt.contains("(must be one of: calculator, file_read)"));
        assert!(prompt.contains("Final Answer: The final answer"));
        assert!(prompt.starts_with("You answer questions.\n\nAvailable tools:\n"));
    }

    #[test]
    fn prompt_is_deterministic() {
        let b = builder();
        let cycles = [cycle(1), cycle(2)];
        assert_eq!(b.build("task", &cycles), b.build("task", &cycles));
    }

    #[test]
    fn prior_cycles_render_chronologically() {
        let prompt = builder().build("task", &[cycle(1), cycle(2)]);
        let expected = "Thought: thought 1\nAction: calculator\nAction Input: 1+1\nObservation: 2\n\
                        Thought: thought 2\nAction: calculator\nAction Input: 2+2\nObservation: 4\n";
        assert!(prompt.ends_with(expected), "prompt was:\n{prompt}");
    }

    #[test]
    fn structured_input_renders_as_compact_json() {
        let record = CycleRecord {
            thought: String::new(),
            action: "file_read".into(),
            action_input: ToolInput::Structured(serde_json::json!({"path": "a.txt"})),
            observation: "contents".into(),
        };
        let prompt = builder().build("task", &[record]);
        assert!(prompt.contains("Action Input: {\"path\":\"a.txt\"}\n"));
    }

    #[test]
    fn no_tools_still_renders() {
        let prompt = PromptBuilder::new("Be helpful.", Vec::new()).build("hi", &[]);
        assert!(prompt.contains("Available tools:\n\nHuman query: hi"));
        assert!(prompt.contains("(must be one of: )"));
    }

    #[test]
    fn empty_history_has_no_transcript() {
        let prompt = builder().build("task", &[]);
        assert!(prompt.ends_with("Final Answer: The final answer to the original question\n"));
    }
}
