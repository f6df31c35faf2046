//! Response parser — recovers structured fields from free-text model output.
//!
//! The model is asked to answer in a labeled-line grammar:
//!
//! ```text
//! Thought: ...
//! Action: <tool name>
//! Action Input: <text or JSON>
//! ```
//!
//! or, when done:
//!
//! ```text
//! Thought: ...
//! Final Answer: ...
//! ```
//!
//! Models drift from the grammar, so parsing is best-effort and never fails.
//! The text is tokenized on the field markers in a single pass, then fields
//! are assigned from the marker positions:
//!
//! - A `Final Answer:` marker wins outright. Everything after it is the
//!   answer; the thought is the text between the last `Thought:` before it
//!   and the answer marker. No action is reported even if one is present.
//! - Otherwise `Thought:` is kept only when the first `Action:` follows the
//!   first `Thought:`, and `Action:` only when the first `Action Input:`
//!   follows it. The action input runs from the first `Action Input:` to the
//!   next `Observation:` (or the end of the text).
//! - An action input that looks like a JSON object or array is decoded;
//!   anything else, including malformed JSON, stays text.

use remind_core::tool::ToolInput;

pub const THOUGHT_MARKER: &str = "Thought:";
pub const ACTION_MARKER: &str = "Action:";
pub const ACTION_INPUT_MARKER: &str = "Action Input:";
pub const OBSERVATION_MARKER: &str = "Observation:";
pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";

/// What the model asked for this cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedResponse {
    /// The model is done.
    FinalAnswer {
        answer: String,
        thought: Option<String>,
    },

    /// The model wants to act. Any field may be missing.
    Step(ParsedStep),
}

impl ParsedResponse {
    /// The final answer, if the model produced one.
    pub fn final_answer(&self) -> Option<&str> {
        match self {
            ParsedResponse::FinalAnswer { answer, .. } => Some(answer),
            ParsedResponse::Step(_) => None,
        }
    }
}

/// The fields of a non-terminal reply.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedStep {
    pub thought: Option<String>,
    pub action: Option<String>,
    pub action_input: Option<ToolInput>,
}

impl ParsedStep {
    /// True when no field was recovered.
    pub fn is_empty(&self) -> bool {
        self.thought.is_none() && self.action.is_none() && self.action_input.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Marker {
    Thought,
    Action,
    ActionInput,
    Observation,
    FinalAnswer,
}

impl Marker {
    /// Match order matters: `Action Input:` must be tried before `Action:`.
    const MATCH_ORDER: [Marker; 5] = [
        Marker::ActionInput,
        Marker::Action,
        Marker::Thought,
        Marker::Observation,
        Marker::FinalAnswer,
    ];

    fn text(self) -> &'static str {
        match self {
            Marker::Thought => THOUGHT_MARKER,
            Marker::Action => ACTION_MARKER,
            Marker::ActionInput => ACTION_INPUT_MARKER,
            Marker::Observation => OBSERVATION_MARKER,
            Marker::FinalAnswer => FINAL_ANSWER_MARKER,
        }
    }
}

/// One marker occurrence: `text[start..end]` is the marker itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    marker: Marker,
    start: usize,
    end: usize,
}

/// Find every marker occurrence, left to right, in one pass.
///
/// Markers are ASCII, so every match position is a char boundary.
fn tokenize(text: &str) -> Vec<Span> {
    let bytes = text.as_bytes();
    let mut spans = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let hit = Marker::MATCH_ORDER
            .into_iter()
            .find(|m| bytes[pos..].starts_with(m.text().as_bytes()));
        match hit {
            Some(marker) => {
                let end = pos + marker.text().len();
                spans.push(Span {
                    marker,
                    start: pos,
                    end,
                });
                pos = end;
            }
            None => pos += 1,
        }
    }

    spans
}

/// Marker positions relevant to field assignment.
///
/// Built by folding over the spans in order; each field is set at most once,
/// except the thought preceding a final answer which tracks the latest one.
#[derive(Debug, Default)]
struct MarkerTable {
    first_thought: Option<Span>,
    first_action: Option<Span>,
    first_action_input: Option<Span>,
    observation_after_input: Option<Span>,
    first_final_answer: Option<Span>,
    thought_before_final: Option<Span>,
}

impl MarkerTable {
    fn build(spans: &[Span]) -> Self {
        let mut table = Self::default();
        for &span in spans {
            match span.marker {
                Marker::Thought => {
                    table.first_thought.get_or_insert(span);
                    if table.first_final_answer.is_none() {
                        table.thought_before_final = Some(span);
                    }
                }
                Marker::Action => {
                    table.first_action.get_or_insert(span);
                }
                Marker::ActionInput => {
                    table.first_action_input.get_or_insert(span);
                }
                Marker::Observation => {
                    if table.first_action_input.is_some() {
                        table.observation_after_input.get_or_insert(span);
                    }
                }
                Marker::FinalAnswer => {
                    table.first_final_answer.get_or_insert(span);
                }
            }
        }
        table
    }
}

/// Text strictly between two spans, trimmed, if `next` follows `open`.
fn between(text: &str, open: Option<Span>, next: Option<Span>) -> Option<String> {
    match (open, next) {
        (Some(open), Some(next)) if next.start > open.start => {
            Some(text[open.end..next.start].trim().to_string())
        }
        _ => None,
    }
}

/// Parse raw model output. Never fails; unrecognized text yields an empty step.
pub fn parse_response(text: &str) -> ParsedResponse {
    let table = MarkerTable::build(&tokenize(text));

    if let Some(final_answer) = table.first_final_answer {
        return ParsedResponse::FinalAnswer {
            answer: text[final_answer.end..].trim().to_string(),
            thought: between(text, table.thought_before_final, Some(final_answer)),
        };
    }

    let thought = between(text, table.first_thought, table.first_action);
    let action = between(text, table.first_action, table.first_action_input);
    let action_input = table.first_action_input.map(|input| {
        let stop = table
            .observation_after_input
            .map_or(text.len(), |obs| obs.start);
        decode_action_input(&text[input.end..stop])
    });

    ParsedResponse::Step(ParsedStep {
        thought,
        action,
        action_input,
    })
}

/// Trim, strip one pair of surrounding double quotes, and decode JSON
/// objects/arrays when they are well-formed.
pub fn decode_action_input(raw: &str) -> ToolInput {
    let trimmed = raw.trim();
    let unquoted = trimmed
        .strip_prefix('"')
        .and_then(|s| s.strip_suffix('"'))
        .unwrap_or(trimmed);

    let looks_structured = (unquoted.starts_with('{') && unquoted.ends_with('}'))
        || (unquoted.starts_with('[') && unquoted.ends_with(']'));
    if looks_structured {
        if let Ok(value) = serde_json::from_str::<serde_json::Value>(unquoted) {
            return ToolInput::Structured(value);
        }
    }

    ToolInput::Text(unquoted.to_string())
}
