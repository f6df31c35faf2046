use remind_core::tool::ToolInput;
use serde::{Deserialize, Serialize};

/// One completed think-act-observe cycle.
///
/// Fields the model omitted are stored empty; the record is still kept so the
/// next prompt shows the model what happened.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CycleRecord {
    pub thought: String,
    pub action: String,
    pub action_input: ToolInput,
    pub observation: String,
}
