//! Step log — the user-facing account of which tools the advisor used in a turn.

use serde::{Deserialize, Serialize};

use crate::models::message::{Message, Role};

/// Tool-result content longer than this is cut down in the step log.
pub const SNIPPET_MAX_CHARS: usize = 150;
const SNIPPET_ELLIPSIS: &str = "...";
const UNKNOWN_TOOL: &str = "unknown";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StepKind {
    ToolCall,
    ToolResult,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepLogEntry {
    #[serde(rename = "type")]
    pub kind: StepKind,
    pub tool: String,
    pub message: String,
}

impl StepLogEntry {
    pub fn tool_call(tool: &str) -> Self {
        Self {
            kind: StepKind::ToolCall,
            tool: tool.to_string(),
            message: format!("Consulting {tool}..."),
        }
    }

    pub fn tool_result(tool: &str, content: &str) -> Self {
        Self {
            kind: StepKind::ToolResult,
            tool: tool.to_string(),
            message: format!("Received data:\n{}", snippet(content)),
        }
    }
}

/// Builds the step log for the current turn.
///
/// `history` is the agent trace without its final (answer) message. Only
/// messages after the most recent user message belong to this turn; a trace
/// with no user message is scanned in full.
pub fn reconstruct_steps(history: &[Message]) -> Vec<StepLogEntry> {
    let turn_start = history
        .iter()
        .rposition(|m| m.role == Role::User)
        .map_or(0, |i| i + 1);

    let mut steps = Vec::new();
    for message in &history[turn_start..] {
        match message.role {
            Role::Assistant => {
                steps.extend(
                    message
                        .tool_calls
                        .iter()
                        .map(|call| StepLogEntry::tool_call(&call.name)),
                );
            }
            Role::Tool => {
                let tool = message.tool_name.as_deref().unwrap_or(UNKNOWN_TOOL);
                steps.push(StepLogEntry::tool_result(tool, &message.content));
            }
            Role::System | Role::User => {}
        }
    }
    steps
}

/// Content up to `SNIPPET_MAX_CHARS` characters verbatim, otherwise that many
/// characters followed by an ellipsis.
fn snippet(content: &str) -> String {
    match content.char_indices().nth(SNIPPET_MAX_CHARS) {
        Some((cut, _)) => format!("{}{SNIPPET_ELLIPSIS}", &content[..cut]),
        None => content.to_string(),
    }
}
