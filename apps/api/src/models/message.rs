use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Author of a message in an advisor conversation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    #[serde(alias = "human")]
    User,
    #[serde(alias = "ai")]
    Assistant,
    Tool,
}

/// A tool invocation declared by an assistant message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub arguments: Value,
}

/// One entry of a conversation trace. Order within a trace is the timeline.
///
/// Incoming request messages only carry `role` and `content`; any other
/// fields the client sends along (cached step logs, for instance) are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tool_calls: Vec<ToolCall>,
    /// Set on tool-result messages: the tool that produced the content.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_name: Option<String>,
    /// Set on tool-result messages: the call this result answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl Message {
    fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            tool_calls: Vec::new(),
            tool_name: None,
            tool_call_id: None,
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }

    pub fn assistant_with_tool_calls(content: impl Into<String>, tool_calls: Vec<ToolCall>) -> Self {
        Self {
            tool_calls,
            ..Self::new(Role::Assistant, content)
        }
    }

    pub fn tool_result(
        tool_name: impl Into<String>,
        tool_call_id: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            tool_name: Some(tool_name.into()),
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(Role::Tool, content)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_incoming_message_ignores_extra_fields() {
        let json = serde_json::json!({
            "role": "assistant",
            "content": "Hello!",
            "steps": [{"type": "tool_call", "tool": "review_user_cv", "message": "..."}]
        });
        let message: Message = serde_json::from_value(json).unwrap();
        assert_eq!(message, Message::assistant("Hello!"));
    }

    #[test]
    fn test_role_aliases() {
        let human: Message =
            serde_json::from_value(serde_json::json!({"role": "human", "content": "hi"})).unwrap();
        let ai: Message =
            serde_json::from_value(serde_json::json!({"role": "ai", "content": "yo"})).unwrap();
        assert_eq!(human.role, Role::User);
        assert_eq!(ai.role, Role::Assistant);
    }

    #[test]
    fn test_unknown_role_rejected() {
        let result: Result<Message, _> =
            serde_json::from_value(serde_json::json!({"role": "narrator", "content": "x"}));
        assert!(result.is_err());
    }

    #[test]
    fn test_tool_result_sets_origin() {
        let message = Message::tool_result("review_user_cv", "call_1", "CV data");
        assert_eq!(message.role, Role::Tool);
        assert_eq!(message.tool_name.as_deref(), Some("review_user_cv"));
        assert_eq!(message.tool_call_id.as_deref(), Some("call_1"));
    }
}
