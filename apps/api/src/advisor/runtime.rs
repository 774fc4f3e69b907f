//! Agent runtime — runs a conversation against the model until it answers,
//! executing whatever tools it calls along the way.

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, info};

use crate::advisor::tools::ToolSet;
use crate::llm_client::{LlmClient, LlmError};
use crate::models::message::Message;

/// Upper bound on model calls within one turn.
const DEFAULT_MAX_MODEL_CALLS: usize = 8;

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("LLM call failed: {0}")]
    Llm(#[from] LlmError),

    #[error("Agent made {0} model calls without producing an answer")]
    IterationLimit(usize),

    #[error("Agent returned an empty message trace")]
    EmptyTrace,
}

/// Given a message history and the tools on offer, produces the updated
/// history: the input messages followed by every assistant and tool message
/// generated during the turn. The last message is the answer.
#[async_trait]
pub trait AgentRuntime: Send + Sync {
    async fn invoke(
        &self,
        messages: Vec<Message>,
        tools: &ToolSet,
    ) -> Result<Vec<Message>, AgentError>;
}

/// Production runtime: a tool-calling loop over the chat-completions API.
///
/// The agent's own system prompt is sent with every model call but is not part
/// of the returned trace.
pub struct ToolCallingAgent {
    llm: LlmClient,
    system_prompt: String,
    max_model_calls: usize,
}

impl ToolCallingAgent {
    pub fn new(llm: LlmClient, system_prompt: impl Into<String>) -> Self {
        Self {
            llm,
            system_prompt: system_prompt.into(),
            max_model_calls: DEFAULT_MAX_MODEL_CALLS,
        }
    }

    pub fn with_max_model_calls(mut self, max_model_calls: usize) -> Self {
        self.max_model_calls = max_model_calls;
        self
    }
}

#[async_trait]
impl AgentRuntime for ToolCallingAgent {
    async fn invoke(
        &self,
        messages: Vec<Message>,
        tools: &ToolSet,
    ) -> Result<Vec<Message>, AgentError> {
        let definitions = tools.definitions();
        let mut prompt = Vec::with_capacity(messages.len() + 1);
        prompt.push(Message::system(self.system_prompt.as_str()));
        prompt.extend(messages);

        for call_index in 0..self.max_model_calls {
            let reply = self.llm.chat(&prompt, &definitions).await?;
            let tool_calls = reply.tool_calls.clone();
            prompt.push(reply);

            if tool_calls.is_empty() {
                debug!("Agent answered after {} model call(s)", call_index + 1);
                // Drop the agent's own system prompt from the trace.
                prompt.remove(0);
                return Ok(prompt);
            }

            for call in tool_calls {
                info!("Agent calling tool '{}' ({})", call.name, call.id);
                let output = tools.dispatch(&call.name, &call.arguments).await;
                prompt.push(Message::tool_result(call.name, call.id, output));
            }
        }

        Err(AgentError::IterationLimit(self.max_model_calls))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use serde_json::{json, Value};
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    use crate::advisor::tools::Tool;
    use crate::models::message::Role;

    struct FakeCvTool;

    #[async_trait]
    impl Tool for FakeCvTool {
        fn name(&self) -> &str {
            "review_user_cv"
        }

        fn description(&self) -> &str {
            "Fetches the CV"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn call(&self, arguments: &Value) -> String {
            format!("CV for {}", arguments["session_id"].as_str().unwrap_or("?"))
        }
    }

    fn tool_call_reply() -> ResponseTemplate {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{"message": {
                "role": "assistant",
                "content": null,
                "tool_calls": [{
                    "id": "call_1",
                    "type": "function",
                    "function": {"name": "review_user_cv", "arguments": "{\"session_id\":\"s-1\"}"}
                }]
            }}]
        }))
    }

    fn agent(server: &MockServer) -> ToolCallingAgent {
        let llm = LlmClient::new("sk-test".to_string(), server.uri()).unwrap();
        ToolCallingAgent::new(llm, "You are a helpful Career Advisor.")
    }

    #[tokio::test]
    async fn test_runs_tool_then_answers() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_reply())
            .up_to_n_times(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{"message": {"role": "assistant", "content": "Here's your summary"}}]
            })))
            .mount(&server)
            .await;

        let tools = ToolSet::new(vec![Arc::new(FakeCvTool)]);
        let trace = agent(&server)
            .invoke(
                vec![Message::system("SYSTEM CONTEXT"), Message::user("hi")],
                &tools,
            )
            .await
            .unwrap();

        let roles: Vec<Role> = trace.iter().map(|m| m.role).collect();
        assert_eq!(
            roles,
            vec![
                Role::System,
                Role::User,
                Role::Assistant,
                Role::Tool,
                Role::Assistant
            ]
        );
        assert_eq!(trace[0].content, "SYSTEM CONTEXT");
        assert_eq!(trace[3].content, "CV for s-1");
        assert_eq!(trace[3].tool_name.as_deref(), Some("review_user_cv"));
        assert_eq!(trace[4].content, "Here's your summary");

        // The second model call sees the tool result and the agent prompt.
        let requests = server.received_requests().await.unwrap();
        assert_eq!(requests.len(), 2);
        let second: Value = serde_json::from_slice(&requests[1].body).unwrap();
        let sent = second["messages"].as_array().unwrap();
        assert_eq!(sent[0]["content"], "You are a helpful Career Advisor.");
        assert_eq!(sent[4]["role"], "tool");
        assert_eq!(sent[4]["tool_call_id"], "call_1");
    }

    #[tokio::test]
    async fn test_stops_at_model_call_limit() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .respond_with(tool_call_reply())
            .mount(&server)
            .await;

        let tools = ToolSet::new(vec![Arc::new(FakeCvTool)]);
        let err = agent(&server)
            .with_max_model_calls(2)
            .invoke(vec![Message::user("hi")], &tools)
            .await
            .unwrap_err();
        assert!(matches!(err, AgentError::IterationLimit(2)));
    }
}
