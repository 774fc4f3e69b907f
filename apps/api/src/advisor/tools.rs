//! Tools the advisor agent may call mid-turn.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::warn;

use crate::llm_client::ToolDefinition;

/// A function the agent can invoke.
///
/// `call` returns text for the model in every case: failures are described in
/// the returned string, never raised, since the agent cannot recover from a
/// fault in the middle of a turn.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    /// JSON Schema of the arguments object.
    fn parameters(&self) -> Value;
    async fn call(&self, arguments: &Value) -> String;
}

/// The set of tools offered to the agent for a turn.
#[derive(Clone, Default)]
pub struct ToolSet {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolSet {
    pub fn new(tools: Vec<Arc<dyn Tool>>) -> Self {
        Self { tools }
    }

    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|tool| ToolDefinition {
                name: tool.name().to_string(),
                description: tool.description().to_string(),
                parameters: tool.parameters(),
            })
            .collect()
    }

    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|tool| tool.name()).collect()
    }

    /// Runs the named tool. An unknown name is reported back to the model as text.
    pub async fn dispatch(&self, name: &str, arguments: &Value) -> String {
        match self.tools.iter().find(|tool| tool.name() == name) {
            Some(tool) => tool.call(arguments).await,
            None => {
                warn!("Agent requested unknown tool '{name}'");
                format!("Error: {name} is not a valid tool")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    struct Echo;

    #[async_trait]
    impl Tool for Echo {
        fn name(&self) -> &str {
            "echo"
        }

        fn description(&self) -> &str {
            "Echoes its arguments"
        }

        fn parameters(&self) -> Value {
            json!({"type": "object"})
        }

        async fn call(&self, arguments: &Value) -> String {
            arguments.to_string()
        }
    }

    #[tokio::test]
    async fn test_dispatch_known_tool() {
        let tools = ToolSet::new(vec![Arc::new(Echo)]);
        assert_eq!(tools.dispatch("echo", &json!({"a": 1})).await, r#"{"a":1}"#);
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_text() {
        let tools = ToolSet::new(vec![Arc::new(Echo)]);
        assert_eq!(
            tools.dispatch("search_jobs", &json!({})).await,
            "Error: search_jobs is not a valid tool"
        );
    }

    #[test]
    fn test_definitions_mirror_tools() {
        let tools = ToolSet::new(vec![Arc::new(Echo)]);
        let defs = tools.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].name, "echo");
        assert_eq!(defs[0].parameters, json!({"type": "object"}));
        assert_eq!(tools.names(), vec!["echo"]);
    }
}
