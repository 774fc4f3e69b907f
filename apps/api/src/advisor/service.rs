//! Advisor invocation — one request/response turn of the career advisor.
//!
//! Flow: bind session instruction → agent runtime (may call tools) →
//!       split off the answer → reconstruct the turn's step log.

use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use crate::advisor::prompts::session_context;
use crate::advisor::runtime::{AgentError, AgentRuntime};
use crate::advisor::steps::{reconstruct_steps, StepLogEntry};
use crate::advisor::tools::ToolSet;
use crate::models::message::Message;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AdvisorReply {
    pub response: String,
    pub steps: Vec<StepLogEntry>,
}

/// Holds the runtime and tool set; cheap to share across requests.
/// No conversation state is kept between calls.
pub struct AdvisorService {
    runtime: Arc<dyn AgentRuntime>,
    tools: ToolSet,
}

impl AdvisorService {
    pub fn new(runtime: Arc<dyn AgentRuntime>, tools: ToolSet) -> Self {
        Self { runtime, tools }
    }

    /// Runs one advisor turn over the caller-supplied history.
    ///
    /// The session instruction is prepended because the model cannot derive
    /// the session id from the visible conversation, and every tool call must
    /// be scoped to it.
    pub async fn invoke(
        &self,
        history: Vec<Message>,
        session_id: &str,
    ) -> Result<AdvisorReply, AgentError> {
        info!(
            "Invoking advisor for session {session_id} ({} messages, tools: {:?})",
            history.len(),
            self.tools.names()
        );

        let mut messages = Vec::with_capacity(history.len() + 1);
        messages.push(Message::system(session_context(session_id)));
        messages.extend(history);

        let trace = self.runtime.invoke(messages, &self.tools).await?;
        let (answer, earlier) = trace.split_last().ok_or(AgentError::EmptyTrace)?;

        let steps = reconstruct_steps(earlier);
        if steps.is_empty() {
            info!("Advisor answered session {session_id} without tool calls");
        } else {
            info!(
                "Advisor answered session {session_id} after {} tool step(s)",
                steps.len()
            );
        }

        Ok(AdvisorReply {
            response: answer.content.clone(),
            steps,
        })
    }
}
