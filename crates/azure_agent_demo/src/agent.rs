//! A single-tool chat agent over [`ChatClient`].
//!
//! `run` sends the conversation once, dispatches any tool calls the model
//! requests to the local tool implementations, feeds the outputs back, and
//! returns the final assistant text.

use crate::chat::{ChatClient, ChatCompletionRequest, ChatMessage, Tool};
use crate::error::{AgentError, AgentResult};
use crate::tools;

/// Upper bound on model round trips for one `run` call.
const MAX_TOOL_ROUNDS: usize = 4;

/// A chat agent with a name, instructions, and registered tools.
pub struct ChatAgent {
    client: ChatClient,
    name: String,
    instructions: String,
    tools: Vec<Tool>,
}

impl ChatAgent {
    /// Create an agent without tools.
    pub fn new(
        client: ChatClient,
        name: impl Into<String>,
        instructions: impl Into<String>,
    ) -> Self {
        Self {
            client,
            name: name.into(),
            instructions: instructions.into(),
            tools: Vec::new(),
        }
    }

    /// Register a tool with the agent.
    pub fn with_tool(mut self, tool: Tool) -> Self {
        self.tools.push(tool);
        self
    }

    /// Run one prompt to completion, dispatching any tool calls locally.
    pub async fn run(&self, prompt: &str) -> AgentResult<String> {
        tracing::info!(agent = %self.name, "running agent");

        let mut messages = vec![
            ChatMessage::system(&self.instructions),
            ChatMessage::user(prompt),
        ];

        for _ in 0..MAX_TOOL_ROUNDS {
            let mut builder = ChatCompletionRequest::builder().messages(messages.clone());
            if !self.tools.is_empty() {
                builder = builder.tools(self.tools.clone());
            }

            let response = self.client.complete(&builder.build()).await?;
            let choice = response.choices.into_iter().next().ok_or_else(|| {
                AgentError::Api {
                    code: "empty_response".into(),
                    message: "response contained no choices".into(),
                }
            })?;
            let message = choice.message;

            let calls = match &message.tool_calls {
                Some(calls) if !calls.is_empty() => calls.clone(),
                _ => return Ok(message.content.unwrap_or_default()),
            };

            // The assistant message carrying the calls must precede the
            // tool outputs in the conversation.
            messages.push(message);
            for call in calls {
                tracing::debug!(agent = %self.name, tool = %call.function.name, "dispatching tool call");
                let output = tools::dispatch(&call.function.name, &call.function.arguments)?;
                messages.push(ChatMessage::tool(call.id, output));
            }
        }

        Err(AgentError::Api {
            code: "tool_loop".into(),
            message: format!("no final answer after {MAX_TOOL_ROUNDS} tool rounds"),
        })
    }
}
