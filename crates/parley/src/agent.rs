use anyhow::Result;
use std::sync::Arc;
use tracing::{debug, info};

use crate::models::message::Message;
use crate::providers::base::{Provider, StopReason};
use crate::systems::System;

/// Substituted when the model's final response carries no text block
pub const NO_RESPONSE: &str = "No response";

/// Agent pairs a persona (name, model, system prompt) with the system whose tools it may use
pub struct Agent {
    name: String,
    model: String,
    system_prompt: String,
    system: Box<dyn System>,
    provider: Arc<dyn Provider>,
}

impl Agent {
    pub fn new<N, M, P>(
        name: N,
        model: M,
        system_prompt: P,
        system: Box<dyn System>,
        provider: Arc<dyn Provider>,
    ) -> Self
    where
        N: Into<String>,
        M: Into<String>,
        P: Into<String>,
    {
        Self {
            name: name.into(),
            model: model.into(),
            system_prompt: system_prompt.into(),
            system,
            provider,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    pub fn system(&self) -> &dyn System {
        self.system.as_ref()
    }

    /// Run one turn: send `text` as a user message on top of `transcript`, service tool
    /// requests until the model stops asking for them, and return the reply text.
    ///
    /// Tool requests are resolved one per response, the first one found, and strictly in
    /// sequence. On success `transcript` is replaced with every message exchanged during the
    /// turn, ending with the model's final response. On error it is left untouched.
    pub async fn reply(&self, text: &str, transcript: &mut Vec<Message>) -> Result<String> {
        let mut messages = transcript.clone();
        messages.push(Message::user().with_text(text));

        let tools = self.system.tools();
        let mut completion = self
            .provider
            .complete(&self.model, &self.system_prompt, &messages, tools)
            .await?;
        debug!(agent = %self.name, stop_reason = ?completion.stop_reason, "initial response");

        while completion.stop_reason == StopReason::ToolUse {
            let Some(request) = completion.message.first_tool_request().cloned() else {
                break;
            };

            info!(
                agent = %self.name,
                tool = %request.tool_call.name,
                input = %request.tool_call.arguments,
                "using tool"
            );
            let output = self.system.call(request.tool_call).await?;
            debug!(agent = %self.name, output = %output, "tool result");

            messages.push(completion.message);
            messages.push(Message::user().with_tool_response(request.id, output));

            completion = self
                .provider
                .complete(&self.model, &self.system_prompt, &messages, tools)
                .await?;
            debug!(agent = %self.name, stop_reason = ?completion.stop_reason, "response after tool");
        }

        debug!(agent = %self.name, usage = ?completion.usage, "turn complete");
        let reply = completion
            .message
            .first_text()
            .unwrap_or(NO_RESPONSE)
            .to_string();

        messages.push(completion.message);
        *transcript = messages;

        Ok(reply)
    }
}
