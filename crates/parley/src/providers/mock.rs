use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::sync::Arc;
use std::sync::Mutex;

use crate::models::message::Message;
use crate::models::tool::Tool;
use crate::providers::base::{Completion, Provider, StopReason, Usage};

/// What the mock saw on one call
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub model: String,
    pub system: String,
    pub messages: Vec<Message>,
    pub tool_names: Vec<String>,
}

/// A mock provider that returns pre-configured responses for testing
pub struct MockProvider {
    responses: Arc<Mutex<Vec<Result<Completion>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockProvider {
    /// Create a new mock provider with a sequence of responses
    pub fn new(responses: Vec<Result<Completion>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            requests: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// A terminal text response
    pub fn text(text: &str) -> Result<Completion> {
        Ok(Completion {
            message: Message::assistant().with_text(text),
            stop_reason: StopReason::EndTurn,
            usage: Usage::default(),
        })
    }

    /// A response asking for one or more tools, in the order given
    pub fn tool_use(message: Message) -> Result<Completion> {
        Ok(Completion {
            message,
            stop_reason: StopReason::ToolUse,
            usage: Usage::default(),
        })
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Provider for MockProvider {
    async fn complete(
        &self,
        model: &str,
        system: &str,
        messages: &[Message],
        tools: &[Tool],
    ) -> Result<Completion> {
        self.requests.lock().unwrap().push(RecordedRequest {
            model: model.to_string(),
            system: system.to_string(),
            messages: messages.to_vec(),
            tool_names: tools.iter().map(|t| t.name.clone()).collect(),
        });

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Err(anyhow!("MockProvider ran out of responses"))
        } else {
            responses.remove(0)
        }
    }
}
