use anyhow::{anyhow, Result};
use async_trait::async_trait;
use parley::conversation::Conversation;
use parley::models::message::Message;
use parley::models::tool::Tool;
use parley::providers::base::{Completion, Provider, StopReason, Usage};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use crate::state::AppState;

/// Answers every request with the same text, or fails every request with the same message
pub struct FixedProvider {
    reply: Result<String, String>,
    calls: AtomicUsize,
}

impl FixedProvider {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Provider for FixedProvider {
    async fn complete(
        &self,
        _model: &str,
        _system: &str,
        _messages: &[Message],
        _tools: &[Tool],
    ) -> Result<Completion> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(Completion {
                message: Message::assistant().with_text(text),
                stop_reason: StopReason::EndTurn,
                usage: Usage::default(),
            }),
            Err(message) => Err(anyhow!("{}", message)),
        }
    }
}

pub fn app_with_reply(reply: Result<&str, &str>) -> (Arc<FixedProvider>, AppState) {
    let provider = Arc::new(FixedProvider {
        reply: reply.map(str::to_string).map_err(str::to_string),
        calls: AtomicUsize::new(0),
    });
    let conversation = Conversation::new(provider.clone(), "test-model");
    (provider, AppState::new(conversation))
}
