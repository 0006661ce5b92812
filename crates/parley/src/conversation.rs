use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::info;

use crate::agent::Agent;
use crate::errors::AgentError;
use crate::models::message::Message;
use crate::prompt_template::load_prompt;
use crate::providers::base::Provider;
use crate::systems::researcher::{Note, NoteBook};
use crate::systems::{expert, researcher};

pub const DEFAULT_TURNS: usize = 3;

const OPENING_TEMPLATE: &str = "I'd like to learn about {{ topic }}. Can you teach me about it?";
const FOLLOW_UP_TEMPLATE: &str = "The expert said: \"{{ reply }}\". What should I ask next?";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationEntry {
    pub agent: String,
    pub message: String,
}

impl ConversationEntry {
    fn new<A: Into<String>, M: Into<String>>(agent: A, message: M) -> Self {
        Self {
            agent: agent.into(),
            message: message.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationResult {
    pub conversation: Vec<ConversationEntry>,
    pub notes: Vec<Note>,
}

/// Drives a fixed number of exchanges between the Expert and the Researcher.
///
/// Every call to [`Conversation::run`] starts from an empty transcript of its own, so runs
/// never see each other's messages. The notebook is shared by every run.
pub struct Conversation {
    expert: Agent,
    researcher: Agent,
    notebook: NoteBook,
}

impl Conversation {
    /// Build both agents on `provider` with a fresh notebook
    pub fn new(provider: Arc<dyn Provider>, model: &str) -> Self {
        let notebook = NoteBook::new();
        Self {
            expert: expert::agent(provider.clone(), model),
            researcher: researcher::agent(provider, model, notebook.clone()),
            notebook,
        }
    }

    pub fn notebook(&self) -> &NoteBook {
        &self.notebook
    }

    /// Run a conversation about `topic` for `turns` Expert replies.
    ///
    /// The Researcher opens, the Expert answers, and the Researcher follows up after every
    /// answer except the last. With zero turns only the opening is recorded.
    pub async fn run(&self, topic: &str, turns: usize) -> Result<ConversationResult> {
        info!(topic, turns, "starting conversation");

        let mut transcript: Vec<Message> = Vec::new();
        let mut conversation = Vec::new();

        let mut current = render(OPENING_TEMPLATE, "topic", topic)?;
        conversation.push(ConversationEntry::new(self.researcher.name(), &current));

        for turn in 0..turns {
            info!(turn = turn + 1, "{} -> {}: {}", self.researcher.name(), self.expert.name(), current);
            let expert_reply = self.expert.reply(&current, &mut transcript).await?;
            info!(turn = turn + 1, "{}: {}", self.expert.name(), expert_reply);
            conversation.push(ConversationEntry::new(self.expert.name(), &expert_reply));

            if turn + 1 < turns {
                let prompt = render(FOLLOW_UP_TEMPLATE, "reply", &expert_reply)?;
                let follow_up = self.researcher.reply(&prompt, &mut transcript).await?;
                info!(turn = turn + 1, "{}: {}", self.researcher.name(), follow_up);
                conversation.push(ConversationEntry::new(self.researcher.name(), &follow_up));
                current = follow_up;
            }
        }

        let notes = self.notebook.all();
        info!(notes = notes.len(), entries = conversation.len(), "conversation finished");

        Ok(ConversationResult {
            conversation,
            notes,
        })
    }
}

fn render(template: &str, key: &str, value: &str) -> Result<String, AgentError> {
    let context = HashMap::from([(key, value)]);
    load_prompt(template, &context).map_err(|e| AgentError::Internal(e.to_string()))
}
