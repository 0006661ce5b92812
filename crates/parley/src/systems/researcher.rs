use async_trait::async_trait;
use chrono::{DateTime, Utc};
use indoc::indoc;
use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use super::validation::parse_arguments;
use super::{System, UNKNOWN_TOOL};
use crate::agent::Agent;
use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;

pub const RESEARCHER_NAME: &str = "Researcher";

const RESEARCHER_PROMPT: &str = indoc! {"
    You are a curious researcher who loves to learn new things.
    Your role is to ask thoughtful questions and take detailed notes on what you learn.

    When you receive information:
    1. Use the take_notes tool to save important points
    2. Ask follow-up questions to deepen your understanding
    3. Be curious and engaged

    Keep your questions focused and specific. After learning something new,
    always take notes before asking the next question."};

pub const QUESTION_TEMPLATES: [&str; 4] = [
    "Can you explain more about {topic}?",
    "What are the key aspects of {topic}?",
    "How does {topic} work in practice?",
    "What are some examples of {topic}?",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Note {
    pub topic: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

/// Append-only store for the notes the Researcher takes.
///
/// Clones share the same notes. A notebook is never cleared, so notes outlive the
/// conversation that produced them for as long as any clone is alive.
#[derive(Debug, Clone, Default)]
pub struct NoteBook {
    notes: Arc<Mutex<Vec<Note>>>,
}

impl NoteBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&self, topic: impl Into<String>, content: impl Into<String>) -> Note {
        let note = Note {
            topic: topic.into(),
            content: content.into(),
            timestamp: Utc::now(),
        };
        self.lock().push(note.clone());
        note
    }

    /// Snapshot of every note taken so far, oldest first
    pub fn all(&self) -> Vec<Note> {
        self.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Note>> {
        // a push never leaves the list half-written, so a poisoned lock is still usable
        self.notes.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ResearcherTool {
    TakeNotes,
    GenerateQuestion,
}

impl ResearcherTool {
    pub fn descriptor(&self) -> Tool {
        match self {
            ResearcherTool::TakeNotes => Tool::new(
                self.as_ref(),
                "Save important information learned during the conversation",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {
                            "type": "string",
                            "description": "The topic or subject of the note"
                        },
                        "content": {
                            "type": "string",
                            "description": "The information to save"
                        }
                    },
                    "required": ["topic", "content"]
                }),
            ),
            ResearcherTool::GenerateQuestion => Tool::new(
                self.as_ref(),
                "Generate a follow-up question based on the current topic",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {
                            "type": "string",
                            "description": "The topic to ask about"
                        },
                        "previous_answer": {
                            "type": "string",
                            "description": "The previous answer received, to generate a relevant follow-up"
                        }
                    },
                    "required": ["topic"]
                }),
            ),
        }
    }
}

#[derive(Debug, Deserialize)]
struct TakeNotesInput {
    topic: String,
    content: String,
}

// previous_answer is accepted by the schema but plays no part in picking a question
#[derive(Debug, Deserialize)]
struct GenerateQuestionInput {
    topic: String,
}

/// Pick one of the question templates uniformly at random and fill in `topic`
pub fn generate_question(topic: &str) -> String {
    let template = QUESTION_TEMPLATES
        .choose(&mut rand::thread_rng())
        .unwrap_or(&QUESTION_TEMPLATES[0]);
    template.replace("{topic}", topic)
}

pub struct ResearcherSystem {
    tools: Vec<Tool>,
    notebook: NoteBook,
}

impl ResearcherSystem {
    pub fn new(notebook: NoteBook) -> Self {
        Self {
            tools: ResearcherTool::iter().map(|tool| tool.descriptor()).collect(),
            notebook,
        }
    }

    pub fn notebook(&self) -> &NoteBook {
        &self.notebook
    }

    fn descriptor(&self, tool: ResearcherTool) -> &Tool {
        &self.tools[tool as usize]
    }
}

#[async_trait]
impl System for ResearcherSystem {
    fn name(&self) -> &str {
        "researcher"
    }

    fn description(&self) -> &str {
        "Note taking and question generation for the Researcher"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<String> {
        let Ok(tool) = tool_call.name.parse::<ResearcherTool>() else {
            return Ok(UNKNOWN_TOOL.to_string());
        };
        let descriptor = self.descriptor(tool);

        match tool {
            ResearcherTool::TakeNotes => {
                let input: TakeNotesInput = parse_arguments(descriptor, tool_call.arguments)?;
                let note = self.notebook.add(input.topic, input.content);
                Ok(format!("Note saved: {} - {}", note.topic, note.content))
            }
            ResearcherTool::GenerateQuestion => {
                let input: GenerateQuestionInput =
                    parse_arguments(descriptor, tool_call.arguments)?;
                Ok(generate_question(&input.topic))
            }
        }
    }
}

/// Build the Researcher agent on top of `provider`, taking notes into `notebook`
pub fn agent(provider: Arc<dyn Provider>, model: &str, notebook: NoteBook) -> Agent {
    Agent::new(
        RESEARCHER_NAME,
        model,
        RESEARCHER_PROMPT,
        Box::new(ResearcherSystem::new(notebook)),
        provider,
    )
}
