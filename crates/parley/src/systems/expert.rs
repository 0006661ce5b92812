use async_trait::async_trait;
use indoc::indoc;
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use strum::IntoEnumIterator;
use strum_macros::{AsRefStr, EnumIter, EnumString};

use super::validation::parse_arguments;
use super::{System, UNKNOWN_TOOL};
use crate::agent::Agent;
use crate::errors::AgentResult;
use crate::models::tool::{Tool, ToolCall};
use crate::providers::base::Provider;

pub const EXPERT_NAME: &str = "Expert";

const EXPERT_PROMPT: &str = indoc! {"
    You are a knowledgeable expert who loves to teach and share information.
    Your role is to provide clear, accurate, and helpful answers to questions.

    When answering questions:
    1. Use the retrieve_knowledge tool to get accurate information
    2. Provide context and examples when helpful
    3. Be patient and thorough in your explanations
    4. Use create_summary when information is complex

    Keep your answers informative but conversational. Make learning engaging!"};

/// Topic keyword to explanation, scanned in order. The first key that overlaps the requested
/// topic wins.
const KNOWLEDGE_BASE: &[(&str, &str)] = &[
    (
        "machine learning",
        "Machine learning is a subset of artificial intelligence that enables systems to learn and improve from experience without being explicitly programmed. It uses algorithms to identify patterns in data and make decisions with minimal human intervention.",
    ),
    (
        "neural networks",
        "Neural networks are computing systems inspired by biological neural networks. They consist of interconnected nodes (neurons) organized in layers that process information using a connectionist approach to computation.",
    ),
    (
        "api design",
        "API design is the process of creating application programming interfaces that are intuitive, efficient, and maintainable. Good API design follows principles like consistency, simplicity, and clear documentation.",
    ),
    (
        "quantum computing",
        "Quantum computing uses quantum-mechanical phenomena like superposition and entanglement to perform computations. Unlike classical computers that use bits, quantum computers use quantum bits (qubits) that can exist in multiple states simultaneously.",
    ),
];

pub const DEFAULT_EXPLANATION: &str = "This is a fascinating topic that involves understanding complex systems and their interactions. It requires careful analysis and consideration of multiple factors.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumString, AsRefStr, EnumIter)]
#[strum(serialize_all = "snake_case")]
pub enum ExpertTool {
    RetrieveKnowledge,
    CreateSummary,
}

impl ExpertTool {
    pub fn descriptor(&self) -> Tool {
        match self {
            ExpertTool::RetrieveKnowledge => Tool::new(
                self.as_ref(),
                "Retrieve detailed knowledge about a specific topic from the knowledge base",
                json!({
                    "type": "object",
                    "properties": {
                        "topic": {
                            "type": "string",
                            "description": "The topic to retrieve information about"
                        }
                    },
                    "required": ["topic"]
                }),
            ),
            ExpertTool::CreateSummary => Tool::new(
                self.as_ref(),
                "Create a concise summary of complex information",
                json!({
                    "type": "object",
                    "properties": {
                        "content": {
                            "type": "string",
                            "description": "The content to summarize"
                        },
                        "length": {
                            "type": "string",
                            "enum": ["brief", "moderate", "detailed"],
                            "description": "How detailed the summary should be"
                        }
                    },
                    "required": ["content"]
                }),
            ),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SummaryLength {
    Brief,
    #[default]
    Moderate,
    Detailed,
}

#[derive(Debug, Deserialize)]
struct RetrieveKnowledgeInput {
    topic: String,
}

#[derive(Debug, Deserialize)]
struct CreateSummaryInput {
    content: String,
    #[serde(default)]
    length: SummaryLength,
}

/// Look up the explanation for `topic`, matching case-insensitively in either direction.
pub fn retrieve_knowledge(topic: &str) -> &'static str {
    let topic = topic.to_lowercase();
    KNOWLEDGE_BASE
        .iter()
        .find(|(key, _)| topic.contains(*key) || key.contains(topic.as_str()))
        .map(|(_, explanation)| *explanation)
        .unwrap_or(DEFAULT_EXPLANATION)
}

/// Shorten `content` by sentence, where sentences are whatever lies between `.` delimiters.
pub fn create_summary(content: &str, length: SummaryLength) -> String {
    match length {
        SummaryLength::Brief => {
            let first = content.split('.').next().unwrap_or(content);
            format!("{}.", first)
        }
        SummaryLength::Detailed => content.to_string(),
        SummaryLength::Moderate => {
            let sentences: Vec<&str> = content.split('.').collect();
            let keep = sentences.len().div_ceil(2);
            format!("{}.", sentences[..keep].join("."))
        }
    }
}

pub struct ExpertSystem {
    tools: Vec<Tool>,
}

impl Default for ExpertSystem {
    fn default() -> Self {
        Self::new()
    }
}

impl ExpertSystem {
    pub fn new() -> Self {
        Self {
            tools: ExpertTool::iter().map(|tool| tool.descriptor()).collect(),
        }
    }

    fn descriptor(&self, tool: ExpertTool) -> &Tool {
        // tools is built from ExpertTool::iter, so every variant sits at its own index
        &self.tools[tool as usize]
    }
}

#[async_trait]
impl System for ExpertSystem {
    fn name(&self) -> &str {
        "expert"
    }

    fn description(&self) -> &str {
        "Knowledge lookup and summarization for the Expert"
    }

    fn tools(&self) -> &[Tool] {
        &self.tools
    }

    async fn call(&self, tool_call: ToolCall) -> AgentResult<String> {
        let Ok(tool) = tool_call.name.parse::<ExpertTool>() else {
            return Ok(UNKNOWN_TOOL.to_string());
        };
        let descriptor = self.descriptor(tool);

        match tool {
            ExpertTool::RetrieveKnowledge => {
                let input: RetrieveKnowledgeInput =
                    parse_arguments(descriptor, tool_call.arguments)?;
                Ok(retrieve_knowledge(&input.topic).to_string())
            }
            ExpertTool::CreateSummary => {
                let input: CreateSummaryInput = parse_arguments(descriptor, tool_call.arguments)?;
                Ok(create_summary(&input.content, input.length))
            }
        }
    }
}

/// Build the Expert agent on top of `provider`
pub fn agent(provider: Arc<dyn Provider>, model: &str) -> Agent {
    Agent::new(
        EXPERT_NAME,
        model,
        EXPERT_PROMPT,
        Box::new(ExpertSystem::new()),
        provider,
    )
}
