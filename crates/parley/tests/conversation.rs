use anyhow::Result;
use serde_json::{json, Value};
use std::sync::Arc;
use wiremock::matchers::{body_string_contains, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use parley::conversation::Conversation;
use parley::providers::anthropic::AnthropicProvider;
use parley::providers::configs::{AnthropicProviderConfig, ANTHROPIC_MODEL};
use parley::systems::expert::EXPERT_NAME;
use parley::systems::researcher::RESEARCHER_NAME;

fn text_response(text: &str) -> Value {
    json!({
        "id": "msg_text",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "text", "text": text}],
        "model": ANTHROPIC_MODEL,
        "stop_reason": "end_turn",
        "usage": {"input_tokens": 10, "output_tokens": 10}
    })
}

fn tool_use_response(id: &str, name: &str, input: Value) -> Value {
    json!({
        "id": "msg_tool",
        "type": "message",
        "role": "assistant",
        "content": [{"type": "tool_use", "id": id, "name": name, "input": input}],
        "model": ANTHROPIC_MODEL,
        "stop_reason": "tool_use",
        "usage": {"input_tokens": 10, "output_tokens": 10}
    })
}

fn conversation_for(server: &MockServer) -> Result<Conversation> {
    let mut config = AnthropicProviderConfig::new("test_api_key".to_string());
    config.host = server.uri();
    let provider = AnthropicProvider::new(config)?;
    Ok(Conversation::new(Arc::new(provider), ANTHROPIC_MODEL))
}

#[tokio::test]
async fn test_expert_answers_from_the_knowledge_base() -> Result<()> {
    let server = MockServer::start().await;

    // the follow-up request carries the knowledge base entry as a tool result
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("superposition and entanglement"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            "Quantum computers use qubits.",
        )))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(header("x-api-key", "test_api_key"))
        .and(body_string_contains("knowledgeable expert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_use_response(
            "toolu_01",
            "retrieve_knowledge",
            json!({"topic": "quantum computing"}),
        )))
        .expect(1)
        .mount(&server)
        .await;

    let conversation = conversation_for(&server)?;
    let result = conversation.run("quantum computing", 1).await?;

    assert_eq!(result.conversation.len(), 2);
    assert_eq!(result.conversation[0].agent, RESEARCHER_NAME);
    assert_eq!(
        result.conversation[0].message,
        "I'd like to learn about quantum computing. Can you teach me about it?"
    );
    assert_eq!(result.conversation[1].agent, EXPERT_NAME);
    assert_eq!(result.conversation[1].message, "Quantum computers use qubits.");
    assert!(result.notes.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_researcher_notes_survive_between_conversations() -> Result<()> {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("curious researcher"))
        .and(body_string_contains("Note saved: tides - The moon pulls the oceans"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            "Why are there two tides a day?",
        )))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("curious researcher"))
        .respond_with(ResponseTemplate::new(200).set_body_json(tool_use_response(
            "toolu_02",
            "take_notes",
            json!({"topic": "tides", "content": "The moon pulls the oceans"}),
        )))
        .with_priority(2)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .and(body_string_contains("knowledgeable expert"))
        .respond_with(ResponseTemplate::new(200).set_body_json(text_response(
            "Tides come from the moon.",
        )))
        .mount(&server)
        .await;

    let conversation = conversation_for(&server)?;

    let first = conversation.run("tides", 2).await?;
    let agents: Vec<&str> = first.conversation.iter().map(|e| e.agent.as_str()).collect();
    assert_eq!(
        agents,
        vec![RESEARCHER_NAME, EXPERT_NAME, RESEARCHER_NAME, EXPERT_NAME]
    );
    assert_eq!(first.conversation[2].message, "Why are there two tides a day?");
    assert_eq!(first.notes.len(), 1);
    assert_eq!(first.notes[0].topic, "tides");

    // a single turn never reaches the Researcher, but the earlier note is still reported
    let second = conversation.run("volcanoes", 1).await?;
    assert_eq!(second.conversation.len(), 2);
    assert_eq!(second.notes, first.notes);
    Ok(())
}

#[tokio::test]
async fn test_api_failure_fails_the_conversation() -> Result<()> {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/messages"))
        .respond_with(
            ResponseTemplate::new(401).set_body_string(r#"{"type":"error","error":{"type":"authentication_error","message":"invalid x-api-key"}}"#),
        )
        .mount(&server)
        .await;

    let conversation = conversation_for(&server)?;
    let err = conversation.run("tides", 3).await.unwrap_err();

    assert!(err.to_string().contains("401"));
    assert!(conversation.notebook().is_empty());
    Ok(())
}
