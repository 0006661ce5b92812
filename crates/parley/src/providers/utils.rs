use anyhow::{anyhow, Result};
use regex::Regex;
use serde_json::{json, Value};
use std::collections::HashSet;

use super::base::{StopReason, Usage};
use crate::models::message::{Message, MessageContent};
use crate::models::role::Role;
use crate::models::tool::{Tool, ToolCall};

/// Convert internal Message format to Anthropic's API message specification
///
/// Empty text blocks are dropped, and so are messages left without any block, since the API
/// rejects both.
pub fn messages_to_anthropic_spec(messages: &[Message]) -> Vec<Value> {
    let mut messages_spec = Vec::new();

    for message in messages {
        let mut blocks = Vec::new();

        for content in &message.content {
            match content {
                MessageContent::Text(text) => {
                    if !text.text.is_empty() {
                        blocks.push(json!({
                            "type": "text",
                            "text": text.text,
                        }));
                    }
                }
                MessageContent::ToolRequest(request) => {
                    blocks.push(json!({
                        "type": "tool_use",
                        "id": request.id,
                        "name": request.tool_call.name,
                        "input": request.tool_call.arguments,
                    }));
                }
                MessageContent::ToolResponse(response) => {
                    blocks.push(json!({
                        "type": "tool_result",
                        "tool_use_id": response.id,
                        "content": response.output,
                    }));
                }
            }
        }

        if !blocks.is_empty() {
            messages_spec.push(json!({
                "role": message.role.as_str(),
                "content": blocks,
            }));
        }
    }

    messages_spec
}

/// Convert internal Tool format to Anthropic's API tool specification
pub fn tools_to_anthropic_spec(tools: &[Tool]) -> Result<Vec<Value>> {
    let mut tool_names = HashSet::new();
    let mut result = Vec::new();

    for tool in tools {
        if !is_valid_tool_name(&tool.name) {
            return Err(anyhow!(
                "Invalid tool name '{}', it must match [a-zA-Z0-9_-]{{1,64}}",
                tool.name
            ));
        }
        if !tool_names.insert(&tool.name) {
            return Err(anyhow!("Duplicate tool name: {}", tool.name));
        }

        result.push(json!({
            "name": tool.name,
            "description": tool.description,
            "input_schema": tool.input_schema,
        }));
    }

    Ok(result)
}

/// Convert Anthropic's API response to internal Message format and the reason it stopped
pub fn anthropic_response_to_message(response: &Value) -> Result<(Message, StopReason)> {
    let blocks = response
        .get("content")
        .and_then(Value::as_array)
        .ok_or_else(|| anyhow!("Invalid response format from Anthropic API: missing content"))?;

    let mut content = Vec::new();
    for block in blocks {
        match block.get("type").and_then(Value::as_str) {
            Some("text") => {
                let text = block.get("text").and_then(Value::as_str).unwrap_or_default();
                content.push(MessageContent::text(text));
            }
            Some("tool_use") => {
                let id = block
                    .get("id")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("tool_use block without an id"))?;
                let name = block
                    .get("name")
                    .and_then(Value::as_str)
                    .ok_or_else(|| anyhow!("tool_use block {} without a name", id))?;
                let input = block.get("input").cloned().unwrap_or_else(|| json!({}));
                content.push(MessageContent::tool_request(id, ToolCall::new(name, input)));
            }
            // thinking and other block types play no part in a turn
            _ => continue,
        }
    }

    let stop_reason = match response.get("stop_reason") {
        Some(reason) if !reason.is_null() => serde_json::from_value(reason.clone())?,
        _ => StopReason::Other,
    };

    Ok((
        Message {
            role: Role::Assistant,
            created: chrono::Utc::now().timestamp(),
            content,
        },
        stop_reason,
    ))
}

pub fn get_usage(response: &Value) -> Usage {
    let usage = response.get("usage");
    let input_tokens = usage
        .and_then(|u| u.get("input_tokens"))
        .and_then(Value::as_i64)
        .map(|v| v as i32);
    let output_tokens = usage
        .and_then(|u| u.get("output_tokens"))
        .and_then(Value::as_i64)
        .map(|v| v as i32);
    let total_tokens = match (input_tokens, output_tokens) {
        (Some(input), Some(output)) => Some(input + output),
        _ => None,
    };

    Usage::new(input_tokens, output_tokens, total_tokens)
}

fn is_valid_tool_name(name: &str) -> bool {
    let re = Regex::new(r"^[a-zA-Z0-9_-]{1,64}$").unwrap();
    re.is_match(name)
}
