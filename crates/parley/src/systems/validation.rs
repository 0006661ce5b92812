//! Check tool call arguments against the tool's declared input schema before any handler runs.
//!
//! Only the parts of JSON Schema our tools use are enforced: an object at the top level,
//! required fields, primitive property types and `enum` membership.

use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::errors::{AgentError, AgentResult};
use crate::models::tool::Tool;

/// Validate `arguments` against `tool.input_schema`, reporting the first violation.
pub fn validate_arguments(tool: &Tool, arguments: &Value) -> AgentResult<()> {
    let schema = &tool.input_schema;
    let invalid = |reason: String| AgentError::invalid_parameters(&tool.name, reason);

    if schema.get("type").and_then(Value::as_str) == Some("object") && !arguments.is_object() {
        return Err(invalid(format!(
            "expected object arguments, got {}",
            json_type_name(arguments)
        )));
    }

    let Some(fields) = arguments.as_object() else {
        return Ok(());
    };

    if let Some(required) = schema.get("required").and_then(Value::as_array) {
        for name in required.iter().filter_map(Value::as_str) {
            if !fields.contains_key(name) {
                return Err(invalid(format!("missing required field '{}'", name)));
            }
        }
    }

    let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
        return Ok(());
    };

    for (key, value) in fields {
        let Some(property) = properties.get(key) else {
            continue;
        };

        if let Some(expected) = property.get("type").and_then(Value::as_str) {
            if !value_matches_type(value, expected) {
                return Err(invalid(format!(
                    "field '{}' expected type '{}', got {}",
                    key,
                    expected,
                    json_type_name(value)
                )));
            }
        }

        if let Some(allowed) = property.get("enum").and_then(Value::as_array) {
            if !allowed.contains(value) {
                return Err(invalid(format!(
                    "field '{}' must be one of {}, got {}",
                    key,
                    Value::Array(allowed.clone()),
                    value
                )));
            }
        }
    }

    Ok(())
}

/// Validate `arguments` and then deserialize them into the handler's typed input.
pub fn parse_arguments<T: DeserializeOwned>(tool: &Tool, arguments: Value) -> AgentResult<T> {
    validate_arguments(tool, &arguments)?;
    serde_json::from_value(arguments)
        .map_err(|e| AgentError::invalid_parameters(&tool.name, e.to_string()))
}

fn value_matches_type(value: &Value, expected: &str) -> bool {
    match expected {
        "string" => value.is_string(),
        "number" => value.is_number(),
        "integer" => value.is_i64() || value.is_u64(),
        "boolean" => value.is_boolean(),
        "object" => value.is_object(),
        "array" => value.is_array(),
        "null" => value.is_null(),
        _ => true,
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
