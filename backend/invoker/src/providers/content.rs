//! Normalises the `content` field of a chat completion into plain text.

use serde_json::Value;

/// Coerce a response `content` value into a string.
///
/// Strings pass through, arrays of content parts are joined from their
/// `text` fields, other values are rendered as JSON. `null` yields `None`.
pub fn content_to_text(content: &Value) -> Option<String> {
    match content {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(parts) => Some(
            parts
                .iter()
                .map(|part| match part {
                    Value::String(s) => s.clone(),
                    Value::Object(map) => match map.get("text") {
                        Some(Value::String(text)) => text.clone(),
                        _ => part.to_string(),
                    },
                    other => other.to_string(),
                })
                .collect::<Vec<_>>()
                .join(""),
        ),
        other => Some(other.to_string()),
    }
}
