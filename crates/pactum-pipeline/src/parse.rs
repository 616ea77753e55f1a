//! Interpreting a provider's raw answer.
//!
//! Models are asked for bare JSON but frequently wrap it in a Markdown code
//! fence. Parsing tries the text as-is first and only then strips the fence.

use serde_json::{Map, Value};

use crate::error::PipelineError;

/// Parse extraction text as JSON, falling back to the fence-stripped text.
pub fn parse_extraction(text: &str) -> Result<Value, PipelineError> {
    match serde_json::from_str(text) {
        Ok(value) => Ok(value),
        Err(_) => serde_json::from_str(strip_code_fence(text)).map_err(PipelineError::Parse),
    }
}

/// Remove a leading ```` ```json ```` (or bare ```` ``` ````) marker, a trailing
/// ```` ``` ```` marker, and surrounding whitespace.
pub fn strip_code_fence(text: &str) -> &str {
    let mut s = text.trim();
    if let Some(rest) = s.strip_prefix("```") {
        s = match rest.get(..4) {
            Some(tag) if tag.eq_ignore_ascii_case("json") => &rest[4..],
            _ => rest,
        };
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

/// The extracted payload: the nested `extractedData` member when the answer
/// has one, otherwise the whole answer.
pub fn payload(parsed: &Value) -> Value {
    match parsed.get("extractedData") {
        Some(inner) if !inner.is_null() => inner.clone(),
        _ => parsed.clone(),
    }
}

/// Whether the answer uses the `{extractedData, confidence, notes}` envelope.
pub fn is_enveloped(parsed: &Value) -> bool {
    parsed
        .get("extractedData")
        .is_some_and(|inner| !inner.is_null())
}

/// The envelope's `confidence` object, if any.
pub fn envelope_confidence(parsed: &Value) -> Map<String, Value> {
    if !is_enveloped(parsed) {
        return Map::new();
    }
    match parsed.get("confidence") {
        Some(Value::Object(map)) => map.clone(),
        _ => Map::new(),
    }
}

/// The envelope's `notes`, accepting either a list or a single string.
pub fn envelope_notes(parsed: &Value) -> Vec<String> {
    if !is_enveloped(parsed) {
        return Vec::new();
    }
    match parsed.get("notes") {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect(),
        Some(Value::String(s)) if !s.is_empty() => vec![s.clone()],
        _ => Vec::new(),
    }
}
