//! Structured output recovery.
//!
//! Pure function from raw model text to a validated [`StructuredPayload`]:
//! strip code fences, try a strict parse, fall back to the tolerant repair,
//! then require both fields to be non-empty strings. Retrying is the
//! generation client's job, never this module's.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::repair::parse_lenient;

/// Image prompt payload returned by the secondary backend.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredPayload {
    /// English prompt for the image model
    pub prompt: String,
    /// Why the chosen elements fit the conversation
    pub explanation: String,
}

/// Why a response could not be turned into a payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecoveryError {
    #[error("response is not JSON even after repair: {0}")]
    NotJson(String),

    #[error("response JSON is not an object")]
    NotObject,

    #[error("required field '{0}' is missing or empty")]
    MissingField(&'static str),
}

/// Body of a markdown-fenced response.
///
/// A response that opens with a fence has it removed together with its
/// language tag and the closing fence, whether or not the body sits on the
/// same line. Prose wrapped around a fenced block is dropped as long as the
/// response does not itself start with a JSON value. Anything else is
/// returned trimmed.
pub fn strip_code_fence(raw: &str) -> &str {
    let trimmed = raw.trim();
    if let Some(after_open) = trimmed.strip_prefix("```") {
        return fence_body(after_open);
    }
    if !trimmed.starts_with(['{', '[']) {
        if let Some(open) = trimmed.find("```") {
            return fence_body(&trimmed[open + 3..]);
        }
    }
    trimmed
}

fn fence_body(after_open: &str) -> &str {
    // Language tag (e.g. `json`) runs up to whitespace or the JSON value
    let tag_len = after_open
        .find(|c: char| c.is_whitespace() || c == '{' || c == '[')
        .unwrap_or(after_open.len());
    let body = &after_open[tag_len..];
    match body.rfind("```") {
        Some(close) => body[..close].trim(),
        None => body.trim(),
    }
}

fn required_field(object: &serde_json::Map<String, Value>, field: &'static str) -> Result<String, RecoveryError> {
    object
        .get(field)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .ok_or(RecoveryError::MissingField(field))
}

/// Validate a parsed value against the payload schema.
pub fn validate(value: &Value) -> Result<StructuredPayload, RecoveryError> {
    let object = value.as_object().ok_or(RecoveryError::NotObject)?;
    Ok(StructuredPayload {
        prompt: required_field(object, "prompt")?,
        explanation: required_field(object, "explanation")?,
    })
}

/// Strict parse only. No repair.
pub fn parse_strict(raw: &str) -> Result<StructuredPayload, RecoveryError> {
    let body = strip_code_fence(raw);
    let value: Value =
        serde_json::from_str(body).map_err(|e| RecoveryError::NotJson(e.to_string()))?;
    validate(&value)
}

/// Recover a payload from raw model text.
pub fn recover(raw: &str) -> Result<StructuredPayload, RecoveryError> {
    let body = strip_code_fence(raw);

    let value = match serde_json::from_str::<Value>(body) {
        Ok(value) => value,
        Err(strict_err) => {
            tracing::debug!(error = %strict_err, "Strict JSON parse failed, attempting repair");
            parse_lenient(body).map_err(|e| RecoveryError::NotJson(e.to_string()))?
        }
    };

    validate(&value)
}
