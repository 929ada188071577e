//! Pre-flight parsing of user-typed request input
//!
//! The tester pages let users type bodies, search criteria, and extra
//! headers as free text. Malformed input must be rejected before any
//! network call, and the error must say which box is wrong: the body or
//! the headers.

use std::collections::BTreeMap;

use serde_json::Value;

use super::errors::ClientError;

/// Parse user-typed body or criteria text into a JSON value.
///
/// Empty (or whitespace-only) text means "no body".
///
/// # Errors
/// Returns [`ClientError::InvalidBodyJson`] when the text is present but
/// not valid JSON.
pub fn parse_body_text(text: &str) -> Result<Option<Value>, ClientError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    serde_json::from_str(trimmed)
        .map(Some)
        .map_err(|err| ClientError::InvalidBodyJson(err.to_string()))
}

/// Parse user-typed header text into a name-to-value map.
///
/// Accepts a JSON object whose values are strings, numbers, or booleans;
/// numbers and booleans are rendered to their literal form. Empty text
/// means "no extra headers".
///
/// # Errors
/// Returns [`ClientError::InvalidHeaderJson`] when the text is not valid
/// JSON, not an object, or contains a non-scalar value.
pub fn parse_header_text(text: &str) -> Result<BTreeMap<String, String>, ClientError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Ok(BTreeMap::new());
    }

    let parsed: Value = serde_json::from_str(trimmed)
        .map_err(|err| ClientError::InvalidHeaderJson(err.to_string()))?;

    let Value::Object(entries) = parsed else {
        return Err(ClientError::InvalidHeaderJson(
            "expected a JSON object mapping header names to values".to_string(),
        ));
    };

    let mut headers = BTreeMap::new();
    for (name, value) in entries {
        let rendered = match value {
            Value::String(text) => text,
            Value::Number(number) => number.to_string(),
            Value::Bool(flag) => flag.to_string(),
            other => {
                return Err(ClientError::InvalidHeaderJson(format!(
                    "header {:?} must be a scalar value, got {}",
                    name, other
                )))
            }
        };
        headers.insert(name, rendered);
    }

    Ok(headers)
}
