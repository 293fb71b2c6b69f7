//! Pulls a JSON object out of free-form model output.
//!
//! The model is asked for bare JSON but sometimes wraps it in fences or
//! prose. Extraction takes the first `{` and scans to its matching `}`,
//! honouring string literals and escapes, then deserializes the span into
//! the caller's typed schema. There is no partial salvage: anything that
//! does not parse is an `ExtractError` and the caller decides the fallback.

use serde::de::DeserializeOwned;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("No JSON object found in response")]
    NoObject,

    #[error("JSON object starting at byte {start} is never closed")]
    Unbalanced { start: usize },

    #[error("JSON object does not match the expected schema: {0}")]
    Schema(#[from] serde_json::Error),
}

/// Strips ```json ... ``` or ``` ... ``` code fences from LLM output.
pub fn strip_json_fences(text: &str) -> &str {
    let text = text.trim();
    if let Some(stripped) = text.strip_prefix("```json") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else if let Some(stripped) = text.strip_prefix("```") {
        stripped
            .trim_start()
            .strip_suffix("```")
            .map(|s| s.trim())
            .unwrap_or(stripped.trim_start())
    } else {
        text
    }
}

/// Returns the first balanced `{...}` span in `text`.
pub fn extract_json_object(text: &str) -> Result<&str, ExtractError> {
    let text = strip_json_fences(text);
    let start = text.find('{').ok_or(ExtractError::NoObject)?;

    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, ch) in text[start..].char_indices() {
        if in_string {
            match ch {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match ch {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + ch.len_utf8();
                    return Ok(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    Err(ExtractError::Unbalanced { start })
}

/// Extracts the first JSON object from `text` and deserializes it strictly.
pub fn parse_json_reply<T: DeserializeOwned>(text: &str) -> Result<T, ExtractError> {
    let span = extract_json_object(text)?;
    Ok(serde_json::from_str(span)?)
}
