//! Parsing of model output that is supposed to be a single JSON value.

use serde::de::DeserializeOwned;
use tracing::warn;

/// Removes a leading ```` ```json ```` (or bare ```` ``` ````) fence and a
/// trailing ```` ``` ```` fence, then trims.
pub fn strip_fences(text: &str) -> &str {
    let text = text.trim();
    let text = text
        .strip_prefix("```json")
        .or_else(|| text.strip_prefix("```"))
        .unwrap_or(text);
    let text = text.trim_end();
    text.strip_suffix("```").unwrap_or(text).trim()
}

#[derive(Debug, Clone, PartialEq)]
pub enum ResponseOutcome<T> {
    Parsed(T),
    /// Not JSON, or JSON of the wrong shape.
    Malformed { error: String },
}

impl<T: DeserializeOwned> ResponseOutcome<T> {
    pub fn parse(text: &str) -> Self {
        match serde_json::from_str(strip_fences(text)) {
            Ok(value) => ResponseOutcome::Parsed(value),
            Err(e) => ResponseOutcome::Malformed { error: e.to_string() },
        }
    }
}

impl<T: Default> ResponseOutcome<T> {
    /// The parsed value, or the empty value after logging why parsing failed.
    pub fn or_default_logged(self, stage: &str) -> T {
        match self {
            ResponseOutcome::Parsed(value) => value,
            ResponseOutcome::Malformed { error } => {
                warn!("Failed to parse {} response: {}", stage, error);
                T::default()
            }
        }
    }
}
