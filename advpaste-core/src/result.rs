//! Transform results
//!
//! A transform produces exactly one of two outcomes: text to insert, or a
//! message to show the user. Serialized as `{"kind": "ok", "value": ...}` /
//! `{"kind": "err", "value": ...}`.

use serde::{Deserialize, Serialize};

/// Shown when a transform fails without saying why
pub const GENERIC_FAILURE: &str = "An error occurred in Advanced Paste.";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum TransformResult {
    Ok(String),
    Err(String),
}

impl TransformResult {
    pub fn ok(value: impl Into<String>) -> Self {
        TransformResult::Ok(value.into())
    }

    pub fn err(message: impl Into<String>) -> Self {
        TransformResult::Err(message.into())
    }

    /// Failure with the generic message
    pub fn failed() -> Self {
        TransformResult::Err(GENERIC_FAILURE.to_string())
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, TransformResult::Ok(_))
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransformResult::Ok(s) => Some(s),
            TransformResult::Err(_) => None,
        }
    }

    /// Message to show for a failure, as given. A failure that came without any
    /// message was already built with `failed()`.
    pub fn failure_message(&self) -> Option<&str> {
        match self {
            TransformResult::Ok(_) => None,
            TransformResult::Err(m) => Some(m),
        }
    }
}

/// Bare strings are successes
impl From<String> for TransformResult {
    fn from(s: String) -> Self {
        TransformResult::Ok(s)
    }
}

impl From<&str> for TransformResult {
    fn from(s: &str) -> Self {
        TransformResult::Ok(s.to_string())
    }
}
