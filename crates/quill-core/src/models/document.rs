//! Opaque structured documents.
//!
//! Content type schemas and content entry data are stored as-is and
//! never interpreted by the core beyond substring search.

use serde::{Deserialize, Serialize};

use crate::error::{QuillError, QuillResult};

/// A JSON object stored verbatim.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document(serde_json::Value);

impl Document {
    /// Wrap a JSON value. Only objects are accepted.
    pub fn new(value: serde_json::Value) -> QuillResult<Self> {
        if value.is_object() {
            Ok(Self(value))
        } else {
            Err(QuillError::validation("document must be a JSON object"))
        }
    }

    pub fn parse(text: &str) -> QuillResult<Self> {
        let value: serde_json::Value = serde_json::from_str(text)
            .map_err(|e| QuillError::validation(format!("malformed document: {e}")))?;
        Self::new(value)
    }

    pub fn as_value(&self) -> &serde_json::Value {
        &self.0
    }

    pub fn into_value(self) -> serde_json::Value {
        self.0
    }

    /// Compact textual rendering used for search.
    pub fn render(&self) -> String {
        self.0.to_string()
    }

    /// Case-insensitive substring match against [`render`](Self::render).
    pub fn contains_text(&self, term: &str) -> bool {
        self.render()
            .to_lowercase()
            .contains(&term.to_lowercase())
    }
}

impl TryFrom<serde_json::Value> for Document {
    type Error = QuillError;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}
