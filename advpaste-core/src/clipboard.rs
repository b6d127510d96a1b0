//! Clipboard payloads and the acquisition modes that select them

use crate::PasteError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// How a transform wants the clipboard read
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformKind {
    /// Clipboard contents as plain text
    Text,
    /// First raw clipboard item, all representations
    Blob,
}

impl TransformKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransformKind::Text => "text",
            TransformKind::Blob => "blob",
        }
    }
}

impl Default for TransformKind {
    fn default() -> Self {
        TransformKind::Text
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransformKind {
    type Err = PasteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(TransformKind::Text),
            "blob" => Ok(TransformKind::Blob),
            other => Err(PasteError::UnsupportedKind(other.to_string())),
        }
    }
}

/// One representation of a clipboard item
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Representation {
    pub mime: String,
    pub data: Vec<u8>,
}

/// A single clipboard entry holding one or more representations
/// (`text/html`, `text/plain`, `image/png`, ...), in the order the
/// platform offered them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClipboardItem {
    representations: Vec<Representation>,
}

impl ClipboardItem {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: add a representation. A later entry for the same MIME type replaces the earlier one.
    pub fn with(mut self, mime: impl Into<String>, data: impl Into<Vec<u8>>) -> Self {
        self.insert(mime, data);
        self
    }

    pub fn insert(&mut self, mime: impl Into<String>, data: impl Into<Vec<u8>>) {
        let mime = mime.into();
        let data = data.into();
        match self.representations.iter_mut().find(|r| r.mime == mime) {
            Some(existing) => existing.data = data,
            None => self.representations.push(Representation { mime, data }),
        }
    }

    pub fn types(&self) -> Vec<&str> {
        self.representations.iter().map(|r| r.mime.as_str()).collect()
    }

    pub fn has_type(&self, mime: &str) -> bool {
        self.representations.iter().any(|r| r.mime == mime)
    }

    pub fn get_type(&self, mime: &str) -> Option<&[u8]> {
        self.representations
            .iter()
            .find(|r| r.mime == mime)
            .map(|r| r.data.as_slice())
    }

    /// Representation decoded as UTF-8 (lossy)
    pub fn get_text(&self, mime: &str) -> Option<String> {
        self.get_type(mime)
            .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
    }

    /// First `image/*` representation
    pub fn image(&self) -> Option<&Representation> {
        self.representations
            .iter()
            .find(|r| r.mime.starts_with("image/"))
    }

    pub fn is_empty(&self) -> bool {
        self.representations.is_empty()
    }
}

/// Input handed to a transform, matching its kind
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransformInput {
    Text(String),
    Blob(ClipboardItem),
}

impl TransformInput {
    pub fn kind(&self) -> TransformKind {
        match self {
            TransformInput::Text(_) => TransformKind::Text,
            TransformInput::Blob(_) => TransformKind::Blob,
        }
    }

    pub fn as_text(&self) -> Option<&str> {
        match self {
            TransformInput::Text(s) => Some(s),
            TransformInput::Blob(_) => None,
        }
    }

    pub fn as_item(&self) -> Option<&ClipboardItem> {
        match self {
            TransformInput::Blob(item) => Some(item),
            TransformInput::Text(_) => None,
        }
    }
}
