//! Errors raised by the paste pipeline and its host ports
//!
//! Transform-reported failures are not errors: they travel as
//! `TransformResult::Err` and end up in a notice. `PasteError` covers the
//! cases where something around the transform broke.

use thiserror::Error;

/// Standard error codes (machine-readable)
pub mod codes {
    pub const CLIPBOARD: &str = "CLIPBOARD";
    pub const VAULT: &str = "VAULT";
    pub const IO: &str = "IO";
    pub const SETTINGS: &str = "SETTINGS";
    pub const SCRIPT: &str = "SCRIPT";
    pub const UNSUPPORTED_KIND: &str = "UNSUPPORTED_KIND";
    pub const TRANSFORM: &str = "TRANSFORM";
    pub const UNKNOWN_COMMAND: &str = "UNKNOWN_COMMAND";
}

#[derive(Debug, Error)]
pub enum PasteError {
    #[error("clipboard unavailable: {0}")]
    Clipboard(String),

    #[error("vault error: {0}")]
    Vault(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid settings data: {0}")]
    Settings(#[from] serde_json::Error),

    #[error("script {file}: {message}")]
    Script { file: String, message: String },

    #[error("unsupported input type: {0}")]
    UnsupportedKind(String),

    #[error("{0}")]
    Transform(String),

    #[error("no command registered as '{0}'")]
    UnknownCommand(String),
}

impl PasteError {
    pub fn clipboard(details: impl Into<String>) -> Self {
        Self::Clipboard(details.into())
    }

    pub fn vault(details: impl Into<String>) -> Self {
        Self::Vault(details.into())
    }

    pub fn script(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Script {
            file: file.into(),
            message: message.into(),
        }
    }

    pub fn transform(details: impl Into<String>) -> Self {
        Self::Transform(details.into())
    }

    /// Machine-readable code, used by hosts that report errors over the wire
    pub fn code(&self) -> &'static str {
        match self {
            Self::Clipboard(_) => codes::CLIPBOARD,
            Self::Vault(_) => codes::VAULT,
            Self::Io(_) => codes::IO,
            Self::Settings(_) => codes::SETTINGS,
            Self::Script { .. } => codes::SCRIPT,
            Self::UnsupportedKind(_) => codes::UNSUPPORTED_KIND,
            Self::Transform(_) => codes::TRANSFORM,
            Self::UnknownCommand(_) => codes::UNKNOWN_COMMAND,
        }
    }
}

pub type Result<T> = std::result::Result<T, PasteError>;
