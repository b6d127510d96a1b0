//! Transform trait

use advpaste_core::{PasteError, TransformInput, TransformKind, TransformResult};
use async_trait::async_trait;
use serde::Serialize;
use crate::TransformUtils;

/// Where a transform came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "file", rename_all = "lowercase")]
pub enum TransformSource {
    Builtin,
    Script(String),
}

/// Metadata for a transform
#[derive(Debug, Clone, Serialize)]
pub struct TransformMeta {
    /// Stable identifier, used as the command id
    pub id: String,
    pub description: String,
    pub source: TransformSource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
}

impl TransformMeta {
    pub fn builtin(id: &str, description: &str) -> Self {
        Self {
            id: id.to_string(),
            description: description.to_string(),
            source: TransformSource::Builtin,
            example: None,
        }
    }

    pub fn with_example(mut self, example: &str) -> Self {
        self.example = Some(example.to_string());
        self
    }
}

/// A clipboard transform.
///
/// `transform` returning `Ok(TransformResult::Err(..))` is a failure the
/// transform reports to the user. Returning `Err(PasteError)` means the
/// transform itself broke (I/O, script exception).
#[async_trait]
pub trait Transform: Send + Sync {
    fn meta(&self) -> TransformMeta;

    /// Clipboard acquisition mode. Fails for transforms declaring a mode
    /// outside `text`/`blob`.
    fn kind(&self) -> Result<TransformKind, PasteError>;

    async fn transform(
        &self,
        input: TransformInput,
        utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError>;
}
