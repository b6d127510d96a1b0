//! Utility bundle passed to every transform

use crate::Vault;
use advpaste_core::PasteError;
use std::sync::Arc;
use tracing::debug;

/// Tags dropped during HTML → Markdown conversion
const SKIPPED_TAGS: [&str; 3] = ["script", "style", "head"];

/// Helpers available to transforms: HTML → Markdown, MIME lookup and
/// attachment saving through the host vault.
#[derive(Clone)]
pub struct TransformUtils {
    vault: Arc<dyn Vault>,
}

impl TransformUtils {
    pub fn new(vault: Arc<dyn Vault>) -> Self {
        Self { vault }
    }

    pub fn html_to_markdown(&self, html: &str) -> Result<String, PasteError> {
        htmd::HtmlToMarkdown::builder()
            .skip_tags(SKIPPED_TAGS.to_vec())
            .build()
            .convert(html)
            .map(|md| md.trim().to_string())
            .map_err(|e| PasteError::transform(format!("HTML conversion failed: {}", e)))
    }

    /// Preferred file extension for a MIME type (`image/jpeg` → `jpeg`)
    pub fn mime_extension(&self, mime: &str) -> Option<&'static str> {
        let exts = mime_guess::get_mime_extensions_str(mime)?;
        let subtype = mime.split('/').nth(1).unwrap_or_default();
        exts.iter()
            .find(|ext| **ext == subtype)
            .or_else(|| exts.first())
            .copied()
    }

    /// MIME type guessed from a file name
    pub fn mime_type(&self, path: &str) -> Option<String> {
        mime_guess::from_path(path).first_raw().map(str::to_string)
    }

    /// Save `data` as `<name>.<ext>` in the vault's attachment location
    pub async fn save_attachment(&self, name: &str, ext: &str, data: &[u8]) -> Result<String, PasteError> {
        debug!(name, ext, bytes = data.len(), "saving attachment");
        self.vault.save_attachment(name, ext, data).await
    }
}
