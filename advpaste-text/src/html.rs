//! Rich clipboard transforms: default, rawHTML

use advpaste_plugin::prelude::*;
use crate::helpers::require_item;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::debug;

const HTML: &str = "text/html";
const PLAIN: &str = "text/plain";

// ============ Default ============

/// HTML → Markdown, images → attachment embeds, anything else as plain text
pub struct DefaultPaste;

fn attachment_name() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default();
    format!("Pasted image {}", secs)
}

/// Embed link for a saved attachment, by file name
fn embed(path: &str) -> String {
    let file = path.rsplit('/').next().unwrap_or(path);
    format!("![[{}]]", file)
}

#[async_trait]
impl Transform for DefaultPaste {
    fn meta(&self) -> TransformMeta {
        TransformMeta::builtin(
            "default",
            "Paste HTML as Markdown and images as attachments",
        )
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        Ok(TransformKind::Blob)
    }

    async fn transform(
        &self,
        input: TransformInput,
        utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let item = require_item(&input, "default")?;

        if let Some(html) = item.get_text(HTML) {
            return utils.html_to_markdown(&html).map(TransformResult::Ok);
        }

        if let Some(image) = item.image() {
            let ext = utils.mime_extension(&image.mime).unwrap_or("png");
            debug!(mime = %image.mime, ext, "pasting image as attachment");
            let path = utils.save_attachment(&attachment_name(), ext, &image.data).await?;
            return Ok(TransformResult::Ok(embed(&path)));
        }

        match item.get_text(PLAIN) {
            Some(text) => Ok(TransformResult::Ok(text)),
            None => Ok(TransformResult::err("Unsupported clipboard content")),
        }
    }
}

// ============ RawHtml ============

pub struct RawHtml;

#[async_trait]
impl Transform for RawHtml {
    fn meta(&self) -> TransformMeta {
        TransformMeta::builtin("rawHTML", "Paste the HTML source of rich clipboard content")
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        Ok(TransformKind::Blob)
    }

    async fn transform(
        &self,
        input: TransformInput,
        _utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let item = require_item(&input, "rawHTML")?;
        Ok(match item.get_text(HTML) {
            Some(html) => TransformResult::Ok(html),
            None => TransformResult::err("No HTML found in clipboard!"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use advpaste_plugin::testing::{utils, MemoryVault};
    use std::sync::Arc;

    fn blob(item: ClipboardItem) -> TransformInput {
        TransformInput::Blob(item)
    }

    #[tokio::test]
    async fn test_default_converts_html() {
        let (_, utils) = utils();
        let item = ClipboardItem::new()
            .with("text/html", "<p>Hello <em>world</em></p>")
            .with("text/plain", "Hello world");
        let result = DefaultPaste.transform(blob(item), &utils).await.unwrap();
        let text = result.as_text().unwrap();
        assert!(text.starts_with("Hello "), "got: {}", text);
        assert!(text.contains("world") && !text.contains("<em>"), "got: {}", text);
    }

    #[tokio::test]
    async fn test_default_saves_images() {
        let (vault, utils): (Arc<MemoryVault>, _) = utils();
        let item = ClipboardItem::new().with("image/png", vec![1u8, 2, 3, 4]);
        let result = DefaultPaste.transform(blob(item), &utils).await.unwrap();

        let text = result.as_text().unwrap();
        assert!(text.starts_with("![[Pasted image "), "got: {}", text);
        assert!(text.ends_with(".png]]"), "got: {}", text);
        let saved = vault.saved.lock().unwrap();
        assert_eq!(saved.len(), 1);
        assert_eq!(saved[0].1, "png");
        assert_eq!(saved[0].2, 4);
    }

    #[tokio::test]
    async fn test_default_plain_text_fallback() {
        let (_, utils) = utils();
        let item = ClipboardItem::new().with("text/plain", "just text");
        let result = DefaultPaste.transform(blob(item), &utils).await.unwrap();
        assert_eq!(result, TransformResult::ok("just text"));
    }

    #[tokio::test]
    async fn test_default_unsupported() {
        let (_, utils) = utils();
        let item = ClipboardItem::new().with("application/octet-stream", vec![0u8]);
        let result = DefaultPaste.transform(blob(item), &utils).await.unwrap();
        assert_eq!(result, TransformResult::err("Unsupported clipboard content"));
    }

    #[tokio::test]
    async fn test_raw_html() {
        let (_, utils) = utils();
        let item = ClipboardItem::new().with("text/html", "<b>x</b>");
        let result = RawHtml.transform(blob(item), &utils).await.unwrap();
        assert_eq!(result, TransformResult::ok("<b>x</b>"));
    }

    #[tokio::test]
    async fn test_raw_html_missing() {
        let (_, utils) = utils();
        let item = ClipboardItem::new().with("text/plain", "x");
        let result = RawHtml.transform(blob(item), &utils).await.unwrap();
        assert_eq!(result, TransformResult::err("No HTML found in clipboard!"));
    }

    #[tokio::test]
    async fn test_raw_html_rejects_text_input() {
        let (_, utils) = utils();
        let err = RawHtml
            .transform(TransformInput::Text("x".into()), &utils)
            .await
            .unwrap_err();
        assert!(matches!(err, PasteError::Transform(_)));
    }

    #[test]
    fn test_embed_uses_file_name() {
        assert_eq!(embed("attachments/a.png"), "![[a.png]]");
        assert_eq!(embed("a.png"), "![[a.png]]");
    }
}
