//! Running one transform against the clipboard

use advpaste_core::{Result, TransformInput, TransformKind, TransformResult, GENERIC_FAILURE};
use advpaste_plugin::{ClipboardSource, Editor, Notifier, Transform, TransformUtils};
use serde::Serialize;
use tracing::{debug, error};

pub const NOTHING_TO_PASTE: &str = "Nothing to paste!";

/// How a paste invocation ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum PasteOutcome {
    /// Transform output replaced the selection
    Inserted,
    /// The transform reported a failure; its message was shown
    Rejected,
    /// Blob transform with an empty clipboard
    NothingToPaste,
    /// The transform itself broke
    Failed,
}

/// Read the clipboard in the form `transform` declares, run it, and either
/// replace the editor selection or show a notice.
///
/// Only an unsupported transform kind or an unreadable clipboard is returned
/// as an error; every other outcome is reported to the user.
pub async fn execute_paste(
    transform: &dyn Transform,
    clipboard: &dyn ClipboardSource,
    editor: &mut dyn Editor,
    notifier: &dyn Notifier,
    utils: &TransformUtils,
) -> Result<PasteOutcome> {
    let id = transform.meta().id;

    let input = match transform.kind()? {
        TransformKind::Text => TransformInput::Text(clipboard.read_text().await?),
        TransformKind::Blob => match clipboard.read_items().await?.into_iter().next() {
            Some(item) => TransformInput::Blob(item),
            None => {
                notifier.notice(NOTHING_TO_PASTE);
                return Ok(PasteOutcome::NothingToPaste);
            }
        },
    };

    debug!(transform = %id, kind = %input.kind(), "running transform");
    let result = match transform.transform(input, utils).await {
        Ok(result) => result,
        Err(e) => {
            error!(transform = %id, error = %e, "Advanced Paste transform failed");
            notifier.notice(&format!("Advanced Paste transform failed: {}", e));
            return Ok(PasteOutcome::Failed);
        }
    };

    match result {
        TransformResult::Ok(text) => {
            editor.replace_selection(&text);
            Ok(PasteOutcome::Inserted)
        }
        rejected => {
            notifier.notice(rejected.failure_message().unwrap_or(GENERIC_FAILURE));
            Ok(PasteOutcome::Rejected)
        }
    }
}
