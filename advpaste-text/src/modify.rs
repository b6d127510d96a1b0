//! Line filtering transforms: removeBlankLines

use advpaste_plugin::prelude::*;
use crate::helpers::require_text;

// ============ RemoveBlankLines ============

pub struct RemoveBlankLines;

pub fn remove_blank_lines(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .collect::<Vec<&str>>()
        .join("\n")
}

#[async_trait]
impl Transform for RemoveBlankLines {
    fn meta(&self) -> TransformMeta {
        TransformMeta::builtin("removeBlankLines", "Drop empty and whitespace-only lines")
            .with_example("\"a\\n\\n  \\nb\" → \"a\\nb\"")
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        Ok(TransformKind::Text)
    }

    async fn transform(
        &self,
        input: TransformInput,
        _utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let text = require_text(&input, "removeBlankLines")?;
        Ok(remove_blank_lines(text).into())
    }
}
