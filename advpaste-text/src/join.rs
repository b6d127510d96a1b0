//! Line joining transforms: smartJoin, joinLines

use advpaste_plugin::prelude::*;
use crate::helpers::{get_regex, require_text};

// ============ SmartJoin ============

pub struct SmartJoin;

/// Joins the lines of one paragraph, merging words hyphenated across a break
fn join_paragraph(lines: &[&str]) -> Result<String, PasteError> {
    let hyphenated = get_regex(r"\p{L}-$")?;
    let mut joined = String::new();

    for line in lines {
        if joined.is_empty() {
            joined.push_str(line);
        } else if hyphenated.is_match(&joined) {
            joined.pop();
            joined.push_str(line);
        } else {
            joined.push(' ');
            joined.push_str(line);
        }
    }

    Ok(joined)
}

pub fn smart_join(text: &str) -> Result<String, PasteError> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();

    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(join_paragraph(&current)?);
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(join_paragraph(&current)?);
    }

    Ok(paragraphs.join("\n\n"))
}

#[async_trait]
impl Transform for SmartJoin {
    fn meta(&self) -> TransformMeta {
        TransformMeta::builtin(
            "smartJoin",
            "Join wrapped lines into paragraphs, merging hyphenated words",
        )
        .with_example("\"exam-\\nple text\\nhere\" → \"example text here\"")
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        Ok(TransformKind::Text)
    }

    async fn transform(
        &self,
        input: TransformInput,
        _utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let text = require_text(&input, "smartJoin")?;
        smart_join(text).map(TransformResult::Ok)
    }
}

// ============ JoinLines ============

pub struct JoinLines;

pub fn join_lines(text: &str) -> Result<String, PasteError> {
    let breaks = get_regex(r"\r?\n")?;
    Ok(breaks.replace_all(text, "").into_owned())
}

#[async_trait]
impl Transform for JoinLines {
    fn meta(&self) -> TransformMeta {
        TransformMeta::builtin("joinLines", "Remove every line break")
            .with_example("\"a\\nb\\nc\" → \"abc\"")
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        Ok(TransformKind::Text)
    }

    async fn transform(
        &self,
        input: TransformInput,
        _utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let text = require_text(&input, "joinLines")?;
        join_lines(text).map(TransformResult::Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smart_join_wrapped_lines() {
        let text = "The quick brown\nfox jumps over\n  the lazy dog.";
        assert_eq!(smart_join(text).unwrap(), "The quick brown fox jumps over the lazy dog.");
    }

    #[test]
    fn test_smart_join_hyphenation() {
        assert_eq!(smart_join("an exam-\nple of hyphen-\nation").unwrap(), "an example of hyphenation");
    }

    #[test]
    fn test_smart_join_keeps_dash_after_space() {
        assert_eq!(smart_join("a -\nb").unwrap(), "a - b");
    }

    #[test]
    fn test_smart_join_paragraphs() {
        let text = "first\nparagraph\n\n\n second\nparagraph\n";
        assert_eq!(smart_join(text).unwrap(), "first paragraph\n\nsecond paragraph");
    }

    #[test]
    fn test_smart_join_empty() {
        assert_eq!(smart_join("").unwrap(), "");
        assert_eq!(smart_join("\n \n").unwrap(), "");
    }

    #[test]
    fn test_join_lines() {
        assert_eq!(join_lines("a\nb\r\nc").unwrap(), "abc");
        assert_eq!(join_lines("single").unwrap(), "single");
    }
}
