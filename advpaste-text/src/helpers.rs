//! Helper functions for built-in transforms
//!
//! Input extraction and a shared regex cache.

use advpaste_core::{ClipboardItem, PasteError, TransformInput};
use regex::Regex;
use std::collections::HashMap;
use std::sync::{OnceLock, RwLock};

/// Text input, or an error naming the transform that was fed the wrong kind
pub fn require_text<'a>(input: &'a TransformInput, transform: &str) -> Result<&'a str, PasteError> {
    input.as_text().ok_or_else(|| {
        PasteError::transform(format!("{} expects text input, got a clipboard item", transform))
    })
}

/// Clipboard item input, or an error naming the transform that was fed the wrong kind
pub fn require_item<'a>(input: &'a TransformInput, transform: &str) -> Result<&'a ClipboardItem, PasteError> {
    input.as_item().ok_or_else(|| {
        PasteError::transform(format!("{} expects a clipboard item, got text", transform))
    })
}

/// Regex cache for compiled patterns
static REGEX_CACHE: OnceLock<RwLock<HashMap<String, Regex>>> = OnceLock::new();

fn get_cache() -> &'static RwLock<HashMap<String, Regex>> {
    REGEX_CACHE.get_or_init(|| RwLock::new(HashMap::new()))
}

/// Get or compile a regex pattern with caching
pub fn get_regex(pattern: &str) -> Result<Regex, PasteError> {
    let cache = get_cache();

    {
        let read_guard = cache
            .read()
            .map_err(|_| PasteError::transform("Failed to acquire regex cache lock"))?;
        if let Some(re) = read_guard.get(pattern) {
            return Ok(re.clone());
        }
    }

    let re = Regex::new(pattern)
        .map_err(|e| PasteError::transform(format!("Invalid regex '{}': {}", pattern, e)))?;

    // Caching is best effort
    if let Ok(mut write_guard) = cache.write() {
        write_guard.insert(pattern.to_string(), re.clone());
    }

    Ok(re)
}
