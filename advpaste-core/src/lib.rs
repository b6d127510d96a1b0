//! Advanced Paste Core - Fundamental types
//!
//! This crate provides the core types used throughout Advanced Paste:
//! - `TransformResult`: what a transform hands back (text to insert or a message)
//! - `ClipboardItem` / `TransformInput` / `TransformKind`: what a transform receives
//! - `PasteError`: failures around the transform (clipboard, vault, scripts)
//! - `start_case`: display names derived from identifiers

mod case;
mod clipboard;
mod error;
mod result;

pub use case::{start_case, words};
pub use clipboard::{ClipboardItem, Representation, TransformInput, TransformKind};
pub use error::{codes, PasteError, Result};
pub use result::{TransformResult, GENERIC_FAILURE};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::{
        ClipboardItem, PasteError, TransformInput, TransformKind, TransformResult,
    };
    pub use crate::error::codes;
}
