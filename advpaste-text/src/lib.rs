//! Advanced Paste Built-in Transforms
//!
//! The transforms shipped with the plugin. Each is a pure function of the
//! clipboard payload, except `default`, which may save an image attachment.

mod helpers;
mod html;
mod join;
mod modify;

use advpaste_plugin::TransformRegistry;

pub use join::{join_lines, smart_join};
pub use modify::remove_blank_lines;

/// Load the built-in transforms into registry
pub fn load_builtin_transforms(registry: TransformRegistry) -> TransformRegistry {
    registry
        // Rich content (blob)
        .with_transform(html::DefaultPaste)
        .with_transform(html::RawHtml)

        // Plain text
        .with_transform(join::SmartJoin)
        .with_transform(join::JoinLines)
        .with_transform(modify::RemoveBlankLines)
}

/// Registry holding only the built-in transforms
pub fn builtin_registry() -> TransformRegistry {
    load_builtin_transforms(TransformRegistry::new())
}
