//! Advanced Paste - clipboard transforms for a note editor
//!
//! Pastes are routed through a transform before they reach the editor:
//! built-in ones (HTML → Markdown, line joining, ...) and user scripts found
//! in a vault folder. The host application is reached only through the ports
//! in [`advpaste_plugin`]; [`AdvancedPaste`] ties them together.
//!
//! ```ignore
//! let plugin = AdvancedPaste::on_load(host, layout).await?;
//! plugin.execute("smartJoin", &mut editor).await?;
//! ```

mod executor;
mod plugin;
mod registrar;
mod settings;

pub use executor::{execute_paste, PasteOutcome, NOTHING_TO_PASTE};
pub use plugin::{AdvancedPaste, PluginHost};
pub use registrar::{Command, CommandInfo, CommandRegistry};
pub use settings::{
    SettingField, Settings, SettingsTab, SettingsView, DEFAULT_SCRIPT_DIR, RELOAD_WARNING,
    UNTRUSTED_SCRIPTS_WARNING,
};

pub use advpaste_core::{PasteError, Result, TransformResult};
pub use advpaste_plugin::{layout_ready, LayoutReady, LayoutReadyTrigger};
