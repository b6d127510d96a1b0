//! Advanced Paste Plugin System
//!
//! Provides the seams between transforms and the application hosting them:
//! - `Transform`: a clipboard transform (built-in or scripted)
//! - `TransformUtils`: helpers handed to every transform
//! - Host ports: clipboard, editor, notices, vault, settings store, layout readiness
//! - `TransformRegistry`: transforms keyed by id

mod context;
mod host;
mod registry;
mod traits;

pub use context::TransformUtils;
pub use host::{
    layout_ready, ClipboardSource, Editor, LayoutReady, LayoutReadyTrigger, Notifier,
    SettingsStore, Vault, VaultEntry,
};
pub use registry::{rank_similar, summarize, TransformRegistry, TransformSummary};
pub use traits::{Transform, TransformMeta, TransformSource};

/// Re-export core types for transform authors
pub mod prelude {
    pub use crate::{
        Transform, TransformMeta, TransformRegistry, TransformSource, TransformUtils,
    };
    pub use advpaste_core::prelude::*;
    pub use async_trait::async_trait;
}

/// In-memory host for tests, here and in the crates built on this one
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use super::*;
    use advpaste_core::PasteError;
    use async_trait::async_trait;
    use std::collections::BTreeMap;
    use std::sync::{Arc, Mutex};

    /// Flat path → content map; folders are implied by paths.
    /// Saved attachments are recorded as `(name, ext, bytes)`.
    #[derive(Default)]
    pub struct MemoryVault {
        files: BTreeMap<String, String>,
        pub saved: Mutex<Vec<(String, String, usize)>>,
    }

    impl MemoryVault {
        pub fn with_file(mut self, path: &str, content: &str) -> Self {
            self.files.insert(path.to_string(), content.to_string());
            self
        }
    }

    #[async_trait]
    impl Vault for MemoryVault {
        async fn list_folder(&self, path: &str) -> Result<Option<Vec<VaultEntry>>, PasteError> {
            let prefix = format!("{}/", path.trim_matches('/'));
            let entries: Vec<VaultEntry> = self
                .files
                .keys()
                .filter_map(|p| {
                    let name = p.strip_prefix(&prefix)?;
                    (!name.contains('/')).then(|| VaultEntry {
                        path: p.clone(),
                        name: name.to_string(),
                        is_folder: false,
                    })
                })
                .collect();
            Ok((!entries.is_empty()).then_some(entries))
        }

        async fn read(&self, path: &str) -> Result<String, PasteError> {
            self.files
                .get(path)
                .cloned()
                .ok_or_else(|| PasteError::vault(format!("{} not found", path)))
        }

        async fn save_attachment(&self, name: &str, ext: &str, data: &[u8]) -> Result<String, PasteError> {
            self.saved
                .lock()
                .unwrap_or_else(|e| e.into_inner())
                .push((name.to_string(), ext.to_string(), data.len()));
            Ok(format!("attachments/{}.{}", name, ext))
        }
    }

    /// A fresh vault and the utilities bound to it
    pub fn utils() -> (Arc<MemoryVault>, TransformUtils) {
        let vault = Arc::new(MemoryVault::default());
        (vault.clone(), TransformUtils::new(vault))
    }
}
