//! Host ports
//!
//! Everything the paste pipeline needs from the application it lives in.
//! Hosts implement these; the pipeline never touches the platform directly.

use advpaste_core::{ClipboardItem, PasteError};
use async_trait::async_trait;
use serde::Serialize;
use tokio::sync::watch;

/// Clipboard access
#[async_trait]
pub trait ClipboardSource: Send + Sync {
    /// Current clipboard contents as plain text
    async fn read_text(&self) -> Result<String, PasteError>;

    /// Every item currently on the clipboard, possibly none
    async fn read_items(&self) -> Result<Vec<ClipboardItem>, PasteError>;
}

/// The editor a command was invoked in
pub trait Editor: Send {
    fn replace_selection(&mut self, text: &str);
}

/// Transient, non-blocking user-visible messages
pub trait Notifier: Send + Sync {
    fn notice(&self, message: &str);
}

/// A child of a vault folder
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VaultEntry {
    /// Vault-relative path
    pub path: String,
    /// File or folder name
    pub name: String,
    pub is_folder: bool,
}

/// Filesystem abstraction scoped to the user's vault
#[async_trait]
pub trait Vault: Send + Sync {
    /// Direct children of `path`, or `None` when it is missing or not a folder
    async fn list_folder(&self, path: &str) -> Result<Option<Vec<VaultEntry>>, PasteError>;

    async fn read(&self, path: &str) -> Result<String, PasteError>;

    /// Store `data` as a new attachment, returning the vault path it was written to
    async fn save_attachment(&self, name: &str, ext: &str, data: &[u8]) -> Result<String, PasteError>;
}

/// Opaque key-value persistence owned by the host
#[async_trait]
pub trait SettingsStore: Send + Sync {
    /// Previously saved data, `None` on first run
    async fn load_data(&self) -> Result<Option<serde_json::Value>, PasteError>;

    async fn save_data(&self, data: &serde_json::Value) -> Result<(), PasteError>;
}

/// Fires the layout-ready signal
#[derive(Debug)]
pub struct LayoutReadyTrigger {
    tx: watch::Sender<bool>,
}

/// One-shot signal that the host workspace is fully initialized
#[derive(Debug, Clone)]
pub struct LayoutReady {
    rx: watch::Receiver<bool>,
}

pub fn layout_ready() -> (LayoutReadyTrigger, LayoutReady) {
    let (tx, rx) = watch::channel(false);
    (LayoutReadyTrigger { tx }, LayoutReady { rx })
}

impl LayoutReadyTrigger {
    pub fn signal(&self) {
        self.tx.send_replace(true);
    }
}

impl LayoutReady {
    /// Already-fired signal, for hosts that are ready at activation
    pub fn ready() -> Self {
        let (_, rx) = watch::channel(true);
        Self { rx }
    }

    pub fn is_ready(&self) -> bool {
        *self.rx.borrow()
    }

    /// Wait for the signal. Returns `false` if the trigger was dropped without firing.
    pub async fn wait(mut self) -> bool {
        self.rx.wait_for(|ready| *ready).await.is_ok()
    }
}
