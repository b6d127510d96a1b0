//! Host ports backed by the local machine

use advpaste_core::{ClipboardItem, PasteError};
use advpaste_plugin::{ClipboardSource, Editor, Notifier, SettingsStore, Vault, VaultEntry};
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;
use tracing::{debug, info};

// ============ Clipboard ============

/// The system clipboard, via arboard
pub struct SystemClipboard;

fn clipboard_error(e: arboard::Error) -> PasteError {
    PasteError::clipboard(e.to_string())
}

/// Missing content of one format is not an error
fn optional<T>(result: Result<T, arboard::Error>) -> Result<Option<T>, PasteError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(arboard::Error::ContentNotAvailable) => Ok(None),
        Err(e) => Err(clipboard_error(e)),
    }
}

/// RGBA pixels to PNG bytes
pub fn encode_png(width: usize, height: usize, rgba: &[u8]) -> Result<Vec<u8>, PasteError> {
    let png_error = |e: png::EncodingError| PasteError::clipboard(format!("PNG encoding failed: {}", e));
    let mut out = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut out, width as u32, height as u32);
        encoder.set_color(png::ColorType::Rgba);
        encoder.set_depth(png::BitDepth::Eight);
        let mut writer = encoder.write_header().map_err(png_error)?;
        writer.write_image_data(rgba).map_err(png_error)?;
        writer.finish().map_err(png_error)?;
    }
    Ok(out)
}

fn read_item() -> Result<ClipboardItem, PasteError> {
    let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
    let mut item = ClipboardItem::new();

    if let Some(html) = optional(clipboard.get().html())? {
        item.insert("text/html", html);
    }
    if let Some(text) = optional(clipboard.get_text())? {
        item.insert("text/plain", text);
    }
    if let Some(image) = optional(clipboard.get_image())? {
        let png = encode_png(image.width, image.height, &image.bytes)?;
        item.insert("image/png", png);
    }

    debug!(types = ?item.types(), "read clipboard item");
    Ok(item)
}

#[async_trait]
impl ClipboardSource for SystemClipboard {
    async fn read_text(&self) -> Result<String, PasteError> {
        tokio::task::spawn_blocking(|| -> Result<String, PasteError> {
            let mut clipboard = arboard::Clipboard::new().map_err(clipboard_error)?;
            Ok(optional(clipboard.get_text())?.unwrap_or_default())
        })
        .await
        .map_err(|e| PasteError::clipboard(e.to_string()))?
    }

    /// At most one item: the system clipboard holds one entry in several formats
    async fn read_items(&self) -> Result<Vec<ClipboardItem>, PasteError> {
        let item = tokio::task::spawn_blocking(read_item)
            .await
            .map_err(|e| PasteError::clipboard(e.to_string()))??;
        Ok(if item.is_empty() { Vec::new() } else { vec![item] })
    }
}

// ============ Vault ============

/// A vault directory on disk. Attachments go to the vault root.
pub struct FsVault {
    root: PathBuf,
}

impl FsVault {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Vault-relative path to a filesystem path; refuses to leave the vault
    fn resolve(&self, path: &str) -> Result<PathBuf, PasteError> {
        let relative = Path::new(path.trim_start_matches('/'));
        if relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_) | Component::CurDir))
        {
            return Err(PasteError::vault(format!("path escapes the vault: {}", path)));
        }
        Ok(self.root.join(relative))
    }

    /// `name.ext`, or `name 1.ext`, `name 2.ext`, ... if taken
    async fn available_name(&self, name: &str, ext: &str) -> Result<String, PasteError> {
        let mut candidate = format!("{}.{}", name, ext);
        let mut n = 0;
        while tokio::fs::try_exists(self.resolve(&candidate)?).await? {
            n += 1;
            candidate = format!("{} {}.{}", name, n, ext);
        }
        Ok(candidate)
    }
}

#[async_trait]
impl Vault for FsVault {
    async fn list_folder(&self, path: &str) -> Result<Option<Vec<VaultEntry>>, PasteError> {
        let dir = self.resolve(path)?;
        match tokio::fs::metadata(&dir).await {
            Ok(meta) if meta.is_dir() => {}
            Ok(_) => return Ok(None),
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        }

        let prefix = path.trim_matches('/');
        let mut entries = Vec::new();
        let mut reader = tokio::fs::read_dir(&dir).await?;
        while let Some(entry) = reader.next_entry().await? {
            let name = entry.file_name().to_string_lossy().to_string();
            let is_folder = entry.file_type().await?.is_dir();
            let path = if prefix.is_empty() {
                name.clone()
            } else {
                format!("{}/{}", prefix, name)
            };
            entries.push(VaultEntry { path, name, is_folder });
        }
        Ok(Some(entries))
    }

    async fn read(&self, path: &str) -> Result<String, PasteError> {
        Ok(tokio::fs::read_to_string(self.resolve(path)?).await?)
    }

    async fn save_attachment(&self, name: &str, ext: &str, data: &[u8]) -> Result<String, PasteError> {
        if name.contains('/') || ext.contains('/') {
            return Err(PasteError::vault(format!("invalid attachment name: {}.{}", name, ext)));
        }
        let file = self.available_name(name, ext).await?;
        tokio::fs::write(self.resolve(&file)?, data).await?;
        info!(file = %file, bytes = data.len(), "attachment saved");
        Ok(file)
    }
}

// ============ Settings store ============

/// Plugin data as a JSON file
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl SettingsStore for JsonFileStore {
    async fn load_data(&self) -> Result<Option<serde_json::Value>, PasteError> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(serde_json::from_str(&content)?)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn save_data(&self, data: &serde_json::Value) -> Result<(), PasteError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&self.path, serde_json::to_string_pretty(data)?).await?;
        debug!(path = %self.path.display(), "settings saved");
        Ok(())
    }
}

// ============ Editor & notices ============

/// Stands in for the client's editor during one command
#[derive(Debug, Default)]
pub struct BufferEditor {
    pub selection: String,
    /// Set once the selection was replaced
    pub replaced: Option<String>,
}

impl BufferEditor {
    pub fn new(selection: impl Into<String>) -> Self {
        Self {
            selection: selection.into(),
            replaced: None,
        }
    }
}

impl Editor for BufferEditor {
    fn replace_selection(&mut self, text: &str) {
        self.selection = text.to_string();
        self.replaced = Some(text.to_string());
    }
}

/// Logs notices and keeps them until the next response picks them up
#[derive(Default)]
pub struct CollectingNotifier {
    pending: Mutex<Vec<String>>,
}

impl CollectingNotifier {
    pub fn drain(&self) -> Vec<String> {
        std::mem::take(&mut *self.pending.lock().unwrap_or_else(|e| e.into_inner()))
    }
}

impl Notifier for CollectingNotifier {
    fn notice(&self, message: &str) {
        info!(notice = message, "notice");
        self.pending
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}
