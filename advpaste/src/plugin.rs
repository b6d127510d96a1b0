//! Plugin lifecycle

use crate::executor::{execute_paste, PasteOutcome};
use crate::registrar::{CommandInfo, CommandRegistry};
use crate::settings::{Settings, SettingsTab};
use advpaste_core::{PasteError, Result};
use advpaste_plugin::{
    ClipboardSource, Editor, LayoutReady, Notifier, SettingsStore, Transform, TransformUtils, Vault,
};
use advpaste_script::ScriptLoader;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

/// The host services a plugin instance runs against
#[derive(Clone)]
pub struct PluginHost {
    pub clipboard: Arc<dyn ClipboardSource>,
    pub vault: Arc<dyn Vault>,
    pub notifier: Arc<dyn Notifier>,
    pub store: Arc<dyn SettingsStore>,
}

/// An activated Advanced Paste plugin
pub struct AdvancedPaste {
    host: PluginHost,
    settings: Arc<RwLock<Settings>>,
    commands: Arc<CommandRegistry>,
    utils: TransformUtils,
    script_load: Mutex<Option<JoinHandle<usize>>>,
}

impl AdvancedPaste {
    /// Activate: load settings, register the built-in commands and schedule
    /// script loading for when `layout` fires.
    ///
    /// Returns without waiting for scripts; their commands appear once the
    /// layout is ready and loading finishes.
    pub async fn on_load(host: PluginHost, layout: LayoutReady) -> Result<Self> {
        info!("Loading Advanced Paste");
        let settings = Settings::load(host.store.as_ref()).await?;

        let commands = Arc::new(CommandRegistry::new());
        let builtins = commands.register_all(&advpaste_text::builtin_registry()).await;
        info!(count = builtins, "built-in transforms registered");

        let loader = ScriptLoader::new(host.vault.clone(), host.notifier.clone());
        let folder = settings.script_folder_path.clone();
        let task = tokio::spawn(load_scripts(loader, folder, layout, commands.clone()));

        Ok(Self {
            utils: TransformUtils::new(host.vault.clone()),
            host,
            settings: Arc::new(RwLock::new(settings)),
            commands,
            script_load: Mutex::new(Some(task)),
        })
    }

    pub fn on_unload(&self) {
        info!("Unloading Advanced Paste");
    }

    /// Wait for the deferred script load and return how many script
    /// transforms it registered. Later calls return 0.
    pub async fn scripts_loaded(&self) -> usize {
        let Some(task) = self.script_load.lock().await.take() else {
            return 0;
        };
        match task.await {
            Ok(count) => count,
            Err(e) => {
                error!(error = %e, "script loading task failed");
                0
            }
        }
    }

    /// Invoke the command `id` against the current clipboard
    pub async fn execute(&self, id: &str, editor: &mut dyn Editor) -> Result<PasteOutcome> {
        let command = self
            .commands
            .get(id)
            .await
            .ok_or_else(|| PasteError::UnknownCommand(id.to_string()))?;
        let transform: &dyn Transform = command.transform.as_ref();

        execute_paste(
            transform,
            self.host.clipboard.as_ref(),
            editor,
            self.host.notifier.as_ref(),
            &self.utils,
        )
        .await
    }

    pub fn commands(&self) -> &CommandRegistry {
        &self.commands
    }

    pub async fn list_commands(&self) -> Vec<CommandInfo> {
        self.commands.list().await
    }

    pub fn settings_tab(&self) -> SettingsTab {
        SettingsTab::new(self.settings.clone(), self.host.store.clone())
    }

    pub async fn settings(&self) -> Settings {
        self.settings.read().await.clone()
    }
}

async fn load_scripts(
    loader: ScriptLoader,
    folder: String,
    layout: LayoutReady,
    commands: Arc<CommandRegistry>,
) -> usize {
    if !layout.wait().await {
        warn!("host went away before the layout was ready, scripts not loaded");
        return 0;
    }

    let transforms = loader.load(&folder).await;
    let count = transforms.len();
    for transform in transforms {
        let id = transform.id();
        let name = transform.display_name();
        commands
            .register_transform(&id, Arc::new(transform), Some(&name))
            .await;
    }
    info!(folder = %folder, count, "script transforms registered");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MemoryStore, MemoryVault, Notices, RecordingEditor, StaticClipboard};
    use advpaste_plugin::layout_ready;
    use serde_json::json;

    struct Fixture {
        host: PluginHost,
        notices: Arc<Notices>,
    }

    fn fixture(clipboard: StaticClipboard, vault: MemoryVault, store: MemoryStore) -> Fixture {
        let notices = Arc::new(Notices::default());
        Fixture {
            host: PluginHost {
                clipboard: Arc::new(clipboard),
                vault: Arc::new(vault),
                notifier: notices.clone(),
                store: Arc::new(store),
            },
            notices,
        }
    }

    #[tokio::test]
    async fn test_builtins_registered_on_load() {
        let f = fixture(StaticClipboard::text(""), MemoryVault::default(), MemoryStore::default());
        let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
        assert_eq!(plugin.scripts_loaded().await, 0);

        let ids: Vec<String> = plugin.list_commands().await.into_iter().map(|c| c.id).collect();
        assert_eq!(ids, vec!["default", "joinLines", "rawHTML", "removeBlankLines", "smartJoin"]);
        assert_eq!(plugin.settings().await.script_folder_path, "advpaste");
    }

    #[tokio::test]
    async fn test_scripts_wait_for_layout() {
        let vault = MemoryVault::default().with_file("advpaste/foo.rhai", "fn foo(text) { text }");
        let f = fixture(StaticClipboard::text(""), vault, MemoryStore::default());
        let (trigger, layout) = layout_ready();

        let plugin = AdvancedPaste::on_load(f.host, layout).await.unwrap();
        tokio::task::yield_now().await;
        assert!(plugin.commands().get("custom-foo").await.is_none());

        trigger.signal();
        assert_eq!(plugin.scripts_loaded().await, 1);
        let command = plugin.commands().get("custom-foo").await.unwrap();
        assert_eq!(command.name, "Foo");
    }

    #[tokio::test]
    async fn test_dropped_layout_trigger_skips_scripts() {
        let vault = MemoryVault::default().with_file("advpaste/foo.rhai", "fn foo(text) { text }");
        let f = fixture(StaticClipboard::text(""), vault, MemoryStore::default());
        let (trigger, layout) = layout_ready();

        let plugin = AdvancedPaste::on_load(f.host, layout).await.unwrap();
        drop(trigger);
        assert_eq!(plugin.scripts_loaded().await, 0);
        assert_eq!(plugin.commands().len().await, 5);
    }

    #[tokio::test]
    async fn test_script_folder_from_settings() {
        let vault = MemoryVault::default()
            .with_file("advpaste/ignored.rhai", "fn ignored(text) { text }")
            .with_file("paste/myCoolTransform.rhai", "fn myCoolTransform(text) { text }")
            .with_file("paste/broken.rhai", "fn broken(text) { ")
            .with_file("paste/shout.rhai", "fn shout(text) { text.to_upper() }");
        let store = MemoryStore::with(json!({ "scriptDir": "paste" }));
        let f = fixture(StaticClipboard::text("hi"), vault, store);

        let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
        assert_eq!(plugin.scripts_loaded().await, 2);

        let cool = plugin.commands().get("custom-myCoolTransform").await.unwrap();
        assert_eq!(cool.name, "My Cool Transform");
        assert!(plugin.commands().get("custom-ignored").await.is_none());

        let notices = f.notices.all();
        assert_eq!(notices.len(), 1);
        assert_eq!(
            notices[0],
            "Advanced Paste failed to load script: broken.rhai\nPlease check your script!"
        );
    }

    #[tokio::test]
    async fn test_bad_saved_script_dir_still_activates() {
        for saved in [json!({ "scriptDir": null }), json!({ "scriptDir": 42 })] {
            let vault = MemoryVault::default().with_file("advpaste/foo.rhai", "fn foo(text) { text }");
            let f = fixture(StaticClipboard::text(""), vault, MemoryStore::with(saved));

            let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
            assert_eq!(plugin.settings().await.script_folder_path, "advpaste");
            assert_eq!(plugin.scripts_loaded().await, 1);
            assert_eq!(plugin.commands().len().await, 6);
        }
    }

    #[tokio::test]
    async fn test_bad_saved_settings_register_builtins() {
        for saved in [json!({ "scriptDir": null }), json!({ "scriptDir": 42 })] {
            let f = fixture(StaticClipboard::text(""), MemoryVault::default(), MemoryStore::with(saved));
            let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
            assert_eq!(plugin.commands().len().await, 5);
        }
    }

    #[tokio::test]
    async fn test_execute_script_command() {
        let vault = MemoryVault::default()
            .with_file("advpaste/greet.rhai", "fn greet(text) { \"hello\" }\nfn shout(text) { text.to_upper() }");
        let f = fixture(StaticClipboard::text("quiet"), vault, MemoryStore::default());
        let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
        plugin.scripts_loaded().await;

        let mut editor = RecordingEditor::default();
        let outcome = plugin.execute("custom-greet", &mut editor).await.unwrap();
        assert_eq!(outcome, PasteOutcome::Inserted);
        plugin.execute("custom-shout", &mut editor).await.unwrap();
        assert_eq!(editor.edits, vec!["hello", "QUIET"]);
    }

    #[tokio::test]
    async fn test_execute_builtin_command() {
        let clipboard = StaticClipboard::text("one\n\n  \ntwo");
        let f = fixture(clipboard, MemoryVault::default(), MemoryStore::default());
        let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();

        let mut editor = RecordingEditor::default();
        plugin.execute("removeBlankLines", &mut editor).await.unwrap();
        assert_eq!(editor.edits, vec!["one\ntwo"]);
    }

    #[tokio::test]
    async fn test_execute_unknown_command() {
        let f = fixture(StaticClipboard::text(""), MemoryVault::default(), MemoryStore::default());
        let plugin = AdvancedPaste::on_load(f.host, LayoutReady::ready()).await.unwrap();
        let mut editor = RecordingEditor::default();
        let err = plugin.execute("custom-missing", &mut editor).await.unwrap_err();
        assert!(matches!(err, PasteError::UnknownCommand(ref id) if id == "custom-missing"));
    }

    #[tokio::test]
    async fn test_settings_change_persists_but_waits_for_reload() {
        let vault = MemoryVault::default().with_file("other/foo.rhai", "fn foo(text) { text }");
        let store = Arc::new(MemoryStore::default());
        let notices = Arc::new(Notices::default());
        let host = PluginHost {
            clipboard: Arc::new(StaticClipboard::text("")),
            vault: Arc::new(vault),
            notifier: notices,
            store: store.clone(),
        };
        let plugin = AdvancedPaste::on_load(host.clone(), LayoutReady::ready()).await.unwrap();
        assert_eq!(plugin.scripts_loaded().await, 0);

        plugin.settings_tab().set_script_dir("other").await.unwrap();
        assert_eq!(store.saved(), Some(json!({ "scriptDir": "other" })));
        assert!(plugin.commands().get("custom-foo").await.is_none());
        plugin.on_unload();

        let reloaded = AdvancedPaste::on_load(host, LayoutReady::ready()).await.unwrap();
        assert_eq!(reloaded.scripts_loaded().await, 1);
        assert!(reloaded.commands().get("custom-foo").await.is_some());
    }
}
