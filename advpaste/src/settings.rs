//! Plugin settings and the settings view

use advpaste_core::Result;
use advpaste_plugin::SettingsStore;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

pub const DEFAULT_SCRIPT_DIR: &str = "advpaste";

pub const UNTRUSTED_SCRIPTS_WARNING: &str =
    "Never add untrusted scripts to the script directory BECAUSE IT MIGHT DESTROY YOUR VAULT OR WORSE!";
pub const RELOAD_WARNING: &str =
    "You need to disable and re-enable this plugin in order to apply the changes to the script directory";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Vault folder scanned for script transforms
    #[serde(rename = "scriptDir")]
    pub script_folder_path: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            script_folder_path: DEFAULT_SCRIPT_DIR.to_string(),
        }
    }
}

impl Settings {
    /// Saved data merged over the defaults. Keys the plugin does not know are
    /// ignored; a saved value of the wrong type keeps the default.
    pub async fn load(store: &dyn SettingsStore) -> Result<Self> {
        let mut settings = Settings::default();
        let mut merged = serde_json::to_value(&settings)?;

        match store.load_data().await? {
            Some(Value::Object(saved)) => {
                for (key, value) in saved {
                    let mut candidate = merged.clone();
                    if let Value::Object(target) = &mut candidate {
                        target.insert(key.clone(), value);
                    }
                    match serde_json::from_value::<Settings>(candidate.clone()) {
                        Ok(parsed) => {
                            settings = parsed;
                            merged = candidate;
                        }
                        Err(e) => warn!(key = %key, error = %e, "ignoring saved setting, keeping default"),
                    }
                }
            }
            Some(other) => warn!(data = %other, "saved settings are not an object, using defaults"),
            None => {}
        }

        debug!(script_dir = %settings.script_folder_path, "settings loaded");
        Ok(settings)
    }

    pub async fn save(&self, store: &dyn SettingsStore) -> Result<()> {
        store.save_data(&serde_json::to_value(self)?).await
    }
}

/// A text input on the settings page
#[derive(Debug, Clone, Serialize)]
pub struct SettingField {
    pub key: &'static str,
    pub name: &'static str,
    pub description: &'static str,
    pub placeholder: &'static str,
    pub value: String,
}

/// What the settings page shows
#[derive(Debug, Clone, Serialize)]
pub struct SettingsView {
    pub warnings: Vec<&'static str>,
    pub fields: Vec<SettingField>,
}

/// Settings page: renders the current values and persists every change
#[derive(Clone)]
pub struct SettingsTab {
    settings: Arc<RwLock<Settings>>,
    store: Arc<dyn SettingsStore>,
}

impl SettingsTab {
    pub fn new(settings: Arc<RwLock<Settings>>, store: Arc<dyn SettingsStore>) -> Self {
        Self { settings, store }
    }

    pub async fn display(&self) -> SettingsView {
        let settings = self.settings.read().await;
        SettingsView {
            warnings: vec![UNTRUSTED_SCRIPTS_WARNING, RELOAD_WARNING],
            fields: vec![SettingField {
                key: "scriptDir",
                name: "Script Directory",
                description: "Directory for custom transforms.",
                placeholder: DEFAULT_SCRIPT_DIR,
                value: settings.script_folder_path.clone(),
            }],
        }
    }

    /// Takes effect for script loading on the next activation.
    /// The value is stored as given.
    pub async fn set_script_dir(&self, value: &str) -> Result<Settings> {
        let mut settings = self.settings.write().await;
        settings.script_folder_path = value.to_string();
        settings.save(self.store.as_ref()).await?;
        info!(script_dir = value, "script directory changed");
        Ok(settings.clone())
    }

    pub async fn current(&self) -> Settings {
        self.settings.read().await.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryStore;
    use serde_json::json;

    #[tokio::test]
    async fn test_defaults_on_first_run() {
        let store = MemoryStore::default();
        let settings = Settings::load(&store).await.unwrap();
        assert_eq!(settings.script_folder_path, "advpaste");
    }

    #[tokio::test]
    async fn test_saved_values_merge_over_defaults() {
        let store = MemoryStore::with(json!({ "scriptDir": "scripts/paste", "legacy": true }));
        let settings = Settings::load(&store).await.unwrap();
        assert_eq!(settings.script_folder_path, "scripts/paste");

        let store = MemoryStore::with(json!({ "other": 1 }));
        assert_eq!(Settings::load(&store).await.unwrap(), Settings::default());

        let store = MemoryStore::with(json!("not an object"));
        assert_eq!(Settings::load(&store).await.unwrap(), Settings::default());
    }

    #[tokio::test]
    async fn test_wrongly_typed_value_keeps_default() {
        for saved in [json!({ "scriptDir": 42 }), json!({ "scriptDir": null }), json!({ "scriptDir": ["a"] })] {
            let store = MemoryStore::with(saved);
            assert_eq!(Settings::load(&store).await.unwrap(), Settings::default());
        }
    }

    #[tokio::test]
    async fn test_change_is_saved_immediately() {
        let store = Arc::new(MemoryStore::default());
        let tab = SettingsTab::new(Arc::new(RwLock::new(Settings::default())), store.clone());

        tab.set_script_dir("my scripts").await.unwrap();
        assert_eq!(store.saved(), Some(json!({ "scriptDir": "my scripts" })));
        assert_eq!(tab.current().await.script_folder_path, "my scripts");

        // no validation
        tab.set_script_dir("").await.unwrap();
        assert_eq!(store.saved(), Some(json!({ "scriptDir": "" })));
    }

    #[tokio::test]
    async fn test_view() {
        let store = Arc::new(MemoryStore::default());
        let tab = SettingsTab::new(Arc::new(RwLock::new(Settings::default())), store);
        let view = tab.display().await;

        assert_eq!(view.warnings.len(), 2);
        assert!(view.warnings[0].starts_with("Never add untrusted scripts"));
        assert!(view.warnings[1].contains("disable and re-enable"));

        let field = &view.fields[0];
        assert_eq!(field.name, "Script Directory");
        assert_eq!(field.description, "Directory for custom transforms.");
        assert_eq!(field.placeholder, "advpaste");
        assert_eq!(field.value, "advpaste");
    }
}
