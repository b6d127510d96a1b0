//! Command table
//!
//! One command per transform. The table is shared between the host (listing
//! and invoking commands) and the deferred script load (registering).

use advpaste_core::start_case;
use advpaste_plugin::{rank_similar, summarize, Transform, TransformRegistry, TransformSource};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, warn};

/// A user-invocable action bound to one transform
#[derive(Clone)]
pub struct Command {
    pub id: String,
    pub name: String,
    pub transform: Arc<dyn Transform>,
}

/// Listing entry for a command
#[derive(Debug, Clone, Serialize)]
pub struct CommandInfo {
    pub id: String,
    pub name: String,
    pub kind: String,
    pub description: String,
    pub source: TransformSource,
}

impl Command {
    pub fn info(&self) -> CommandInfo {
        let summary = summarize(self.transform.as_ref());
        CommandInfo {
            id: self.id.clone(),
            name: self.name.clone(),
            kind: summary.kind,
            description: summary.meta.description,
            source: summary.meta.source,
        }
    }
}

#[derive(Default)]
pub struct CommandRegistry {
    commands: RwLock<BTreeMap<String, Command>>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a command for `transform` and return its display name.
    ///
    /// The name defaults to the start-cased id. Registering an id again
    /// replaces the earlier command.
    pub async fn register_transform(
        &self,
        id: &str,
        transform: Arc<dyn Transform>,
        display_name: Option<&str>,
    ) -> String {
        let name = display_name.map(str::to_string).unwrap_or_else(|| start_case(id));
        let command = Command {
            id: id.to_string(),
            name: name.clone(),
            transform,
        };

        let mut commands = self.commands.write().await;
        if let Some(previous) = commands.insert(id.to_string(), command) {
            warn!(id, previous = %previous.name, name = %name, "command id registered twice, replacing");
        } else {
            debug!(id, name = %name, "command registered");
        }
        name
    }

    /// Register every transform of `registry` under its own id
    pub async fn register_all(&self, registry: &TransformRegistry) -> usize {
        for (id, transform) in registry.iter() {
            self.register_transform(id, transform.clone(), None).await;
        }
        registry.len()
    }

    pub async fn get(&self, id: &str) -> Option<Command> {
        self.commands.read().await.get(id).cloned()
    }

    pub async fn list(&self) -> Vec<CommandInfo> {
        self.commands.read().await.values().map(Command::info).collect()
    }

    pub async fn len(&self) -> usize {
        self.commands.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.commands.read().await.is_empty()
    }

    /// Registered ids resembling `id`
    pub async fn suggest(&self, id: &str) -> Vec<String> {
        let commands = self.commands.read().await;
        rank_similar(id, commands.keys().map(String::as_str))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::Fixed;
    use advpaste_core::{TransformKind, TransformResult};

    #[tokio::test]
    async fn test_default_display_name() {
        let registry = CommandRegistry::new();
        let name = registry
            .register_transform("removeBlankLines", Arc::new(Fixed::text("removeBlankLines", "")), None)
            .await;
        assert_eq!(name, "Remove Blank Lines");
        assert_eq!(registry.get("removeBlankLines").await.unwrap().name, "Remove Blank Lines");
    }

    #[tokio::test]
    async fn test_explicit_display_name() {
        let registry = CommandRegistry::new();
        let name = registry
            .register_transform(
                "custom-myCoolTransform",
                Arc::new(Fixed::text("custom-myCoolTransform", "")),
                Some("My Cool Transform"),
            )
            .await;
        assert_eq!(name, "My Cool Transform");
    }

    #[tokio::test]
    async fn test_last_registration_wins() {
        let registry = CommandRegistry::new();
        registry
            .register_transform("dup", Arc::new(Fixed::text("dup", "first")), None)
            .await;
        registry
            .register_transform("dup", Arc::new(Fixed::new("dup", TransformKind::Blob, TransformResult::ok("second"))), Some("Second"))
            .await;

        assert_eq!(registry.len().await, 1);
        let command = registry.get("dup").await.unwrap();
        assert_eq!(command.name, "Second");
        assert_eq!(command.transform.kind().unwrap(), TransformKind::Blob);
    }

    #[tokio::test]
    async fn test_list_and_suggest() {
        let registry = CommandRegistry::new();
        let count = registry.register_all(&advpaste_text::builtin_registry()).await;
        assert_eq!(count, 5);

        let list = registry.list().await;
        let raw = list.iter().find(|c| c.id == "rawHTML").unwrap();
        assert_eq!(raw.name, "Raw HTML");
        assert_eq!(raw.kind, "blob");
        assert_eq!(raw.source, TransformSource::Builtin);

        assert!(registry.get("nope").await.is_none());
        assert_eq!(registry.suggest("smart").await.first().map(String::as_str), Some("smartJoin"));
    }
}
