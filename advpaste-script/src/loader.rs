//! Script discovery and evaluation

use crate::api::build_engine;
use crate::transform::{ScriptModule, ScriptTransform};
use crate::{KINDS_CONSTANT, SCRIPT_EXTENSION};
use advpaste_core::PasteError;
use advpaste_plugin::{Notifier, Vault, VaultEntry};
use rhai::{Engine, FnAccess, Map, Scope};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

/// Loads transforms from `.rhai` files in a vault folder.
///
/// Scripts are trusted code: whatever a script does with the capabilities
/// it is given (writing attachments into the vault, running unbounded
/// loops) happens with the user's full authority. Only point the loader at
/// folders holding scripts the user wrote or reviewed.
pub struct ScriptLoader {
    vault: Arc<dyn Vault>,
    notifier: Arc<dyn Notifier>,
    engine: Arc<Engine>,
}

impl ScriptLoader {
    pub fn new(vault: Arc<dyn Vault>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            vault,
            notifier,
            engine: Arc::new(build_engine()),
        }
    }

    /// Evaluate every script directly inside `folder` and collect their transforms.
    ///
    /// A missing folder yields nothing. A script that fails to read or
    /// evaluate is reported with a notice and skipped; the rest still load.
    pub async fn load(&self, folder: &str) -> Vec<ScriptTransform> {
        let entries = match self.vault.list_folder(folder).await {
            Ok(Some(entries)) => entries,
            Ok(None) => {
                debug!(folder, "script folder not found, skipping");
                return Vec::new();
            }
            Err(e) => {
                error!(folder, error = %e, "failed to list script folder");
                return Vec::new();
            }
        };

        let mut scripts: Vec<VaultEntry> = entries
            .into_iter()
            .filter(|e| !e.is_folder && e.name.ends_with(SCRIPT_EXTENSION))
            .collect();
        scripts.sort_by(|a, b| a.name.cmp(&b.name));

        let mut transforms = Vec::new();
        for entry in scripts {
            info!("Advanced Paste: Loading script {}", entry.name);
            match self.load_file(&entry).await {
                Ok(mut loaded) => transforms.append(&mut loaded),
                Err(e) => {
                    error!(file = %entry.name, error = %e, "Advanced Paste Script Error");
                    self.notifier.notice(&format!(
                        "Advanced Paste failed to load script: {}\nPlease check your script!",
                        entry.name
                    ));
                }
            }
        }
        transforms
    }

    async fn load_file(&self, entry: &VaultEntry) -> Result<Vec<ScriptTransform>, PasteError> {
        let source = self.vault.read(&entry.path).await?;
        let module = self.evaluate(&entry.name, &source)?;
        Ok(exported_transforms(Arc::new(module)))
    }

    /// Compile and run the top level of a script
    fn evaluate(&self, file: &str, source: &str) -> Result<ScriptModule, PasteError> {
        let ast = self
            .engine
            .compile(source)
            .map_err(|e| PasteError::script(file, e.to_string()))?;
        let mut scope = Scope::new();
        self.engine
            .run_ast_with_scope(&mut scope, &ast)
            .map_err(|e| PasteError::script(file, e.to_string()))?;

        Ok(ScriptModule {
            file: file.to_string(),
            engine: self.engine.clone(),
            ast,
            scope,
        })
    }
}

/// Public one- or two-parameter functions of a module, tagged with their declared kind
fn exported_transforms(module: Arc<ScriptModule>) -> Vec<ScriptTransform> {
    let kinds: Map = module
        .scope
        .get_value::<Map>(KINDS_CONSTANT)
        .unwrap_or_default();

    let mut functions: BTreeMap<String, usize> = BTreeMap::new();
    for f in module.ast.iter_functions() {
        if f.access == FnAccess::Private {
            continue;
        }
        let arity = f.params.len();
        if !(1..=2).contains(&arity) {
            debug!(file = %module.file, function = f.name, arity, "skipping function: not a transform signature");
            continue;
        }
        functions
            .entry(f.name.to_string())
            .and_modify(|a| *a = (*a).min(arity))
            .or_insert(arity);
    }

    for name in kinds.keys() {
        if !functions.contains_key(name.as_str()) {
            warn!(file = %module.file, function = %name, "{} names an unknown function", KINDS_CONSTANT);
        }
    }

    functions
        .into_iter()
        .map(|(name, arity)| {
            let kind_tag = kinds.get(name.as_str()).map(|tag| tag.to_string());
            ScriptTransform::new(module.clone(), &name, arity, kind_tag)
        })
        .collect()
}
