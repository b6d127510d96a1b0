//! Script functions as transforms

use crate::api::{ScriptItem, ScriptUtils};
use crate::CUSTOM_PREFIX;
use advpaste_core::{start_case, PasteError, TransformInput, TransformKind, TransformResult};
use advpaste_plugin::{Transform, TransformMeta, TransformSource, TransformUtils};
use async_trait::async_trait;
use rhai::{CallFnOptions, Dynamic, Engine, Map, Scope, AST};
use std::sync::Arc;
use tokio::runtime::Handle;
use tracing::debug;

/// An evaluated script file
pub struct ScriptModule {
    pub(crate) file: String,
    pub(crate) engine: Arc<Engine>,
    pub(crate) ast: AST,
    /// Top-level state after evaluation, cloned into every call
    pub(crate) scope: Scope<'static>,
}

/// Convert what a script function returned into a `TransformResult`.
///
/// A string is a success. `ok(v)` / `err(v)` maps (`#{kind, value}`) carry
/// their value; an `err` without a value and every other shape become the
/// generic failure.
pub fn coerce_result(value: Dynamic) -> TransformResult {
    if value.is_string() {
        return value
            .into_string()
            .map(TransformResult::Ok)
            .unwrap_or_else(|_| TransformResult::failed());
    }

    let Some(map) = value.try_cast::<Map>() else {
        return TransformResult::failed();
    };
    let kind = map.get("kind").and_then(|k| k.clone().into_string().ok());
    let payload = map.get("value").filter(|v| !v.is_unit());

    match (kind.as_deref(), payload) {
        (Some("ok"), Some(v)) => TransformResult::Ok(v.to_string()),
        (Some("err"), Some(v)) => TransformResult::Err(v.to_string()),
        _ => TransformResult::failed(),
    }
}

/// One public function of a script module
pub struct ScriptTransform {
    module: Arc<ScriptModule>,
    function: String,
    arity: usize,
    kind_tag: Option<String>,
}

impl ScriptTransform {
    pub(crate) fn new(
        module: Arc<ScriptModule>,
        function: &str,
        arity: usize,
        kind_tag: Option<String>,
    ) -> Self {
        Self {
            module,
            function: function.to_string(),
            arity,
            kind_tag,
        }
    }

    /// Name of the script function
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Command id: the function name under the custom prefix
    pub fn id(&self) -> String {
        format!("{}{}", CUSTOM_PREFIX, self.function)
    }

    /// Display name derived from the function name, not the prefixed id
    pub fn display_name(&self) -> String {
        start_case(&self.function)
    }

    pub fn file(&self) -> &str {
        &self.module.file
    }
}

#[async_trait]
impl Transform for ScriptTransform {
    fn meta(&self) -> TransformMeta {
        TransformMeta {
            id: self.id(),
            description: format!("{}() from {}", self.function, self.module.file),
            source: TransformSource::Script(self.module.file.clone()),
            example: None,
        }
    }

    fn kind(&self) -> Result<TransformKind, PasteError> {
        match &self.kind_tag {
            Some(tag) => tag.parse(),
            None => Ok(TransformKind::Text),
        }
    }

    async fn transform(
        &self,
        input: TransformInput,
        utils: &TransformUtils,
    ) -> Result<TransformResult, PasteError> {
        let module = self.module.clone();
        let function = self.function.clone();
        let arity = self.arity;
        let script_utils = ScriptUtils::new(utils.clone(), Handle::current());

        debug!(file = %module.file, function = %function, "calling script transform");

        let value = tokio::task::spawn_blocking(move || {
            let options = CallFnOptions::new().eval_ast(false).rewind_scope(true);
            let mut scope = module.scope.clone();
            let engine = &module.engine;
            let ast = &module.ast;

            let called = match (input, arity) {
                (TransformInput::Text(text), 1) => {
                    engine.call_fn_with_options::<Dynamic>(options, &mut scope, ast, &function, (text,))
                }
                (TransformInput::Text(text), _) => engine.call_fn_with_options::<Dynamic>(
                    options,
                    &mut scope,
                    ast,
                    &function,
                    (text, script_utils),
                ),
                (TransformInput::Blob(item), 1) => engine.call_fn_with_options::<Dynamic>(
                    options,
                    &mut scope,
                    ast,
                    &function,
                    (ScriptItem(item),),
                ),
                (TransformInput::Blob(item), _) => engine.call_fn_with_options::<Dynamic>(
                    options,
                    &mut scope,
                    ast,
                    &function,
                    (ScriptItem(item), script_utils),
                ),
            };
            called.map_err(|e| PasteError::script(module.file.clone(), e.to_string()))
        })
        .await
        .map_err(|e| PasteError::transform(format!("script task failed: {}", e)))??;

        Ok(coerce_result(value))
    }
}
