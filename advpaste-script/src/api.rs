//! What scripts can call
//!
//! The engine exposes `ok(value)` / `err(value)` result helpers, a
//! `ClipboardItem` type for blob transforms and a `Utils` type handed to
//! two-parameter transforms. Nothing else from the host is reachable.

use advpaste_core::ClipboardItem;
use advpaste_plugin::TransformUtils;
use rhai::{Array, Blob, Dynamic, Engine, EvalAltResult, Map};
use tokio::runtime::Handle;

/// `Utils` as seen from a script
#[derive(Clone)]
pub struct ScriptUtils {
    utils: TransformUtils,
    handle: Handle,
}

impl ScriptUtils {
    /// `handle` drives async host calls; scripts must run off the runtime's worker threads
    pub fn new(utils: TransformUtils, handle: Handle) -> Self {
        Self { utils, handle }
    }
}

/// `ClipboardItem` as seen from a script
#[derive(Clone)]
pub struct ScriptItem(pub ClipboardItem);

fn result_map(kind: &str, value: Dynamic) -> Map {
    let mut map = Map::new();
    map.insert("kind".into(), Dynamic::from(kind.to_string()));
    map.insert("value".into(), value);
    map
}

fn optional(value: Option<String>) -> Dynamic {
    value.map(Dynamic::from).unwrap_or(Dynamic::UNIT)
}

pub fn build_engine() -> Engine {
    let mut engine = Engine::new();

    engine
        .register_fn("ok", |value: Dynamic| result_map("ok", value))
        .register_fn("err", |value: Dynamic| result_map("err", value));

    engine
        .register_type_with_name::<ScriptItem>("ClipboardItem")
        .register_fn("types", |item: &mut ScriptItem| -> Array {
            item.0.types().into_iter().map(|t| Dynamic::from(t.to_string())).collect()
        })
        .register_fn("has", |item: &mut ScriptItem, mime: &str| item.0.has_type(mime))
        .register_fn("get", |item: &mut ScriptItem, mime: &str| -> Dynamic {
            match item.0.get_type(mime) {
                Some(bytes) => Dynamic::from_blob(bytes.to_vec()),
                None => Dynamic::UNIT,
            }
        })
        .register_fn("text", |item: &mut ScriptItem, mime: &str| optional(item.0.get_text(mime)));

    engine
        .register_type_with_name::<ScriptUtils>("Utils")
        .register_fn(
            "html_to_markdown",
            |u: &mut ScriptUtils, html: &str| -> Result<String, Box<EvalAltResult>> {
                u.utils.html_to_markdown(html).map_err(|e| e.to_string().into())
            },
        )
        .register_fn("mime_extension", |u: &mut ScriptUtils, mime: &str| {
            optional(u.utils.mime_extension(mime).map(str::to_string))
        })
        .register_fn("mime_type", |u: &mut ScriptUtils, path: &str| {
            optional(u.utils.mime_type(path))
        })
        .register_fn(
            "save_attachment",
            |u: &mut ScriptUtils, name: &str, ext: &str, data: Blob| -> Result<String, Box<EvalAltResult>> {
                u.handle
                    .block_on(u.utils.save_attachment(name, ext, &data))
                    .map_err(|e| e.to_string().into())
            },
        );

    engine
}
