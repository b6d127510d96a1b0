//! Advanced Paste Script Transforms
//!
//! User transforms written in [Rhai](https://rhai.rs). Every `.rhai` file
//! directly inside the script folder is evaluated once; each public function
//! taking one or two parameters becomes a transform with command id
//! `custom-<function>`.
//!
//! ```rhai
//! // text transform: receives the clipboard text
//! fn shout(text) { text.to_upper() }
//!
//! // blob transform: receives the first clipboard item and the utils
//! fn html_source(item, utils) {
//!     if item.has("text/html") { ok(item.text("text/html")) } else { err("No HTML") }
//! }
//!
//! const TRANSFORM_KINDS = #{ html_source: "blob" };
//! ```
//!
//! A function returns a string (inserted as-is), `ok(value)` or
//! `err(message)`; anything else is reported as a generic failure.
//! Functions are called without re-running the script's top level, so they
//! only see their own parameters.
//!
//! Scripts run with every capability the engine grants them. There is no
//! sandbox beyond that capability set and no time limit.

mod api;
mod loader;
mod transform;

pub use api::{build_engine, ScriptItem, ScriptUtils};
pub use loader::ScriptLoader;
pub use transform::{coerce_result, ScriptModule, ScriptTransform};

/// Suffix of files treated as scripts
pub const SCRIPT_EXTENSION: &str = ".rhai";

/// Prefix keeping script command ids apart from built-in ones
pub const CUSTOM_PREFIX: &str = "custom-";

/// Top-level constant map assigning kinds to functions
pub const KINDS_CONSTANT: &str = "TRANSFORM_KINDS";
