//! Pluggable loaders for entry-point configuration files.
//!
//! The resolver reads a configuration file and hands its contents to the
//! [`ConfigLoader`] registered for the file's extension. Script configs are
//! never executed: the default script loader only understands a literal
//! JSON object behind `module.exports =` or `export default`, and refuses
//! everything else.

use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;

/// Turns the contents of a configuration file into a JSON object.
pub trait ConfigLoader: Send + Sync {
    /// Load the configuration object stored in `source`, read from `path`.
    ///
    /// # Errors
    ///
    /// Returns a human-readable message when the contents cannot be
    /// interpreted as a configuration object.
    fn load(&self, path: &Path, source: &str) -> Result<Map<String, Value>, String>;
}

/// Strict JSON loader.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonLoader;

impl ConfigLoader for JsonLoader {
    fn load(&self, _path: &Path, source: &str) -> Result<Map<String, Value>, String> {
        match serde_json::from_str::<Value>(source).map_err(|e| e.to_string())? {
            Value::Object(map) => Ok(map),
            other => Err(format!("expected a JSON object, found {}", kind_of(&other))),
        }
    }
}

/// Restricted loader for script configs that export a literal object.
///
/// Accepts `module.exports = {...}` and `export default {...}` where the
/// object is valid JSON, with an optional trailing semicolon. Leading line
/// comments and a `"use strict"` directive are ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct StaticExportLoader;

impl ConfigLoader for StaticExportLoader {
    fn load(&self, path: &Path, source: &str) -> Result<Map<String, Value>, String> {
        let body = strip_preamble(source);
        let expression = body
            .strip_prefix("module.exports")
            .and_then(|rest| rest.trim_start().strip_prefix('='))
            .or_else(|| body.strip_prefix("export default"))
            .ok_or_else(|| {
                "script configuration must be `module.exports = {...}` or `export default {...}`"
                    .to_string()
            })?;

        let expression = expression.trim();
        let expression = expression.strip_suffix(';').unwrap_or(expression);

        JsonLoader
            .load(path, expression)
            .map_err(|e| format!("exported configuration is not a static JSON object: {e}"))
    }
}

fn strip_preamble(source: &str) -> &str {
    let mut rest = source.trim_start();
    loop {
        if rest.starts_with("//") {
            rest = rest.split_once('\n').map_or("", |(_, tail)| tail).trim_start();
        } else if let Some(tail) = rest
            .strip_prefix("\"use strict\"")
            .or_else(|| rest.strip_prefix("'use strict'"))
        {
            rest = tail.trim_start().trim_start_matches(';').trim_start();
        } else {
            return rest;
        }
    }
}

const fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

/// Maps file extensions to loaders.
#[derive(Clone)]
pub struct LoaderRegistry {
    loaders: HashMap<String, Arc<dyn ConfigLoader>>,
}

impl std::fmt::Debug for LoaderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut extensions: Vec<_> = self.loaders.keys().collect();
        extensions.sort();
        f.debug_struct("LoaderRegistry")
            .field("extensions", &extensions)
            .finish()
    }
}

impl Default for LoaderRegistry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register("json", JsonLoader);
        for extension in ["js", "cjs", "mjs"] {
            registry.register(extension, StaticExportLoader);
        }
        registry
    }
}

impl LoaderRegistry {
    /// A registry with no loaders; every lookup fails closed.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            loaders: HashMap::new(),
        }
    }

    /// Register `loader` for `extension` (without the leading dot), replacing any previous one.
    pub fn register(&mut self, extension: impl Into<String>, loader: impl ConfigLoader + 'static) {
        self.loaders
            .insert(extension.into().to_ascii_lowercase(), Arc::new(loader));
    }

    /// Remove the loader for `extension`.
    pub fn unregister(&mut self, extension: &str) {
        self.loaders.remove(&extension.to_ascii_lowercase());
    }

    /// Loader for the extension of `path`, if one is registered.
    #[must_use]
    pub fn for_path(&self, path: &Path) -> Option<Arc<dyn ConfigLoader>> {
        let extension = path.extension()?.to_str()?.to_ascii_lowercase();
        self.loaders.get(&extension).cloned()
    }
}
