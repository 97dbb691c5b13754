//! Entry-point configuration schema and validation.
//!
//! Discovery never interprets raw configuration objects directly. Each
//! entry point's raw config goes through a [`ConfigValidator`] exactly once,
//! and everything downstream reads the resulting [`ValidatedConfig`].

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Default output directory, relative to the entry point's source directory.
pub const DEFAULT_DEST: &str = "dist";

/// Default entry file, relative to the entry point's source directory.
pub const DEFAULT_ENTRY_FILE: &str = "src/public_api.ts";

/// Configuration of a single entry point after defaults are applied.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct EntryPointConfig {
    /// Path of the JSON Schema this document claims to follow.
    #[serde(rename = "$schema", skip_serializing_if = "Option::is_none")]
    pub schema: Option<String>,
    /// Output directory. Only meaningful on the primary entry point.
    pub dest: String,
    /// Library build options.
    pub lib: LibOptions,
    /// Assets copied into the output directory, carried through untouched.
    pub assets: Vec<Value>,
    /// Dependencies allowed outside `peerDependencies`.
    pub allowed_non_peer_dependencies: Vec<String>,
    /// Keep npm lifecycle scripts in the published manifest.
    pub keep_lifecycle_scripts: bool,
    /// Delete the output directory before building.
    pub delete_dest_path: bool,
}

impl Default for EntryPointConfig {
    fn default() -> Self {
        Self {
            schema: None,
            dest: DEFAULT_DEST.to_string(),
            lib: LibOptions::default(),
            assets: Vec::new(),
            allowed_non_peer_dependencies: Vec::new(),
            keep_lifecycle_scripts: false,
            delete_dest_path: true,
        }
    }
}

/// Library build options of an entry point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(default, rename_all = "camelCase", deny_unknown_fields)]
pub struct LibOptions {
    /// Entry file, relative to the entry point's source directory.
    pub entry_file: String,
    /// Overrides the flat module file name derived from the module id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flat_module_file: Option<String>,
    /// How `url()` references in stylesheets are handled.
    pub css_url: CssUrl,
    /// Extra include paths for stylesheet preprocessors.
    pub style_include_paths: Vec<String>,
}

impl Default for LibOptions {
    fn default() -> Self {
        Self {
            entry_file: DEFAULT_ENTRY_FILE.to_string(),
            flat_module_file: None,
            css_url: CssUrl::Inline,
            style_include_paths: Vec::new(),
        }
    }
}

/// Stylesheet `url()` handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum CssUrl {
    /// Inline referenced resources.
    Inline,
    /// Leave references untouched.
    None,
}

/// A validated, defaulted entry-point configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidatedConfig {
    #[serde(flatten)]
    config: EntryPointConfig,
    #[serde(skip)]
    values: Value,
}

impl ValidatedConfig {
    fn new(config: EntryPointConfig) -> Result<Self, String> {
        let values = serde_json::to_value(&config).map_err(|e| e.to_string())?;
        Ok(Self { config, values })
    }

    /// The typed configuration.
    #[must_use]
    pub const fn config(&self) -> &EntryPointConfig {
        &self.config
    }

    /// The declared output directory, possibly relative.
    #[must_use]
    pub fn dest(&self) -> &str {
        &self.config.dest
    }

    /// Look up a top-level key of the defaulted configuration.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.values.get(key)
    }
}

/// Validates and defaults raw entry-point configuration objects.
pub trait ConfigValidator: Send + Sync {
    /// Validate `raw`, returning the defaulted configuration.
    ///
    /// # Errors
    ///
    /// Returns a description of the first problem found.
    fn validate(&self, raw: &Map<String, Value>) -> Result<ValidatedConfig, String>;
}

/// Validator backed by the [`EntryPointConfig`] schema.
#[derive(Debug, Clone, Copy, Default)]
pub struct SchemaValidator;

impl ConfigValidator for SchemaValidator {
    fn validate(&self, raw: &Map<String, Value>) -> Result<ValidatedConfig, String> {
        let config = EntryPointConfig::deserialize(Value::Object(raw.clone()))
            .map_err(|e| e.to_string())?;
        ValidatedConfig::new(config)
    }
}

/// Validate `raw` against the default schema.
///
/// # Errors
///
/// Returns a description of the first problem found.
pub fn validate(raw: &Map<String, Value>) -> Result<ValidatedConfig, String> {
    SchemaValidator.validate(raw)
}

/// JSON Schema describing [`EntryPointConfig`].
#[must_use]
pub fn entry_point_config_schema() -> schemars::Schema {
    schemars::schema_for!(EntryPointConfig)
}
