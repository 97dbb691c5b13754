//! Raw package descriptors produced by the resolver.

use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Where an entry point's raw configuration came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "path", rename_all = "camelCase")]
pub enum ConfigSource {
    /// The manifest's embedded configuration field.
    Embedded,
    /// A sibling structured configuration file.
    File(PathBuf),
    /// A sibling script configuration file.
    Script(PathBuf),
    /// No configuration source; defaults apply.
    Defaults,
}

/// A package manifest paired with its entry-point configuration.
///
/// Immutable once built by [`ConfigResolver`](crate::ConfigResolver).
#[derive(Debug, Clone, PartialEq)]
pub struct RawPackageDescriptor {
    package_metadata: Map<String, Value>,
    entry_point_config: Map<String, Value>,
    base_path: PathBuf,
    config_source: ConfigSource,
}

impl RawPackageDescriptor {
    /// Assemble a descriptor. `base_path` must be an absolute directory.
    #[must_use]
    pub const fn new(
        package_metadata: Map<String, Value>,
        entry_point_config: Map<String, Value>,
        base_path: PathBuf,
        config_source: ConfigSource,
    ) -> Self {
        Self {
            package_metadata,
            entry_point_config,
            base_path,
            config_source,
        }
    }

    /// The parsed package manifest.
    #[must_use]
    pub const fn package_metadata(&self) -> &Map<String, Value> {
        &self.package_metadata
    }

    /// The raw, unvalidated entry-point configuration.
    #[must_use]
    pub const fn entry_point_config(&self) -> &Map<String, Value> {
        &self.entry_point_config
    }

    /// Directory holding the manifest.
    #[must_use]
    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Which precedence step produced the configuration.
    #[must_use]
    pub const fn config_source(&self) -> &ConfigSource {
        &self.config_source
    }

    /// The manifest's `name`, when it is a string.
    #[must_use]
    pub fn package_name(&self) -> Option<&str> {
        self.package_metadata.get("name").and_then(Value::as_str)
    }
}
