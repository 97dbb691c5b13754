//! Discovery configuration.
//!
//! [`DiscoveryOptions`] names the files discovery looks for and controls how
//! the secondary scan behaves. It deserializes from JSON with every field
//! optional, so embedders can keep their overrides in their own config files.

use serde::{Deserialize, Serialize};

/// Default upper bound on concurrently resolved secondary candidates.
pub const DEFAULT_CONCURRENCY: usize = 16;

/// Options that control file naming, exclusions and scheduling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiscoveryOptions {
    /// Name of the package manifest file.
    pub manifest_file: String,
    /// Manifest field that may embed the entry-point configuration.
    pub embedded_key: String,
    /// Name of the structured entry-point configuration file.
    pub config_file: String,
    /// Name of the script entry-point configuration file.
    pub script_config_file: String,
    /// Directory names pruned at any depth during the secondary scan.
    pub excluded_dirs: Vec<String>,
    /// Extra glob patterns, relative to the project root, excluded from the scan.
    pub exclude: Vec<String>,
    /// Skip secondaries that have no entry-point configuration of their own.
    pub require_secondary_config: bool,
    /// Maximum number of secondary candidates resolved at once.
    pub concurrency: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            manifest_file: "package.json".to_string(),
            embedded_key: "ngPackage".to_string(),
            config_file: "ng-package.json".to_string(),
            script_config_file: "ng-package.js".to_string(),
            excluded_dirs: vec![
                "node_modules".to_string(),
                ".git".to_string(),
                ".ng_pkg_build".to_string(),
            ],
            exclude: Vec::new(),
            require_secondary_config: false,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }
}

impl DiscoveryOptions {
    /// File names that mark a directory as a secondary candidate.
    #[must_use]
    pub fn candidate_file_names(&self) -> [&str; 2] {
        [self.manifest_file.as_str(), self.config_file.as_str()]
    }

    /// Whether `name` is one of the pruned directory names.
    #[must_use]
    pub fn is_excluded_dir(&self, name: &str) -> bool {
        self.excluded_dirs.iter().any(|dir| dir == name)
    }

    /// Concurrency limit, never below one.
    #[must_use]
    pub fn effective_concurrency(&self) -> usize {
        self.concurrency.max(1)
    }
}
