//! Resolution of package manifests and entry-point configuration.
//!
//! Given a directory or a file, [`ConfigResolver`] loads the package
//! manifest next to it and picks the entry-point configuration from the
//! first source that exists, in this order:
//!
//! 1. the manifest's embedded field (`ngPackage`), when the key is present
//! 2. a sibling structured config file (`ng-package.json`)
//! 3. a sibling script config file (`ng-package.js`), via the loader
//!    registered for its extension
//!
//! A directory with none of these resolves to an empty configuration. An
//! explicit file path with none of these is an error.

use crate::descriptor::{ConfigSource, RawPackageDescriptor};
use crate::error::{Error, Result};
use crate::loader::LoaderRegistry;
use crate::options::DiscoveryOptions;
use crate::paths;
use serde_json::{Map, Value};
use std::ffi::OsStr;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;

/// Loads raw package descriptors from disk.
#[derive(Debug, Clone)]
pub struct ConfigResolver {
    options: Arc<DiscoveryOptions>,
    loaders: LoaderRegistry,
}

impl Default for ConfigResolver {
    fn default() -> Self {
        Self::new(Arc::new(DiscoveryOptions::default()), LoaderRegistry::default())
    }
}

impl ConfigResolver {
    /// Create a resolver with the given file naming options and loaders.
    #[must_use]
    pub const fn new(options: Arc<DiscoveryOptions>, loaders: LoaderRegistry) -> Self {
        Self { options, loaders }
    }

    /// Resolve the descriptor for a directory or for a file inside it.
    ///
    /// # Errors
    ///
    /// - [`Error::ConfigNotFound`] when the input or its manifest does not exist
    /// - [`Error::ConfigInvalid`] when a configuration source is malformed, or
    ///   when an explicit file path has no usable configuration
    /// - [`Error::Json`] / [`Error::Io`] when a file cannot be read or parsed
    #[tracing::instrument(level = "debug", skip(self))]
    pub async fn resolve(&self, path: &Path) -> Result<RawPackageDescriptor> {
        let input =
            paths::absolutize(path).map_err(|e| Error::io(e, path, "resolving absolute path"))?;

        let metadata = match fs::metadata(&input).await {
            Ok(metadata) => metadata,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::ConfigNotFound { path: input });
            }
            Err(e) => return Err(Error::io(e, input, "reading path metadata")),
        };
        let is_dir = metadata.is_dir();

        let base_path = if is_dir {
            input.clone()
        } else {
            input
                .parent()
                .map_or_else(|| input.clone(), Path::to_path_buf)
        };

        let manifest_path = base_path.join(&self.options.manifest_file);
        if !is_regular_file(&manifest_path).await {
            return Err(Error::ConfigNotFound {
                path: manifest_path,
            });
        }
        let package_metadata = read_json_object(&manifest_path, "manifest").await?;

        if let Some((config, source)) = self
            .entry_point_config(&base_path, &manifest_path, &package_metadata)
            .await?
        {
            tracing::debug!(base = %base_path.display(), ?source, "Resolved entry-point configuration");
            return Ok(RawPackageDescriptor::new(
                package_metadata,
                config,
                base_path,
                source,
            ));
        }

        if is_dir {
            tracing::debug!(base = %base_path.display(), "No entry-point configuration, using defaults");
            return Ok(RawPackageDescriptor::new(
                package_metadata,
                Map::new(),
                base_path,
                ConfigSource::Defaults,
            ));
        }

        let message = if input.file_name() == Some(OsStr::new(&self.options.manifest_file)) {
            "manifest has no entry-point configuration field"
        } else {
            "unsupported file extension for entry-point configuration"
        };
        Err(Error::invalid(input, message))
    }

    async fn entry_point_config(
        &self,
        base_path: &Path,
        manifest_path: &Path,
        package_metadata: &Map<String, Value>,
    ) -> Result<Option<(Map<String, Value>, ConfigSource)>> {
        // Key presence wins, even for an empty object.
        if let Some(embedded) = package_metadata.get(&self.options.embedded_key) {
            let Value::Object(config) = embedded else {
                return Err(Error::invalid(
                    manifest_path,
                    format!("'{}' must be an object", self.options.embedded_key),
                ));
            };
            return Ok(Some((config.clone(), ConfigSource::Embedded)));
        }

        let config_path = base_path.join(&self.options.config_file);
        if is_regular_file(&config_path).await {
            let config = read_json_object(&config_path, "entry-point configuration").await?;
            return Ok(Some((config, ConfigSource::File(config_path))));
        }

        let script_path = base_path.join(&self.options.script_config_file);
        if is_regular_file(&script_path).await {
            let config = self.load_script(&script_path).await?;
            return Ok(Some((config, ConfigSource::Script(script_path))));
        }

        Ok(None)
    }

    async fn load_script(&self, path: &Path) -> Result<Map<String, Value>> {
        let Some(loader) = self.loaders.for_path(path) else {
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().into_owned())
                .unwrap_or_default();
            return Err(Error::invalid(
                path,
                format!("no configuration loader registered for '.{extension}' files"),
            ));
        };

        let source = fs::read_to_string(path)
            .await
            .map_err(|e| Error::io(e, path, "reading script configuration"))?;
        loader
            .load(path, &source)
            .map_err(|message| Error::invalid(path, message))
    }
}

/// True only for an existing regular file; directories never match.
pub async fn is_regular_file(path: &Path) -> bool {
    fs::metadata(path)
        .await
        .map(|metadata| metadata.is_file())
        .unwrap_or(false)
}

/// Reads a JSON file that must hold an object.
async fn read_json_object(path: &Path, what: &str) -> Result<Map<String, Value>> {
    let content = fs::read_to_string(path)
        .await
        .map_err(|e| Error::io(e, path, format!("reading {what}")))?;

    match serde_json::from_str::<Value>(&content).map_err(|e| Error::Json {
        source: e,
        path: Some(PathBuf::from(path)),
    })? {
        Value::Object(map) => Ok(map),
        _ => Err(Error::invalid(path, format!("{what} is not a JSON object"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write(root: &Path, rel: &str, content: &str) {
        let path = root.join(rel);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, content).unwrap();
    }

    #[tokio::test]
    async fn test_embedded_field_wins_over_sibling_file() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(
            root,
            "package.json",
            r#"{"name": "mylib", "ngPackage": {"dest": "embedded"}}"#,
        );
        write(root, "ng-package.json", r#"{"dest": "sibling"}"#);

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();

        assert_eq!(descriptor.config_source(), &ConfigSource::Embedded);
        assert_eq!(descriptor.entry_point_config()["dest"], "embedded");
        assert_eq!(descriptor.package_name(), Some("mylib"));
    }

    #[tokio::test]
    async fn test_empty_embedded_field_counts_as_found() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib", "ngPackage": {}}"#);
        write(root, "ng-package.json", r#"{"dest": "sibling"}"#);

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();

        assert_eq!(descriptor.config_source(), &ConfigSource::Embedded);
        assert!(descriptor.entry_point_config().is_empty());
    }

    #[tokio::test]
    async fn test_sibling_file_used_verbatim() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);
        write(
            root,
            "ng-package.json",
            r#"{"dest": "../dist/mylib", "lib": {"entryFile": "index.ts"}}"#,
        );

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();

        let expected: Map<String, Value> = serde_json::from_str(
            r#"{"dest": "../dist/mylib", "lib": {"entryFile": "index.ts"}}"#,
        )
        .unwrap();
        assert_eq!(descriptor.entry_point_config(), &expected);
        assert!(matches!(descriptor.config_source(), ConfigSource::File(p) if p.ends_with("ng-package.json")));
    }

    #[tokio::test]
    async fn test_script_config_loaded_through_registry() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);
        write(root, "ng-package.js", r#"module.exports = {"dest": "out"};"#);

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();
        assert_eq!(descriptor.entry_point_config()["dest"], "out");
        assert!(matches!(descriptor.config_source(), ConfigSource::Script(_)));

        let strict = ConfigResolver::new(
            Arc::new(DiscoveryOptions::default()),
            LoaderRegistry::empty(),
        );
        let err = strict.resolve(root).await.unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { ref message, .. } if message.contains("'.js'")));
    }

    #[tokio::test]
    async fn test_directory_named_like_config_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);
        fs::create_dir_all(root.join("ng-package.json")).unwrap();

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();
        assert_eq!(descriptor.config_source(), &ConfigSource::Defaults);
    }

    #[tokio::test]
    async fn test_directory_without_config_uses_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);

        let descriptor = ConfigResolver::default().resolve(root).await.unwrap();

        assert!(descriptor.entry_point_config().is_empty());
        assert_eq!(descriptor.config_source(), &ConfigSource::Defaults);
        assert_eq!(descriptor.base_path(), paths::normalize(root));
    }

    #[tokio::test]
    async fn test_missing_manifest_is_not_found() {
        let temp_dir = TempDir::new().unwrap();
        write(temp_dir.path(), "ng-package.json", "{}");

        let err = ConfigResolver::default()
            .resolve(temp_dir.path())
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { ref path } if path.ends_with("package.json")));

        let err = ConfigResolver::default()
            .resolve(&temp_dir.path().join("missing"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::ConfigNotFound { .. }));
    }

    #[tokio::test]
    async fn test_manifest_path_without_field_is_invalid() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);

        let err = ConfigResolver::default()
            .resolve(&root.join("package.json"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConfigInvalid { ref message, .. }
                if message == "manifest has no entry-point configuration field"
        ));
    }

    #[tokio::test]
    async fn test_other_file_path_is_unsupported() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib"}"#);
        write(root, "README.md", "# mylib");

        let err = ConfigResolver::default()
            .resolve(&root.join("README.md"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            Error::ConfigInvalid { ref message, .. }
                if message == "unsupported file extension for entry-point configuration"
        ));
    }

    #[tokio::test]
    async fn test_file_path_with_config_resolves_to_parent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        write(root, "package.json", r#"{"name": "mylib", "ngPackage": {}}"#);

        let descriptor = ConfigResolver::default()
            .resolve(&root.join("package.json"))
            .await
            .unwrap();
        assert_eq!(descriptor.base_path(), paths::normalize(root));
    }

    #[tokio::test]
    async fn test_malformed_sources() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        write(root, "package.json", "[]");
        let err = ConfigResolver::default().resolve(root).await.unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));

        write(root, "package.json", r#"{"name": "x", "ngPackage": true}"#);
        let err = ConfigResolver::default().resolve(root).await.unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));

        write(root, "package.json", r#"{"name": "x"}"#);
        write(root, "ng-package.json", "{ nope");
        let err = ConfigResolver::default().resolve(root).await.unwrap_err();
        assert!(matches!(err, Error::Json { path: Some(_), .. }));
    }
}
