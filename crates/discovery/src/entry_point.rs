//! Entry points and their construction from resolved descriptors.

use crate::config::{ConfigValidator, SchemaValidator, ValidatedConfig};
use crate::descriptor::RawPackageDescriptor;
use crate::error::{Error, Result};
use crate::paths;
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A buildable unit of a library package.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EntryPoint {
    module_id: String,
    destination_path: PathBuf,
    source_path: PathBuf,
    is_secondary: bool,
    config: ValidatedConfig,
    #[serde(skip)]
    package_metadata: Map<String, Value>,
}

impl EntryPoint {
    /// Import path consumers use for this entry point, always `/`-separated.
    #[must_use]
    pub fn module_id(&self) -> &str {
        &self.module_id
    }

    /// Absolute output directory.
    #[must_use]
    pub fn destination_path(&self) -> &Path {
        &self.destination_path
    }

    /// Absolute source directory (the descriptor's base path).
    #[must_use]
    pub fn source_path(&self) -> &Path {
        &self.source_path
    }

    /// Whether this is a secondary entry point.
    #[must_use]
    pub const fn is_secondary(&self) -> bool {
        self.is_secondary
    }

    /// The validated configuration.
    #[must_use]
    pub const fn config(&self) -> &ValidatedConfig {
        &self.config
    }

    /// The package manifest this entry point was resolved from.
    #[must_use]
    pub const fn package_metadata(&self) -> &Map<String, Value> {
        &self.package_metadata
    }

    /// Absolute path of the entry file.
    #[must_use]
    pub fn entry_file(&self) -> PathBuf {
        paths::normalize(&self.source_path.join(&self.config.config().lib.entry_file))
    }

    /// File name stem for flattened bundles.
    ///
    /// `@scope/lib/testing` becomes `scope-lib-testing` unless
    /// `lib.flatModuleFile` overrides it.
    #[must_use]
    pub fn flat_module_file(&self) -> String {
        self.config.config().lib.flat_module_file.clone().unwrap_or_else(|| {
            self.module_id.replacen('@', "", 1).replace('/', "-")
        })
    }
}

/// Builds [`EntryPoint`]s from resolved descriptors.
#[derive(Clone)]
pub struct EntryPointBuilder {
    validator: Arc<dyn ConfigValidator>,
}

impl std::fmt::Debug for EntryPointBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EntryPointBuilder").finish_non_exhaustive()
    }
}

impl Default for EntryPointBuilder {
    fn default() -> Self {
        Self::new(Arc::new(SchemaValidator))
    }
}

impl EntryPointBuilder {
    /// Create a builder that validates configs with `validator`.
    #[must_use]
    pub fn new(validator: Arc<dyn ConfigValidator>) -> Self {
        Self { validator }
    }

    /// Build the primary entry point.
    ///
    /// The module id is the manifest's `name`; the destination is the
    /// configured `dest` resolved against the descriptor's base path.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the configuration is rejected and
    /// [`Error::ConfigInvalid`] if the manifest has no string `name`.
    pub fn build_primary(&self, descriptor: &RawPackageDescriptor) -> Result<EntryPoint> {
        let config = self.validate(descriptor)?;
        let module_id = descriptor
            .package_name()
            .filter(|name| !name.is_empty())
            .ok_or_else(|| {
                Error::invalid(
                    descriptor.base_path(),
                    "manifest is missing a package name",
                )
            })?
            .to_string();
        let destination_path = paths::normalize(&descriptor.base_path().join(config.dest()));

        Ok(EntryPoint {
            module_id,
            destination_path,
            source_path: descriptor.base_path().to_path_buf(),
            is_secondary: false,
            config,
            package_metadata: descriptor.package_metadata().clone(),
        })
    }

    /// Build a secondary entry point placed relative to `primary`.
    ///
    /// The module id and destination are derived from the path between
    /// `primary_base_path` and the descriptor's base path; the secondary's
    /// own `dest` is ignored.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SecondaryIsPrimary`] when both base paths are equal,
    /// and [`Error::Validation`] if the configuration is rejected.
    pub fn build_secondary(
        &self,
        primary_base_path: &Path,
        primary: &EntryPoint,
        descriptor: &RawPackageDescriptor,
    ) -> Result<EntryPoint> {
        let primary_base_path = paths::normalize(primary_base_path);
        let source_path = paths::normalize(descriptor.base_path());
        if source_path == primary_base_path {
            return Err(Error::SecondaryIsPrimary { path: source_path });
        }

        let config = self.validate(descriptor)?;
        let relative = paths::relative_path(&primary_base_path, &source_path);
        let relative_source_path = paths::to_unix(&relative);

        Ok(EntryPoint {
            module_id: format!("{}/{relative_source_path}", primary.module_id()),
            destination_path: paths::normalize(&primary.destination_path().join(&relative)),
            source_path,
            is_secondary: true,
            config,
            package_metadata: descriptor.package_metadata().clone(),
        })
    }

    fn validate(&self, descriptor: &RawPackageDescriptor) -> Result<ValidatedConfig> {
        self.validator
            .validate(descriptor.entry_point_config())
            .map_err(|message| Error::Validation {
                path: descriptor.base_path().to_path_buf(),
                message,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::descriptor::ConfigSource;
    use serde_json::json;

    fn descriptor(base: &str, manifest: Value, config: Value) -> RawPackageDescriptor {
        let (Value::Object(manifest), Value::Object(config)) = (manifest, config) else {
            unreachable!("fixtures are objects");
        };
        RawPackageDescriptor::new(manifest, config, PathBuf::from(base), ConfigSource::Embedded)
    }

    fn primary() -> EntryPoint {
        EntryPointBuilder::default()
            .build_primary(&descriptor(
                "/proj",
                json!({"name": "mylib"}),
                json!({"dest": "dist"}),
            ))
            .unwrap()
    }

    #[test]
    fn test_primary_identity() {
        let primary = primary();

        assert_eq!(primary.module_id(), "mylib");
        assert_eq!(primary.destination_path(), Path::new("/proj/dist"));
        assert_eq!(primary.source_path(), Path::new("/proj"));
        assert!(!primary.is_secondary());
        assert_eq!(primary.entry_file(), Path::new("/proj/src/public_api.ts"));
    }

    #[test]
    fn test_primary_dest_is_normalized() {
        let primary = EntryPointBuilder::default()
            .build_primary(&descriptor(
                "/ws/projects/mylib",
                json!({"name": "@scope/mylib"}),
                json!({"dest": "../../dist/mylib"}),
            ))
            .unwrap();

        assert_eq!(primary.destination_path(), Path::new("/ws/dist/mylib"));
        assert_eq!(primary.flat_module_file(), "scope-mylib");
    }

    #[test]
    fn test_primary_requires_name() {
        let err = EntryPointBuilder::default()
            .build_primary(&descriptor("/proj", json!({}), json!({})))
            .unwrap_err();
        assert!(matches!(err, Error::ConfigInvalid { .. }));
    }

    #[test]
    fn test_primary_rejects_invalid_config() {
        let err = EntryPointBuilder::default()
            .build_primary(&descriptor(
                "/proj",
                json!({"name": "mylib"}),
                json!({"dest": ["x"]}),
            ))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn test_secondary_module_id_and_destination() {
        let primary = primary();
        let secondary = EntryPointBuilder::default()
            .build_secondary(
                Path::new("/proj"),
                &primary,
                &descriptor(
                    "/proj/testing",
                    json!({"name": "ignored"}),
                    json!({"dest": "elsewhere"}),
                ),
            )
            .unwrap();

        assert_eq!(secondary.module_id(), "mylib/testing");
        assert_eq!(secondary.destination_path(), Path::new("/proj/dist/testing"));
        assert_eq!(secondary.source_path(), Path::new("/proj/testing"));
        assert!(secondary.is_secondary());
        assert_eq!(secondary.flat_module_file(), "mylib-testing");
    }

    #[test]
    fn test_nested_secondary_uses_forward_slashes() {
        let primary = primary();
        let base: PathBuf = ["/proj", "utils", "http"].iter().collect();
        let nested = RawPackageDescriptor::new(
            Map::new(),
            Map::new(),
            base,
            ConfigSource::Defaults,
        );

        let secondary = EntryPointBuilder::default()
            .build_secondary(Path::new("/proj"), &primary, &nested)
            .unwrap();

        assert_eq!(secondary.module_id(), "mylib/utils/http");
        assert!(!secondary.module_id().contains('\\'));
        assert_eq!(
            secondary.destination_path(),
            Path::new("/proj/dist").join("utils").join("http")
        );
    }

    #[test]
    fn test_secondary_at_primary_base_is_rejected() {
        let primary = primary();
        let err = EntryPointBuilder::default()
            .build_secondary(
                Path::new("/proj"),
                &primary,
                &descriptor("/proj/./", json!({"name": "mylib"}), json!({})),
            )
            .unwrap_err();
        assert!(matches!(err, Error::SecondaryIsPrimary { ref path } if path == Path::new("/proj")));
    }

    #[test]
    fn test_flat_module_file_override() {
        let secondary = EntryPointBuilder::default()
            .build_secondary(
                Path::new("/proj"),
                &primary(),
                &descriptor(
                    "/proj/testing",
                    json!({}),
                    json!({"lib": {"flatModuleFile": "my-testing"}}),
                ),
            )
            .unwrap();
        assert_eq!(secondary.flat_module_file(), "my-testing");
    }

    #[test]
    fn test_custom_validator() {
        struct Reject;
        impl ConfigValidator for Reject {
            fn validate(&self, _raw: &Map<String, Value>) -> std::result::Result<ValidatedConfig, String> {
                Err("rejected".to_string())
            }
        }

        let err = EntryPointBuilder::new(Arc::new(Reject))
            .build_primary(&descriptor("/proj", json!({"name": "mylib"}), json!({})))
            .unwrap_err();
        assert!(matches!(err, Error::Validation { ref message, .. } if message == "rejected"));
    }
}
