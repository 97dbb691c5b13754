//! Error types for entry-point discovery.

use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for discovery operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while discovering entry points.
#[derive(Error, Debug, Diagnostic)]
pub enum Error {
    /// No package manifest at the resolved base path.
    #[error("Package manifest not found at path: {path}")]
    #[diagnostic(
        code(pkgraph::discovery::config_not_found),
        help("Point discovery at a directory containing a 'package.json', or at the manifest itself")
    )]
    ConfigNotFound {
        /// The path that was expected to hold the manifest.
        path: PathBuf,
    },

    /// The entry-point configuration source is missing or unsupported.
    #[error("Invalid entry-point configuration at {path}: {message}")]
    #[diagnostic(
        code(pkgraph::discovery::config_invalid),
        help(
            "Add an 'ngPackage' field to package.json, or place an 'ng-package.json' next to it"
        )
    )]
    ConfigInvalid {
        /// The file or directory that was being resolved.
        path: PathBuf,
        /// Description of what is invalid.
        message: String,
    },

    /// A secondary candidate resolved to the primary's own directory.
    #[error("Secondary entry point at {path} is the primary entry point")]
    #[diagnostic(
        code(pkgraph::discovery::secondary_is_primary),
        help("Secondary entry points must live in a subdirectory of the primary entry point")
    )]
    SecondaryIsPrimary {
        /// The shared base directory.
        path: PathBuf,
    },

    /// The entry-point configuration was rejected by the validator.
    #[error("Entry-point configuration at {path} failed validation: {message}")]
    #[diagnostic(
        code(pkgraph::discovery::validation_failed),
        help("Run 'pkgraph schema' to see the accepted configuration fields")
    )]
    Validation {
        /// Base directory of the entry point being validated.
        path: PathBuf,
        /// Description of the validation failure.
        message: String,
    },

    /// I/O error occurred.
    #[error("I/O error during {operation}{}: {source}", path.as_ref().map(|p| format!(" at {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(pkgraph::discovery::io_error),
        help("Check that the referenced paths exist and that you have permission to read them")
    )]
    Io {
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
        /// Optional path where the error occurred.
        path: Option<PathBuf>,
        /// Description of the operation being performed.
        operation: String,
    },

    /// JSON parsing error.
    #[error("JSON parsing error{}: {source}", path.as_ref().map(|p| format!(" in {}", p.display())).unwrap_or_default())]
    #[diagnostic(
        code(pkgraph::discovery::json_error),
        help("Ensure the file contains valid JSON")
    )]
    Json {
        /// The underlying JSON error.
        #[source]
        source: serde_json::Error,
        /// Optional path to the file being parsed.
        path: Option<PathBuf>,
    },

    /// Directory traversal failed while scanning for secondary entry points.
    #[error("Failed to scan {path} for entry points: {source}")]
    #[diagnostic(
        code(pkgraph::discovery::scan_failed),
        help("Check directory permissions under the project root")
    )]
    Scan {
        /// The underlying traversal error.
        #[source]
        source: walkdir::Error,
        /// Root of the scan.
        path: PathBuf,
    },

    /// A background task panicked or was cancelled.
    #[error("Discovery task failed: {0}")]
    #[diagnostic(code(pkgraph::discovery::task_failed))]
    Task(#[from] tokio::task::JoinError),
}

impl Error {
    /// Shorthand for [`Error::ConfigInvalid`].
    pub(crate) fn invalid(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self::ConfigInvalid {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Attach a path to an I/O error.
    pub(crate) fn io(
        source: std::io::Error,
        path: impl Into<PathBuf>,
        operation: impl Into<String>,
    ) -> Self {
        Self::Io {
            source,
            path: Some(path.into()),
            operation: operation.into(),
        }
    }

    /// True for errors caused by what the user wrote rather than by the environment.
    #[must_use]
    pub const fn is_configuration(&self) -> bool {
        matches!(
            self,
            Self::ConfigNotFound { .. }
                | Self::ConfigInvalid { .. }
                | Self::SecondaryIsPrimary { .. }
                | Self::Validation { .. }
                | Self::Json { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(source: std::io::Error) -> Self {
        Self::Io {
            source,
            path: None,
            operation: "file operation".to_string(),
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source, path: None }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Diagnostic;

    #[test]
    fn test_config_not_found_error() {
        let error = Error::ConfigNotFound {
            path: PathBuf::from("/lib/package.json"),
        };

        let message = error.to_string();
        assert!(message.contains("Package manifest not found"));
        assert!(message.contains("/lib/package.json"));
        assert!(error.is_configuration());
    }

    #[test]
    fn test_config_invalid_error() {
        let error = Error::invalid("/lib/package.json", "manifest is not a JSON object");

        let message = error.to_string();
        assert!(message.contains("Invalid entry-point configuration"));
        assert!(message.contains("manifest is not a JSON object"));
    }

    #[test]
    fn test_io_error_display() {
        let io_error = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let error = Error::io(io_error, "/lib/ng-package.json", "reading config");

        let message = error.to_string();
        assert!(message.contains("I/O error during reading config"));
        assert!(message.contains("/lib/ng-package.json"));
        assert!(!error.is_configuration());
    }

    #[test]
    fn test_io_error_conversion() {
        let io_error = std::io::Error::new(std::io::ErrorKind::NotFound, "not found");
        let error: Error = io_error.into();

        match error {
            Error::Io {
                path, operation, ..
            } => {
                assert_eq!(path, None);
                assert_eq!(operation, "file operation");
            }
            _ => panic!("Expected Io error variant"),
        }
    }

    #[test]
    fn test_json_error_no_path() {
        let json_error = serde_json::from_str::<serde_json::Value>("{ nope").unwrap_err();
        let error: Error = json_error.into();

        let message = error.to_string();
        assert!(message.starts_with("JSON parsing error: "));
    }

    #[test]
    fn test_diagnostic_codes() {
        let error = Error::SecondaryIsPrimary {
            path: PathBuf::from("/lib"),
        };
        assert_eq!(
            error.code().map(|c| c.to_string()),
            Some("pkgraph::discovery::secondary_is_primary".to_string())
        );
        assert!(error.help().is_some());

        let error = Error::Validation {
            path: PathBuf::from("/lib"),
            message: "unknown field".to_string(),
        };
        assert!(error.code().is_some());
        assert!(error.help().is_some());
    }
}
