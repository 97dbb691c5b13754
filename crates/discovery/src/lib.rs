//! Entry-point discovery for library packages.
//!
//! A library package has one *primary* entry point, the directory holding
//! its `package.json`, and any number of *secondary* entry points nested
//! below it, each marked by its own `package.json` or `ng-package.json`.
//! This crate finds them all and produces a [`PackageGraph`] for a build
//! pipeline to consume.
//!
//! # Architecture
//!
//! - [`ConfigResolver`] loads a manifest and picks its entry-point
//!   configuration (embedded `ngPackage` field, then `ng-package.json`, then
//!   `ng-package.js`)
//! - [`PathScanner`] walks the project for secondary candidates, pruning
//!   `node_modules`, the build working directory and the primary's output
//! - [`EntryPointBuilder`] validates configuration and derives module ids
//!   and destinations
//! - [`Discovery`] ties them together and tolerates broken secondaries
//!
//! The two seams meant for embedders are [`ConfigValidator`] (schema
//! validation) and [`ConfigLoader`] (per-extension config file loading).
//! Progress is reported to a [`DiagnosticsSink`].
//!
//! # Example
//!
//! ```rust,ignore
//! use pkgraph_discovery::discover;
//!
//! let graph = discover("projects/mylib").await?;
//! println!("{} -> {}", graph.primary().module_id(), graph.primary().destination_path().display());
//! for secondary in graph.secondaries() {
//!     println!("  {}", secondary.module_id());
//! }
//! ```

pub mod config;
pub mod descriptor;
pub mod diagnostics;
pub mod discovery;
pub mod entry_point;
pub mod error;
pub mod graph;
pub mod loader;
pub mod options;
pub mod paths;
pub mod resolver;
pub mod scanner;

pub use config::{
    ConfigValidator, EntryPointConfig, SchemaValidator, ValidatedConfig,
    entry_point_config_schema, validate,
};
pub use descriptor::{ConfigSource, RawPackageDescriptor};
pub use diagnostics::{DiagnosticsSink, DiscoveryEvent, MemorySink, TracingSink};
pub use discovery::{CandidateOutcome, Discovery, discover};
pub use entry_point::{EntryPoint, EntryPointBuilder};
pub use error::{Error, Result};
pub use graph::PackageGraph;
pub use loader::{ConfigLoader, JsonLoader, LoaderRegistry, StaticExportLoader};
pub use options::DiscoveryOptions;
pub use resolver::ConfigResolver;
pub use scanner::PathScanner;
