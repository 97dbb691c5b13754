//! Discovery of a complete package graph.
//!
//! [`Discovery::discover`] resolves and builds the primary entry point, then
//! scans below it for secondary candidates and resolves those concurrently.
//! Primary failures are returned to the caller. Secondary failures are
//! reported to the [`DiagnosticsSink`] and the candidate is left out.

use crate::config::ConfigValidator;
use crate::descriptor::ConfigSource;
use crate::diagnostics::{DiagnosticsSink, DiscoveryEvent, TracingSink};
use crate::entry_point::{EntryPoint, EntryPointBuilder};
use crate::error::{Error, Result};
use crate::graph::PackageGraph;
use crate::loader::LoaderRegistry;
use crate::options::DiscoveryOptions;
use crate::paths;
use crate::resolver::ConfigResolver;
use crate::scanner::PathScanner;
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of resolving one secondary candidate.
#[derive(Debug)]
pub enum CandidateOutcome {
    /// The candidate became a secondary entry point.
    Built(EntryPoint),
    /// The candidate was left out.
    Skipped {
        /// The candidate directory.
        path: PathBuf,
        /// Why it was left out.
        error: Error,
    },
}

impl CandidateOutcome {
    /// Directory the outcome refers to.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::Built(entry_point) => entry_point.source_path(),
            Self::Skipped { path, .. } => path,
        }
    }
}

/// Configured discovery pipeline.
#[derive(Clone)]
pub struct Discovery {
    options: Arc<DiscoveryOptions>,
    resolver: ConfigResolver,
    scanner: PathScanner,
    builder: EntryPointBuilder,
    sink: Arc<dyn DiagnosticsSink>,
}

impl std::fmt::Debug for Discovery {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Discovery")
            .field("options", &self.options)
            .field("resolver", &self.resolver)
            .finish_non_exhaustive()
    }
}

impl Default for Discovery {
    fn default() -> Self {
        Self::new(DiscoveryOptions::default())
    }
}

impl Discovery {
    /// Pipeline with default loaders, the schema validator and a tracing sink.
    #[must_use]
    pub fn new(options: DiscoveryOptions) -> Self {
        let options = Arc::new(options);
        Self {
            resolver: ConfigResolver::new(Arc::clone(&options), LoaderRegistry::default()),
            scanner: PathScanner::new(Arc::clone(&options)),
            builder: EntryPointBuilder::default(),
            sink: Arc::new(TracingSink),
            options,
        }
    }

    /// Replace the configuration loaders.
    #[must_use]
    pub fn with_loaders(mut self, loaders: LoaderRegistry) -> Self {
        self.resolver = ConfigResolver::new(Arc::clone(&self.options), loaders);
        self
    }

    /// Replace the configuration validator.
    #[must_use]
    pub fn with_validator(mut self, validator: Arc<dyn ConfigValidator>) -> Self {
        self.builder = EntryPointBuilder::new(validator);
        self
    }

    /// Replace the diagnostics sink.
    #[must_use]
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticsSink>) -> Self {
        self.sink = sink;
        self
    }

    /// The options this pipeline runs with.
    #[must_use]
    pub fn options(&self) -> &DiscoveryOptions {
        &self.options
    }

    /// Discover the package graph rooted at `project_path`.
    ///
    /// `project_path` may be relative to the working directory and may name
    /// the project directory or a file inside it.
    ///
    /// # Errors
    ///
    /// Returns any error raised while resolving or building the primary
    /// entry point, or while scanning for candidates. Secondary failures are
    /// never returned.
    #[tracing::instrument(level = "debug", skip(self, project_path), fields(path = %project_path.as_ref().display()))]
    pub async fn discover(&self, project_path: impl AsRef<Path>) -> Result<PackageGraph> {
        let project_path = project_path.as_ref();
        let project_path = paths::absolutize(project_path)
            .map_err(|e| Error::io(e, project_path, "resolving absolute path"))?;

        let descriptor = self.resolver.resolve(&project_path).await?;
        let primary = self.builder.build_primary(&descriptor)?;
        let root = descriptor.base_path();
        self.sink.record(&DiscoveryEvent::PrimaryFound {
            module_id: primary.module_id().to_string(),
            path: primary.source_path().to_path_buf(),
        });

        let excluded = paths::relative_path(root, primary.destination_path());
        let candidates = self
            .scanner
            .scan_secondary_candidates(root, Some(&excluded))
            .await?;

        let mut outcomes: Vec<CandidateOutcome> = stream::iter(candidates)
            .map(|candidate| self.resolve_candidate(root, &primary, candidate))
            .buffer_unordered(self.options.effective_concurrency())
            .collect()
            .await;
        outcomes.sort_by(|a, b| a.path().cmp(b.path()));

        let mut secondaries = Vec::with_capacity(outcomes.len());
        for outcome in outcomes {
            match outcome {
                CandidateOutcome::Built(entry_point) => {
                    self.sink.record(&DiscoveryEvent::SecondaryFound {
                        module_id: entry_point.module_id().to_string(),
                        path: entry_point.source_path().to_path_buf(),
                    });
                    secondaries.push(entry_point);
                }
                CandidateOutcome::Skipped { path, error } => {
                    self.sink.record(&DiscoveryEvent::SecondarySkipped {
                        path,
                        reason: error.to_string(),
                    });
                }
            }
        }

        PackageGraph::new(root.to_path_buf(), primary, secondaries)
    }

    /// Resolve and build one candidate, capturing any failure.
    pub async fn resolve_candidate(
        &self,
        primary_base_path: &Path,
        primary: &EntryPoint,
        candidate: PathBuf,
    ) -> CandidateOutcome {
        match self
            .build_candidate(primary_base_path, primary, &candidate)
            .await
        {
            Ok(entry_point) => CandidateOutcome::Built(entry_point),
            Err(error) => CandidateOutcome::Skipped {
                path: candidate,
                error,
            },
        }
    }

    async fn build_candidate(
        &self,
        primary_base_path: &Path,
        primary: &EntryPoint,
        candidate: &Path,
    ) -> Result<EntryPoint> {
        let descriptor = self.resolver.resolve(candidate).await?;
        if self.options.require_secondary_config
            && *descriptor.config_source() == ConfigSource::Defaults
        {
            return Err(Error::invalid(candidate, "no entry-point configuration"));
        }
        self.builder
            .build_secondary(primary_base_path, primary, &descriptor)
    }
}

/// Discover the package graph at `project_path` with default settings.
///
/// # Errors
///
/// See [`Discovery::discover`].
pub async fn discover(project_path: impl AsRef<Path>) -> Result<PackageGraph> {
    Discovery::default().discover(project_path).await
}
