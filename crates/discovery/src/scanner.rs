//! Scanning a project tree for secondary entry-point candidates.

use crate::error::{Error, Result};
use crate::options::DiscoveryOptions;
use crate::paths;
use glob::Pattern;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use walkdir::{DirEntry, WalkDir};

/// Finds directories that may hold secondary entry points.
#[derive(Debug, Clone, Default)]
pub struct PathScanner {
    options: Arc<DiscoveryOptions>,
}

impl PathScanner {
    /// Create a scanner using the file names and exclusions in `options`.
    #[must_use]
    pub const fn new(options: Arc<DiscoveryOptions>) -> Self {
        Self { options }
    }

    /// Collect every directory below `root` holding a manifest or structured
    /// config file, excluding `root` itself.
    ///
    /// Pruned from the walk: directories named in
    /// [`DiscoveryOptions::excluded_dirs`] at any depth, everything under
    /// `excluded_relative` (resolved against `root`), and paths matching the
    /// [`DiscoveryOptions::exclude`] globs. An `excluded_relative` that is
    /// empty or points outside `root` excludes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Scan`] if any part of the tree cannot be read, and
    /// [`Error::ConfigInvalid`] for a malformed exclude glob.
    pub async fn scan_secondary_candidates(
        &self,
        root: &Path,
        excluded_relative: Option<&Path>,
    ) -> Result<BTreeSet<PathBuf>> {
        let root = paths::normalize(root);
        let excluded = excluded_relative
            .map(paths::normalize)
            .filter(|rel| paths::is_contained(rel))
            .map(|rel| root.join(rel));
        let options = Arc::clone(&self.options);

        tokio::task::spawn_blocking(move || scan_blocking(&root, excluded.as_deref(), &options))
            .await?
    }
}

fn scan_blocking(
    root: &Path,
    excluded: Option<&Path>,
    options: &DiscoveryOptions,
) -> Result<BTreeSet<PathBuf>> {
    let patterns = options
        .exclude
        .iter()
        .map(|p| {
            Pattern::new(p)
                .map_err(|e| Error::invalid(root, format!("invalid exclude pattern '{p}': {e}")))
        })
        .collect::<Result<Vec<_>>>()?;
    let candidate_names = options.candidate_file_names();

    let keep = |entry: &DirEntry| -> bool {
        if entry.depth() == 0 {
            return true;
        }
        let path = entry.path();
        if entry.file_type().is_dir()
            && options.is_excluded_dir(&entry.file_name().to_string_lossy())
        {
            return false;
        }
        if excluded.is_some_and(|excluded| path.starts_with(excluded)) {
            return false;
        }
        if let Ok(rel) = path.strip_prefix(root)
            && patterns.iter().any(|p| p.matches_path(rel))
        {
            return false;
        }
        true
    };

    let mut candidates = BTreeSet::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(keep)
    {
        let entry = entry.map_err(|source| Error::Scan {
            source,
            path: root.to_path_buf(),
        })?;

        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !candidate_names.iter().any(|candidate| *candidate == name) {
            continue;
        }

        // Files directly under the root belong to the primary.
        match entry.path().parent() {
            Some(parent) if parent != root => {
                candidates.insert(parent.to_path_buf());
            }
            _ => {}
        }
    }

    tracing::debug!(
        root = %root.display(),
        count = candidates.len(),
        "Scanned for secondary entry points"
    );
    Ok(candidates)
}
