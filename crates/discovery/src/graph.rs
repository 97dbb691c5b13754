//! The assembled package graph.

use crate::entry_point::EntryPoint;
use crate::error::{Error, Result};
use serde::Serialize;
use std::path::{Path, PathBuf};

/// A primary entry point and the secondaries nested under it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackageGraph {
    root_path: PathBuf,
    primary: EntryPoint,
    secondaries: Vec<EntryPoint>,
}

impl PackageGraph {
    /// Assemble a graph.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SecondaryIsPrimary`] if any secondary shares the
    /// primary's source directory.
    pub fn new(root_path: PathBuf, primary: EntryPoint, secondaries: Vec<EntryPoint>) -> Result<Self> {
        if let Some(clash) = secondaries
            .iter()
            .find(|secondary| secondary.source_path() == primary.source_path())
        {
            return Err(Error::SecondaryIsPrimary {
                path: clash.source_path().to_path_buf(),
            });
        }

        Ok(Self {
            root_path,
            primary,
            secondaries,
        })
    }

    /// Directory of the primary entry point.
    #[must_use]
    pub fn root_path(&self) -> &Path {
        &self.root_path
    }

    /// The primary entry point.
    #[must_use]
    pub const fn primary(&self) -> &EntryPoint {
        &self.primary
    }

    /// Secondary entry points, ordered by source path.
    #[must_use]
    pub fn secondaries(&self) -> &[EntryPoint] {
        &self.secondaries
    }

    /// All entry points, primary first.
    pub fn entry_points(&self) -> impl Iterator<Item = &EntryPoint> {
        std::iter::once(&self.primary).chain(self.secondaries.iter())
    }

    /// Entry point with the given module id.
    #[must_use]
    pub fn find(&self, module_id: &str) -> Option<&EntryPoint> {
        self.entry_points().find(|ep| ep.module_id() == module_id)
    }

    /// Number of entry points, primary included.
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.secondaries.len()
    }

    /// Always false: a graph has at least its primary.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }

    /// Take the graph apart.
    #[must_use]
    pub fn into_parts(self) -> (PathBuf, EntryPoint, Vec<EntryPoint>) {
        (self.root_path, self.primary, self.secondaries)
    }
}
