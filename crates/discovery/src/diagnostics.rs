//! Discovery events and where they go.
//!
//! Events are purely observational. The default [`TracingSink`] turns them
//! into structured `tracing` events on the `pkgraph::discovery` target, in
//! the same shape the CLI's subscriber renders.

use serde::Serialize;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};

/// Something worth reporting during a discovery run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DiscoveryEvent {
    /// The primary entry point was built.
    PrimaryFound {
        /// Its module id.
        module_id: String,
        /// Its source directory.
        path: PathBuf,
    },
    /// A secondary entry point was built.
    SecondaryFound {
        /// Its module id.
        module_id: String,
        /// Its source directory.
        path: PathBuf,
    },
    /// A secondary candidate was skipped.
    SecondarySkipped {
        /// The candidate directory.
        path: PathBuf,
        /// Why it was skipped.
        reason: String,
    },
}

/// Receives [`DiscoveryEvent`]s.
pub trait DiagnosticsSink: Send + Sync {
    /// Record one event.
    fn record(&self, event: &DiscoveryEvent);
}

impl<T: DiagnosticsSink + ?Sized> DiagnosticsSink for Arc<T> {
    fn record(&self, event: &DiscoveryEvent) {
        (**self).record(event);
    }
}

/// Both sinks receive every event, left first.
impl<A: DiagnosticsSink, B: DiagnosticsSink> DiagnosticsSink for (A, B) {
    fn record(&self, event: &DiscoveryEvent) {
        self.0.record(event);
        self.1.record(event);
    }
}

/// Emits events through `tracing`.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticsSink for TracingSink {
    fn record(&self, event: &DiscoveryEvent) {
        match event {
            DiscoveryEvent::PrimaryFound { module_id, path } => tracing::info!(
                target: "pkgraph::discovery",
                event_type = "primary.found",
                module_id = %module_id,
                path = %path.display(),
                "Found primary entry point"
            ),
            DiscoveryEvent::SecondaryFound { module_id, path } => tracing::info!(
                target: "pkgraph::discovery",
                event_type = "secondary.found",
                module_id = %module_id,
                path = %path.display(),
                "Found secondary entry point"
            ),
            DiscoveryEvent::SecondarySkipped { path, reason } => tracing::warn!(
                target: "pkgraph::discovery",
                event_type = "secondary.skipped",
                path = %path.display(),
                reason = %reason,
                "Skipped secondary entry point"
            ),
        }
    }
}

/// Keeps events in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    events: Mutex<Vec<DiscoveryEvent>>,
}

impl MemorySink {
    /// Create an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<DiscoveryEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Only the skip events.
    #[must_use]
    pub fn skipped(&self) -> Vec<DiscoveryEvent> {
        self.events()
            .into_iter()
            .filter(|event| matches!(event, DiscoveryEvent::SecondarySkipped { .. }))
            .collect()
    }
}

impl DiagnosticsSink for MemorySink {
    fn record(&self, event: &DiscoveryEvent) {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
    }
}
