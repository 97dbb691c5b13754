//! `pkgraph discover`: print the package graph of a library.

use crate::cli::{DiscoverArgs, OkEnvelope, OutputFormat};
use pkgraph_discovery::{
    Discovery, DiscoveryEvent, DiscoveryOptions, MemorySink, PackageGraph, Result, TracingSink,
};
use serde::Serialize;
use std::fmt::Write;
use std::sync::Arc;

/// JSON payload: the graph plus the candidates that were left out.
#[derive(Debug, Serialize)]
struct DiscoverOutput<'a> {
    #[serde(flatten)]
    graph: &'a PackageGraph,
    skipped: Vec<DiscoveryEvent>,
}

fn options_from(args: &DiscoverArgs) -> DiscoveryOptions {
    DiscoveryOptions {
        exclude: args.exclude.clone(),
        require_secondary_config: args.require_secondary_config,
        concurrency: args.concurrency,
        ..DiscoveryOptions::default()
    }
}

/// Execute the discover command.
///
/// Skipped secondaries are logged as warnings and also listed in the
/// output.
///
/// # Errors
///
/// Returns an error if the primary entry point cannot be resolved, the
/// project cannot be scanned, or the output fails to serialize.
pub async fn execute_discover(args: &DiscoverArgs) -> Result<String> {
    let memory = Arc::new(MemorySink::new());
    let discovery = Discovery::new(options_from(args))
        .with_sink(Arc::new((TracingSink, Arc::clone(&memory))));

    let graph = discovery.discover(&args.path).await?;
    let skipped = memory.skipped();
    tracing::debug!(
        entry_points = graph.len(),
        skipped = skipped.len(),
        "Discovery finished"
    );

    match args.format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(&OkEnvelope::new(
            DiscoverOutput {
                graph: &graph,
                skipped,
            },
        ))?),
        OutputFormat::Text => Ok(render_text(&graph, &skipped)),
    }
}

fn render_text(graph: &PackageGraph, skipped: &[DiscoveryEvent]) -> String {
    let mut out = String::new();
    let primary = graph.primary();
    let _ = writeln!(out, "Primary:");
    let _ = writeln!(
        out,
        "  {} -> {}",
        primary.module_id(),
        primary.destination_path().display()
    );

    let _ = writeln!(out, "Secondaries ({}):", graph.secondaries().len());
    for secondary in graph.secondaries() {
        let _ = writeln!(
            out,
            "  {} -> {}",
            secondary.module_id(),
            secondary.destination_path().display()
        );
    }

    if !skipped.is_empty() {
        let _ = writeln!(out, "Skipped ({}):", skipped.len());
        for event in skipped {
            if let DiscoveryEvent::SecondarySkipped { path, reason } = event {
                let _ = writeln!(out, "  {}: {reason}", path.display());
            }
        }
    }

    out.trim_end().to_string()
}
