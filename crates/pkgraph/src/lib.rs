//! pkgraph - command line front end for library entry-point discovery
//!
//! The binary is a thin layer over [`pkgraph_discovery`]: it parses
//! arguments, installs a tracing subscriber, runs one command and maps
//! failures to exit codes.

// CLI output goes to stdout/stderr directly
#![allow(clippy::print_stdout, clippy::print_stderr)]

/// CLI argument parsing and exit codes.
pub mod cli;
/// Command implementations.
pub mod commands;
/// Tracing subscriber setup.
pub mod tracing;
