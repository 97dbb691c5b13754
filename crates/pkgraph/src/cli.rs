use crate::tracing::{LogLevel, TracingFormat};
use clap::{Args, Parser, Subcommand, ValueEnum};
use miette::{Diagnostic, Report};
use pkgraph_discovery::options::DEFAULT_CONCURRENCY;
use serde::Serialize;
use std::io::{self, Write};
use std::path::PathBuf;
use thiserror::Error;

/// Exit codes for the CLI application
pub const EXIT_OK: i32 = 0;
/// Configuration error exit code
pub const EXIT_CONFIG: i32 = 2;
/// Any other failure
pub const EXIT_ERROR: i32 = 3;

/// CLI-specific error types with proper exit code mapping
#[derive(Error, Debug, Clone, Diagnostic)]
pub enum CliError {
    /// The primary entry point could not be found or its configuration is
    /// invalid (exit code 2)
    #[error("Configuration error: {message}")]
    #[diagnostic(code(pkgraph::cli::config))]
    Config {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
    /// Other unexpected error (exit code 3)
    #[error("Unexpected error: {message}")]
    #[diagnostic(code(pkgraph::cli::other))]
    Other {
        /// The error message
        message: String,
        /// Optional help text
        #[help]
        help: Option<String>,
    },
}

impl CliError {
    /// Create a new configuration error
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            help: None,
        }
    }

    /// Create a new other error
    #[must_use]
    pub fn other(message: impl Into<String>) -> Self {
        Self::Other {
            message: message.into(),
            help: None,
        }
    }

    /// Replace the help text.
    #[must_use]
    pub fn with_help(self, help_text: impl Into<String>) -> Self {
        let help = Some(help_text.into());
        match self {
            Self::Config { message, .. } => Self::Config { message, help },
            Self::Other { message, .. } => Self::Other { message, help },
        }
    }
}

/// Configuration problems exit with 2, everything else with 3. The
/// library's help text is carried over.
impl From<pkgraph_discovery::Error> for CliError {
    fn from(err: pkgraph_discovery::Error) -> Self {
        let help = err.help().map(|help| help.to_string());
        let converted = if err.is_configuration() {
            Self::config(err.to_string())
        } else {
            Self::other(err.to_string())
        };
        match help {
            Some(help) => converted.with_help(help),
            None => converted,
        }
    }
}

/// Map CLI error to appropriate exit code
#[must_use]
pub const fn exit_code_for(err: &CliError) -> i32 {
    match err {
        CliError::Config { .. } => EXIT_CONFIG,
        CliError::Other { .. } => EXIT_ERROR,
    }
}

/// Render an error to the user.
///
/// In JSON mode the error goes to stdout as an [`ErrorEnvelope`] so that
/// scripted callers always get parseable output.
pub fn render_error(err: &CliError, json_mode: bool) {
    if json_mode {
        let error_envelope = ErrorEnvelope::new(serde_json::json!({
            "code": match err {
                CliError::Config { .. } => "config",
                CliError::Other { .. } => "other",
            },
            "message": err.to_string()
        }));

        match serde_json::to_string(&error_envelope) {
            Ok(json) => println!("{json}"),
            Err(_) => eprintln!("Error serializing error response"),
        }
    } else {
        let report = Report::new(err.clone());
        eprintln!("{report:?}");
        let _ = io::stderr().flush();
    }
}

/// Output format for command results
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, ValueEnum, Default)]
pub enum OutputFormat {
    /// One line per entry point
    #[default]
    Text,
    /// The package graph as JSON
    Json,
}

/// Success response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct OkEnvelope<T> {
    /// Status indicator - always "ok" for success
    pub status: &'static str,
    /// The actual data payload
    pub data: T,
}

impl<T> OkEnvelope<T> {
    /// Create a new success envelope
    #[must_use]
    pub const fn new(data: T) -> Self {
        Self { status: "ok", data }
    }
}

/// Error response envelope for JSON output
#[derive(Debug, Clone, Serialize)]
pub struct ErrorEnvelope<E> {
    /// Status indicator - always "error" for failures
    pub status: &'static str,
    /// The error details
    pub error: E,
}

impl<E> ErrorEnvelope<E> {
    /// Create a new error envelope
    #[must_use]
    pub const fn new(error: E) -> Self {
        Self {
            status: "error",
            error,
        }
    }
}

/// Discover the entry points of a library package.
#[derive(Parser, Debug)]
#[command(name = "pkgraph")]
#[command(about = "Discover the primary and secondary entry points of a library package")]
#[command(long_about = None)]
#[command(version)]
pub struct Cli {
    /// The subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,

    /// Logging verbosity level.
    #[arg(
        short = 'L',
        long,
        global = true,
        env = "PKGRAPH_LEVEL",
        default_value = "warn",
        value_enum
    )]
    pub level: LogLevel,

    /// Log output format.
    #[arg(
        long,
        global = true,
        env = "PKGRAPH_LOG_FORMAT",
        default_value = "pretty",
        value_enum
    )]
    pub log_format: TracingFormat,
}

impl Cli {
    /// Whether errors should be rendered as JSON envelopes.
    #[must_use]
    pub const fn json_mode(&self) -> bool {
        matches!(
            &self.command,
            Commands::Discover(DiscoverArgs {
                format: OutputFormat::Json,
                ..
            })
        )
    }
}

/// Available CLI subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover the package graph of a library.
    #[command(about = "Discover the primary and secondary entry points under PATH")]
    Discover(DiscoverArgs),
    /// Print the entry-point configuration schema.
    #[command(about = "Print the JSON Schema of entry-point configuration")]
    Schema,
}

/// Arguments of `pkgraph discover`.
#[derive(Args, Debug, Clone)]
pub struct DiscoverArgs {
    /// Project directory or a file inside it.
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Output format.
    #[arg(long, short = 'f', value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,

    /// Glob of paths, relative to the project, to leave out of the scan.
    #[arg(long = "exclude", value_name = "GLOB")]
    pub exclude: Vec<String>,

    /// Skip secondary candidates that carry no entry-point configuration.
    #[arg(long)]
    pub require_secondary_config: bool,

    /// Maximum number of candidates resolved at once.
    #[arg(long, default_value_t = DEFAULT_CONCURRENCY)]
    pub concurrency: usize,
}

/// Parse command line arguments.
#[must_use]
pub fn parse() -> Cli {
    Cli::parse()
}
