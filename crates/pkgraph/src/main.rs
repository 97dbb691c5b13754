//! pkgraph binary entry point.

// CLI binary needs to output to stdout/stderr - this is intentional
#![allow(clippy::print_stdout, clippy::print_stderr)]

use pkgraph::cli::{self, EXIT_ERROR, EXIT_OK, exit_code_for, render_error};
use pkgraph::commands;
use pkgraph::tracing::{TracingConfig, init_tracing};

fn main() {
    // NOTE: Using eprintln! in panic hook is intentional - the subscriber
    // may be unusable during a panic.
    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Application panicked: {panic_info}");
        eprintln!("Internal error occurred. Run with RUST_LOG=debug for more information.");
    }));

    let cli = cli::parse();
    std::process::exit(run_with_tokio(cli));
}

/// Create tokio runtime and run the command
fn run_with_tokio(cli: cli::Cli) -> i32 {
    let rt = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Fatal error: Failed to create tokio runtime: {e}");
            return EXIT_ERROR;
        }
    };

    rt.block_on(run(cli))
}

async fn run(cli: cli::Cli) -> i32 {
    let tracing_config = TracingConfig {
        format: cli.log_format,
        level: cli.level.into(),
        ..Default::default()
    };
    // Ignore error if tracing already initialized
    let _ = init_tracing(tracing_config);

    let json_mode = cli.json_mode();
    match commands::execute(cli.command).await {
        Ok(output) => {
            println!("{output}");
            EXIT_OK
        }
        Err(err) => {
            render_error(&err, json_mode);
            exit_code_for(&err)
        }
    }
}
