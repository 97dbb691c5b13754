//! Command implementations.
//!
//! Each command returns its rendered output; printing is left to `main`.

pub mod discover;
pub mod schema;

use crate::cli::{CliError, Commands};

/// Run one parsed subcommand.
///
/// # Errors
///
/// Returns the command's failure mapped to a [`CliError`].
pub async fn execute(command: Commands) -> Result<String, CliError> {
    match command {
        Commands::Discover(args) => discover::execute_discover(&args)
            .await
            .map_err(CliError::from),
        Commands::Schema => schema::execute_schema().map_err(CliError::from),
    }
}
