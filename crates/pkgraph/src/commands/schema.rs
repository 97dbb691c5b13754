//! `pkgraph schema`: the JSON Schema accepted for entry-point configuration.

use pkgraph_discovery::{Result, entry_point_config_schema};

/// Render the schema as pretty-printed JSON.
///
/// # Errors
///
/// Returns an error if the schema fails to serialize.
pub fn execute_schema() -> Result<String> {
    Ok(serde_json::to_string_pretty(&entry_point_config_schema())?)
}
