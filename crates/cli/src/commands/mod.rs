//! Command implementations.

pub mod catalog;
pub mod quote;
pub mod session;

use shopfront_store::Catalog;
use tracing::debug;

use crate::config::CliConfig;

/// Load the configured catalog, or the built-in one.
///
/// # Errors
///
/// Returns an error if the catalog file cannot be read or is invalid.
pub async fn load_catalog(config: &CliConfig) -> Result<Catalog, Box<dyn std::error::Error>> {
    let Some(path) = &config.catalog_path else {
        return Ok(Catalog::builtin()?);
    };

    debug!(path = %path.display(), "Loading catalog from file");
    let json = tokio::fs::read_to_string(path)
        .await
        .map_err(|e| format!("Cannot read catalog {}: {e}", path.display()))?;
    Ok(Catalog::from_json(&json)?)
}
