//! CLI configuration loaded from environment variables.
//!
//! # Environment Variables
//!
//! ## Optional
//! - `SHOPFRONT_CATALOG_PATH` - JSON catalog to use instead of the built-in one
//! - `SHOPFRONT_AUTO_CONFIRM` - Answer every confirmation with yes (default: false)
//! - `RUST_LOG` - Log filter (default: `shopfront_cli=info,shopfront_store=info`)

use std::path::PathBuf;

use thiserror::Error;

/// Configuration errors that can occur during loading.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("Invalid environment variable {0}: {1}")]
    InvalidEnvVar(String, String),
}

/// CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CliConfig {
    /// Catalog file; `None` uses the built-in dataset
    pub catalog_path: Option<PathBuf>,
    /// Skip confirmation prompts
    pub auto_confirm: bool,
}

impl CliConfig {
    /// Load configuration from environment variables.
    ///
    /// Calls `dotenvy::dotenv()` to load from `.env` file if present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        // Load .env file if present (ignore errors if not found)
        let _ = dotenvy::dotenv();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary variable source.
    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let catalog_path = lookup("SHOPFRONT_CATALOG_PATH")
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from);
        let auto_confirm = lookup("SHOPFRONT_AUTO_CONFIRM")
            .map(|value| parse_bool("SHOPFRONT_AUTO_CONFIRM", &value))
            .transpose()?
            .unwrap_or(false);

        Ok(Self {
            catalog_path,
            auto_confirm,
        })
    }
}

// =============================================================================
// Helper Functions
// =============================================================================

/// Parse a boolean flag value.
fn parse_bool(key: &str, value: &str) -> Result<bool, ConfigError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(ConfigError::InvalidEnvVar(
            key.to_string(),
            format!("expected true or false, got {other:?}"),
        )),
    }
}
