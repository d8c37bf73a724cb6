//! Session configuration
//!
//! A JSON file naming the backing database and a few defaults:
//!
//! ```json
//! {
//!   "database_path": "/opt/knots/plausible_knots.sqlite",
//!   "log_level": "warn",
//!   "default_filter": { "knots_vs_links": "knots" }
//! }
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::errors::TableError;
use crate::filter::FilterOptions;
use crate::observability::Severity;
use crate::table::definition::is_identifier;
use crate::table::TableDefinition;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The file is not valid configuration JSON
    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    /// A field holds an unusable value
    #[error("Invalid config: {0}")]
    Invalid(String),

    /// The default filter does not parse
    #[error("Invalid default_filter: {0}")]
    Filter(#[from] TableError),
}

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Path to the knot database (required)
    pub database_path: PathBuf,

    /// Minimum log severity (optional, default "warn")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Column pinning positional order (optional, default "id")
    #[serde(default = "default_order_column")]
    pub order_column: String,

    /// Filter applied to every record table (optional)
    #[serde(default)]
    pub default_filter: BTreeMap<String, String>,
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_order_column() -> String {
    "id".to_string()
}

impl Config {
    /// Configuration with defaults for everything but the database path
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        Self {
            database_path: database_path.into(),
            log_level: default_log_level(),
            order_column: default_order_column(),
            default_filter: BTreeMap::new(),
        }
    }

    /// Load and validate configuration from file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config: Config = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every field without touching the database
    pub fn validate(&self) -> ConfigResult<()> {
        if self.database_path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("database_path must not be empty".into()));
        }

        self.severity()?;

        if !is_identifier(&self.order_column) {
            return Err(ConfigError::Invalid(format!(
                "order_column '{}' is not a plain SQL identifier",
                self.order_column
            )));
        }

        self.filter_options()?;
        Ok(())
    }

    /// The configured minimum log severity
    pub fn severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse::<Severity>().map_err(ConfigError::Invalid)
    }

    /// The record table definition with the configured order column
    pub fn record_definition(&self) -> TableDefinition {
        TableDefinition::plausible_knots().with_order_column(self.order_column.clone())
    }

    /// The configured default filter
    pub fn filter_options(&self) -> ConfigResult<FilterOptions> {
        Ok(FilterOptions::from_pairs(&self.default_filter)?)
    }
}
