//! CLI error types

use thiserror::Error;

use crate::config::ConfigError;
use crate::errors::TableError;

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;

/// Everything that can end a CLI invocation
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration missing or invalid
    #[error("KNOTS_CLI_CONFIG_ERROR: {0}")]
    Config(#[from] ConfigError),

    /// No database path from either the flags or the configuration file
    #[error("KNOTS_CLI_CONFIG_ERROR: no database path; pass --database or --config")]
    NoDatabase,

    /// Invalid command-line value
    #[error("KNOTS_CLI_USAGE_ERROR: {0}")]
    Usage(String),

    /// A table operation failed
    #[error("{0}")]
    Table(#[from] TableError),

    /// Writing output failed
    #[error("KNOTS_CLI_IO_ERROR: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing output failed
    #[error("KNOTS_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CliError {
    /// Process exit status for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Table(e) if e.is_not_found() => 3,
            CliError::Table(e) if e.is_fatal() => 4,
            CliError::Table(_) => 1,
            CliError::Config(_) | CliError::NoDatabase | CliError::Usage(_) => 2,
            CliError::Io(_) | CliError::Json(_) => 1,
        }
    }
}
