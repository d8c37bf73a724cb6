//! Table error types
//!
//! Error codes:
//! - KNOTS_CONNECTION_FAILED (FATAL)
//! - KNOTS_QUERY_FAILED (ERROR)
//! - KNOTS_NOT_FOUND (ERROR)
//! - KNOTS_BAD_CONFIGURATION (ERROR)
//! - KNOTS_INDEX_OUT_OF_RANGE (ERROR)
//!
//! Nothing here is recovered internally. Every error reaches the caller with
//! the offending key, index or option in its message.

use std::fmt;

/// Severity levels for table errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// The operation failed, the table is still usable
    Error,
    /// The table cannot be used at all
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "ERROR"),
            Severity::Fatal => write!(f, "FATAL"),
        }
    }
}

/// Table error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableErrorCode {
    /// Backing file missing, unreadable or not a database
    KnotsConnectionFailed,
    /// A query failed against an open connection
    KnotsQueryFailed,
    /// A key lookup matched zero rows
    KnotsNotFound,
    /// A filter option value failed coercion
    KnotsBadConfiguration,
    /// An integer position fell outside the filtered view
    KnotsIndexOutOfRange,
}

impl TableErrorCode {
    /// Returns the string code
    pub fn code(&self) -> &'static str {
        match self {
            TableErrorCode::KnotsConnectionFailed => "KNOTS_CONNECTION_FAILED",
            TableErrorCode::KnotsQueryFailed => "KNOTS_QUERY_FAILED",
            TableErrorCode::KnotsNotFound => "KNOTS_NOT_FOUND",
            TableErrorCode::KnotsBadConfiguration => "KNOTS_BAD_CONFIGURATION",
            TableErrorCode::KnotsIndexOutOfRange => "KNOTS_INDEX_OUT_OF_RANGE",
        }
    }

    /// Returns the severity level for this error
    pub fn severity(&self) -> Severity {
        match self {
            TableErrorCode::KnotsConnectionFailed => Severity::Fatal,
            _ => Severity::Error,
        }
    }
}

impl fmt::Display for TableErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Table error type with full context
#[derive(Debug)]
pub struct TableError {
    code: TableErrorCode,
    message: String,
    source: Option<rusqlite::Error>,
}

impl TableError {
    /// The backing file could not be opened or probed (FATAL)
    pub fn connection_failed(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self {
            code: TableErrorCode::KnotsConnectionFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// A query failed after the connection was established
    pub fn query_failed(message: impl Into<String>, source: rusqlite::Error) -> Self {
        Self {
            code: TableErrorCode::KnotsQueryFailed,
            message: message.into(),
            source: Some(source),
        }
    }

    /// No row carries the given name
    pub fn not_found(key: &str) -> Self {
        Self {
            code: TableErrorCode::KnotsNotFound,
            message: format!("No row named '{}'", key),
            source: None,
        }
    }

    /// A filter option could not be coerced
    pub fn bad_configuration(option: &str, reason: impl Into<String>) -> Self {
        Self {
            code: TableErrorCode::KnotsBadConfiguration,
            message: format!("Option '{}': {}", option, reason.into()),
            source: None,
        }
    }

    /// A position outside `[-len, len)`
    pub fn index_out_of_range(index: i64, len: u64) -> Self {
        Self {
            code: TableErrorCode::KnotsIndexOutOfRange,
            message: format!("Index {} out of range for view of length {}", index, len),
            source: None,
        }
    }

    /// Returns the error code
    pub fn code(&self) -> TableErrorCode {
        self.code
    }

    /// Returns the severity level
    pub fn severity(&self) -> Severity {
        self.code.severity()
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns whether this is a fatal error
    pub fn is_fatal(&self) -> bool {
        self.severity() == Severity::Fatal
    }

    /// Returns whether a key lookup missed
    pub fn is_not_found(&self) -> bool {
        self.code == TableErrorCode::KnotsNotFound
    }
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {}: {}",
            self.code.severity(),
            self.code.code(),
            self.message
        )?;
        if let Some(ref source) = self.source {
            write!(f, " (caused by: {})", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for TableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for table operations
pub type TableResult<T> = Result<T, TableError>;
