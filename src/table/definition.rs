//! Table catalog
//!
//! Every SQL identifier a table interpolates comes from a definition, and
//! every definition is checked before a connection is opened.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::{TableError, TableResult};

/// Describes one dataset variant inside the backing file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableDefinition {
    /// Name shown when the table is displayed
    pub display_name: String,
    /// Table or view to select from
    pub table: String,
    /// Unique, non-null column pinning the order of positional access.
    /// Sequences page through the view by comparing against it.
    pub order_column: String,
    /// Column returned by key-code lookups
    pub code_column: String,
}

impl TableDefinition {
    /// Knots with at most 19 crossings that are plausibly slice
    pub fn plausible_knots() -> Self {
        Self {
            display_name: "PlausibleKnots".to_string(),
            table: "plausible_knots_view".to_string(),
            order_column: "id".to_string(),
            code_column: "DT".to_string(),
        }
    }

    /// The DT code lookup over the same view
    pub fn plausible_knot_dt_codes() -> Self {
        Self {
            display_name: "PlausibleKnotDTcodes".to_string(),
            ..Self::plausible_knots()
        }
    }

    pub fn with_order_column(mut self, column: impl Into<String>) -> Self {
        self.order_column = column.into();
        self
    }

    /// Reject identifiers that are not plain SQL names
    pub fn validate(&self) -> TableResult<()> {
        check_identifier("table", &self.table)?;
        check_identifier("order_column", &self.order_column)?;
        check_identifier("code_column", &self.code_column)?;
        Ok(())
    }
}

fn identifier_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid identifier regex"))
}

/// True for names that can be spliced into SQL unquoted
pub fn is_identifier(name: &str) -> bool {
    identifier_regex().is_match(name)
}

fn check_identifier(option: &str, value: &str) -> TableResult<()> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(TableError::bad_configuration(
            option,
            format!("'{}' is not a plain SQL identifier", value),
        ))
    }
}
