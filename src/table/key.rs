//! Table keys
//!
//! A record table can be addressed by position, by slice or by name.

use std::str::FromStr;

use crate::errors::{TableError, TableResult};

use super::rows::Rows;
use super::slice::SliceSpec;

/// How a caller addresses a record table
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableKey {
    /// Ordinal position, negative counts from the end
    Index(i64),
    /// A stepped range of positions
    Slice(SliceSpec),
    /// A row name, optionally with filling coefficients
    Name(String),
}

impl From<i64> for TableKey {
    fn from(index: i64) -> Self {
        TableKey::Index(index)
    }
}

impl From<SliceSpec> for TableKey {
    fn from(spec: SliceSpec) -> Self {
        TableKey::Slice(spec)
    }
}

impl FromStr for TableKey {
    type Err = TableError;

    /// `"12"` and `"-1"` are positions, anything with a `:` is a slice,
    /// everything else is a name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.contains(':') {
            return s.parse::<SliceSpec>().map(TableKey::Slice);
        }
        match s.parse::<i64>() {
            Ok(index) => Ok(TableKey::Index(index)),
            Err(_) => Ok(TableKey::Name(s.to_string())),
        }
    }
}

/// The result of [`RecordTable::select`](super::RecordTable::select)
pub enum Selection<'t, T> {
    One(T),
    Many(Rows<'t, T>),
}

impl<'t, T> Selection<'t, T> {
    /// Collect into a vector, stopping at the first failed page.
    ///
    /// Holds every selected row at once; iterate `Many` directly for large
    /// slices.
    pub fn into_vec(self) -> TableResult<Vec<T>> {
        match self {
            Selection::One(item) => Ok(vec![item]),
            Selection::Many(rows) => rows.collect(),
        }
    }
}
