//! Construction entry points
//!
//! The enclosing toolkit builds its tables through these two functions. The
//! backing file is always passed in explicitly.

use std::path::Path;

use crate::errors::TableResult;
use crate::exterior::{link_exteriors, LinkExterior};
use crate::table::{KeyCodeTable, RecordTable, TableDefinition};

/// File name of the dataset as shipped
pub const DATABASE_FILE_NAME: &str = "plausible_knots.sqlite";

/// All record tables in the file, producing `M` for every row.
pub fn get_tables<M: LinkExterior + 'static>(db_path: &Path) -> TableResult<Vec<RecordTable<M>>> {
    get_tables_with(db_path, &[TableDefinition::plausible_knots()])
}

/// Record tables for explicit definitions
pub fn get_tables_with<M: LinkExterior + 'static>(
    db_path: &Path,
    definitions: &[TableDefinition],
) -> TableResult<Vec<RecordTable<M>>> {
    definitions
        .iter()
        .map(|definition| RecordTable::open(db_path, definition.clone(), link_exteriors::<M>()))
        .collect()
}

/// All DT code lookup tables in the file.
pub fn get_dt_tables(db_path: &Path) -> TableResult<Vec<KeyCodeTable>> {
    get_dt_tables_with(db_path, &[TableDefinition::plausible_knot_dt_codes()])
}

/// DT code lookup tables for explicit definitions
pub fn get_dt_tables_with(
    db_path: &Path,
    definitions: &[TableDefinition],
) -> TableResult<Vec<KeyCodeTable>> {
    definitions
        .iter()
        .map(|definition| KeyCodeTable::open(db_path, definition.clone()))
        .collect()
}
