//! Key-code table
//!
//! The minimal read path: name in, DT code out. No filter, no finalizer and
//! no domain objects.

use std::cell::Cell;
use std::fmt;
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};

use crate::connection::open_read_only;
use crate::errors::{TableError, TableResult};
use crate::observability::{log_event_with_fields, trace_query, Event};

use super::definition::TableDefinition;

/// Looks up one code column by row name.
pub struct KeyCodeTable {
    definition: TableDefinition,
    connection: Connection,
    lookup_sql: String,
    count_sql: String,
    queries: Cell<u64>,
}

impl KeyCodeTable {
    /// Opens the table read-only, failing fast on a missing file or column.
    pub fn open(db_path: &Path, definition: TableDefinition) -> TableResult<Self> {
        definition.validate()?;
        let connection = open_read_only(db_path)?;

        let lookup_sql = format!(
            "SELECT {} FROM {} WHERE name = ?1 LIMIT 1",
            definition.code_column, definition.table
        );
        let count_sql = format!("SELECT COUNT(*) FROM {}", definition.table);

        connection.prepare(&lookup_sql).map_err(|e| {
            TableError::connection_failed(
                format!(
                    "Table '{}' in {} has no name/{} columns",
                    definition.table,
                    db_path.display(),
                    definition.code_column
                ),
                e,
            )
        })?;

        log_event_with_fields(
            Event::CodeTableOpened,
            &[
                ("column", &definition.code_column),
                ("name", &definition.display_name),
                ("table", &definition.table),
            ],
        );

        Ok(Self {
            definition,
            connection,
            lookup_sql,
            count_sql,
            queries: Cell::new(0),
        })
    }

    pub fn name(&self) -> &str {
        &self.definition.display_name
    }

    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    /// Number of queries issued by this table so far
    pub fn queries_executed(&self) -> u64 {
        self.queries.get()
    }

    /// The code stored for `name`.
    ///
    /// Duplicate names are not policed; the first matching row wins.
    pub fn lookup(&self, name: &str) -> TableResult<String> {
        self.note_query(&self.lookup_sql);

        let code: Option<String> = self
            .connection
            .prepare_cached(&self.lookup_sql)
            .and_then(|mut stmt| stmt.query_row([name], |row| row.get(0)).optional())
            .map_err(|e| self.query_failed(e))?;

        code.ok_or_else(|| {
            log_event_with_fields(
                Event::LookupMiss,
                &[("key", name), ("name", &self.definition.display_name)],
            );
            TableError::not_found(name)
        })
    }

    /// Whether a row named `name` exists
    pub fn contains(&self, name: &str) -> TableResult<bool> {
        match self.lookup(name) {
            Ok(_) => Ok(true),
            Err(e) if e.is_not_found() => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Total row count, unfiltered
    pub fn len(&self) -> TableResult<u64> {
        self.note_query(&self.count_sql);

        let count: i64 = self
            .connection
            .query_row(&self.count_sql, [], |row| row.get(0))
            .map_err(|e| self.query_failed(e))?;

        Ok(count.max(0) as u64)
    }

    pub fn is_empty(&self) -> TableResult<bool> {
        Ok(self.len()? == 0)
    }

    fn note_query(&self, sql: &str) {
        self.queries.set(self.queries.get() + 1);
        trace_query(sql);
    }

    fn query_failed(&self, e: rusqlite::Error) -> TableError {
        let err = TableError::query_failed(
            format!("Query on '{}' failed", self.definition.display_name),
            e,
        );
        log_event_with_fields(Event::QueryFailed, &[("error", &err.to_string())]);
        err
    }
}

impl fmt::Display for KeyCodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition.display_name)
    }
}

impl fmt::Debug for KeyCodeTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("KeyCodeTable")
            .field("definition", &self.definition)
            .finish()
    }
}
