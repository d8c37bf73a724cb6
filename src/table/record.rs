//! Record table
//!
//! A filtered, read-only view over one knot table. The view is never loaded
//! into memory: every access issues its own bounded SELECT under a pinned
//! `ORDER BY`, so positions are reproducible across calls and sessions.
//!
//! # Filtering
//!
//! [`RecordTable::configure`] is additive. Each call ANDs its options onto the
//! predicate built by earlier calls, so a table can only ever be narrowed.
//! [`RecordTable::view`] opens a fresh table when a new, independent filter is
//! wanted.

use std::cell::Cell;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use rand::Rng;
use rusqlite::types::Value;
use rusqlite::{params_from_iter, Connection};

use crate::connection::open_read_only;
use crate::errors::{TableError, TableResult};
use crate::exterior::Finalizer;
use crate::filter::{FilterCompiler, FilterOptions, Predicate};
use crate::name::{split_filling_info, KnotName};
use crate::observability::{log_event_with_fields, trace_query, Event};

use super::definition::TableDefinition;
use super::key::{Selection, TableKey};
use super::row::RawRow;
use super::rows::Rows;
use super::slice::SliceSpec;

/// Position of the order column in every selected row, after [`RawRow::COLUMNS`]
const ORDER_KEY_INDEX: usize = 4;

/// A row paired with its order column value
pub(crate) type KeyedRow = (Value, RawRow);

/// A filtered view over a knot table, producing `T` for every row.
pub struct RecordTable<T> {
    definition: TableDefinition,
    db_path: PathBuf,
    connection: Connection,
    /// `SELECT <columns>, <order column> FROM <table>`
    select: String,
    predicate: Predicate,
    finalizer: Finalizer<T>,
    queries: Cell<u64>,
}

impl<T> RecordTable<T> {
    /// Opens the table read-only.
    ///
    /// Fails with a connection error when the file cannot be opened or the
    /// table lacks the expected columns.
    pub fn open(
        db_path: &Path,
        definition: TableDefinition,
        finalizer: Finalizer<T>,
    ) -> TableResult<Self> {
        definition.validate()?;
        let connection = open_read_only(db_path)?;

        let select = format!(
            "SELECT {}, {} FROM {}",
            RawRow::COLUMNS,
            definition.order_column,
            definition.table
        );
        connection
            .prepare(&format!(
                "{} ORDER BY {} LIMIT 0",
                select, definition.order_column
            ))
            .map_err(|e| {
                TableError::connection_failed(
                    format!(
                        "Table '{}' in {} lacks the expected columns",
                        definition.table,
                        db_path.display()
                    ),
                    e,
                )
            })?;

        log_event_with_fields(
            Event::TableOpened,
            &[
                ("name", &definition.display_name),
                ("path", &db_path.display().to_string()),
                ("table", &definition.table),
            ],
        );

        Ok(Self {
            definition,
            db_path: db_path.to_path_buf(),
            connection,
            select,
            predicate: Predicate::new(),
            finalizer,
            queries: Cell::new(0),
        })
    }

    /// Opens an independent table over the same file with only `options`
    /// applied.
    pub fn view(&self, options: &FilterOptions) -> TableResult<Self> {
        let mut table = Self::open(
            &self.db_path,
            self.definition.clone(),
            Arc::clone(&self.finalizer),
        )?;
        table.configure(options);
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.definition.display_name
    }

    pub fn definition(&self) -> &TableDefinition {
        &self.definition
    }

    pub fn path(&self) -> &Path {
        &self.db_path
    }

    /// The current filter predicate
    pub fn predicate(&self) -> &Predicate {
        &self.predicate
    }

    /// Number of queries issued by this table so far
    pub fn queries_executed(&self) -> u64 {
        self.queries.get()
    }

    /// Narrows the view by `options`, ANDed onto any earlier filter.
    pub fn configure(&mut self, options: &FilterOptions) {
        self.predicate = FilterCompiler::extend(&self.predicate, options);
        log_event_with_fields(
            Event::TableConfigured,
            &[
                ("name", &self.definition.display_name),
                ("predicate", &self.predicate.sql()),
            ],
        );
    }

    /// Narrows the view by untyped key/value options.
    ///
    /// Bad values fail here, before any query runs; the predicate is left
    /// untouched in that case.
    pub fn configure_pairs<I, K, V>(&mut self, pairs: I) -> TableResult<()>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let options = FilterOptions::from_pairs(pairs)?;
        self.configure(&options);
        Ok(())
    }

    /// Number of rows in the filtered view
    pub fn len(&self) -> TableResult<u64> {
        let sql = format!(
            "SELECT COUNT(*) FROM {}{}",
            self.definition.table,
            self.predicate.where_clause()
        );
        self.note_query(&sql);

        let count: i64 = self
            .connection
            .query_row(
                &sql,
                params_from_iter(self.predicate.params().iter()),
                |row| row.get(0),
            )
            .map_err(|e| query_failed(&sql, e))?;

        Ok(count.max(0) as u64)
    }

    pub fn is_empty(&self) -> TableResult<bool> {
        Ok(self.len()? == 0)
    }

    /// The row at `index` in the filtered view; negative indices count from
    /// the end.
    pub fn get(&self, index: i64) -> TableResult<T> {
        let len = self.len()?;
        let position = resolve_index(index, len)?;
        let row = self.fetch_position(position)?;
        Ok(self.finalize(row))
    }

    /// Lazily iterates over a slice of the filtered view.
    pub fn slice(&self, spec: SliceSpec) -> TableResult<Rows<'_, T>> {
        let resolved = spec.resolve(self.len()?)?;
        Ok(Rows::new(self, resolved))
    }

    /// Lazily iterates over the whole filtered view in order.
    pub fn iter(&self) -> TableResult<Rows<'_, T>> {
        self.slice(SliceSpec::full())
    }

    /// Looks a row up by name, e.g. `K6a3` or `K6a3(1,0)`.
    ///
    /// Name lookups go straight to the name column and ignore the filter.
    pub fn get_by_name(&self, key: &str) -> TableResult<T> {
        let (name, fillings) = split_filling_info(key)?;

        if KnotName::parse(name).is_none() {
            return Err(self.lookup_miss(key));
        }

        let sql = format!(
            "{} WHERE name = ? ORDER BY {} LIMIT 1",
            self.select, self.definition.order_column
        );
        let mut rows = self.query_rows(&sql, &[Value::Text(name.to_string())])?;

        match rows.pop() {
            Some((_, mut row)) => {
                row.fillings = fillings;
                Ok(self.finalize(row))
            }
            None => Err(self.lookup_miss(key)),
        }
    }

    /// Dispatches on the kind of key.
    pub fn select(&self, key: TableKey) -> TableResult<Selection<'_, T>> {
        match key {
            TableKey::Index(index) => self.get(index).map(Selection::One),
            TableKey::Name(name) => self.get_by_name(&name).map(Selection::One),
            TableKey::Slice(spec) => self.slice(spec).map(Selection::Many),
        }
    }

    /// A uniformly chosen row of the filtered view.
    pub fn random(&self) -> TableResult<T> {
        self.random_with(&mut rand::thread_rng())
    }

    /// A uniformly chosen row, drawing from `rng`.
    pub fn random_with<R: Rng>(&self, rng: &mut R) -> TableResult<T> {
        let len = self.len()?;
        if len == 0 {
            return Err(TableError::index_out_of_range(0, 0));
        }

        let position = rng.gen_range(0..len);
        log_event_with_fields(
            Event::RandomSample,
            &[
                ("name", &self.definition.display_name),
                ("position", &position.to_string()),
            ],
        );

        let row = self.fetch_position(position)?;
        Ok(self.finalize(row))
    }

    pub(crate) fn finalize(&self, row: RawRow) -> T {
        (self.finalizer)(row)
    }

    /// One row at an already resolved position
    pub(crate) fn fetch_position(&self, position: u64) -> TableResult<RawRow> {
        self.fetch_window(position, 1)?
            .pop()
            .map(|(_, row)| row)
            .ok_or_else(|| TableError::index_out_of_range(position as i64, position))
    }

    /// Up to `limit` consecutive rows starting at position `offset`, with
    /// their order keys.
    ///
    /// SQLite walks every skipped row, so this is only used to seek.
    pub(crate) fn fetch_window(&self, offset: u64, limit: u64) -> TableResult<Vec<KeyedRow>> {
        let sql = format!(
            "{}{} ORDER BY {} LIMIT ? OFFSET ?",
            self.select,
            self.predicate.where_clause(),
            self.definition.order_column
        );

        let mut params = self.predicate.params().to_vec();
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(offset as i64));

        self.query_rows(&sql, &params)
    }

    /// Up to `limit` rows past the row keyed `key`, walking forwards or
    /// backwards through the order column, after skipping `skip` of them.
    pub(crate) fn fetch_keyed(
        &self,
        key: &Value,
        forward: bool,
        skip: u64,
        limit: u64,
    ) -> TableResult<Vec<KeyedRow>> {
        let order = &self.definition.order_column;
        let (comparison, direction) = if forward { (">", "ASC") } else { ("<", "DESC") };

        let mut conditions = self.predicate.sql();
        if !conditions.is_empty() {
            conditions.push_str(" AND ");
        }
        conditions.push_str(&format!("{} {} ?", order, comparison));

        let sql = format!(
            "{} WHERE {} ORDER BY {} {} LIMIT ? OFFSET ?",
            self.select, conditions, order, direction
        );

        let mut params = self.predicate.params().to_vec();
        params.push(key.clone());
        params.push(Value::Integer(limit as i64));
        params.push(Value::Integer(skip as i64));

        self.query_rows(&sql, &params)
    }

    fn query_rows(&self, sql: &str, params: &[Value]) -> TableResult<Vec<KeyedRow>> {
        self.note_query(sql);

        let mut stmt = self
            .connection
            .prepare_cached(sql)
            .map_err(|e| query_failed(sql, e))?;
        let rows = stmt
            .query_map(params_from_iter(params.iter()), |row| {
                Ok((row.get::<_, Value>(ORDER_KEY_INDEX)?, RawRow::from_sql_row(row)?))
            })
            .map_err(|e| query_failed(sql, e))?;

        let collected: rusqlite::Result<Vec<KeyedRow>> = rows.collect();
        collected.map_err(|e| query_failed(sql, e))
    }

    fn note_query(&self, sql: &str) {
        self.queries.set(self.queries.get() + 1);
        trace_query(sql);
    }

    fn lookup_miss(&self, key: &str) -> TableError {
        log_event_with_fields(
            Event::LookupMiss,
            &[("key", key), ("name", &self.definition.display_name)],
        );
        TableError::not_found(key)
    }
}

impl<T> fmt::Display for RecordTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.definition.display_name)
    }
}

impl<T> fmt::Debug for RecordTable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordTable")
            .field("definition", &self.definition)
            .field("db_path", &self.db_path)
            .field("predicate", &self.predicate.sql())
            .finish()
    }
}

/// Maps `index` into `[0, len)`, counting negative indices from the end.
pub(crate) fn resolve_index(index: i64, len: u64) -> TableResult<u64> {
    let signed_len = i64::try_from(len).unwrap_or(i64::MAX);
    let position = if index < 0 { index + signed_len } else { index };

    if position < 0 || position >= signed_len {
        return Err(TableError::index_out_of_range(index, len));
    }
    Ok(position as u64)
}

fn query_failed(sql: &str, e: rusqlite::Error) -> TableError {
    let err = TableError::query_failed(format!("Query failed: {}", sql), e);
    log_event_with_fields(Event::QueryFailed, &[("error", &err.to_string())]);
    err
}
