//! plausible_knots - read-only filtered lookup over the plausibly slice
//! knots database
//!
//! The dataset ships as one SQLite file. This crate never writes to it:
//!
//! - [`RecordTable`] is a filtered, ordered view over the knot rows, indexed
//!   by position, slice or name, producing a caller-chosen type per row.
//! - [`KeyCodeTable`] maps a knot or link name to its DT code.
//! - [`get_tables`] and [`get_dt_tables`] build both from a database path.
//!
//! ```ignore
//! use plausible_knots::{get_tables, FilterOptions, KnotExterior};
//!
//! let mut tables = get_tables::<KnotExterior>(path)?;
//! let table = &mut tables[0];
//! table.configure(&FilterOptions::new().with_crossings(12).with_alternating(false));
//! let last = table.get(-1)?;
//! ```

pub mod cli;
pub mod config;
pub mod connection;
pub mod errors;
pub mod exterior;
pub mod filter;
pub mod name;
pub mod observability;
pub mod registry;
pub mod table;

pub use config::{Config, ConfigError};
pub use errors::{TableError, TableErrorCode, TableResult};
pub use exterior::{link_exteriors, raw_rows, Finalizer, KnotExterior, LinkExterior};
pub use filter::{FilterCompiler, FilterOptions, KnotsVsLinks, Predicate};
pub use name::{split_filling_info, Filling, KnotName};
pub use registry::{get_dt_tables, get_dt_tables_with, get_tables, get_tables_with, DATABASE_FILE_NAME};
pub use table::{
    KeyCodeTable, RawRow, RecordTable, ResolvedSlice, Rows, Selection, SliceSpec, TableDefinition,
    TableKey,
};
