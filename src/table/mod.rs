//! Read-only knot tables
//!
//! Two table shapes share one backing file:
//!
//! - [`RecordTable`]: a filtered view producing finalized rows by position,
//!   slice, name or at random.
//! - [`KeyCodeTable`]: name to DT code, nothing else.
//!
//! # Resource Model
//!
//! Each table owns exactly one read-only connection, closed on drop. A table
//! is `Send` but not `Sync`: move it between threads freely, share it only
//! behind a lock. Any number of tables may read the same file at once.

pub mod definition;
mod key;
mod key_code;
mod record;
pub(crate) mod row;
mod rows;
mod slice;

pub use definition::TableDefinition;
pub use key::{Selection, TableKey};
pub use key_code::KeyCodeTable;
pub use record::RecordTable;
pub use row::RawRow;
pub use rows::Rows;
pub use slice::{ResolvedSlice, SliceSpec};
