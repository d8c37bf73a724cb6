//! Read-only connection provider
//!
//! The knot database is produced by an external build step and may be shared
//! by several processes at once. It is only ever opened with
//! `SQLITE_OPEN_READ_ONLY` through a `file:<path>?mode=ro` URI.
//!
//! SQLite opens lazily, so every new connection is probed with a query
//! against `sqlite_master`. A missing file, an unreadable file or a file that
//! is not a database fails here, at construction, never later.

use std::path::Path;

use rusqlite::{Connection, OpenFlags};

use crate::errors::{TableError, TableResult};
use crate::observability::{log_event_with_fields, Event};

/// Builds the `file:` URI for a read-only open.
///
/// Characters SQLite treats as URI delimiters are percent-encoded.
pub fn read_only_uri(path: &Path) -> String {
    let raw = path.to_string_lossy();
    let mut uri = String::with_capacity(raw.len() + 16);
    uri.push_str("file:");
    for c in raw.chars() {
        match c {
            '%' => uri.push_str("%25"),
            '?' => uri.push_str("%3f"),
            '#' => uri.push_str("%23"),
            c => uri.push(c),
        }
    }
    uri.push_str("?mode=ro");
    uri
}

/// Opens the database at `path` in read-only mode and verifies it is readable.
pub fn open_read_only(path: &Path) -> TableResult<Connection> {
    let uri = read_only_uri(path);
    let flags = OpenFlags::SQLITE_OPEN_READ_ONLY
        | OpenFlags::SQLITE_OPEN_URI
        | OpenFlags::SQLITE_OPEN_NO_MUTEX;

    let result = Connection::open_with_flags(&uri, flags)
        .map_err(|e| {
            TableError::connection_failed(format!("Failed to open {}", path.display()), e)
        })
        .and_then(|conn| {
            // `conn` is dropped (and closed) if the probe fails.
            probe(&conn).map_err(|e| {
                TableError::connection_failed(
                    format!("{} is not a readable database", path.display()),
                    e,
                )
            })?;
            Ok(conn)
        });

    let display = path.display().to_string();
    match &result {
        Ok(_) => log_event_with_fields(Event::ConnectionOpened, &[("path", &display)]),
        Err(e) => log_event_with_fields(
            Event::ConnectionFailed,
            &[("path", &display), ("error", &e.to_string())],
        ),
    }
    result
}

fn probe(conn: &Connection) -> rusqlite::Result<i64> {
    conn.query_row("SELECT COUNT(*) FROM sqlite_master", [], |row| row.get(0))
}
