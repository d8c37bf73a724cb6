//! Shared fixtures for the integration tests
//!
//! Builds a small plausible_knots database in a temp dir. The layout matches
//! the shipped file: a base table and the `plausible_knots_view` view the
//! tables read from.

#![allow(dead_code)]

use std::path::PathBuf;

use rusqlite::{params, Connection};
use tempfile::TempDir;

/// (name, DT code, cusps) in `id` order, ids starting at 1
pub const ROWS: &[(&str, &str, i64)] = &[
    ("K6a3", "fafbdfeac.010001", 1),
    ("K8n1", "hahbdFaGCHE.00010101", 1),
    ("L6a2", "fdbfeac.010110", 2),
    ("K12n242", "lalcfhjkbiegad.001011010110", 1),
    ("L8n3", "hbdfhegca.01101011", 2),
    ("16a52086", "papbefiadkmcngojhpl.0000110111110010", 1),
    ("16n992421", "papdeghaNbcLMOPIFJK.0000101100001111", 1),
    ("L10a1", "jcefhijabgd.0100110101", 3),
    ("18ah_4028506", "rarpqekhibncfrdoglmaj.000110110100100011", 1),
    ("18nh_07319980", "rarePNkoHQlABcrgJdIFm.001011101011110000", 1),
    ("18ns_86", "rarnDqMjOKaPlGeBhFRcI.000001010011110011", 1),
    ("K12a100", "lalbdfhjlkacegi.000000000000", 1),
];

/// A fixture database that lives as long as the value
pub struct Fixture {
    _dir: TempDir,
    pub path: PathBuf,
}

impl Fixture {
    /// The standard twelve-row dataset
    pub fn standard() -> Self {
        Self::with_rows(ROWS)
    }

    /// A dataset with the given rows
    pub fn with_rows(rows: &[(&str, &str, i64)]) -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plausible_knots.sqlite");

        let mut conn = Connection::open(&path).expect("Failed to create fixture");
        let tx = conn.transaction().expect("Failed to begin fixture transaction");
        tx.execute_batch(
            "CREATE TABLE plausible_knots (
                 id INTEGER PRIMARY KEY,
                 name TEXT NOT NULL,
                 triangulation BLOB,
                 DT TEXT NOT NULL,
                 cusps INTEGER NOT NULL
             );
             CREATE INDEX plausible_knots_name ON plausible_knots(name);
             CREATE VIEW plausible_knots_view AS
                 SELECT id, name, triangulation, DT, cusps FROM plausible_knots;",
        )
        .expect("Failed to create schema");

        // Insert in reverse so storage order differs from id order.
        for (i, (name, dt, cusps)) in rows.iter().enumerate().rev() {
            tx.execute(
                "INSERT INTO plausible_knots (id, name, triangulation, DT, cusps)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![(i + 1) as i64, name, triangulation_for(name), dt, cusps],
            )
            .expect("Failed to insert fixture row");
        }
        tx.commit().expect("Failed to commit fixture");
        drop(conn);

        Self { _dir: dir, path }
    }

    /// A dataset of `n` generated rows, see [`generated_row`]
    pub fn sized(n: usize) -> Self {
        let owned: Vec<(String, String, i64)> = (0..n).map(generated_row).collect();
        let rows: Vec<(&str, &str, i64)> = owned
            .iter()
            .map(|(name, dt, cusps)| (name.as_str(), dt.as_str(), *cusps))
            .collect();
        Self::with_rows(&rows)
    }

    /// A valid SQLite file without the knot tables
    pub fn wrong_schema() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("plausible_knots.sqlite");

        let conn = Connection::open(&path).expect("Failed to create fixture");
        conn.execute_batch("CREATE TABLE unrelated (x INTEGER);")
            .expect("Failed to create schema");
        drop(conn);

        Self { _dir: dir, path }
    }

    /// A path inside the temp dir where nothing exists
    pub fn missing() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let path = dir.path().join("absent.sqlite");
        Self { _dir: dir, path }
    }

    /// Count rows directly, bypassing the crate
    pub fn count_where(&self, clause: &str) -> u64 {
        let conn = Connection::open(&self.path).expect("Failed to reopen fixture");
        let sql = format!("SELECT COUNT(*) FROM plausible_knots_view WHERE {}", clause);
        let count: i64 = conn.query_row(&sql, [], |row| row.get(0)).unwrap();
        count as u64
    }
}

/// The stored triangulation text for a fixture row
pub fn triangulation_for(name: &str) -> Vec<u8> {
    format!("% Triangulation\n{}\n", name).into_bytes()
}

/// Row `i` of a generated dataset: alternating for even `i`, a link for
/// every third `i`
pub fn generated_row(i: usize) -> (String, String, i64) {
    let flavor = if i % 2 == 0 { 'a' } else { 'n' };
    let prefix = if i % 3 == 0 { 'L' } else { 'K' };
    let cusps = if i % 3 == 0 { 2 } else { 1 };
    (
        format!("{}{}{}{}", prefix, 10 + i % 9, flavor, i),
        format!("dt.{:06}", i),
        cusps,
    )
}

/// Names of the fixture rows matching `keep`, in id order
pub fn names_where(keep: impl Fn(&str, i64) -> bool) -> Vec<String> {
    ROWS.iter()
        .filter(|(name, _, cusps)| keep(name, *cusps))
        .map(|(name, _, _)| name.to_string())
        .collect()
}
