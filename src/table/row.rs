//! Raw dataset rows

use rusqlite::types::ValueRef;
use rusqlite::Row;
use serde::{Serialize, Serializer};

use crate::name::Filling;

/// One row of a knot table, exactly as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawRow {
    pub name: String,
    /// Encoded triangulation, opaque to this crate
    #[serde(serialize_with = "serialize_triangulation")]
    pub triangulation: Vec<u8>,
    /// Dewey–Thistlethwaite code
    #[serde(rename = "DT")]
    pub dt_code: String,
    /// Number of link components
    pub cusps: i64,
    /// Fillings requested by the lookup key, empty for positional access
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub fillings: Vec<Filling>,
}

impl RawRow {
    /// Columns read for every row, in `from_sql_row` order
    pub const COLUMNS: &'static str = "name, triangulation, DT, cusps";

    /// Decode a row selected with [`RawRow::COLUMNS`].
    ///
    /// The triangulation may be stored as TEXT or BLOB.
    pub fn from_sql_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        let triangulation = match row.get_ref(1)? {
            ValueRef::Text(bytes) | ValueRef::Blob(bytes) => bytes.to_vec(),
            ValueRef::Null => Vec::new(),
            other => {
                return Err(rusqlite::Error::InvalidColumnType(
                    1,
                    "triangulation".to_string(),
                    other.data_type(),
                ))
            }
        };

        Ok(Self {
            name: row.get(0)?,
            triangulation,
            dt_code: row.get(2)?,
            cusps: row.get(3)?,
            fillings: Vec::new(),
        })
    }

    /// The triangulation as text, when it is valid UTF-8
    pub fn triangulation_text(&self) -> Option<&str> {
        std::str::from_utf8(&self.triangulation).ok()
    }
}

/// Text triangulations stay readable; binary ones are written as hex.
pub(crate) fn serialize_triangulation<S: Serializer>(
    bytes: &[u8],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match std::str::from_utf8(bytes) {
        Ok(text) => serializer.serialize_str(text),
        Err(_) => {
            let hex: String = bytes.iter().map(|b| format!("{:02x}", b)).collect();
            serializer.serialize_str(&hex)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rusqlite::Connection;

    fn select_one(conn: &Connection) -> RawRow {
        conn.query_row(
            &format!("SELECT {} FROM t", RawRow::COLUMNS),
            [],
            RawRow::from_sql_row,
        )
        .unwrap()
    }

    #[test]
    fn test_decode_text_triangulation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (name TEXT, triangulation TEXT, DT TEXT, cusps INTEGER);
             INSERT INTO t VALUES ('K6a3', 'tri-K6a3', 'fafbdfeac.010001', 1);",
        )
        .unwrap();

        let row = select_one(&conn);
        assert_eq!(row.name, "K6a3");
        assert_eq!(row.triangulation_text(), Some("tri-K6a3"));
        assert_eq!(row.dt_code, "fafbdfeac.010001");
        assert_eq!(row.cusps, 1);
        assert!(row.fillings.is_empty());
    }

    #[test]
    fn test_decode_blob_triangulation() {
        let conn = Connection::open_in_memory().unwrap();
        conn.execute_batch(
            "CREATE TABLE t (name TEXT, triangulation BLOB, DT TEXT, cusps INTEGER);
             INSERT INTO t VALUES ('K8n1', x'00ff10', 'hahbdFaGCHE.00010101', 1);",
        )
        .unwrap();

        let row = select_one(&conn);
        assert_eq!(row.triangulation, vec![0x00, 0xff, 0x10]);
        assert_eq!(row.triangulation_text(), None);

        let json = serde_json::to_value(&row).unwrap();
        assert_eq!(json["triangulation"], "00ff10");
        assert_eq!(json["DT"], "hahbdFaGCHE.00010101");
        assert!(json.get("fillings").is_none());
    }
}
