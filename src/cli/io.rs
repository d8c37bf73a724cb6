//! JSON output for the CLI
//!
//! One JSON value per line on stdout, UTF-8 only. Logs go to stderr.

use std::io::{self, Write};

use serde::Serialize;

use super::errors::CliResult;
use crate::table::Selection;

/// Write one serializable value as a JSON line
pub fn write_json_line<T: Serialize>(value: &T) -> CliResult<()> {
    let mut stdout = io::stdout().lock();
    write_json_line_to(&mut stdout, value)
}

/// Write one serializable value as a JSON line to `writer`
pub fn write_json_line_to<W: Write, T: Serialize>(writer: &mut W, value: &T) -> CliResult<()> {
    serde_json::to_writer(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

/// Write every record of a selection as it is produced.
///
/// Sequences are written row by row, so output starts after the first page
/// and memory stays bounded. Returns the number of lines written.
pub fn write_selection<W: Write, T: Serialize>(
    writer: &mut W,
    selection: Selection<'_, T>,
) -> CliResult<u64> {
    match selection {
        Selection::One(record) => {
            write_json_line_to(writer, &record)?;
            Ok(1)
        }
        Selection::Many(rows) => {
            let mut written = 0;
            for record in rows {
                write_json_line_to(writer, &record?)?;
                written += 1;
            }
            Ok(written)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_line() {
        let mut buffer = Vec::new();
        write_json_line_to(&mut buffer, &json!({"count": 3})).unwrap();

        let output = String::from_utf8(buffer).unwrap();
        assert_eq!(output, "{\"count\":3}\n");
    }
}
