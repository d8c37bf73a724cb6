//! Command-line interface
//!
//! Provides:
//! - count: Number of rows in the filtered view
//! - get: Rows by position, slice or name
//! - random: One uniformly chosen row
//! - dt: DT codes by name

mod args;
mod commands;
mod errors;
mod io;

pub use args::{Cli, Command, FilterArgs};
pub use commands::{count, dt, get, random, run, run_cli, run_command};
pub use errors::{CliError, CliResult};
pub use io::{write_json_line, write_json_line_to, write_selection};
