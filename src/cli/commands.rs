//! CLI command implementations
//!
//! Every command resolves a session first: the configuration file (when one
//! is given), the database path and the log level. Record commands then open
//! the record table, apply the configured default filter followed by the
//! filter flags, and print JSON lines.

use std::io;

use serde_json::json;

use super::args::{Cli, Command, FilterArgs};
use super::errors::{CliError, CliResult};
use super::io::{write_json_line, write_selection};
use crate::config::Config;
use crate::errors::TableError;
use crate::exterior::KnotExterior;
use crate::filter::FilterOptions;
use crate::observability::{log_event_with_fields, Event, Logger, Severity};
use crate::registry::{get_dt_tables, get_tables_with};
use crate::table::{RecordTable, TableKey};

/// Run the CLI with the given arguments
pub fn run() -> CliResult<()> {
    let cli = Cli::parse_args();
    run_cli(cli)
}

/// Run a parsed invocation
pub fn run_cli(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli)?;
    run_command(&config, cli.command)
}

/// Dispatch to the appropriate command handler
pub fn run_command(config: &Config, command: Command) -> CliResult<()> {
    match command {
        Command::Count { filters } => count(config, &filters),
        Command::Get { key, filters } => get(config, &key, &filters),
        Command::Random { filters } => random(config, &filters),
        Command::Dt { names } => dt(config, &names),
    }
}

/// Build the session configuration.
///
/// `--database` overrides `database_path` from the file, `--log-level`
/// overrides `log_level`. Without a config file `--database` is required.
fn resolve_config(cli: &Cli) -> CliResult<Config> {
    let mut config = match (&cli.config, &cli.database) {
        (Some(path), database) => {
            let mut config = Config::load(path)?;
            if let Some(database) = database {
                config.database_path = database.clone();
            }
            config
        }
        (None, Some(database)) => Config::new(database.clone()),
        (None, None) => return Err(CliError::NoDatabase),
    };

    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }

    let severity: Severity = config.severity()?;
    Logger::set_level(severity);

    log_event_with_fields(
        Event::ConfigLoaded,
        &[
            ("database_path", &config.database_path.display().to_string()),
            ("log_level", severity.as_str()),
        ],
    );

    Ok(config)
}

/// Open the record table with the default filter and the flag filters applied
fn open_records(config: &Config, filters: &FilterArgs) -> CliResult<RecordTable<KnotExterior>> {
    let mut tables = get_tables_with::<KnotExterior>(&config.database_path, &[config.record_definition()])?;
    let mut table = tables
        .pop()
        .ok_or_else(|| CliError::Usage("no record table defined".to_string()))?;

    table.configure(&config.filter_options()?);
    let options = FilterOptions::from_pairs(filters.to_pairs())?;
    table.configure(&options);

    Ok(table)
}

/// Print the number of rows in the filtered view
pub fn count(config: &Config, filters: &FilterArgs) -> CliResult<()> {
    let table = open_records(config, filters)?;
    let len = table.len()?;
    write_json_line(&json!({ "table": table.name(), "count": len }))
}

/// Print the rows addressed by `key`, one per line
pub fn get(config: &Config, key: &str, filters: &FilterArgs) -> CliResult<()> {
    let table = open_records(config, filters)?;
    let key: TableKey = key.parse()?;

    let mut stdout = io::stdout().lock();
    write_selection(&mut stdout, table.select(key)?)?;
    Ok(())
}

/// Print one random row of the filtered view
pub fn random(config: &Config, filters: &FilterArgs) -> CliResult<()> {
    let table = open_records(config, filters)?;
    let record = table.random()?;
    write_json_line(&record)
}

/// Print the DT code for each name.
///
/// Every table is consulted in order. A name missing from all of them is
/// printed as an error line and makes the command fail after the remaining
/// names have been printed.
pub fn dt(config: &Config, names: &[String]) -> CliResult<()> {
    let tables = get_dt_tables(&config.database_path)?;
    let mut first_miss = None;

    for name in names {
        let mut found = None;
        for table in &tables {
            match table.lookup(name) {
                Ok(code) => {
                    found = Some(code);
                    break;
                }
                Err(e) if e.is_not_found() => continue,
                Err(e) => return Err(e.into()),
            }
        }

        match found {
            Some(code) => write_json_line(&json!({ "name": name, "DT": code }))?,
            None => {
                let err = TableError::not_found(name);
                write_json_line(&json!({
                    "name": name,
                    "status": "error",
                    "code": err.code().code(),
                    "message": err.message(),
                }))?;
                first_miss.get_or_insert(err);
            }
        }
    }

    match first_miss {
        Some(err) => Err(err.into()),
        None => Ok(()),
    }
}
