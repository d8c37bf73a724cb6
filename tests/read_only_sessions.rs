//! Read-Only Session Tests
//!
//! Tests for:
//! - Construction fails fast on a missing or foreign file
//! - The backing file is never modified
//! - Independent tables read the same file concurrently
//! - The CLI runs a full session from a config file

mod common;

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;

use clap::Parser;
use common::{Fixture, ROWS};
use plausible_knots::cli::{run_cli, Cli};
use plausible_knots::{
    get_dt_tables, get_tables, get_tables_with, Config, FilterOptions, KnotExterior,
    KnotsVsLinks, TableDefinition, TableErrorCode,
};

// =============================================================================
// Connection Failures
// =============================================================================

#[test]
fn test_missing_file_fails_at_construction() {
    let fixture = Fixture::missing();

    let err = get_tables::<KnotExterior>(&fixture.path).unwrap_err();
    assert_eq!(err.code(), TableErrorCode::KnotsConnectionFailed);
    assert!(err.is_fatal());

    assert!(get_dt_tables(&fixture.path).unwrap_err().is_fatal());

    // Opening read-only never creates the file.
    assert!(!fixture.path.exists());
}

#[test]
fn test_non_database_file_fails_at_construction() {
    let fixture = Fixture::missing();
    fs::write(&fixture.path, b"this is not a sqlite database at all").unwrap();

    let err = get_tables::<KnotExterior>(&fixture.path).unwrap_err();
    assert_eq!(err.code(), TableErrorCode::KnotsConnectionFailed);
}

#[test]
fn test_wrong_schema_fails_at_construction() {
    let fixture = Fixture::wrong_schema();

    assert_eq!(
        get_tables::<KnotExterior>(&fixture.path).unwrap_err().code(),
        TableErrorCode::KnotsConnectionFailed
    );
    assert_eq!(
        get_dt_tables(&fixture.path).unwrap_err().code(),
        TableErrorCode::KnotsConnectionFailed
    );
}

#[test]
fn test_bad_definition_rejected_before_open() {
    let fixture = Fixture::missing();
    let definition =
        TableDefinition::plausible_knots().with_order_column("id; DROP TABLE x".to_string());

    let err = get_tables_with::<KnotExterior>(&fixture.path, &[definition]).unwrap_err();
    assert_eq!(err.code(), TableErrorCode::KnotsBadConfiguration);
}

// =============================================================================
// Read-Only
// =============================================================================

#[test]
fn test_session_leaves_file_unchanged() {
    let fixture = Fixture::standard();
    let before = fs::read(&fixture.path).unwrap();

    {
        let mut table = get_tables::<KnotExterior>(&fixture.path).unwrap().pop().unwrap();
        table.configure(&FilterOptions::new().with_alternating(true));
        let _ = table.len().unwrap();
        let _ = table.get(-1).unwrap();
        let _ = table.random().unwrap();
        let _: Vec<_> = table.iter().unwrap().collect();

        let codes = get_dt_tables(&fixture.path).unwrap().pop().unwrap();
        let _ = codes.lookup("K6a3").unwrap();
    }

    assert_eq!(fs::read(&fixture.path).unwrap(), before);
}

// =============================================================================
// Concurrency
// =============================================================================

#[test]
fn test_concurrent_construction_and_reads() {
    let fixture = Arc::new(Fixture::standard());
    let barrier = Arc::new(Barrier::new(4));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let fixture = Arc::clone(&fixture);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                barrier.wait();
                let mut table = get_tables::<KnotExterior>(&fixture.path)
                    .unwrap()
                    .pop()
                    .unwrap();
                if i % 2 == 0 {
                    table.configure(&FilterOptions::new().with_knots_vs_links(KnotsVsLinks::Links));
                }
                let codes = get_dt_tables(&fixture.path).unwrap().pop().unwrap();

                let len = table.len().unwrap();
                let last = table.get(-1).unwrap();
                assert_eq!(codes.lookup(last.name()).unwrap(), last.dt_code());
                len
            })
        })
        .collect();

    let lens: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(lens, vec![3, ROWS.len() as u64, 3, ROWS.len() as u64]);
}

#[test]
fn test_table_moves_between_threads() {
    let fixture = Fixture::standard();
    let table = get_tables::<KnotExterior>(&fixture.path).unwrap().pop().unwrap();

    let name = thread::spawn(move || table.get(0).unwrap().name().to_string())
        .join()
        .unwrap();
    assert_eq!(name, "K6a3");
}

// =============================================================================
// CLI Sessions
// =============================================================================

#[test]
fn test_cli_runs_from_config_file() {
    let fixture = Fixture::standard();
    let config_path = fixture.path.with_file_name("knots.json");

    let mut config = Config::new(&fixture.path);
    config.log_level = "error".to_string();
    config
        .default_filter
        .insert("knots_vs_links".to_string(), "links".to_string());
    fs::write(&config_path, serde_json::to_string(&config).unwrap()).unwrap();

    let config_arg = config_path.to_string_lossy().to_string();
    let config_arg = config_arg.as_str();
    for args in [
        vec!["plausible-knots", "--config", config_arg, "count"],
        vec!["plausible-knots", "--config", config_arg, "get", "0:2", "--cusps", "2"],
        vec!["plausible-knots", "--config", config_arg, "random"],
        vec!["plausible-knots", "--config", config_arg, "dt", "K6a3", "18ns_86"],
    ] {
        let cli = Cli::try_parse_from(args).unwrap();
        run_cli(cli).unwrap();
    }
}

#[test]
fn test_cli_reports_missing_names() {
    let fixture = Fixture::standard();
    let database = fixture.path.to_string_lossy().to_string();

    let cli = Cli::try_parse_from([
        "plausible-knots",
        "--database",
        database.as_str(),
        "--log-level",
        "fatal",
        "dt",
        "K6a3",
        "K99a1",
    ])
    .unwrap();

    let err = run_cli(cli).unwrap_err();
    assert_eq!(err.exit_code(), 3);
}

#[test]
fn test_cli_requires_a_database() {
    let cli = Cli::try_parse_from(["plausible-knots", "count"]).unwrap();
    assert_eq!(run_cli(cli).unwrap_err().exit_code(), 2);
}
