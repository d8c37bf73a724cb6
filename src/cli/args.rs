//! CLI argument definitions using clap
//!
//! Commands:
//! - plausible-knots count [filters]
//! - plausible-knots get <key> [filters]
//! - plausible-knots random [filters]
//! - plausible-knots dt <name>...

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Read-only lookup over the plausibly slice knots database
#[derive(Parser, Debug)]
#[command(name = "plausible-knots")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Path to plausible_knots.sqlite, overriding the configuration file
    #[arg(long, global = true)]
    pub database: Option<PathBuf>,

    /// Minimum log severity (trace, info, warn, error, fatal)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Count the rows of the filtered view
    Count {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print rows by position, by start:stop[:step] slice or by name
    Get {
        /// An integer, a slice such as 0:10:2, or a name such as K6a3
        #[arg(allow_hyphen_values = true)]
        key: String,

        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print one uniformly chosen row of the filtered view
    Random {
        #[command(flatten)]
        filters: FilterArgs,
    },

    /// Print the DT code of each named knot or link
    Dt {
        /// Row names
        #[arg(required = true)]
        names: Vec<String>,
    },
}

/// Filter flags shared by the record table commands
#[derive(Args, Debug, Default, Clone)]
pub struct FilterArgs {
    /// Only alternating (true) or non-alternating (false) diagrams
    #[arg(long)]
    pub alternating: Option<String>,

    /// Only knots or only links
    #[arg(long, value_name = "knots|links")]
    pub knots_vs_links: Option<String>,

    /// Exact crossing number
    #[arg(long)]
    pub crossings: Option<String>,

    /// Exact number of cusps
    #[arg(long)]
    pub cusps: Option<String>,

    /// Additional option as key=value (repeatable)
    #[arg(long = "filter", value_name = "KEY=VALUE")]
    pub extra: Vec<String>,
}

impl FilterArgs {
    /// Flatten into key/value pairs for `FilterOptions::from_pairs`.
    ///
    /// An `--filter` entry without `=` becomes a key with an empty value.
    pub fn to_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = Vec::new();

        let named = [
            ("alternating", &self.alternating),
            ("knots_vs_links", &self.knots_vs_links),
            ("crossings", &self.crossings),
            ("cusps", &self.cusps),
        ];
        for (key, value) in named {
            if let Some(value) = value {
                pairs.push((key.to_string(), value.clone()));
            }
        }

        for entry in &self.extra {
            let (key, value) = entry.split_once('=').unwrap_or((entry.as_str(), ""));
            pairs.push((key.trim().to_string(), value.trim().to_string()));
        }

        pairs
    }
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}
