//! Filter options
//!
//! The closed set of options a record table understands. Values are typed so
//! that nothing a caller supplies can reach the SQL text unescaped.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::{TableError, TableResult};
use crate::observability::{log_event_with_fields, Event};

/// Restrict the view to knots or to links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnotsVsLinks {
    /// One component
    Knots,
    /// Two or more components
    Links,
}

impl KnotsVsLinks {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnotsVsLinks::Knots => "knots",
            KnotsVsLinks::Links => "links",
        }
    }
}

impl fmt::Display for KnotsVsLinks {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for KnotsVsLinks {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "knots" => Ok(KnotsVsLinks::Knots),
            "links" => Ok(KnotsVsLinks::Links),
            other => Err(TableError::bad_configuration(
                "knots_vs_links",
                format!("expected 'knots' or 'links', got '{}'", other),
            )),
        }
    }
}

/// Filter options accepted by [`RecordTable::configure`](crate::table::RecordTable::configure).
///
/// Every field is independent and `None` means "no constraint".
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FilterOptions {
    /// Alternating (`true`) or non-alternating (`false`) diagrams
    #[serde(default)]
    pub alternating: Option<bool>,

    /// Knots only or links only
    #[serde(default)]
    pub knots_vs_links: Option<KnotsVsLinks>,

    /// Exact crossing number
    #[serde(default)]
    pub crossings: Option<u32>,

    /// Exact number of cusps (link components)
    #[serde(default)]
    pub cusps: Option<u32>,
}

impl FilterOptions {
    /// No constraints
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_alternating(mut self, alternating: bool) -> Self {
        self.alternating = Some(alternating);
        self
    }

    pub fn with_knots_vs_links(mut self, flavor: KnotsVsLinks) -> Self {
        self.knots_vs_links = Some(flavor);
        self
    }

    pub fn with_crossings(mut self, crossings: u32) -> Self {
        self.crossings = Some(crossings);
        self
    }

    pub fn with_cusps(mut self, cusps: u32) -> Self {
        self.cusps = Some(cusps);
        self
    }

    /// True when no option is set
    pub fn is_empty(&self) -> bool {
        self.alternating.is_none()
            && self.knots_vs_links.is_none()
            && self.crossings.is_none()
            && self.cusps.is_none()
    }

    /// Parse options from untyped key/value pairs (CLI flags, config maps).
    ///
    /// Unrecognized keys are dropped with a WARN log line. A recognized key
    /// with a value that does not coerce fails with a bad-configuration error.
    pub fn from_pairs<I, K, V>(pairs: I) -> TableResult<Self>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut options = FilterOptions::new();

        for (key, value) in pairs {
            let key = key.as_ref().trim();
            let value = value.as_ref().trim();

            let applied = match key {
                "alternating" => parse_bool(key, value).map(|v| options.alternating = Some(v)),
                "knots_vs_links" => value
                    .parse::<KnotsVsLinks>()
                    .map(|v| options.knots_vs_links = Some(v)),
                "crossings" => parse_count(key, value).map(|v| options.crossings = Some(v)),
                "cusps" | "num_cusps" => parse_count(key, value).map(|v| options.cusps = Some(v)),
                _ => {
                    log_event_with_fields(Event::UnknownFilterOption, &[("key", key)]);
                    Ok(())
                }
            };

            if let Err(e) = applied {
                log_event_with_fields(
                    Event::FilterRejected,
                    &[("key", key), ("value", value)],
                );
                return Err(e);
            }
        }

        Ok(options)
    }
}

fn parse_bool(key: &str, value: &str) -> TableResult<bool> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        _ => Err(TableError::bad_configuration(
            key,
            format!("expected a boolean, got '{}'", value),
        )),
    }
}

fn parse_count(key: &str, value: &str) -> TableResult<u32> {
    value.parse::<u32>().map_err(|_| {
        TableError::bad_configuration(
            key,
            format!("expected a non-negative integer, got '{}'", value),
        )
    })
}
