//! Observable table events
//!
//! Events are explicit and typed. Every log line emitted by the tables
//! names one of these.

use std::fmt;

/// Observable events during a query session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration file loaded
    ConfigLoaded,
    /// Backing file opened read-only
    ConnectionOpened,
    /// Backing file could not be opened (FATAL)
    ConnectionFailed,
    /// Record table constructed
    TableOpened,
    /// Key-code table constructed
    CodeTableOpened,

    // Filtering
    /// Filter predicate extended
    TableConfigured,
    /// Unrecognized filter option dropped at the string boundary
    UnknownFilterOption,
    /// Filter option rejected
    FilterRejected,

    // Queries
    /// Query failed against an open connection
    QueryFailed,
    /// Key lookup matched no row
    LookupMiss,
    /// Random sample drawn
    RandomSample,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::ConnectionOpened => "CONNECTION_OPENED",
            Event::ConnectionFailed => "CONNECTION_FAILED",
            Event::TableOpened => "TABLE_OPENED",
            Event::CodeTableOpened => "CODE_TABLE_OPENED",

            Event::TableConfigured => "TABLE_CONFIGURED",
            Event::UnknownFilterOption => "UNKNOWN_FILTER_OPTION",
            Event::FilterRejected => "FILTER_REJECTED",

            Event::QueryFailed => "QUERY_FAILED",
            Event::LookupMiss => "LOOKUP_MISS",
            Event::RandomSample => "RANDOM_SAMPLE",
        }
    }

    /// Returns true if this event indicates a fatal condition
    pub fn is_fatal(&self) -> bool {
        matches!(self, Event::ConnectionFailed)
    }

    /// Events that describe a rejected or dropped input
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::UnknownFilterOption | Event::FilterRejected | Event::LookupMiss
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
