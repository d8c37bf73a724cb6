//! Observability for knot table sessions
//!
//! Structured JSON logging and typed lifecycle events.
//!
//! # Usage
//!
//! ```ignore
//! use plausible_knots::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::TableOpened, &[("table", "plausible_knots_view")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity, DEFAULT_LEVEL};

fn severity_for(event: Event) -> Severity {
    if event.is_fatal() {
        Severity::Fatal
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(severity_for(event), event.as_str(), fields);
}

/// Log a per-query detail line
pub fn trace_query(sql: &str) {
    Logger::trace("QUERY", &[("sql", sql)]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(severity_for(Event::ConnectionFailed), Severity::Fatal);
        assert_eq!(severity_for(Event::UnknownFilterOption), Severity::Warn);
        assert_eq!(severity_for(Event::TableOpened), Severity::Info);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::ConfigLoaded, &[("database_path", "/tmp/x")]);
        log_event_with_fields(Event::TableOpened, &[]);
    }
}
