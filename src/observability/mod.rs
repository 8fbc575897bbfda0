//! Observability subsystem for georange
//!
//! - Structured logging (JSON lines on stderr)
//! - Typed lifecycle events
//! - Scope-based begin/complete logging
//! - Usage counters
//!
//! Observability is read-only: it never changes what an operation does.
//!
//! ```ignore
//! use georange::observability::{Logger, Event, ObservationScope};
//!
//! Logger::info("LOOKUP_EXECUTED", &[("address", "3.0.0.1")]);
//!
//! let scope = ObservationScope::new("IMPORT");
//! // ... do work ...
//! scope.complete();
//! ```

mod events;
mod logger;
mod metrics;
mod scope;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};
pub use scope::{ObservationScope, Timer};

fn event_severity(event: Event) -> Severity {
    if event.is_failure() {
        Severity::Error
    } else if event.is_warning() {
        Severity::Warn
    } else {
        Severity::Info
    }
}

/// Log a lifecycle event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event_severity(event), event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_severity() {
        assert_eq!(event_severity(Event::LoadFailed), Severity::Error);
        assert_eq!(event_severity(Event::RangeConflict), Severity::Warn);
        assert_eq!(event_severity(Event::SaveComplete), Severity::Info);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::SourceSkipped, &[("path", "/tmp/a.gz")]);
    }
}
