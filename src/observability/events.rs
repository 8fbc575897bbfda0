//! Observability events for georange
//!
//! Every lifecycle point that is logged has a typed event here.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Configuration
    /// Configuration loaded
    ConfigLoaded,

    // Import
    /// One registry file imported
    SourceImported,
    /// File skipped (already known, unsupported format)
    SourceSkipped,
    /// File failed to import
    SourceFailed,
    /// Registry line could not be parsed
    MalformedLine,
    /// Range dropped because another code already owns it on that date
    RangeConflict,

    // Repair
    /// Repair pass started
    RepairBegin,
    /// Repair pass finished
    RepairComplete,

    // Persistence
    /// Combined database saved
    SaveComplete,
    /// Combined database loaded
    LoadComplete,
    /// Combined database could not be loaded
    LoadFailed,

    // Query
    /// Lookup answered
    LookupExecuted,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",

            Event::SourceImported => "SOURCE_IMPORTED",
            Event::SourceSkipped => "SOURCE_SKIPPED",
            Event::SourceFailed => "SOURCE_FAILED",
            Event::MalformedLine => "MALFORMED_LINE",
            Event::RangeConflict => "RANGE_CONFLICT",

            Event::RepairBegin => "REPAIR_BEGIN",
            Event::RepairComplete => "REPAIR_COMPLETE",

            Event::SaveComplete => "SAVE_COMPLETE",
            Event::LoadComplete => "LOAD_COMPLETE",
            Event::LoadFailed => "LOAD_FAILED",

            Event::LookupExecuted => "LOOKUP_EXECUTED",
        }
    }

    /// Returns true if this event indicates a failure
    pub fn is_failure(&self) -> bool {
        matches!(self, Event::SourceFailed | Event::LoadFailed)
    }

    /// Returns true if this event is a recoverable data problem
    pub fn is_warning(&self) -> bool {
        matches!(
            self,
            Event::SourceSkipped | Event::MalformedLine | Event::RangeConflict
        )
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_events_have_string_representation() {
        let events = [
            Event::ConfigLoaded,
            Event::SourceImported,
            Event::SourceSkipped,
            Event::SourceFailed,
            Event::MalformedLine,
            Event::RangeConflict,
            Event::RepairBegin,
            Event::RepairComplete,
            Event::SaveComplete,
            Event::LoadComplete,
            Event::LoadFailed,
            Event::LookupExecuted,
        ];

        for event in events {
            let s = event.as_str();
            assert!(!s.is_empty());
            assert!(s.chars().all(|c| c.is_uppercase() || c == '_'));
        }
    }

    #[test]
    fn test_failure_and_warning_are_disjoint() {
        assert!(Event::LoadFailed.is_failure());
        assert!(!Event::LoadFailed.is_warning());
        assert!(Event::RangeConflict.is_warning());
        assert!(!Event::RangeConflict.is_failure());
        assert!(!Event::SourceImported.is_failure());
    }

    #[test]
    fn test_event_display() {
        assert_eq!(format!("{}", Event::RepairComplete), "REPAIR_COMPLETE");
    }
}
