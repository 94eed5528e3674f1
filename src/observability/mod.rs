//! Observability subsystem for rightsledger
//!
//! Structured JSON logging of registry, index, query and transaction events.
//!
//! # Principles
//!
//! 1. Observability is read-only
//! 2. No side effects on execution
//! 3. No background threads
//!
//! # Usage
//!
//! ```ignore
//! use rightsledger::observability::{log_event_with_fields, Event};
//!
//! log_event_with_fields(Event::CopyrightRegistered, &[("key", "copyright001")]);
//! ```

mod events;
mod logger;

pub use events::Event;
pub use logger::{Logger, Severity};

/// Log a lifecycle event
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a lifecycle event with fields
///
/// Anomalies are logged at WARN, everything else at INFO.
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    let severity = if event.is_anomaly() {
        Severity::Warn
    } else {
        Severity::Info
    };
    Logger::log(severity, event.as_str(), fields);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_event() {
        // Verifies no panic
        log_event(Event::Serving);
        log_event(Event::SnapshotSaved);
    }

    #[test]
    fn test_log_event_with_fields() {
        log_event_with_fields(Event::QueryRowSkipped, &[("key", "copyright9")]);
    }
}
