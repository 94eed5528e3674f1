//! Observable events for rightsledger
//!
//! Events are explicit and typed.

use std::fmt;

/// Observable events
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Lifecycle
    /// Configuration loaded
    ConfigLoaded,
    /// Ledger data directory initialized
    LedgerInitialized,
    /// Serve loop entered
    Serving,

    // Registry writes
    /// Copyright document written
    CopyrightRegistered,
    /// Rights-holder report filed
    ReportFiled,
    /// Rights-holder verdict changed
    VerdictChanged,
    /// Authority report received
    InvestigationOpened,
    /// Authority investigation status changed
    StatusChanged,
    /// Rights-holder report forwarded to the authority channel
    ReportReferred,

    // Index
    /// Composite-key marker written
    IndexEntryRegistered,
    /// Index entry points at a missing document
    StaleIndexEntry,

    // Query
    /// Rich query executed
    QueryExecuted,
    /// Row dropped by the skip-and-continue decode policy
    QueryRowSkipped,
    /// Cursor close failed while releasing
    CursorReleaseFailed,

    // Transactions
    /// Transaction write set applied
    TxCommitted,
    /// Transaction dropped with pending writes
    TxDiscarded,

    // Persistence
    /// Ledger snapshot loaded
    SnapshotLoaded,
    /// Ledger snapshot written
    SnapshotSaved,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::LedgerInitialized => "LEDGER_INITIALIZED",
            Event::Serving => "RIGHTSLEDGER_SERVING",

            Event::CopyrightRegistered => "COPYRIGHT_REGISTERED",
            Event::ReportFiled => "REPORT_FILED",
            Event::VerdictChanged => "REPORT_VERDICT_CHANGED",
            Event::InvestigationOpened => "INVESTIGATION_OPENED",
            Event::StatusChanged => "INVESTIGATION_STATUS_CHANGED",
            Event::ReportReferred => "REPORT_REFERRED",

            Event::IndexEntryRegistered => "INDEX_ENTRY_REGISTERED",
            Event::StaleIndexEntry => "INDEX_ENTRY_STALE",

            Event::QueryExecuted => "QUERY_COMPLETE",
            Event::QueryRowSkipped => "QUERY_ROW_SKIPPED",
            Event::CursorReleaseFailed => "CURSOR_RELEASE_FAILED",

            Event::TxCommitted => "TX_COMMITTED",
            Event::TxDiscarded => "TX_DISCARDED",

            Event::SnapshotLoaded => "SNAPSHOT_LOADED",
            Event::SnapshotSaved => "SNAPSHOT_SAVED",
        }
    }

    /// Returns true if this event reports a tolerated anomaly
    pub fn is_anomaly(&self) -> bool {
        matches!(
            self,
            Event::StaleIndexEntry
                | Event::QueryRowSkipped
                | Event::CursorReleaseFailed
                | Event::TxDiscarded
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
    fn test_anomalies() {
        assert!(Event::QueryRowSkipped.is_anomaly());
        assert!(Event::StaleIndexEntry.is_anomaly());
        assert!(!Event::CopyrightRegistered.is_anomaly());
    }
}
