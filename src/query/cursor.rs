//! Scoped acquisition of host cursors
//!
//! A `ScopedCursor` owns a host cursor and releases it exactly once: on
//! `finish()`, or on drop if the caller leaves early (error, `?`, panic).

use crate::ledger::{QueryResponse, StateCursor};
use crate::observability::{log_event_with_fields, Event};
use crate::store::{StoreError, StoreResult};

/// Cursor guard with guaranteed release
pub struct ScopedCursor<'a> {
    inner: Option<Box<dyn StateCursor + 'a>>,
    label: String,
}

impl<'a> ScopedCursor<'a> {
    /// Take ownership of an open host cursor
    pub fn new(cursor: Box<dyn StateCursor + 'a>, label: impl Into<String>) -> Self {
        Self {
            inner: Some(cursor),
            label: label.into(),
        }
    }

    /// Yield the next row, or `None` once exhausted
    pub fn next_row(&mut self) -> StoreResult<Option<QueryResponse>> {
        let cursor = match self.inner.as_mut() {
            Some(c) => c,
            None => return Ok(None),
        };
        if !cursor.has_next() {
            return Ok(None);
        }
        cursor
            .next()
            .map(Some)
            .map_err(|e| StoreError::query_failed(format!("cursor failed during {}", self.label), e))
    }

    /// Release the cursor now and surface any close failure
    pub fn finish(mut self) -> StoreResult<()> {
        match self.inner.take() {
            Some(mut cursor) => cursor.close().map_err(|e| {
                StoreError::query_failed(format!("failed to close cursor for {}", self.label), e)
            }),
            None => Ok(()),
        }
    }
}

impl Drop for ScopedCursor<'_> {
    fn drop(&mut self) {
        if let Some(mut cursor) = self.inner.take() {
            if let Err(e) = cursor.close() {
                log_event_with_fields(
                    Event::CursorReleaseFailed,
                    &[("query", &self.label), ("error", &e.to_string())],
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{LedgerStub, MemoryLedger};

    fn seeded() -> MemoryLedger {
        let mut ledger = MemoryLedger::new();
        for i in 0..3 {
            ledger
                .put_state(&format!("report{}", i), br#"{"docType":"report"}"#.to_vec())
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_finish_releases_cursor() {
        let ledger = seeded();
        let mut cursor = ScopedCursor::new(
            ledger.get_query_result(r#"{"selector":{}}"#).unwrap(),
            "all",
        );
        let mut seen = 0;
        while cursor.next_row().unwrap().is_some() {
            seen += 1;
        }
        assert_eq!(seen, 3);
        cursor.finish().unwrap();
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_early_exit_releases_cursor() {
        let ledger = seeded();

        fn first_key(ledger: &MemoryLedger) -> StoreResult<Option<String>> {
            let mut cursor = ScopedCursor::new(
                ledger.get_query_result(r#"{"selector":{}}"#).unwrap(),
                "first",
            );
            Ok(cursor.next_row()?.map(|row| row.key))
        }

        assert_eq!(first_key(&ledger).unwrap(), Some("report0".to_string()));
        assert_eq!(ledger.open_cursors(), 0);
    }
}
