//! Index-scan read path
//!
//! Walks every entry under a partial composite key and returns the trailing
//! primary-key component, in key order. Entries are markers; their values are
//! never read.

use super::spec::IndexSpec;
use crate::ledger::LedgerStub;
use crate::query::ScopedCursor;
use crate::store::{StoreError, StoreResult};

/// Reads primary keys out of a composite-key index
pub struct IndexScan;

impl IndexScan {
    /// Primary keys of every entry whose leading components equal `prefix`
    pub fn primary_keys<S>(stub: &S, index: &IndexSpec, prefix: &[&str]) -> StoreResult<Vec<String>>
    where
        S: LedgerStub + ?Sized,
    {
        index.check_prefix(prefix)?;

        let cursor = stub
            .get_state_by_partial_composite_key(index.name(), prefix)
            .map_err(|e| StoreError::query_failed(format!("failed to scan index {}", index), e))?;
        let mut cursor = ScopedCursor::new(cursor, index.name());

        let mut keys = Vec::new();
        while let Some(row) = cursor.next_row()? {
            let (_, mut components) = stub
                .split_composite_key(&row.key)
                .map_err(StoreError::invalid_composite_key)?;

            if components.len() != index.arity() {
                return Err(StoreError::decode_failed(
                    &row.key,
                    format!("index {} entry has {} components", index, components.len()),
                ));
            }
            if let Some(primary_key) = components.pop() {
                keys.push(primary_key);
            }
        }
        cursor.finish()?;

        Ok(keys)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::index::{CompositeKeyIndexer, AUTHOR_ID, COPYRIGHT_ID};
    use crate::ledger::{FaultPlan, MemoryLedger};
    use crate::store::StoreErrorCode;

    #[test]
    fn test_scan_returns_primary_keys_for_prefix() {
        let mut ledger = MemoryLedger::new();
        for (copyright, report) in [
            ("copyright001", "report011"),
            ("copyright002", "report012"),
            ("copyright001", "report010"),
            ("copyright0010", "report013"),
        ] {
            CompositeKeyIndexer::register_index_entry(&mut ledger, &COPYRIGHT_ID, &[copyright, report])
                .unwrap();
        }

        let keys = IndexScan::primary_keys(&ledger, &COPYRIGHT_ID, &["copyright001"]).unwrap();
        assert_eq!(keys, vec!["report010", "report011"]);
        assert_eq!(ledger.open_cursors(), 0);
    }

    #[test]
    fn test_scan_does_not_cross_indexes() {
        let mut ledger = MemoryLedger::new();
        CompositeKeyIndexer::register_index_entry(&mut ledger, &AUTHOR_ID, &["x", "copyright001"]).unwrap();
        CompositeKeyIndexer::register_index_entry(&mut ledger, &COPYRIGHT_ID, &["x", "report001"]).unwrap();

        assert_eq!(
            IndexScan::primary_keys(&ledger, &AUTHOR_ID, &[]).unwrap(),
            vec!["copyright001"]
        );
    }

    #[test]
    fn test_full_prefix_is_rejected() {
        let ledger = MemoryLedger::new();
        let err = IndexScan::primary_keys(&ledger, &AUTHOR_ID, &["A", "copyright001"]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::InvalidKey);
    }

    #[test]
    fn test_rejected_scan_is_query_failure() {
        let mut ledger = MemoryLedger::new();
        ledger.set_faults(FaultPlan::reject_queries());
        let err = IndexScan::primary_keys(&ledger, &AUTHOR_ID, &["A"]).unwrap_err();
        assert_eq!(err.code(), StoreErrorCode::QueryFailure);
    }
}
