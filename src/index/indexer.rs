//! Composite Key Indexer
//!
//! Index entries are marker records: the composite key carries the
//! information, the value is the single byte `0x00`. Entries are written
//! alongside their document inside the same host transaction and are never
//! updated or removed.

use super::spec::IndexSpec;
use crate::ledger::LedgerStub;
use crate::observability::{Event, Logger};
use crate::store::{StoreError, StoreResult};

/// Sentinel value stored under every index entry
pub const INDEX_MARKER: [u8; 1] = [0x00];

/// Writes secondary index entries
pub struct CompositeKeyIndexer;

impl CompositeKeyIndexer {
    /// Derive the composite key for a full index entry
    pub fn make_composite_key<S>(stub: &S, index: &IndexSpec, components: &[&str]) -> StoreResult<String>
    where
        S: LedgerStub + ?Sized,
    {
        index.check_entry(components)?;
        stub.create_composite_key(index.name(), components)
            .map_err(StoreError::invalid_composite_key)
    }

    /// Write the marker record for `components` under `index`
    ///
    /// Returns the composite key written.
    pub fn register_index_entry<S>(stub: &mut S, index: &IndexSpec, components: &[&str]) -> StoreResult<String>
    where
        S: LedgerStub + ?Sized,
    {
        let key = Self::make_composite_key(stub, index, components)?;
        stub.put_state(&key, INDEX_MARKER.to_vec())
            .map_err(|e| StoreError::write_failed(&key, e))?;

        Logger::trace(
            Event::IndexEntryRegistered.as_str(),
            &[("index", index.name()), ("primary_key", components[components.len() - 1])],
        );
        Ok(key)
    }
}
