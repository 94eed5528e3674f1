//! Host ledger boundary for rightsledger
//!
//! The core never owns durable state. Every registry operation receives a
//! `LedgerStub` handle for the transaction it runs in and reads/writes through
//! it. Commit, endorsement and concurrency control belong to the host.
//!
//! # Contents
//!
//! - `LedgerStub` / `StateCursor`: the host contract
//! - `MemoryLedger` / `Transaction`: an in-memory host with all-or-nothing
//!   transactions, fault injection and checksummed snapshots
//!
//! # Invariants
//!
//! - Composite keys and primary keys occupy disjoint key spaces
//! - Rich queries never return composite-key entries
//! - Iteration order is key order

mod checksum;
mod composite;
mod errors;
mod filter;
mod memory;
mod snapshot;

pub use checksum::{compute_checksum, verify_checksum};
pub use composite::{is_composite, COMPOSITE_KEY_NAMESPACE};
pub use errors::{LedgerError, LedgerResult};
pub use filter::SelectorFilter;
pub use memory::{FaultPlan, MemoryLedger, Transaction};

/// One row yielded by a host cursor
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResponse {
    /// Key the value is stored under
    pub key: String,
    /// Raw stored bytes
    pub value: Vec<u8>,
}

/// Single-pass host cursor over query results
///
/// A cursor must be closed once the caller is done with it, on every exit
/// path. `query::ScopedCursor` enforces that.
pub trait StateCursor {
    /// Returns true if `next` will yield another row
    fn has_next(&self) -> bool;

    /// Yield the next row
    fn next(&mut self) -> LedgerResult<QueryResponse>;

    /// Release the cursor. Closing twice is an error.
    fn close(&mut self) -> LedgerResult<()>;
}

/// The host ledger contract consumed by the core
pub trait LedgerStub {
    /// Write `value` under `key`, overwriting any prior value
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()>;

    /// Read the value under `key`; `None` if the key was never written
    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>>;

    /// Run a selector query, e.g. `{"selector":{"docType":"copyright"}}`
    fn get_query_result(&self, query: &str) -> LedgerResult<Box<dyn StateCursor + '_>>;

    /// Ordered scan of every composite key extending the given partial key
    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<Box<dyn StateCursor + '_>>;

    /// Build a composite key. Deterministic and injective.
    fn create_composite_key(&self, object_type: &str, attributes: &[&str]) -> LedgerResult<String> {
        composite::encode(object_type, attributes)
    }

    /// Inverse of `create_composite_key`
    fn split_composite_key(&self, key: &str) -> LedgerResult<(String, Vec<String>)> {
        composite::decode(key)
    }
}
