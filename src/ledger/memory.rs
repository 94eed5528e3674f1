//! In-memory host ledger
//!
//! World state is a `BTreeMap`, so every scan and query runs in key order and
//! is deterministic. `MemoryLedger` implements `LedgerStub` in autocommit mode;
//! `Transaction` buffers a write set and applies it all at once on commit.
//!
//! Reads inside a transaction see committed state only. A transaction dropped
//! without `commit` discards every buffered write.

use std::collections::{BTreeMap, VecDeque};
use std::convert::Infallible;
use std::mem;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use uuid::Uuid;

use super::composite;
use super::errors::{LedgerError, LedgerResult};
use super::filter::SelectorFilter;
use super::{LedgerStub, QueryResponse, StateCursor};
use crate::observability::{log_event_with_fields, Event};

/// Injected host failures
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FaultPlan {
    /// Reject every put whose key starts with this prefix
    pub reject_put_prefix: Option<String>,
    /// Fail every point read
    pub reject_reads: bool,
    /// Fail every rich query and composite-key scan
    pub reject_queries: bool,
}

impl FaultPlan {
    /// Reject puts under `prefix`
    pub fn reject_puts(prefix: impl Into<String>) -> Self {
        Self {
            reject_put_prefix: Some(prefix.into()),
            ..Self::default()
        }
    }

    /// Fail point reads
    pub fn reject_reads() -> Self {
        Self {
            reject_reads: true,
            ..Self::default()
        }
    }

    /// Fail queries and scans
    pub fn reject_queries() -> Self {
        Self {
            reject_queries: true,
            ..Self::default()
        }
    }
}

/// In-memory world state
#[derive(Debug, Default)]
pub struct MemoryLedger {
    state: BTreeMap<String, Vec<u8>>,
    faults: FaultPlan,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_state(state: BTreeMap<String, Vec<u8>>) -> Self {
        Self {
            state,
            ..Self::default()
        }
    }

    pub(crate) fn state(&self) -> &BTreeMap<String, Vec<u8>> {
        &self.state
    }

    /// Install a fault plan for subsequent operations
    pub fn set_faults(&mut self, faults: FaultPlan) {
        self.faults = faults;
    }

    /// Remove all injected faults
    pub fn clear_faults(&mut self) {
        self.faults = FaultPlan::default();
    }

    /// Number of committed keys, index markers included
    pub fn len(&self) -> usize {
        self.state.len()
    }

    /// Returns true if nothing has been committed
    pub fn is_empty(&self) -> bool {
        self.state.is_empty()
    }

    /// Committed keys in order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.state.keys().map(String::as_str)
    }

    /// Raw committed bytes under `key`, bypassing fault injection
    pub fn raw(&self, key: &str) -> Option<&[u8]> {
        self.state.get(key).map(Vec::as_slice)
    }

    /// Cursors handed out and not yet closed
    pub fn open_cursors(&self) -> usize {
        self.open_cursors.load(Ordering::SeqCst)
    }

    /// Start a transaction against this ledger
    pub fn begin(&mut self) -> Transaction<'_> {
        Transaction {
            ledger: self,
            tx_id: Uuid::new_v4(),
            writes: BTreeMap::new(),
            finished: false,
        }
    }

    fn check_put(&self, key: &str) -> LedgerResult<()> {
        if key.is_empty() {
            return Err(LedgerError::InvalidKey("key must not be empty".to_string()));
        }
        if let Some(prefix) = &self.faults.reject_put_prefix {
            if key.starts_with(prefix.as_str()) {
                return Err(LedgerError::Rejected {
                    key: key.to_string(),
                    reason: "injected write fault".to_string(),
                });
            }
        }
        Ok(())
    }

    fn read(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        if self.faults.reject_reads {
            return Err(LedgerError::Unavailable(format!("read of {:?} refused", key)));
        }
        Ok(self.state.get(key).cloned())
    }

    fn run_query(&self, query: &str) -> LedgerResult<MemoryCursor> {
        if self.faults.reject_queries {
            return Err(LedgerError::Unavailable("query engine refused".to_string()));
        }
        let filter = SelectorFilter::parse(query)?;

        let rows = self
            .state
            .iter()
            .filter(|(key, _)| !composite::is_composite(key))
            .filter(|(_, value)| {
                match serde_json::from_slice::<serde_json::Value>(value) {
                    Ok(doc) => doc.is_object() && filter.matches(&doc),
                    Err(_) => false,
                }
            })
            .map(|(key, value)| QueryResponse {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(MemoryCursor::open(rows, Arc::clone(&self.open_cursors)))
    }

    fn run_prefix_scan(&self, object_type: &str, attributes: &[&str]) -> LedgerResult<MemoryCursor> {
        if self.faults.reject_queries {
            return Err(LedgerError::Unavailable("range scan refused".to_string()));
        }
        let prefix = composite::encode(object_type, attributes)?;

        let rows = self
            .state
            .range(prefix.clone()..)
            .take_while(|(key, _)| key.starts_with(&prefix))
            .map(|(key, value)| QueryResponse {
                key: key.clone(),
                value: value.clone(),
            })
            .collect();

        Ok(MemoryCursor::open(rows, Arc::clone(&self.open_cursors)))
    }
}

impl LedgerStub for MemoryLedger {
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.check_put(key)?;
        self.state.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.read(key)
    }

    fn get_query_result(&self, query: &str) -> LedgerResult<Box<dyn StateCursor + '_>> {
        Ok(Box::new(self.run_query(query)?))
    }

    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<Box<dyn StateCursor + '_>> {
        Ok(Box::new(self.run_prefix_scan(object_type, attributes)?))
    }
}

/// A write-set buffer over a `MemoryLedger`
pub struct Transaction<'a> {
    ledger: &'a mut MemoryLedger,
    tx_id: Uuid,
    writes: BTreeMap<String, Vec<u8>>,
    finished: bool,
}

impl Transaction<'_> {
    /// Transaction identifier, for logs
    pub fn tx_id(&self) -> Uuid {
        self.tx_id
    }

    /// Number of buffered writes
    pub fn pending_writes(&self) -> usize {
        self.writes.len()
    }

    /// Apply every buffered write. Returns the number of keys written.
    pub fn commit(self) -> usize {
        match self.commit_and(|_| Ok::<(), Infallible>(())) {
            Ok(count) => count,
            Err(never) => match never {},
        }
    }

    /// Apply every buffered write, then hand the new state to `publish`
    ///
    /// If `publish` fails every write is undone, the ledger is left exactly
    /// as it was before the call, and the error is returned.
    pub fn commit_and<E, F>(mut self, publish: F) -> Result<usize, E>
    where
        F: FnOnce(&MemoryLedger) -> Result<(), E>,
    {
        let writes = mem::take(&mut self.writes);
        self.finished = true;

        let count = writes.len();
        let mut undo = Vec::with_capacity(count);
        for (key, value) in writes {
            let previous = self.ledger.state.insert(key.clone(), value);
            undo.push((key, previous));
        }

        if let Err(e) = publish(&*self.ledger) {
            for (key, previous) in undo.into_iter().rev() {
                match previous {
                    Some(value) => self.ledger.state.insert(key, value),
                    None => self.ledger.state.remove(&key),
                };
            }
            log_event_with_fields(
                Event::TxDiscarded,
                &[
                    ("reason", "publish failed"),
                    ("tx_id", &self.tx_id.to_string()),
                    ("writes", &count.to_string()),
                ],
            );
            return Err(e);
        }

        log_event_with_fields(
            Event::TxCommitted,
            &[
                ("tx_id", &self.tx_id.to_string()),
                ("writes", &count.to_string()),
            ],
        );
        Ok(count)
    }

    /// Discard every buffered write
    pub fn rollback(self) {
        drop(self);
    }
}

impl Drop for Transaction<'_> {
    fn drop(&mut self) {
        if !self.finished && !self.writes.is_empty() {
            log_event_with_fields(
                Event::TxDiscarded,
                &[
                    ("tx_id", &self.tx_id.to_string()),
                    ("writes", &self.writes.len().to_string()),
                ],
            );
        }
    }
}

impl LedgerStub for Transaction<'_> {
    fn put_state(&mut self, key: &str, value: Vec<u8>) -> LedgerResult<()> {
        self.ledger.check_put(key)?;
        self.writes.insert(key.to_string(), value);
        Ok(())
    }

    fn get_state(&self, key: &str) -> LedgerResult<Option<Vec<u8>>> {
        self.ledger.read(key)
    }

    fn get_query_result(&self, query: &str) -> LedgerResult<Box<dyn StateCursor + '_>> {
        Ok(Box::new(self.ledger.run_query(query)?))
    }

    fn get_state_by_partial_composite_key(
        &self,
        object_type: &str,
        attributes: &[&str],
    ) -> LedgerResult<Box<dyn StateCursor + '_>> {
        Ok(Box::new(self.ledger.run_prefix_scan(object_type, attributes)?))
    }
}

/// Materialized cursor; counts itself open until closed
struct MemoryCursor {
    rows: VecDeque<QueryResponse>,
    open: bool,
    open_cursors: Arc<AtomicUsize>,
}

impl MemoryCursor {
    fn open(rows: Vec<QueryResponse>, open_cursors: Arc<AtomicUsize>) -> Self {
        open_cursors.fetch_add(1, Ordering::SeqCst);
        Self {
            rows: rows.into(),
            open: true,
            open_cursors,
        }
    }
}

impl StateCursor for MemoryCursor {
    fn has_next(&self) -> bool {
        self.open && !self.rows.is_empty()
    }

    fn next(&mut self) -> LedgerResult<QueryResponse> {
        if !self.open {
            return Err(LedgerError::CursorClosed);
        }
        self.rows
            .pop_front()
            .ok_or_else(|| LedgerError::InvalidQuery("cursor exhausted".to_string()))
    }

    fn close(&mut self) -> LedgerResult<()> {
        if !self.open {
            return Err(LedgerError::CursorClosed);
        }
        self.open = false;
        self.rows.clear();
        self.open_cursors.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }
}
