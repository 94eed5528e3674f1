//! Copyright Registry
//!
//! Copyrights are immutable once registered. Each registration writes the
//! document and one `author~id` index entry in the caller's transaction.

use super::documents::Copyright;
use super::RegistryOptions;
use crate::index::{CompositeKeyIndexer, IndexScan, AUTHOR_ID};
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event};
use crate::query::{QueryExecutor, QueryRecord, QueryResults, Selector};
use crate::store::{copyright_key, DocumentStore, Fetched, StoreErrorCode, StoreResult, COPYRIGHT_TAG};

/// Registers and looks up copyrights
#[derive(Debug, Clone, Copy, Default)]
pub struct CopyrightRegistry {
    executor: QueryExecutor,
}

impl CopyrightRegistry {
    pub fn new(options: &RegistryOptions) -> Self {
        Self {
            executor: QueryExecutor::new(options.decode_policy),
        }
    }

    /// Register a copyright under `copyright` + `serial`
    ///
    /// Re-registering an existing serial overwrites the document. If the
    /// author changed, the entry under the old author is left behind.
    pub fn register<S>(
        &self,
        stub: &mut S,
        serial: &str,
        title: &str,
        content_type: &str,
        author: &str,
    ) -> StoreResult<Copyright>
    where
        S: LedgerStub + ?Sized,
    {
        let key = copyright_key(serial)?;
        let copyright = Copyright::new(key.clone(), title, content_type, author);

        DocumentStore::put(stub, &key, &copyright)?;
        CompositeKeyIndexer::register_index_entry(stub, &AUTHOR_ID, &[author, &key])?;

        log_event_with_fields(
            Event::CopyrightRegistered,
            &[("key", &key), ("author", author)],
        );
        Ok(copyright)
    }

    /// Every copyright, in key order
    pub fn query_all<S>(&self, stub: &S) -> StoreResult<Vec<QueryRecord<Copyright>>>
    where
        S: LedgerStub + ?Sized,
    {
        let results = self
            .executor
            .execute(stub, &Selector::doc_type(COPYRIGHT_TAG))?;
        Ok(results.into_records())
    }

    /// Copyrights whose `author` equals `author` exactly
    pub fn query_by_author<S>(&self, stub: &S, author: &str) -> StoreResult<Vec<QueryRecord<Copyright>>>
    where
        S: LedgerStub + ?Sized,
    {
        let selector = Selector::doc_type(COPYRIGHT_TAG).and_eq("author", author);
        let results = self.executor.execute(stub, &selector)?;
        Ok(results.into_records())
    }

    /// Copyrights for `author` resolved through the `author~id` index
    ///
    /// Entries whose document is gone or was re-registered under another
    /// author are skipped. Rows that do not decode follow the decode policy.
    pub fn query_by_author_index<S>(
        &self,
        stub: &S,
        author: &str,
    ) -> StoreResult<Vec<QueryRecord<Copyright>>>
    where
        S: LedgerStub + ?Sized,
    {
        let policy = self.executor.policy();
        let mut results = QueryResults::empty();
        for key in IndexScan::primary_keys(stub, &AUTHOR_ID, &[author])? {
            match DocumentStore::get::<_, Copyright>(stub, &key) {
                Ok(Fetched::Found(copyright)) if copyright.author == author => {
                    results.accept(key, Ok(copyright), policy)?;
                }
                Err(e) if e.code() == StoreErrorCode::DecodeFailure => {
                    results.accept(key, Err(e), policy)?;
                }
                Err(e) => return Err(e),
                Ok(_) => log_event_with_fields(
                    Event::StaleIndexEntry,
                    &[("index", AUTHOR_ID.name()), ("key", &key)],
                ),
            }
        }
        Ok(results.into_records())
    }

    /// The copyright registered under `serial`
    pub fn query_one<S>(&self, stub: &S, serial: &str) -> StoreResult<Copyright>
    where
        S: LedgerStub + ?Sized,
    {
        let key = copyright_key(serial)?;
        DocumentStore::require(stub, &key)
    }
}
