//! Rich query execution
//!
//! Delegates selector evaluation to the host, then decodes each row
//! independently under a `DecodePolicy`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::cursor::ScopedCursor;
use super::selector::Selector;
use crate::ledger::LedgerStub;
use crate::observability::{log_event_with_fields, Event, Logger};
use crate::store::{Document, DocumentStore, StoreError, StoreResult};

/// What to do with a row that does not decode during a bulk listing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DecodePolicy {
    /// Log the row, leave it out and keep enumerating
    #[default]
    SkipAndContinue,
    /// Abort the listing with `RL_DECODE_FAILED`
    FailFast,
}

impl DecodePolicy {
    /// Config spelling
    pub fn as_str(&self) -> &'static str {
        match self {
            DecodePolicy::SkipAndContinue => "skip",
            DecodePolicy::FailFast => "fail_fast",
        }
    }
}

impl fmt::Display for DecodePolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for DecodePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "skip" => Ok(DecodePolicy::SkipAndContinue),
            "fail_fast" => Ok(DecodePolicy::FailFast),
            other => Err(format!(
                "unknown decode policy {:?}; expected \"skip\" or \"fail_fast\"",
                other
            )),
        }
    }
}

/// One decoded query row
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryRecord<T> {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "Record")]
    pub record: T,
}

/// Decoded rows plus the keys dropped by `SkipAndContinue`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryResults<T> {
    pub records: Vec<QueryRecord<T>>,
    pub skipped: Vec<String>,
}

impl<T> QueryResults<T> {
    /// No rows, nothing skipped
    pub fn empty() -> Self {
        Self {
            records: Vec::new(),
            skipped: Vec::new(),
        }
    }

    /// Number of decoded rows
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if no row decoded
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Just the decoded records
    pub fn into_records(self) -> Vec<QueryRecord<T>> {
        self.records
    }

    /// Decoded documents without their keys
    pub fn documents(&self) -> impl Iterator<Item = &T> {
        self.records.iter().map(|r| &r.record)
    }

    /// Record one row according to `policy`
    pub(crate) fn accept(
        &mut self,
        key: String,
        decoded: StoreResult<T>,
        policy: DecodePolicy,
    ) -> StoreResult<()> {
        match decoded {
            Ok(record) => {
                self.records.push(QueryRecord { key, record });
                Ok(())
            }
            Err(e) => match policy {
                DecodePolicy::FailFast => Err(e),
                DecodePolicy::SkipAndContinue => {
                    log_event_with_fields(
                        Event::QueryRowSkipped,
                        &[("key", &key), ("error", e.message())],
                    );
                    self.skipped.push(key);
                    Ok(())
                }
            },
        }
    }
}

/// Runs selectors against the host and decodes the rows
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryExecutor {
    policy: DecodePolicy,
}

impl QueryExecutor {
    /// Executor with the given decode policy
    pub fn new(policy: DecodePolicy) -> Self {
        Self { policy }
    }

    /// The decode policy in force
    pub fn policy(&self) -> DecodePolicy {
        self.policy
    }

    /// Execute `selector` and decode every row as `T`
    ///
    /// The host cursor is released on every exit path.
    pub fn execute<S, T>(&self, stub: &S, selector: &Selector) -> StoreResult<QueryResults<T>>
    where
        S: LedgerStub + ?Sized,
        T: Document,
    {
        let query = selector.to_query_string();
        let cursor = stub.get_query_result(&query).map_err(|e| {
            StoreError::query_failed(
                format!("failed to get all {} data from world state", selector.target_type()),
                e,
            )
        })?;
        let mut cursor = ScopedCursor::new(cursor, query.clone());

        let mut results = QueryResults::empty();
        while let Some(row) = cursor.next_row()? {
            let decoded = DocumentStore::decode::<T>(&row.key, &row.value);
            results.accept(row.key, decoded, self.policy)?;
        }
        cursor.finish()?;

        Logger::trace(
            Event::QueryExecuted.as_str(),
            &[
                ("query", &query),
                ("rows", &results.len().to_string()),
                ("skipped", &results.skipped.len().to_string()),
            ],
        );
        Ok(results)
    }
}
