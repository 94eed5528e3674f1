//! Typed document read/write over the host stub
//!
//! Canonical encoding is compact JSON with fields in declaration order, so the
//! same document always produces the same bytes.

use serde::de::DeserializeOwned;
use serde::Serialize;

use super::errors::{StoreError, StoreResult};
use crate::ledger::LedgerStub;

/// A record persisted under a single key and tagged with a type discriminator
pub trait Document: Serialize + DeserializeOwned {
    /// Discriminator value stored in `docType`
    const DOC_TYPE: &'static str;

    /// The stored `docType` of this instance
    fn doc_type(&self) -> &str;

    /// Primary key of this instance
    fn id(&self) -> &str;
}

/// Outcome of a point read
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetched<T> {
    /// Key present and decoded
    Found(T),
    /// Key never written
    Absent,
    /// Key present with a zero-length value
    Empty,
}

impl<T> Fetched<T> {
    /// Returns the document, if found
    pub fn found(self) -> Option<T> {
        match self {
            Fetched::Found(doc) => Some(doc),
            Fetched::Absent | Fetched::Empty => None,
        }
    }
}

/// Typed document access
pub struct DocumentStore;

impl DocumentStore {
    /// Encode a document to its canonical bytes
    pub fn encode<T: Document>(document: &T) -> StoreResult<Vec<u8>> {
        serde_json::to_vec(document).map_err(|e| {
            StoreError::encode_failed(document.id(), format!("failed to encode document: {}", e))
        })
    }

    /// Decode bytes stored under `key` as a `T`
    ///
    /// A record whose `docType` is not `T::DOC_TYPE` is a decode failure.
    pub fn decode<T: Document>(key: &str, bytes: &[u8]) -> StoreResult<T> {
        let document: T = serde_json::from_slice(bytes).map_err(|e| {
            StoreError::decode_failed(key, format!("malformed {} document: {}", T::DOC_TYPE, e))
        })?;

        if document.doc_type() != T::DOC_TYPE {
            return Err(StoreError::decode_failed(
                key,
                format!(
                    "expected docType {:?}, found {:?}",
                    T::DOC_TYPE,
                    document.doc_type()
                ),
            ));
        }
        Ok(document)
    }

    /// Write `document` under `key`, overwriting any prior value
    pub fn put<S, T>(stub: &mut S, key: &str, document: &T) -> StoreResult<()>
    where
        S: LedgerStub + ?Sized,
        T: Document,
    {
        let bytes = Self::encode(document)?;
        stub.put_state(key, bytes)
            .map_err(|e| StoreError::write_failed(key, e))
    }

    /// Read and decode the document under `key`
    pub fn get<S, T>(stub: &S, key: &str) -> StoreResult<Fetched<T>>
    where
        S: LedgerStub + ?Sized,
        T: Document,
    {
        let bytes = stub
            .get_state(key)
            .map_err(|e| StoreError::read_failed(key, e))?;

        match bytes {
            None => Ok(Fetched::Absent),
            Some(b) if b.is_empty() => Ok(Fetched::Empty),
            Some(b) => Self::decode(key, &b).map(Fetched::Found),
        }
    }

    /// Read a document that must exist. Absent and empty values are NotFound.
    pub fn require<S, T>(stub: &S, key: &str) -> StoreResult<T>
    where
        S: LedgerStub + ?Sized,
        T: Document,
    {
        Self::get(stub, key)?
            .found()
            .ok_or_else(|| StoreError::not_found(key))
    }
}
