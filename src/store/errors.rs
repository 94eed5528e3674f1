//! Core error types
//!
//! Error codes:
//! - RL_STORE_WRITE_FAILED: host put rejected
//! - RL_STORE_READ_FAILED: host get rejected (distinct from not-found)
//! - RL_NOT_FOUND: key absent on a read expected to exist
//! - RL_QUERY_FAILED: selector or index scan rejected by the host
//! - RL_DECODE_FAILED: stored bytes do not parse as the expected document
//! - RL_ENCODE_FAILED: a document could not be serialized for writing
//! - RL_INVALID_KEY: serial, index name or component cannot form a key
//!
//! Every core operation returns the first error it hits and performs no
//! cleanup; atomicity belongs to the enclosing host transaction.

use std::fmt;

use crate::ledger::LedgerError;

/// Core error codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreErrorCode {
    /// Underlying put rejected
    StoreWriteFailure,
    /// Underlying get rejected
    StoreReadFailure,
    /// Key absent
    NotFound,
    /// Selector execution rejected
    QueryFailure,
    /// Stored bytes do not decode
    DecodeFailure,
    /// Document does not serialize
    EncodeFailure,
    /// Key could not be formed
    InvalidKey,
}

impl StoreErrorCode {
    /// Returns the stable string code
    pub fn code(&self) -> &'static str {
        match self {
            StoreErrorCode::StoreWriteFailure => "RL_STORE_WRITE_FAILED",
            StoreErrorCode::StoreReadFailure => "RL_STORE_READ_FAILED",
            StoreErrorCode::NotFound => "RL_NOT_FOUND",
            StoreErrorCode::QueryFailure => "RL_QUERY_FAILED",
            StoreErrorCode::DecodeFailure => "RL_DECODE_FAILED",
            StoreErrorCode::EncodeFailure => "RL_ENCODE_FAILED",
            StoreErrorCode::InvalidKey => "RL_INVALID_KEY",
        }
    }
}

impl fmt::Display for StoreErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Core error with key context and the host failure as source
#[derive(Debug)]
pub struct StoreError {
    code: StoreErrorCode,
    message: String,
    key: Option<String>,
    source: Option<LedgerError>,
}

impl StoreError {
    fn new(code: StoreErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            key: None,
            source: None,
        }
    }

    /// Host rejected a write
    pub fn write_failed(key: &str, source: LedgerError) -> Self {
        Self::new(StoreErrorCode::StoreWriteFailure, "failed to put to world state")
            .with_key(key)
            .with_source(source)
    }

    /// Host rejected a read
    pub fn read_failed(key: &str, source: LedgerError) -> Self {
        Self::new(StoreErrorCode::StoreReadFailure, "failed to read from world state")
            .with_key(key)
            .with_source(source)
    }

    /// Key absent
    pub fn not_found(key: &str) -> Self {
        Self::new(StoreErrorCode::NotFound, format!("{} does not exist", key)).with_key(key)
    }

    /// Host rejected a query or scan
    pub fn query_failed(message: impl Into<String>, source: LedgerError) -> Self {
        Self::new(StoreErrorCode::QueryFailure, message).with_source(source)
    }

    /// Stored bytes did not decode
    pub fn decode_failed(key: &str, reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::DecodeFailure, reason).with_key(key)
    }

    /// Document could not be serialized
    pub fn encode_failed(key: &str, reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::EncodeFailure, reason).with_key(key)
    }

    /// Key could not be formed
    pub fn invalid_key(reason: impl Into<String>) -> Self {
        Self::new(StoreErrorCode::InvalidKey, reason)
    }

    /// Composite key rejected by the host
    pub fn invalid_composite_key(source: LedgerError) -> Self {
        Self::new(StoreErrorCode::InvalidKey, "failed to create composite key").with_source(source)
    }

    fn with_key(mut self, key: &str) -> Self {
        self.key = Some(key.to_string());
        self
    }

    fn with_source(mut self, source: LedgerError) -> Self {
        self.source = Some(source);
        self
    }

    /// Returns the error code
    pub fn code(&self) -> StoreErrorCode {
        self.code
    }

    /// Returns the error message
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Returns the key involved, if known
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Returns true for `RL_NOT_FOUND`
    pub fn is_not_found(&self) -> bool {
        self.code == StoreErrorCode::NotFound
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)?;
        if let Some(ref key) = self.key {
            write!(f, " (key: {:?})", key)?;
        }
        if let Some(ref source) = self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl std::error::Error for StoreError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|e| e as &(dyn std::error::Error + 'static))
    }
}

/// Result type for core operations
pub type StoreResult<T> = Result<T, StoreError>;
