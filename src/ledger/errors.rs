//! Host ledger error types
//!
//! These are the failures the host reports back across the stub boundary.
//! The store adapter wraps them into `StoreError` with a core error code.

use std::io;

use thiserror::Error;

/// Result type for host ledger operations
pub type LedgerResult<T> = Result<T, LedgerError>;

/// Host ledger errors
#[derive(Debug, Error)]
pub enum LedgerError {
    #[error("write rejected for key {key:?}: {reason}")]
    Rejected { key: String, reason: String },

    #[error("ledger unavailable: {0}")]
    Unavailable(String),

    #[error("invalid key: {0}")]
    InvalidKey(String),

    #[error("invalid query: {0}")]
    InvalidQuery(String),

    #[error("cursor already closed")]
    CursorClosed,

    #[error("snapshot I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("corrupt snapshot: {0}")]
    CorruptSnapshot(String),
}

impl LedgerError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            LedgerError::Rejected { .. } => "RL_LEDGER_REJECTED",
            LedgerError::Unavailable(_) => "RL_LEDGER_UNAVAILABLE",
            LedgerError::InvalidKey(_) => "RL_LEDGER_INVALID_KEY",
            LedgerError::InvalidQuery(_) => "RL_LEDGER_INVALID_QUERY",
            LedgerError::CursorClosed => "RL_LEDGER_CURSOR_CLOSED",
            LedgerError::Io(_) => "RL_LEDGER_IO_ERROR",
            LedgerError::CorruptSnapshot(_) => "RL_LEDGER_CORRUPT_SNAPSHOT",
        }
    }
}
