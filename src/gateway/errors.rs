//! # Gateway Errors

use thiserror::Error;

use crate::contract::ContractError;
use crate::ledger::LedgerError;

/// Result type for gateway operations
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Gateway errors
#[derive(Debug, Error)]
pub enum GatewayError {
    #[error("Unknown channel: {0}")]
    UnknownChannel(String),

    #[error(transparent)]
    Contract(#[from] ContractError),

    #[error("Failed to load {channel} ledger: {source}")]
    Load {
        channel: &'static str,
        #[source]
        source: LedgerError,
    },

    #[error("Failed to persist {channel} ledger: {source}")]
    Persist {
        channel: &'static str,
        #[source]
        source: LedgerError,
    },
}

impl GatewayError {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            GatewayError::UnknownChannel(_) => "RL_UNKNOWN_CHANNEL",
            GatewayError::Contract(e) => e.code(),
            GatewayError::Load { .. } => "RL_LOAD_FAILED",
            GatewayError::Persist { .. } => "RL_PERSIST_FAILED",
        }
    }
}
