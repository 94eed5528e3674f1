//! # Contract Errors

use thiserror::Error;

use crate::store::StoreError;

/// Result type for contract invocations
pub type ContractResult<T> = Result<T, ContractError>;

/// Contract invocation errors
#[derive(Debug, Error)]
pub enum ContractError {
    #[error("Unknown function {function} on {contract} contract")]
    UnknownFunction {
        contract: &'static str,
        function: String,
    },

    #[error("Incorrect number of arguments for {function}: expected {expected}, got {actual}")]
    ArgumentCount {
        function: String,
        expected: usize,
        actual: usize,
    },

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Failed to encode result: {0}")]
    Encode(#[from] serde_json::Error),
}

impl ContractError {
    /// Stable string code
    pub fn code(&self) -> &'static str {
        match self {
            ContractError::UnknownFunction { .. } => "RL_UNKNOWN_FUNCTION",
            ContractError::ArgumentCount { .. } => "RL_ARGUMENT_COUNT",
            ContractError::InvalidArgument(_) => "RL_INVALID_ARGUMENT",
            ContractError::Store(e) => e.code().code(),
            ContractError::Encode(_) => "RL_ENCODE_FAILED",
        }
    }
}
