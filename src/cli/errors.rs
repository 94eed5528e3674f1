//! CLI-specific error types
//!
//! CLI errors end the process. Errors raised by a single request in the
//! serving loop are written as responses instead.

use std::io;

use thiserror::Error;

/// CLI error
#[derive(Debug, Error)]
pub enum CliError {
    #[error("RL_CLI_CONFIG_ERROR: {0}")]
    Config(String),

    #[error("RL_CLI_IO_ERROR: {0}")]
    Io(#[from] io::Error),

    #[error("RL_CLI_IO_ERROR: JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RL_CLI_ALREADY_INITIALIZED: data directory already initialized")]
    AlreadyInitialized,

    #[error("RL_CLI_NOT_INITIALIZED: data directory not initialized, run 'rightsledger init' first")]
    NotInitialized,

    /// Ledgers could not be opened
    #[error("RL_CLI_BOOT_FAILED: {0}")]
    Boot(String),

    /// Request line is not a valid request
    #[error("RL_CLI_BAD_REQUEST: {0}")]
    BadRequest(String),

    /// One-shot invocation returned an error
    #[error("RL_CLI_INVOCATION_FAILED: {0}")]
    Invocation(String),
}

impl CliError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    pub fn already_initialized() -> Self {
        Self::AlreadyInitialized
    }

    pub fn not_initialized() -> Self {
        Self::NotInitialized
    }

    pub fn boot_failed(msg: impl Into<String>) -> Self {
        Self::Boot(msg.into())
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::BadRequest(msg.into())
    }

    pub fn invocation_failed(msg: impl Into<String>) -> Self {
        Self::Invocation(msg.into())
    }

    /// Stable error code
    pub fn code_str(&self) -> &'static str {
        match self {
            Self::Config(_) => "RL_CLI_CONFIG_ERROR",
            Self::Io(_) | Self::Json(_) => "RL_CLI_IO_ERROR",
            Self::AlreadyInitialized => "RL_CLI_ALREADY_INITIALIZED",
            Self::NotInitialized => "RL_CLI_NOT_INITIALIZED",
            Self::Boot(_) => "RL_CLI_BOOT_FAILED",
            Self::BadRequest(_) => "RL_CLI_BAD_REQUEST",
            Self::Invocation(_) => "RL_CLI_INVOCATION_FAILED",
        }
    }
}

/// CLI result type
pub type CliResult<T> = Result<T, CliError>;
