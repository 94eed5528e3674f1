//! CLI module for rightsledger
//!
//! Provides command-line interface for:
//! - init: Create the data directory and empty channel ledgers
//! - serve: Open the ledgers and serve line-delimited JSON requests
//! - invoke: One-shot function invocation

mod args;
mod commands;
mod config;
mod errors;
mod io;

pub use args::{Cli, Command};
pub use commands::{handle_line, init, invoke, run, run_command, serve, Request};
pub use config::Config;
pub use errors::{CliError, CliResult};
pub use io::{error_response, ok_response, write_error, write_response};
