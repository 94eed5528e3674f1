//! CLI argument definitions using clap
//!
//! Commands:
//! - rightsledger init --config <path>
//! - rightsledger serve --config <path>
//! - rightsledger invoke --config <path> <channel> <function> [args...]

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// rightsledger - copyright registrations and infringement reports on a ledger
#[derive(Parser, Debug)]
#[command(name = "rightsledger")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create the data directory and empty channel ledgers
    Init {
        /// Path to configuration file
        #[arg(long, default_value = "./rightsledger.json")]
        config: PathBuf,
    },

    /// Serve line-delimited JSON requests from stdin
    Serve {
        /// Path to configuration file
        #[arg(long, default_value = "./rightsledger.json")]
        config: PathBuf,
    },

    /// Invoke a single function and exit
    Invoke {
        /// Path to configuration file
        #[arg(long, default_value = "./rightsledger.json")]
        config: PathBuf,

        /// rights_holder, authority or gateway
        channel: String,

        /// Function name, e.g. registCopyright
        function: String,

        /// Positional string arguments
        args: Vec<String>,
    },
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_invoke() {
        let cli = Cli::try_parse_from([
            "rightsledger",
            "invoke",
            "--config",
            "cfg.json",
            "rights_holder",
            "queryCopyright",
            "001",
        ])
        .unwrap();

        match cli.command {
            Command::Invoke {
                config,
                channel,
                function,
                args,
            } => {
                assert_eq!(config, PathBuf::from("cfg.json"));
                assert_eq!(channel, "rights_holder");
                assert_eq!(function, "queryCopyright");
                assert_eq!(args, vec!["001".to_string()]);
            }
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_default_config_path() {
        let cli = Cli::try_parse_from(["rightsledger", "serve"]).unwrap();
        match cli.command {
            Command::Serve { config } => assert_eq!(config, PathBuf::from("./rightsledger.json")),
            other => panic!("unexpected {:?}", other),
        }
    }
}
