//! CLI command implementations
//!
//! Every command loads the config first. `serve` and `invoke` require an
//! initialized data directory and open both channel ledgers before touching
//! stdin.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::{json, Value};

use crate::gateway::{Channel, Gateway, GatewayError, AUTHORITY_SNAPSHOT, RIGHTS_HOLDER_SNAPSHOT};
use crate::ledger::MemoryLedger;
use crate::observability::{log_event_with_fields, Event, Logger};

use super::args::Command;
use super::config::Config;
use super::errors::{CliError, CliResult};
use super::io::{error_response, ok_response, read_requests, write_error, write_json, write_response};

/// One line of the serving protocol
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Request {
    pub channel: String,
    pub function: String,
    #[serde(default)]
    pub args: Vec<String>,
}

/// Main CLI entry point
///
/// Parses arguments and dispatches to the appropriate command.
/// This is the only function that main.rs should call.
pub fn run() -> CliResult<()> {
    let cli = super::args::Cli::parse_args();
    run_command(cli.command)
}

/// Run the appropriate command based on CLI args
pub fn run_command(cmd: Command) -> CliResult<()> {
    match cmd {
        Command::Init { config } => init(&config),
        Command::Serve { config } => serve(&config),
        Command::Invoke {
            config,
            channel,
            function,
            args,
        } => invoke(&config, &channel, &function, &args),
    }
}

/// Create the data directory with an empty ledger per channel
pub fn init(config_path: &Path) -> CliResult<()> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if is_initialized(data_dir) {
        return Err(CliError::already_initialized());
    }

    fs::create_dir_all(data_dir).map_err(|e| {
        CliError::config_error(format!("Failed to create directory {:?}: {}", data_dir, e))
    })?;

    let empty = MemoryLedger::new();
    for file in [RIGHTS_HOLDER_SNAPSHOT, AUTHORITY_SNAPSHOT] {
        empty
            .save(&data_dir.join(file))
            .map_err(|e| CliError::boot_failed(format!("Failed to write {}: {}", file, e)))?;
    }

    log_event_with_fields(Event::LedgerInitialized, &[("data_dir", &config.data_dir)]);
    write_response(json!({"initialized": true}))?;

    Ok(())
}

/// Serve one request per stdin line until EOF
///
/// A bad request line gets an error response; only I/O failures stop the
/// loop.
pub fn serve(config_path: &Path) -> CliResult<()> {
    let (config, mut gateway) = boot(config_path)?;
    log_event_with_fields(Event::Serving, &[("data_dir", &config.data_dir)]);

    for line in read_requests() {
        let line = line?;
        let response = handle_line(&mut gateway, &line);
        write_json(&response)?;
    }

    Ok(())
}

/// Invoke one function, print the response and exit
pub fn invoke(config_path: &Path, channel: &str, function: &str, args: &[String]) -> CliResult<()> {
    let (_config, mut gateway) = boot(config_path)?;

    match dispatch(&mut gateway, channel, function, args) {
        Ok(data) => write_response(data),
        Err(e) => {
            write_error(e.code(), &e.to_string())?;
            Err(CliError::invocation_failed(e.to_string()))
        }
    }
}

/// Turn one request line into one response envelope
pub fn handle_line(gateway: &mut Gateway, line: &str) -> Value {
    let request: Request = match serde_json::from_str(line) {
        Ok(request) => request,
        Err(e) => {
            let err = CliError::bad_request(format!("Invalid request: {}", e));
            return error_response(err.code_str(), &err.to_string());
        }
    };

    match dispatch(gateway, &request.channel, &request.function, &request.args) {
        Ok(data) => ok_response(data),
        Err(e) => error_response(e.code(), &e.to_string()),
    }
}

fn dispatch(gateway: &mut Gateway, channel: &str, function: &str, args: &[String]) -> Result<Value, GatewayError> {
    let channel: Channel = channel.parse()?;
    gateway.invoke(channel, function, args)
}

fn load_config(config_path: &Path) -> CliResult<Config> {
    let config = Config::load(config_path)?;
    Logger::set_min_severity(config.log_severity()?);
    log_event_with_fields(Event::ConfigLoaded, &[("path", &config_path.display().to_string())]);
    Ok(config)
}

/// Load config and open both channel ledgers
fn boot(config_path: &Path) -> CliResult<(Config, Gateway)> {
    let config = load_config(config_path)?;
    let data_dir = config.data_path();

    if !is_initialized(data_dir) {
        return Err(CliError::not_initialized());
    }

    let gateway = Gateway::open(
        data_dir,
        &config.registry_options()?,
        config.referral_policy(),
    )
    .map_err(|e| CliError::boot_failed(e.to_string()))?;

    Ok((config, gateway))
}

/// Check if a data directory is initialized
fn is_initialized(data_dir: &Path) -> bool {
    data_dir.join(RIGHTS_HOLDER_SNAPSHOT).exists() && data_dir.join(AUTHORITY_SNAPSHOT).exists()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::ReferralPolicy;
    use crate::registry::RegistryOptions;

    fn gateway() -> Gateway {
        Gateway::in_memory(&RegistryOptions::default(), ReferralPolicy::default())
    }

    #[test]
    fn test_handle_line_ok() {
        let mut gateway = gateway();
        let response = handle_line(
            &mut gateway,
            r#"{"channel":"rights_holder","function":"registCopyright","args":["001","T","image","A"]}"#,
        );
        assert_eq!(response["status"], "ok");
        assert_eq!(response["data"]["id"], "copyright001");
    }

    #[test]
    fn test_handle_line_contract_error() {
        let mut gateway = gateway();
        let response = handle_line(
            &mut gateway,
            r#"{"channel":"rights_holder","function":"queryCopyright","args":["404"]}"#,
        );
        assert_eq!(response["status"], "error");
        assert_eq!(response["code"], "RL_NOT_FOUND");
    }

    #[test]
    fn test_handle_line_bad_request() {
        let mut gateway = gateway();
        let response = handle_line(&mut gateway, "not json");
        assert_eq!(response["code"], "RL_CLI_BAD_REQUEST");

        let response = handle_line(&mut gateway, r#"{"channel":"mychannel","function":"x"}"#);
        assert_eq!(response["code"], "RL_UNKNOWN_CHANNEL");
    }

    #[test]
    fn test_args_default_to_empty() {
        let request: Request =
            serde_json::from_str(r#"{"channel":"authority","function":"queryAllReports"}"#).unwrap();
        assert!(request.args.is_empty());
    }

    #[test]
    fn test_init_then_boot() {
        let dir = tempfile::tempdir().unwrap();
        let data_dir = dir.path().join("data");
        let config_path = dir.path().join("rightsledger.json");
        fs::write(
            &config_path,
            json!({"data_dir": data_dir.to_string_lossy()}).to_string(),
        )
        .unwrap();

        assert_eq!(
            boot(&config_path).unwrap_err().code_str(),
            "RL_CLI_NOT_INITIALIZED"
        );

        init(&config_path).unwrap();
        assert!(is_initialized(&data_dir));
        assert_eq!(
            init(&config_path).unwrap_err().code_str(),
            "RL_CLI_ALREADY_INITIALIZED"
        );

        let (_, mut gateway) = boot(&config_path).unwrap();
        handle_line(
            &mut gateway,
            r#"{"channel":"rights_holder","function":"registCopyright","args":["001","T","image","A"]}"#,
        );

        // Committed writes survive a restart
        let (_, mut reopened) = boot(&config_path).unwrap();
        let response = handle_line(
            &mut reopened,
            r#"{"channel":"rights_holder","function":"queryCopyright","args":["001"]}"#,
        );
        assert_eq!(response["data"]["title"], "T");
    }
}
