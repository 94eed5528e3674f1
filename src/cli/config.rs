//! Configuration file
//!
//! ```json
//! {
//!   "data_dir": "./data",
//!   "decode_policy": "skip",
//!   "verify_copyright_reference": false,
//!   "auto_refer": true,
//!   "referral_threshold": 70.0,
//!   "log_level": "info"
//! }
//! ```
//!
//! Only `data_dir` is required.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::gateway::{ReferralPolicy, DEFAULT_REFERRAL_THRESHOLD};
use crate::observability::Severity;
use crate::query::DecodePolicy;
use crate::registry::RegistryOptions;

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Data directory (required)
    pub data_dir: String,

    /// "skip" or "fail_fast" (optional, default "skip")
    #[serde(default = "default_decode_policy")]
    pub decode_policy: String,

    /// Check that a reported copyright exists (optional, default false)
    #[serde(default)]
    pub verify_copyright_reference: bool,

    /// Forward reports judged as piracy to the authority (optional, default true)
    #[serde(default = "default_auto_refer")]
    pub auto_refer: bool,

    /// Similarity above which a filed report is judged as piracy (optional, default 70)
    #[serde(default = "default_referral_threshold")]
    pub referral_threshold: f64,

    /// Minimum log severity (optional, default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_decode_policy() -> String {
    DecodePolicy::default().as_str().to_string()
}
fn default_auto_refer() -> bool {
    true
}
fn default_referral_threshold() -> f64 {
    DEFAULT_REFERRAL_THRESHOLD
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        Self::parse(&content)
    }

    /// Parse and validate configuration JSON
    pub fn parse(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.data_dir.trim().is_empty() {
            return Err(CliError::config_error("data_dir must not be empty"));
        }

        self.decode_policy()?;
        self.log_severity()?;

        if !self.referral_threshold.is_finite() {
            return Err(CliError::config_error(format!(
                "referral_threshold must be a finite number, got {}",
                self.referral_threshold
            )));
        }

        Ok(())
    }

    /// Get data directory as Path
    pub fn data_path(&self) -> &Path {
        Path::new(&self.data_dir)
    }

    pub fn decode_policy(&self) -> CliResult<DecodePolicy> {
        self.decode_policy
            .parse()
            .map_err(|e: String| CliError::config_error(format!("Invalid decode_policy: {}", e)))
    }

    pub fn log_severity(&self) -> CliResult<Severity> {
        Severity::parse(&self.log_level).ok_or_else(|| {
            CliError::config_error(format!(
                "Invalid log_level: '{}'. Must be one of trace, info, warn, error.",
                self.log_level
            ))
        })
    }

    pub fn registry_options(&self) -> CliResult<RegistryOptions> {
        Ok(RegistryOptions {
            decode_policy: self.decode_policy()?,
            verify_copyright_reference: self.verify_copyright_reference,
        })
    }

    pub fn referral_policy(&self) -> ReferralPolicy {
        ReferralPolicy {
            auto_refer: self.auto_refer,
            threshold: self.referral_threshold,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = Config::parse(r#"{"data_dir": "./data"}"#).unwrap();
        assert_eq!(config.decode_policy().unwrap(), DecodePolicy::SkipAndContinue);
        assert!(!config.verify_copyright_reference);
        assert_eq!(config.referral_policy(), ReferralPolicy::default());
        assert_eq!(config.log_severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_data_dir_required() {
        let err = Config::parse("{}").unwrap_err();
        assert_eq!(err.code_str(), "RL_CLI_CONFIG_ERROR");
    }

    #[test]
    fn test_invalid_values_rejected() {
        for body in [
            r#"{"data_dir": "d", "decode_policy": "strict"}"#,
            r#"{"data_dir": "d", "log_level": "debug"}"#,
            r#"{"data_dir": ""}"#,
        ] {
            let err = Config::parse(body).unwrap_err();
            assert_eq!(err.code_str(), "RL_CLI_CONFIG_ERROR", "{}", body);
        }
    }

    #[test]
    fn test_registry_options() {
        let config = Config::parse(
            r#"{"data_dir": "d", "decode_policy": "fail_fast", "verify_copyright_reference": true}"#,
        )
        .unwrap();
        assert_eq!(
            config.registry_options().unwrap(),
            RegistryOptions {
                decode_policy: DecodePolicy::FailFast,
                verify_copyright_reference: true,
            }
        );
    }

    #[test]
    fn test_load_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"data_dir": "/tmp/rl", "referral_threshold": 85.5}}"#).unwrap();

        let config = Config::load(file.path()).unwrap();
        assert_eq!(config.data_path(), Path::new("/tmp/rl"));
        assert_eq!(config.referral_policy().threshold, 85.5);
    }

    #[test]
    fn test_missing_file() {
        let err = Config::load(Path::new("/nonexistent/rightsledger.json")).unwrap_err();
        assert_eq!(err.code_str(), "RL_CLI_CONFIG_ERROR");
    }
}
