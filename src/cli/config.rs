//! Configuration file
//!
//! ```json
//! { "database_path": "./combined.txt", "log_level": "warn" }
//! ```

use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::errors::{CliError, CliResult};
use crate::import::{ImportOptions, DEFAULT_IGNORED_SUFFIXES};
use crate::observability::{log_event_with_fields, Event, Logger, Severity};

/// Configuration file structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Combined database file (required)
    pub database_path: String,

    /// File name suffixes skipped during import
    #[serde(default = "default_ignored_suffixes")]
    pub ignored_suffixes: Vec<String>,

    /// Lowest log severity written to stderr (default "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Records listed by `info` unless `--limit` is given (default 10)
    #[serde(default = "default_summary_limit")]
    pub summary_limit: usize,
}

fn default_ignored_suffixes() -> Vec<String> {
    DEFAULT_IGNORED_SUFFIXES
        .iter()
        .map(|s| s.to_string())
        .collect()
}
fn default_log_level() -> String {
    "info".to_string()
}
fn default_summary_limit() -> usize {
    10
}

impl Config {
    /// Load configuration from file
    pub fn load(path: &Path) -> CliResult<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| CliError::config_error(format!("Failed to read config: {}", e)))?;

        let config = Self::from_json(&content)?;

        log_event_with_fields(
            Event::ConfigLoaded,
            &[("path", path.display().to_string().as_str())],
        );
        Ok(config)
    }

    /// Parse and validate configuration text
    pub fn from_json(content: &str) -> CliResult<Self> {
        let config: Config = serde_json::from_str(content)
            .map_err(|e| CliError::config_error(format!("Invalid config JSON: {}", e)))?;

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> CliResult<()> {
        if self.database_path.trim().is_empty() {
            return Err(CliError::config_error("database_path must not be empty"));
        }

        if self.ignored_suffixes.iter().any(|s| s.is_empty()) {
            return Err(CliError::config_error(
                "ignored_suffixes must not contain empty entries",
            ));
        }

        self.severity()?;
        Ok(())
    }

    /// Combined database file as Path
    pub fn database_path(&self) -> &Path {
        Path::new(&self.database_path)
    }

    /// Configured minimum log severity
    pub fn severity(&self) -> CliResult<Severity> {
        Severity::from_str(&self.log_level)
            .map_err(|e| CliError::config_error(format!("Invalid log_level: {}", e)))
    }

    /// Apply the configured log severity to the process logger
    pub fn apply_log_level(&self) -> CliResult<()> {
        Logger::set_min_severity(self.severity()?);
        Ok(())
    }

    /// Options for path imports
    pub fn import_options(&self) -> ImportOptions {
        ImportOptions {
            ignored_suffixes: self.ignored_suffixes.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cli::CliErrorCode;

    #[test]
    fn test_defaults() {
        let config = Config::from_json(r#"{"database_path": "/tmp/combined.txt"}"#).unwrap();
        assert_eq!(config.log_level, "info");
        assert_eq!(config.summary_limit, 10);
        assert_eq!(config.ignored_suffixes.len(), 6);
        assert!(config.ignored_suffixes.contains(&".md5.gz".to_string()));
        assert_eq!(config.severity().unwrap(), Severity::Info);
    }

    #[test]
    fn test_database_path_required() {
        let err = Config::from_json("{}").unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);

        let err = Config::from_json(r#"{"database_path": "  "}"#).unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_invalid_log_level() {
        let err = Config::from_json(r#"{"database_path": "a", "log_level": "loud"}"#)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
        assert!(err.message().contains("log_level"));
    }

    #[test]
    fn test_empty_suffix_rejected() {
        let err = Config::from_json(r#"{"database_path": "a", "ignored_suffixes": [".gz", ""]}"#)
            .unwrap_err();
        assert_eq!(err.code(), &CliErrorCode::ConfigError);
    }

    #[test]
    fn test_import_options_follow_config() {
        let config =
            Config::from_json(r#"{"database_path": "a", "ignored_suffixes": [".sig"]}"#).unwrap();
        assert_eq!(config.import_options().ignored_suffixes, vec![".sig".to_string()]);
    }
}
