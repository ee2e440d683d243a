//! Process configuration, resolved once at cold start.

use std::path::PathBuf;

use thiserror::Error;

pub const AGGREGATOR_NAME_VAR: &str = "AGGREGATOR_NAME";
pub const OUTPUT_BUCKET_VAR: &str = "S3_OUTPUT_BUCKET";
pub const OUTPUT_FORMAT_VAR: &str = "OUTPUT_FORMAT";
pub const LOG_LEVEL_VAR: &str = "LOG_LEVEL";
pub const SCRATCH_DIR_VAR: &str = "OUTPUT_SCRATCH_DIR";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    #[error("{0} must be configured")]
    Missing(&'static str),
    #[error("{0} cannot be empty")]
    Blank(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warning,
    Error,
}

impl LogLevel {
    /// Parses standard severity names. `CRITICAL`/`FATAL` map onto `Error`.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_uppercase().as_str() {
            "TRACE" => Some(Self::Trace),
            "DEBUG" => Some(Self::Debug),
            "INFO" => Some(Self::Info),
            "WARN" | "WARNING" => Some(Self::Warning),
            "ERROR" | "CRITICAL" | "FATAL" => Some(Self::Error),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExporterConfig {
    pub aggregator_name: String,
    pub output_bucket: String,
    /// Raw configured value; resolved per invocation.
    pub output_format: Option<String>,
    pub log_level: LogLevel,
    /// Set when `LOG_LEVEL` was present but not a known severity name.
    pub rejected_log_level: Option<String>,
    pub scratch_dir: PathBuf,
}

impl ExporterConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let aggregator_name = required(&lookup, AGGREGATOR_NAME_VAR)?;
        let output_bucket = required(&lookup, OUTPUT_BUCKET_VAR)?;

        let raw_level = lookup(LOG_LEVEL_VAR);
        let parsed_level = raw_level.as_deref().and_then(LogLevel::parse);
        let rejected_log_level = match (&raw_level, parsed_level) {
            (Some(raw), None) => Some(raw.clone()),
            _ => None,
        };

        let scratch_dir = lookup(SCRATCH_DIR_VAR)
            .filter(|value| !value.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(std::env::temp_dir);

        Ok(Self {
            aggregator_name,
            output_bucket,
            output_format: lookup(OUTPUT_FORMAT_VAR),
            log_level: parsed_level.unwrap_or_default(),
            rejected_log_level,
            scratch_dir,
        })
    }
}

fn required(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &'static str,
) -> Result<String, ConfigError> {
    let value = lookup(name).ok_or(ConfigError::Missing(name))?;
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ConfigError::Blank(name));
    }
    Ok(trimmed.to_string())
}
