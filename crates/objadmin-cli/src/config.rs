//! Encoder configuration loading from file and environment variables.

use objadmin_log::HashPolicy;
use serde::Deserialize;
use thiserror::Error;

/// Top-level encoder configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Output settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Which event kinds get an integrity hash.
    #[serde(default)]
    pub hashing: HashPolicy,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serialization target for encoded events.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Sorted `key=value` line.
    #[default]
    Canonical,
    /// One JSON document per line.
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "canonical" => Ok(Self::Canonical),
            "json" => Ok(Self::Json),
            _ => Err(format!("unknown output format: {s}")),
        }
    }
}

/// Output configuration.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,

    /// Skip input lines that fail to decode instead of aborting.
    #[serde(default)]
    pub skip_invalid: bool,
}

/// Logging configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "debug", "objadmin_log=debug,info").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Whether to output logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

/// Errors that can occur when loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Failed to read the configuration file.
    #[error("failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse config file: {0}")]
    Parse(#[from] toml::de::Error),
}

/// Loads configuration from a TOML file, falling back to defaults.
///
/// Environment variable overrides:
/// - `OBJADMIN_FORMAT` overrides `output.format` (`canonical` or `json`)
/// - `OBJADMIN_HASH_API`, `OBJADMIN_HASH_AUDIT`, `OBJADMIN_HASH_ERROR`
///   override the `hashing` flags
/// - `OBJADMIN_LOG_LEVEL` overrides `logging.level`
/// - `OBJADMIN_LOG_JSON` overrides `logging.json` (set to "true" to enable)
///
/// # Errors
///
/// Returns `ConfigError` if the file exists but cannot be read or parsed.
pub fn load_config(path: Option<&str>) -> Result<Config, ConfigError> {
    let mut config = match path {
        Some(p) => match std::fs::read_to_string(p) {
            Ok(contents) => toml::from_str(&contents)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::info!(path = p, "config file not found, using defaults");
                Config::default()
            }
            Err(e) => return Err(ConfigError::FileRead(e)),
        },
        None => Config::default(),
    };

    apply_env_overrides(&mut config, |key| std::env::var(key).ok());
    Ok(config)
}

fn parse_flag(value: &str) -> bool {
    value == "true" || value == "1"
}

/// Applies `OBJADMIN_*` overrides using `lookup` to read variables.
///
/// Unparseable values are ignored and leave the setting unchanged.
pub fn apply_env_overrides<F>(config: &mut Config, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(format) = lookup("OBJADMIN_FORMAT") {
        match format.parse() {
            Ok(parsed) => config.output.format = parsed,
            Err(e) => tracing::warn!(error = %e, "ignoring OBJADMIN_FORMAT"),
        }
    }
    if let Some(flag) = lookup("OBJADMIN_HASH_API") {
        config.hashing.api = parse_flag(&flag);
    }
    if let Some(flag) = lookup("OBJADMIN_HASH_AUDIT") {
        config.hashing.audit = parse_flag(&flag);
    }
    if let Some(flag) = lookup("OBJADMIN_HASH_ERROR") {
        config.hashing.error = parse_flag(&flag);
    }
    if let Some(level) = lookup("OBJADMIN_LOG_LEVEL") {
        config.logging.level = level;
    }
    if let Some(json) = lookup("OBJADMIN_LOG_JSON") {
        config.logging.json = parse_flag(&json);
    }
}
