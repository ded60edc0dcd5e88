//! Configuration loading from TOML and environment variables.
//!
//! The CLI reads its configuration from:
//! 1. A TOML config file: `--config`, else `FAMIGLIA_CONFIG`, else
//!    `<config dir>/famiglia/famiglia.toml` when it exists
//! 2. Environment variables (override TOML values)
//!
//! Environment variable prefix: FAMIGLIA_

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use famiglia_protocol::{
    CONFIG_DIR_NAME, DEFAULT_CONFIG_FILE, DEFAULT_JOURNAL_CAPACITY, DEFAULT_LOG_LEVEL, ENV_PREFIX,
};
use serde::{Deserialize, Serialize};

/// Top-level CLI configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CliConfig {
    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Output rendering configuration.
    #[serde(default)]
    pub output: OutputConfig,
    /// Journal configuration.
    #[serde(default)]
    pub journal: JournalConfig,
}

/// Logging configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g., "info", "famiglia_hierarchy=debug").
    #[serde(default = "default_log_level")]
    pub level: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalConfig {
    /// Events retained before the oldest are evicted. Zero disables the journal.
    #[serde(default = "default_journal_capacity")]
    pub capacity: usize,
}

/// How outcomes are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable lines and trees.
    #[default]
    Text,
    /// One JSON document per outcome.
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" => Ok(OutputFormat::Text),
            "json" => Ok(OutputFormat::Json),
            other => Err(format!("unknown output format: {other}")),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

// -- Defaults --

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}
fn default_journal_capacity() -> usize {
    DEFAULT_JOURNAL_CAPACITY
}

// -- Trait impls --

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: OutputFormat::Text,
        }
    }
}

impl Default for JournalConfig {
    fn default() -> Self {
        Self {
            capacity: default_journal_capacity(),
        }
    }
}

impl CliConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self, anyhow::Error> {
        let content = std::fs::read_to_string(path)?;
        let config: CliConfig = toml::from_str(&content)?;
        Ok(config)
    }

    /// Resolve the config file, load it, then apply environment overrides.
    ///
    /// An explicit path that does not exist is reported and defaults are used.
    pub fn load(path: Option<&Path>) -> Result<Self, anyhow::Error> {
        let mut config = match Self::resolve_path(path) {
            Some(path) if path.exists() => {
                tracing::debug!(path = %path.display(), "Loading config file");
                Self::from_file(&path)?
            }
            Some(path) => {
                tracing::warn!(
                    path = %path.display(),
                    "Config file not found, using defaults"
                );
                Self::default()
            }
            None => Self::default(),
        };

        config.apply_env_overrides();

        Ok(config)
    }

    /// The file to read, if any. The platform default is only used when present.
    pub fn resolve_path(explicit: Option<&Path>) -> Option<PathBuf> {
        if let Some(path) = explicit {
            return Some(path.to_path_buf());
        }
        if let Ok(path) = std::env::var(env_key("CONFIG")) {
            return Some(PathBuf::from(path));
        }
        Self::default_path().filter(|path| path.exists())
    }

    /// `<config dir>/famiglia/famiglia.toml`.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(CONFIG_DIR_NAME).join(DEFAULT_CONFIG_FILE))
    }

    /// Apply environment variable overrides to the configuration.
    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from any key lookup. Unparseable values are ignored
    /// with a warning.
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(val) = lookup(&env_key("LOG_LEVEL")) {
            self.logging.level = val;
        }
        if let Some(val) = lookup(&env_key("OUTPUT_FORMAT")) {
            match val.parse() {
                Ok(format) => self.output.format = format,
                Err(e) => tracing::warn!(error = %e, "Ignoring output format override"),
            }
        }
        if let Some(val) = lookup(&env_key("JOURNAL_CAPACITY")) {
            match val.trim().parse() {
                Ok(capacity) => self.journal.capacity = capacity,
                Err(_) => tracing::warn!(value = %val, "Ignoring journal capacity override"),
            }
        }
    }
}

fn env_key(name: &str) -> String {
    format!("{ENV_PREFIX}{name}")
}
