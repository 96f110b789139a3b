use chrono::format::{Item, StrftimeItems};
use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::catalog::source::DEFAULT_SOURCE;
use crate::render::DEFAULT_TIME_FORMAT;

const CONFIG_FILE: &str = "agent-catalog.yaml";

/// Main configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Catalog location: a path or an http(s) URL
    pub source: String,
    pub log_level: LogLevel,
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Copy, Deserialize, Serialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    #[default]
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Delay between card reveals in interactive output; 0 disables it
    pub stagger_ms: u64,
    /// strftime format for last-active times
    pub time_format: String,
    /// How long a selection notification stays up
    pub notification_secs: u64,
    /// Colored output (also disabled by NO_COLOR or a non-TTY stdout)
    pub color: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            source: DEFAULT_SOURCE.to_string(),
            log_level: LogLevel::default(),
            display: DisplayConfig::default(),
        }
    }
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            stagger_ms: 100,
            time_format: DEFAULT_TIME_FORMAT.to_string(),
            notification_secs: 3,
            color: true,
        }
    }
}

impl DisplayConfig {
    /// The configured time format, or the default if it does not parse
    pub fn time_format(&self) -> &str {
        let invalid = StrftimeItems::new(&self.time_format).any(|item| matches!(item, Item::Error));
        if invalid {
            log::warn!(
                "Invalid display.time_format {:?}, using {:?}",
                self.time_format,
                DEFAULT_TIME_FORMAT
            );
            DEFAULT_TIME_FORMAT
        } else {
            &self.time_format
        }
    }

    pub fn notification_duration(&self) -> Duration {
        Duration::from_secs(self.notification_secs)
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        if let Ok(env_path) = std::env::var("AGENT_CATALOG_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from AGENT_CATALOG_CONFIG: {}", e);
                    }
                }
            }
        }

        if let Ok(dir) = std::env::var("AGENT_CATALOG_DIR") {
            let path = PathBuf::from(dir).join(CONFIG_FILE);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from AGENT_CATALOG_DIR: {}", e);
                    }
                }
            }
        }

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("agent-catalog").join(CONFIG_FILE);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./agent-catalog.yaml (for development)
        let local_config = PathBuf::from(CONFIG_FILE);
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Source to load: the command-line override if given, else the configured one
    pub fn source_or<'a>(&'a self, cli_source: Option<&'a str>) -> &'a str {
        cli_source.unwrap_or(&self.source)
    }
}
