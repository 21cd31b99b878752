//! Configuration management for the corpus graph system

use crate::core::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Storage configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Metrics and monitoring
    #[serde(default)]
    pub metrics: MetricsConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Data directory path
    pub data_dir: PathBuf,

    /// Optional corpus fixture to ingest at startup (JSON)
    pub corpus_file: Option<PathBuf>,
}

/// Metrics configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricsConfig {
    /// Enable Prometheus metrics
    pub enable_prometheus: bool,

    /// Enable detailed per-operation metrics
    pub enable_detailed: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Log format (json, pretty)
    pub format: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("./data"),
            corpus_file: None,
        }
    }
}

impl Default for MetricsConfig {
    fn default() -> Self {
        Self {
            enable_prometheus: true,
            enable_detailed: false,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: "pretty".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables and config file
    pub fn load() -> Result<Self> {
        let mut config = Config::default();

        // Try to load from config file first
        if let Ok(file_config) = Self::from_file("corpus-graph.toml") {
            config = file_config;
        }

        // Override with environment variables
        config.apply_env_overrides()?;

        // Validate configuration
        config.validate()?;

        Ok(config)
    }

    /// Load configuration from a TOML file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .map_err(|e| Error::config(format!("Failed to read config file: {}", e)))?;

        toml::from_str(&contents)
            .map_err(|e| Error::config(format!("Failed to parse config file: {}", e)))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) -> Result<()> {
        use std::env;

        if let Ok(dir) = env::var("CG_DATA_DIR") {
            self.storage.data_dir = dir.into();
        }

        if let Ok(file) = env::var("CG_CORPUS_FILE") {
            self.storage.corpus_file = Some(file.into());
        }

        if let Ok(level) = env::var("CG_LOG_LEVEL") {
            self.logging.level = level;
        }

        if let Ok(format) = env::var("CG_LOG_FORMAT") {
            self.logging.format = format;
        }

        if let Ok(enabled) = env::var("CG_ENABLE_PROMETHEUS") {
            self.metrics.enable_prometheus = enabled
                .parse()
                .map_err(|e| Error::config(format!("Invalid CG_ENABLE_PROMETHEUS: {}", e)))?;
        }

        Ok(())
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        const LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];
        if !LEVELS.contains(&self.logging.level.as_str()) {
            return Err(Error::config(format!(
                "Invalid log level: {}",
                self.logging.level
            )));
        }

        const FORMATS: [&str; 2] = ["json", "pretty"];
        if !FORMATS.contains(&self.logging.format.as_str()) {
            return Err(Error::config(format!(
                "Invalid log format: {}",
                self.logging.format
            )));
        }

        Ok(())
    }
}
