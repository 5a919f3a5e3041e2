//! Configuration management for PhotoResize

use std::path::Path;
use serde::{Deserialize, Serialize};
use crate::error::{Result, PhotoResizeError};

/// Longest side, in pixels, of every resized image
pub const TARGET_SIZE: u32 = 800;

/// Name of the subdirectory that receives the resized images
pub const OUTPUT_DIR_NAME: &str = "Resized";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level or filter directive (trace, debug, info, warn, error)
    pub level: String,

    /// Emit log lines as JSON
    #[serde(default)]
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

impl Config {
    /// Load configuration from a `.toml` or `.yaml` file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)
            .map_err(|e| PhotoResizeError::config(
                format!("Failed to read config file {:?}: {}", path.as_ref(), e)
            ))?;

        let config: Config = match extension_of(path.as_ref()).as_str() {
            "toml" => toml::from_str(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            _ => return Err(PhotoResizeError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        config.validate()?;
        Ok(config)
    }

    /// Save configuration to file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = match extension_of(path.as_ref()).as_str() {
            "toml" => toml::to_string_pretty(self)
                .map_err(|e| PhotoResizeError::config(format!("TOML serialization failed: {}", e)))?,
            "yaml" | "yml" => serde_yaml::to_string(self)
                .map_err(|e| PhotoResizeError::config(format!("YAML serialization failed: {}", e)))?,
            _ => return Err(PhotoResizeError::config(
                "Unsupported config file format. Use .toml or .yaml"
            )),
        };

        std::fs::write(&path, content)
            .map_err(|e| PhotoResizeError::config(
                format!("Failed to write config file {:?}: {}", path.as_ref(), e)
            ))?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<()> {
        if self.logging.level.trim().is_empty() {
            return Err(PhotoResizeError::config("Log level must not be empty"));
        }

        tracing_subscriber::EnvFilter::try_new(&self.logging.level)
            .map_err(|e| PhotoResizeError::config(
                format!("Invalid log level '{}': {}", self.logging.level, e)
            ))?;

        Ok(())
    }

    /// Override the log level (command-line verbosity flags win over the file)
    pub fn with_log_level<S: Into<String>>(mut self, level: S) -> Self {
        self.logging.level = level.into();
        self
    }
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .and_then(|ext| ext.to_str())
        .unwrap_or("")
        .to_lowercase()
}
