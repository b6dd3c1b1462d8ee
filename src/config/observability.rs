//! Logging configuration

use serde::Deserialize;

/// Logging configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Logging settings as loaded from config file
#[derive(Debug, Clone, Deserialize, Default)]
pub struct FileLogging {
    pub level: Option<String>,
}

impl LoggingConfig {
    /// Create from file config with defaults
    pub fn from_file(file: Option<FileLogging>) -> Self {
        let file = file.unwrap_or_default();
        let defaults = Self::default();

        Self {
            level: file
                .level
                .map(|level| level.trim().to_lowercase())
                .filter(|level| !level.is_empty())
                .unwrap_or(defaults.level),
        }
    }
}
