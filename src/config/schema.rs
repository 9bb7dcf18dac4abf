//! Configuration schema types
//!
//! Every section is optional; a missing file or section falls back to defaults.

use crate::anonymization::config::AnonymizationConfig;
use crate::anonymization::dictionary::DEFAULT_DICTIONARY_PREFIX;
use serde::{Deserialize, Serialize};

/// Main logscrub configuration
///
/// This is the root configuration structure that maps to the TOML file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrubConfig {
    /// Application-level settings
    #[serde(default)]
    pub application: ApplicationConfig,

    /// Anonymization engine settings
    #[serde(default)]
    pub anonymization: AnonymizationConfig,

    /// File processing settings
    #[serde(default)]
    pub processing: ProcessingConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl ScrubConfig {
    /// Validates the configuration
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid
    pub fn validate(&self) -> Result<(), String> {
        self.application.validate()?;
        self.anonymization
            .validate()
            .map_err(|e| format!("{e:#}"))?;
        self.processing.validate()?;
        self.logging.validate()?;
        Ok(())
    }
}

/// Application-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApplicationConfig {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl ApplicationConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.log_level.as_str()) {
            return Err(format!(
                "Invalid log_level '{}'. Must be one of: {}",
                self.log_level,
                valid_levels.join(", ")
            ));
        }
        Ok(())
    }
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

/// File processing configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessingConfig {
    /// Extension of log files picked up in directory mode (without the dot)
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Files anonymized concurrently during the application pass
    #[serde(default = "default_parallel_files")]
    pub parallel_files: usize,

    /// File name prefix of dictionary files
    #[serde(default = "default_dictionary_prefix")]
    pub dictionary_prefix: String,
}

impl ProcessingConfig {
    fn validate(&self) -> Result<(), String> {
        if self.file_extension.is_empty() {
            return Err("processing.file_extension cannot be empty".to_string());
        }

        if self.file_extension.starts_with('.') {
            return Err(format!(
                "processing.file_extension must not start with a dot: '{}'",
                self.file_extension
            ));
        }

        if self.parallel_files == 0 {
            return Err("processing.parallel_files must be greater than 0".to_string());
        }

        if self.parallel_files > 64 {
            return Err("processing.parallel_files cannot exceed 64".to_string());
        }

        if self.dictionary_prefix.is_empty()
            || self.dictionary_prefix.contains(['/', '\\'])
        {
            return Err(format!(
                "Invalid processing.dictionary_prefix '{}'",
                self.dictionary_prefix
            ));
        }

        Ok(())
    }
}

impl Default for ProcessingConfig {
    fn default() -> Self {
        Self {
            file_extension: default_file_extension(),
            parallel_files: default_parallel_files(),
            dictionary_prefix: default_dictionary_prefix(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Enable local file logging
    #[serde(default)]
    pub local_enabled: bool,

    /// Local log directory
    #[serde(default = "default_local_path")]
    pub local_path: String,

    /// Log rotation strategy (daily, hourly)
    #[serde(default = "default_local_rotation")]
    pub local_rotation: String,
}

impl LoggingConfig {
    fn validate(&self) -> Result<(), String> {
        let valid_rotations = ["daily", "hourly"];
        if !valid_rotations.contains(&self.local_rotation.as_str()) {
            return Err(format!(
                "Invalid logging.local_rotation '{}'. Must be one of: {}",
                self.local_rotation,
                valid_rotations.join(", ")
            ));
        }

        if self.local_enabled && self.local_path.is_empty() {
            return Err("logging.local_path cannot be empty when local logging is enabled".to_string());
        }

        Ok(())
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            local_enabled: false,
            local_path: default_local_path(),
            local_rotation: default_local_rotation(),
        }
    }
}

// Default value functions
fn default_log_level() -> String {
    "info".to_string()
}

fn default_file_extension() -> String {
    "log".to_string()
}

fn default_parallel_files() -> usize {
    1
}

fn default_dictionary_prefix() -> String {
    DEFAULT_DICTIONARY_PREFIX.to_string()
}

fn default_local_path() -> String {
    "./logs".to_string()
}

fn default_local_rotation() -> String {
    "daily".to_string()
}
