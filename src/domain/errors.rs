//! Domain error types
//!
//! This module defines the error hierarchy for logscrub. Collection-pass
//! failures for a single category never surface as errors: the extractor
//! converts them into a degraded [`Extraction`](crate::anonymization::detector::Extraction).
//! Everything defined here is either fatal for the run or reported to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// Main logscrub error type
#[derive(Debug, Error)]
pub enum ScrubError {
    /// The pattern table file does not exist; aborts before any processing
    #[error("Pattern table not found: {}", .0.display())]
    ConfigurationMissing(PathBuf),

    /// An input log file could not be read
    #[error("Input file unavailable: {}: {reason}", path.display())]
    InputUnavailable {
        /// Path of the unreadable file
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// A category key is absent from the pattern table
    #[error("Pattern key '{0}' not found in pattern table")]
    PatternNotFound(String),

    /// A category key is present but its expression does not compile
    #[error("Invalid pattern for key '{key}': {reason}")]
    InvalidPattern {
        /// Pattern table key
        key: String,
        /// Compiler message
        reason: String,
    },

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Preparing, copying or writing an output path failed
    #[error("Output error: {}: {reason}", path.display())]
    Output {
        /// Destination path
        path: PathBuf,
        /// Underlying failure
        reason: String,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(String),

    /// Generic errors with context
    #[error("{0}")]
    Other(String),
}

impl ScrubError {
    /// Builds an [`ScrubError::InputUnavailable`] from an I/O failure
    pub fn input(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ScrubError::InputUnavailable {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Builds an [`ScrubError::Output`] from an I/O failure
    pub fn output(path: impl Into<PathBuf>, err: impl std::fmt::Display) -> Self {
        ScrubError::Output {
            path: path.into(),
            reason: err.to_string(),
        }
    }

    /// Process exit code used by the CLI for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            ScrubError::ConfigurationMissing(_)
            | ScrubError::Configuration(_)
            | ScrubError::PatternNotFound(_)
            | ScrubError::InvalidPattern { .. } => 2,
            ScrubError::InputUnavailable { .. } | ScrubError::Output { .. } => 1,
            _ => 5,
        }
    }
}

// Conversion from std::io::Error
impl From<std::io::Error> for ScrubError {
    fn from(err: std::io::Error) -> Self {
        ScrubError::Io(err.to_string())
    }
}

// Conversion from serde_json::Error
impl From<serde_json::Error> for ScrubError {
    fn from(err: serde_json::Error) -> Self {
        ScrubError::Serialization(err.to_string())
    }
}

// Conversion from toml parse errors
impl From<toml::de::Error> for ScrubError {
    fn from(err: toml::de::Error) -> Self {
        ScrubError::Configuration(format!("TOML parse error: {err}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrub_error_display() {
        let err = ScrubError::Configuration("Invalid config".to_string());
        assert_eq!(err.to_string(), "Configuration error: Invalid config");
    }

    #[test]
    fn test_configuration_missing_display() {
        let err = ScrubError::ConfigurationMissing(PathBuf::from("patterns.toml"));
        assert_eq!(err.to_string(), "Pattern table not found: patterns.toml");
    }

    #[test]
    fn test_input_helper() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = ScrubError::input("/var/log/a.log", io_err);
        assert!(matches!(err, ScrubError::InputUnavailable { .. }));
        assert!(err.to_string().contains("/var/log/a.log"));
        assert!(err.to_string().contains("gone"));
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(ScrubError::PatternNotFound("Email".into()).exit_code(), 2);
        assert_eq!(ScrubError::output("/out", "denied").exit_code(), 1);
        assert_eq!(ScrubError::Other("boom".into()).exit_code(), 5);
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "File not found");
        let err: ScrubError = io_err.into();
        assert!(matches!(err, ScrubError::Io(_)));
    }

    #[test]
    fn test_serde_json_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("invalid json").unwrap_err();
        let err: ScrubError = json_err.into();
        assert!(matches!(err, ScrubError::Serialization(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let toml_err = toml::from_str::<toml::Value>("invalid = toml = syntax").unwrap_err();
        let err: ScrubError = toml_err.into();
        assert!(matches!(err, ScrubError::Configuration(_)));
        assert!(err.to_string().contains("TOML parse error"));
    }
}
