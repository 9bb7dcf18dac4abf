//! Anonymization configuration

use crate::anonymization::anonymizer::masking::default_exempt_prefixes;
use crate::anonymization::anonymizer::tokenization::DEFAULT_TOKEN_LENGTH;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Smallest accepted token length
pub const MIN_TOKEN_LENGTH: usize = 4;
/// Largest accepted token length
pub const MAX_TOKEN_LENGTH: usize = 64;

/// Anonymization engine configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnonymizationConfig {
    /// Path to the pattern table (TOML or JSON)
    #[serde(default = "default_pattern_table")]
    pub pattern_table: PathBuf,

    /// Length of generated tokens
    #[serde(default = "default_token_length")]
    pub token_length: usize,

    /// IPv4 literals starting with one of these prefixes are never masked
    #[serde(default = "default_exempt_prefixes")]
    pub ipv4_exempt_prefixes: Vec<String>,

    /// Audit logging configuration
    #[serde(default)]
    pub audit: AuditConfig,
}

fn default_pattern_table() -> PathBuf {
    PathBuf::from("patterns.toml")
}

fn default_token_length() -> usize {
    DEFAULT_TOKEN_LENGTH
}

impl Default for AnonymizationConfig {
    fn default() -> Self {
        Self {
            pattern_table: default_pattern_table(),
            token_length: default_token_length(),
            ipv4_exempt_prefixes: default_exempt_prefixes(),
            audit: AuditConfig::default(),
        }
    }
}

impl AnonymizationConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if !(MIN_TOKEN_LENGTH..=MAX_TOKEN_LENGTH).contains(&self.token_length) {
            anyhow::bail!(
                "anonymization.token_length must be between {} and {}, got {}",
                MIN_TOKEN_LENGTH,
                MAX_TOKEN_LENGTH,
                self.token_length
            );
        }

        if self.ipv4_exempt_prefixes.iter().any(|p| p.is_empty()) {
            anyhow::bail!("anonymization.ipv4_exempt_prefixes must not contain empty prefixes");
        }

        if let Some(ext) = self.pattern_table.extension().and_then(|s| s.to_str()) {
            if ext != "toml" && ext != "json" {
                anyhow::bail!(
                    "Pattern table must be a TOML or JSON file: {}",
                    self.pattern_table.display()
                );
            }
        }

        self.audit.validate().context("Invalid audit configuration")?;

        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_PATTERN_TABLE") {
            self.pattern_table = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_TOKEN_LENGTH") {
            self.token_length = val
                .parse()
                .context("Invalid LOGSCRUB_ANONYMIZATION_TOKEN_LENGTH value")?;
        }

        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_IPV4_EXEMPT_PREFIXES") {
            self.ipv4_exempt_prefixes = val
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }

        self.audit.apply_env_overrides()?;

        Ok(())
    }
}

/// Audit logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditConfig {
    /// Enable audit logging
    #[serde(default)]
    pub enabled: bool,

    /// Audit log file path
    #[serde(default = "default_audit_log_path")]
    pub log_path: PathBuf,

    /// Use JSON format for audit logs
    #[serde(default = "default_audit_json_format")]
    pub json_format: bool,
}

fn default_audit_log_path() -> PathBuf {
    PathBuf::from("./audit/logscrub.log")
}

fn default_audit_json_format() -> bool {
    true
}

impl Default for AuditConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            log_path: default_audit_log_path(),
            json_format: default_audit_json_format(),
        }
    }
}

impl AuditConfig {
    /// Validate audit configuration
    pub fn validate(&self) -> Result<()> {
        if self.enabled && self.log_path.as_os_str().is_empty() {
            anyhow::bail!("anonymization.audit.log_path must be set when audit is enabled");
        }
        Ok(())
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_AUDIT_ENABLED") {
            self.enabled = val
                .parse()
                .context("Invalid LOGSCRUB_ANONYMIZATION_AUDIT_ENABLED value")?;
        }

        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_AUDIT_LOG_PATH") {
            self.log_path = PathBuf::from(val);
        }

        if let Ok(val) = std::env::var("LOGSCRUB_ANONYMIZATION_AUDIT_JSON_FORMAT") {
            self.json_format = val
                .parse()
                .context("Invalid LOGSCRUB_ANONYMIZATION_AUDIT_JSON_FORMAT value")?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AnonymizationConfig::default();
        assert_eq!(config.token_length, 12);
        assert_eq!(config.ipv4_exempt_prefixes, vec!["7.", "8."]);
        assert_eq!(config.pattern_table, PathBuf::from("patterns.toml"));
        assert!(!config.audit.enabled);
        assert!(config.audit.json_format);
    }

    #[test]
    fn test_config_validation() {
        assert!(AnonymizationConfig::default().validate().is_ok());
    }

    #[test]
    fn test_token_length_bounds() {
        let mut config = AnonymizationConfig::default();
        config.token_length = 2;
        assert!(config.validate().is_err());
        config.token_length = 65;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_pattern_table_extension() {
        let mut config = AnonymizationConfig::default();
        config.pattern_table = PathBuf::from("patterns.json");
        assert!(config.validate().is_ok());
        config.pattern_table = PathBuf::from("patterns.yaml");
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_empty_exempt_prefix_rejected() {
        let mut config = AnonymizationConfig::default();
        config.ipv4_exempt_prefixes = vec![String::new()];
        assert!(config.validate().is_err());
    }
}
