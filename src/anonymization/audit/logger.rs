//! Audit logger for anonymization runs

use crate::anonymization::config::AuditConfig;
use crate::anonymization::engine::SubstitutionStats;
use crate::anonymization::models::{Category, MappingSnapshot};
use anyhow::{Context, Result};
use chrono::Utc;
use serde::Serialize;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Audit entry for the frozen mapping
#[derive(Debug, Serialize)]
struct MappingAuditEntry {
    timestamp: String,
    event: &'static str,
    total_entries: usize,
    entries: Vec<AuditMapping>,
}

/// One mapping pair (original hashed)
#[derive(Debug, Serialize)]
struct AuditMapping {
    category: Category,
    /// SHA-256 hash of the original value (never log plaintext identifiers)
    original_hash: String,
    token: String,
}

/// Audit entry for one anonymized file
#[derive(Debug, Serialize)]
struct FileAuditEntry {
    timestamp: String,
    event: &'static str,
    file: String,
    replacements: BTreeMap<Category, usize>,
    masked_ipv4: usize,
    masking_skipped: bool,
}

/// Audit logger for anonymization runs
pub struct AuditLogger {
    log_path: PathBuf,
    json_format: bool,
    enabled: bool,
}

impl AuditLogger {
    /// Create a new audit logger
    pub fn new(log_path: PathBuf, json_format: bool, enabled: bool) -> Result<Self> {
        if enabled {
            if let Some(parent) = log_path.parent() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create audit log directory: {}", parent.display())
                })?;
            }
        }

        Ok(Self {
            log_path,
            json_format,
            enabled,
        })
    }

    /// Create an audit logger from configuration
    pub fn from_config(config: &AuditConfig) -> Result<Self> {
        Self::new(config.log_path.clone(), config.json_format, config.enabled)
    }

    /// Whether entries are written
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Log the frozen mapping
    pub fn log_snapshot(&self, snapshot: &MappingSnapshot) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entries = Category::ALL
            .iter()
            .flat_map(|&category| {
                snapshot.entries(category).iter().map(move |e| AuditMapping {
                    category,
                    original_hash: hash_value(&e.original),
                    token: e.token.clone(),
                })
            })
            .collect();

        let entry = MappingAuditEntry {
            timestamp: Utc::now().to_rfc3339(),
            event: "mapping_built",
            total_entries: snapshot.total_entries(),
            entries,
        };

        if self.json_format {
            self.write_json(&entry)
        } else {
            self.write_line(&format!(
                "[{}] Mapping built | Entries: {}",
                entry.timestamp, entry.total_entries
            ))
        }
    }

    /// Log the outcome of one anonymized file
    pub fn log_file(&self, file: &Path, stats: &SubstitutionStats) -> Result<()> {
        if !self.enabled {
            return Ok(());
        }

        let entry = FileAuditEntry {
            timestamp: Utc::now().to_rfc3339(),
            event: "file_anonymized",
            file: file.display().to_string(),
            replacements: stats.replacements.clone(),
            masked_ipv4: stats.masked_ipv4,
            masking_skipped: stats.masking_skipped,
        };

        if self.json_format {
            self.write_json(&entry)
        } else {
            self.write_line(&format!(
                "[{}] File: {} | Replacements: {} | Masked IPv4: {}",
                entry.timestamp,
                entry.file,
                stats.total() - stats.masked_ipv4,
                entry.masked_ipv4
            ))
        }
    }

    fn write_json<T: Serialize>(&self, entry: &T) -> Result<()> {
        let json_line = serde_json::to_string(entry).context("Failed to serialize audit entry")?;
        self.write_line(&json_line)
    }

    fn write_line(&self, line: &str) -> Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .with_context(|| format!("Failed to open audit log: {}", self.log_path.display()))?;

        writeln!(file, "{line}").context("Failed to write audit entry")?;
        Ok(())
    }
}

/// Hash a value using SHA-256
fn hash_value(value: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(value.as_bytes());
    let result = hasher.finalize();
    format!("{result:x}")
}
