//! Validate config command implementation
//!
//! This module implements the `validate-config` command, which checks the
//! configuration file and the pattern table it points at.

use crate::anonymization::detector::PatternTable;
use crate::config::ScrubConfig;
use crate::domain::Result;
use clap::Args;
use std::path::Path;

/// Arguments for the validate-config command
#[derive(Args, Debug)]
pub struct ValidateArgs {}

impl ValidateArgs {
    /// Execute the validate-config command
    pub async fn execute(
        &self,
        config_path: Option<&Path>,
        loaded: Result<ScrubConfig>,
    ) -> anyhow::Result<i32> {
        let shown = config_path
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "(defaults)".to_string());
        tracing::info!(config_path = %shown, "Validating configuration");

        println!("🔍 Validating configuration: {shown}");
        println!();

        let config = match loaded {
            Ok(c) => {
                println!("✅ Configuration loaded and valid");
                c
            }
            Err(e) => {
                println!("❌ Failed to load configuration");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        println!();
        println!("Configuration Summary:");
        println!("  Log Level: {}", config.application.log_level);
        println!(
            "  Pattern Table: {}",
            config.anonymization.pattern_table.display()
        );
        println!("  Token Length: {}", config.anonymization.token_length);
        println!(
            "  IPv4 Exempt Prefixes: {}",
            config.anonymization.ipv4_exempt_prefixes.join(", ")
        );
        println!("  File Extension: {}", config.processing.file_extension);
        println!("  Parallel Files: {}", config.processing.parallel_files);
        println!("  Dictionary Prefix: {}", config.processing.dictionary_prefix);
        println!(
            "  Audit Log: {}",
            if config.anonymization.audit.enabled {
                config.anonymization.audit.log_path.display().to_string()
            } else {
                "disabled".to_string()
            }
        );
        println!();

        let table = match PatternTable::from_file(&config.anonymization.pattern_table) {
            Ok(table) => table,
            Err(e) => {
                println!("❌ Pattern table unusable");
                println!("   Error: {e}");
                return Ok(e.exit_code());
            }
        };

        let missing = table.missing_categories();
        if missing.is_empty() {
            println!("✅ Pattern table covers every category ({} patterns)", table.len());
        } else {
            println!("⚠️  Pattern table loaded; these categories will be skipped:");
            for category in missing {
                let reason = table
                    .for_category(category)
                    .err()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                println!("   - {}: {}", category.display_name(), reason);
            }
        }

        Ok(0)
    }
}
