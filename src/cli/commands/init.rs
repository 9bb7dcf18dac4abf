//! Init command implementation
//!
//! This module implements the `init` command for generating a sample
//! configuration file and, optionally, the default pattern table.

use crate::anonymization::detector::patterns::DEFAULT_PATTERNS_TOML;
use clap::Args;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the pattern table written next to the configuration
pub const PATTERNS_FILE: &str = "patterns.toml";

/// Arguments for the init command
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Path where to create the configuration file
    #[arg(short, long, default_value = "logscrub.toml")]
    pub output: PathBuf,

    /// Also write the built-in pattern table next to the configuration
    #[arg(long)]
    pub with_patterns: bool,

    /// Overwrite existing files
    #[arg(long)]
    pub force: bool,
}

impl InitArgs {
    /// Path of the pattern table written by `--with-patterns`
    pub fn patterns_path(&self) -> PathBuf {
        match self.output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.join(PATTERNS_FILE),
            _ => PathBuf::from(PATTERNS_FILE),
        }
    }

    /// Execute the init command
    pub async fn execute(&self) -> anyhow::Result<i32> {
        tracing::info!(output = %self.output.display(), "Initializing configuration file");

        println!("📝 Initializing logscrub configuration");
        println!();

        let patterns_path = self.patterns_path();
        let mut targets = vec![self.output.as_path()];
        if self.with_patterns {
            targets.push(patterns_path.as_path());
        }

        if !self.force {
            if let Some(existing) = targets.iter().find(|p| p.exists()) {
                println!("❌ File already exists: {}", existing.display());
                println!("   Use --force to overwrite");
                return Ok(2);
            }
        }

        if let Err(e) = write_file(&self.output, &Self::generate_config()) {
            println!("❌ Failed to write configuration file");
            println!("   Error: {e}");
            return Ok(5);
        }
        println!("✅ Configuration file created: {}", self.output.display());

        if self.with_patterns {
            if let Err(e) = write_file(&patterns_path, DEFAULT_PATTERNS_TOML) {
                println!("❌ Failed to write pattern table");
                println!("   Error: {e}");
                return Ok(5);
            }
            println!("✅ Pattern table created: {}", patterns_path.display());
        }

        println!();
        println!("Next steps:");
        println!("  1. Edit {} with your settings", self.output.display());
        if self.with_patterns {
            println!("  2. Adjust the expressions in {}", patterns_path.display());
        } else {
            println!("  2. Provide a pattern table (or rerun with --with-patterns)");
        }
        println!("  3. Validate configuration: logscrub validate-config");
        println!("  4. Run: logscrub anonymize -d ./logs -o ./scrubbed");
        println!();

        Ok(0)
    }

    /// Generate the configuration file with comments
    fn generate_config() -> String {
        r#"# logscrub Configuration File
#
# Every setting has a default; remove what you do not need to change.
# Values may reference environment variables as ${VAR}, and any setting can
# be overridden with LOGSCRUB_<SECTION>_<KEY> (e.g. LOGSCRUB_PROCESSING_PARALLEL_FILES).

# ============================================================================
# Application Settings
# ============================================================================
[application]
# Log level (trace, debug, info, warn, error)
log_level = "info"

# ============================================================================
# Anonymization
# ============================================================================
[anonymization]
# Pattern table with one regular expression per category (TOML or JSON)
pattern_table = "patterns.toml"

# Length of generated tokens (4-64)
token_length = 12

# IPv4 literals starting with these prefixes are left unmasked
ipv4_exempt_prefixes = ["7.", "8."]

[anonymization.audit]
# Record mapping and per-file events; originals are stored as SHA-256 hashes
enabled = false
log_path = "./audit/logscrub.log"
json_format = true

# ============================================================================
# Processing
# ============================================================================
[processing]
# Extension of log files picked up in directory mode
file_extension = "log"

# Files anonymized concurrently (1-64)
parallel_files = 1

# Dictionary file name prefix
dictionary_prefix = "logscrub-dictionary"

# ============================================================================
# Logging Configuration
# ============================================================================
[logging]
# Enable local file logging (JSON lines)
local_enabled = false

# Local log directory
local_path = "./logs"

# Log rotation (daily or hourly)
local_rotation = "daily"
"#
        .to_string()
    }
}

fn write_file(path: &Path, content: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, content)
}
