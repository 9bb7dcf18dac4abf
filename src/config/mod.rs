//! Configuration management for logscrub.
//!
//! This module provides TOML-based configuration loading, parsing, and validation.
//!
//! # Overview
//!
//! logscrub runs without a configuration file; when one is given it supports:
//! - Environment variable substitution (`${VAR_NAME}`)
//! - `LOGSCRUB_<SECTION>_<KEY>` environment overrides
//! - Default values for every setting
//! - Validation before any file is touched
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use logscrub::config::load_config;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("logscrub.toml")?;
//!
//! println!("Pattern table: {}", config.anonymization.pattern_table.display());
//! println!("Parallel files: {}", config.processing.parallel_files);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration Structure
//!
//! - [`ApplicationConfig`] - Application settings (log level)
//! - [`AnonymizationConfig`](crate::anonymization::AnonymizationConfig) - Pattern table, tokens, IPv4 exemptions, audit
//! - [`ProcessingConfig`] - Input extension, parallelism, dictionary naming
//! - [`LoggingConfig`] - Logging configuration
//!
//! # Example Configuration
//!
//! ```toml
//! [application]
//! log_level = "info"
//!
//! [anonymization]
//! pattern_table = "patterns.toml"
//! token_length = 12
//! ipv4_exempt_prefixes = ["7.", "8."]
//!
//! [anonymization.audit]
//! enabled = true
//! log_path = "${LOGSCRUB_AUDIT_DIR}/logscrub.log"
//!
//! [processing]
//! file_extension = "log"
//! parallel_files = 4
//! ```

pub mod loader;
pub mod schema;

// Re-export commonly used types
pub use loader::{load_config, load_or_default};
pub use schema::{ApplicationConfig, LoggingConfig, ProcessingConfig, ScrubConfig};
