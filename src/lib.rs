// logscrub - Consistent Anonymization of Diagnostic Logs
// Copyright (c) 2025 logscrub Contributors
// Licensed under the MIT License

//! # logscrub - Consistent Anonymization of Diagnostic Logs
//!
//! logscrub replaces server names, accounts, domains, email addresses, object
//! paths and IPv4 addresses in backup-software diagnostic logs with random
//! tokens, so the logs can be shared with a support engineer without leaking
//! infrastructure details.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Extracting** identifiers with a configurable table of regular expressions
//! - **Classifying** them into FQDNs, bare hosts, IPv4 literals and accounts
//! - **Mapping** every original to one token, shared across all input files
//! - **Substituting** in a fixed order, finishing with IPv4 masking
//! - **Persisting** the mapping to a JSON dictionary for later de-anonymization
//!
//! ## Architecture
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Run orchestration (discovery, collection, application, summary)
//! - [`anonymization`] - Mapping engine
//! - [`domain`] - Error types
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use logscrub::config::load_config;
//! use logscrub::core::run::{InputSource, RunCoordinator, RunOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = load_config("logscrub.toml")?;
//!     let options = RunOptions::new(InputSource::Directory("./logs".into()), "./scrubbed");
//!     let (_tx, shutdown) = tokio::sync::watch::channel(false);
//!
//!     let summary = RunCoordinator::new(config, options, shutdown)?.execute().await?;
//!
//!     println!("Anonymized {} files", summary.files_anonymized);
//!     Ok(())
//! }
//! ```
//!
//! ## Error Handling
//!
//! Library operations return [`domain::ScrubError`]. A category whose pattern
//! is missing or invalid is not an error: it is skipped and reported.

pub mod anonymization;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
