//! CLI interface and argument parsing
//!
//! This module provides the command-line interface for logscrub using clap.

pub mod commands;

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// logscrub - consistent anonymization of diagnostic log files
#[derive(Parser, Debug)]
#[command(name = "logscrub")]
#[command(version, about, long_about = None)]
#[command(author = "logscrub Contributors")]
pub struct Cli {
    /// Path to configuration file (defaults apply when absent)
    #[arg(short, long, env = "LOGSCRUB_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "LOGSCRUB_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Whether the selected command asked for verbose output
    pub fn verbose(&self) -> bool {
        matches!(&self.command, Commands::Anonymize(args) if args.verbose)
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Anonymize a log file or a directory of log files
    Anonymize(commands::anonymize::AnonymizeArgs),

    /// Validate configuration file and pattern table
    ValidateConfig(commands::validate::ValidateArgs),

    /// Initialize a new configuration file
    Init(commands::init::InitArgs),
}
