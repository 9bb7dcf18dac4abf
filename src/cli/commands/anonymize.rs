//! Anonymize command implementation
//!
//! This module implements the `anonymize` command, which scrubs a log file or
//! a directory of log files into an output directory.

use crate::config::ScrubConfig;
use crate::core::run::{InputSource, RunCoordinator, RunOptions};
use crate::domain::Result;
use clap::{ArgGroup, Args};
use std::path::PathBuf;
use tokio::sync::watch;

/// Arguments for the anonymize command
#[derive(Args, Debug)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "directory"])))]
pub struct AnonymizeArgs {
    /// Single log file to anonymize
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory searched recursively for log files
    #[arg(short, long, value_name = "DIR")]
    pub directory: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub output: PathBuf,

    /// Overwrite existing output files and create the output directory
    #[arg(short, long)]
    pub force: bool,

    /// Print the original-to-token mapping after collection
    #[arg(short, long)]
    pub mapping: bool,

    /// Write the mapping to a dictionary file in the output directory
    #[arg(short = 'D', long)]
    pub dictionary: bool,

    /// Show per-file progress
    #[arg(short, long)]
    pub verbose: bool,

    /// Override the pattern table path
    #[arg(short, long, value_name = "FILE")]
    pub patterns: Option<PathBuf>,

    /// Override the number of files anonymized concurrently
    #[arg(long, value_name = "N")]
    pub parallel: Option<usize>,
}

impl AnonymizeArgs {
    /// Input source selected on the command line
    pub fn source(&self) -> Option<InputSource> {
        match (&self.input, &self.directory) {
            (Some(file), None) => Some(InputSource::File(file.clone())),
            (None, Some(dir)) => Some(InputSource::Directory(dir.clone())),
            _ => None,
        }
    }

    /// Execute the anonymize command
    pub async fn execute(
        &self,
        loaded: Result<ScrubConfig>,
        shutdown_signal: watch::Receiver<bool>,
    ) -> anyhow::Result<i32> {
        tracing::info!("Starting anonymize command");

        let mut config = match loaded {
            Ok(config) => config,
            Err(e) => {
                tracing::error!(error = %e, "Failed to load configuration");
                eprintln!("Failed to load configuration: {e}");
                return Ok(e.exit_code());
            }
        };

        // Apply CLI overrides
        if let Some(patterns) = &self.patterns {
            tracing::info!(patterns = %patterns.display(), "Overriding pattern table from CLI");
            config.anonymization.pattern_table = patterns.clone();
        }

        if let Some(parallel) = self.parallel {
            tracing::info!(parallel, "Overriding parallel files from CLI");
            config.processing.parallel_files = parallel;
        }

        if let Err(e) = config.validate() {
            tracing::error!(error = %e, "Configuration validation failed");
            eprintln!("Configuration validation failed: {e}");
            return Ok(2);
        }

        let Some(source) = self.source() else {
            eprintln!("Exactly one of --input or --directory is required");
            return Ok(2);
        };

        let options = RunOptions {
            source,
            output_dir: self.output.clone(),
            force: self.force,
            show_mapping: self.mapping,
            write_dictionary: self.dictionary,
            verbose: self.verbose,
        };

        let coordinator = match RunCoordinator::new(config, options, shutdown_signal) {
            Ok(c) => c,
            Err(e) => {
                tracing::error!(error = %e, "Failed to initialize anonymization");
                eprintln!("Failed to initialize anonymization: {e}");
                return Ok(e.exit_code());
            }
        };

        let summary = match coordinator.execute().await {
            Ok(s) => s,
            Err(e) => {
                tracing::error!(error = %e, "Anonymization failed");
                eprintln!("Anonymization failed: {e}");
                return Ok(e.exit_code());
            }
        };

        if let Some(report) = &summary.mapping_report {
            print!("{}", report.format_console());
        }

        println!();
        print!("{}", summary.format_console());
        println!();

        let exit_code = if summary.interrupted {
            println!("⚠️  Anonymization interrupted. Files already written are complete.");
            130
        } else if summary.total_files == 0 {
            println!("⚠️  No log files found");
            0
        } else {
            println!("✅ Anonymization completed successfully!");
            0
        };

        Ok(exit_code)
    }
}
