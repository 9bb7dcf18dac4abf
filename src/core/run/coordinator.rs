//! Run coordinator - orchestrates the two anonymization passes
//!
//! 1. **Collection**: every input file is read once and fed to the
//!    [`MappingBuilder`]; the builder is then frozen into a snapshot.
//! 2. **Reporting**: optional mapping report, audit entry and dictionary.
//! 3. **Application**: each file is rewritten by the shared
//!    [`SubstitutionEngine`], up to `processing.parallel_files` at a time.
//!
//! Output problems (existing files without `force`, a missing output
//! directory) are detected before anything is written.

use crate::anonymization::anonymizer::TokenGenerator;
use crate::anonymization::audit::AuditLogger;
use crate::anonymization::builder::MappingBuilder;
use crate::anonymization::detector::regex::read_log_file;
use crate::anonymization::detector::{PatternTable, RegexExtractor};
use crate::anonymization::dictionary::{dictionary_path, existing_dictionaries, update_dictionary_file};
use crate::anonymization::engine::SubstitutionEngine;
use crate::anonymization::models::MappingSnapshot;
use crate::anonymization::report::MappingReport;
use crate::config::ScrubConfig;
use crate::core::run::discovery::{discover, InputSource, LogFile};
use crate::core::run::summary::{FileOutcome, RunSummary};
use crate::domain::{Result, ScrubError};
use futures::stream::{self, StreamExt};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::watch;

/// Options taken from the command line
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Input file or directory
    pub source: InputSource,
    /// Output directory
    pub output_dir: PathBuf,
    /// Overwrite existing outputs and create a missing output directory
    pub force: bool,
    /// Produce a mapping report after collection
    pub show_mapping: bool,
    /// Merge the mapping into a timestamped dictionary file
    pub write_dictionary: bool,
    /// Per-file progress output
    pub verbose: bool,
}

impl RunOptions {
    /// Options for `source` written to `output_dir`, everything else off
    pub fn new(source: InputSource, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            source,
            output_dir: output_dir.into(),
            force: false,
            show_mapping: false,
            write_dictionary: false,
            verbose: false,
        }
    }
}

/// Run coordinator
pub struct RunCoordinator {
    config: ScrubConfig,
    options: RunOptions,
    extractor: RegexExtractor,
    generator: Option<Box<dyn TokenGenerator>>,
    audit: AuditLogger,
    shutdown_signal: watch::Receiver<bool>,
}

impl RunCoordinator {
    /// Create a coordinator, loading the configured pattern table
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::ConfigurationMissing`] if the pattern table file
    /// does not exist, or a configuration error if it cannot be parsed.
    pub fn new(
        config: ScrubConfig,
        options: RunOptions,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        let table = PatternTable::from_file(&config.anonymization.pattern_table)?;
        Self::with_pattern_table(config, options, table, shutdown_signal)
    }

    /// Create a coordinator over an already loaded pattern table
    pub fn with_pattern_table(
        config: ScrubConfig,
        options: RunOptions,
        table: PatternTable,
        shutdown_signal: watch::Receiver<bool>,
    ) -> Result<Self> {
        for category in table.missing_categories() {
            tracing::warn!(category = %category, "No pattern configured; category will be skipped");
        }

        let audit = AuditLogger::from_config(&config.anonymization.audit)
            .map_err(|e| ScrubError::Configuration(format!("{e:#}")))?;
        if audit.is_enabled() {
            tracing::info!(
                path = %config.anonymization.audit.log_path.display(),
                "Audit logging enabled"
            );
        }

        Ok(Self {
            config,
            options,
            extractor: RegexExtractor::with_table(table),
            generator: None,
            audit,
            shutdown_signal,
        })
    }

    /// Draw tokens from `generator` instead of random tokens
    pub fn with_token_generator(mut self, generator: Box<dyn TokenGenerator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Execute the run
    pub async fn execute(mut self) -> Result<RunSummary> {
        let start_time = Instant::now();
        let mut summary = RunSummary::new();

        self.prepare_output_dir()?;

        let files = discover(
            &self.options.source,
            &self.options.output_dir,
            &self.config.processing.file_extension,
        )?;
        summary.total_files = files.len();

        if files.is_empty() {
            tracing::warn!(
                input = %self.options.source.path().display(),
                extension = %self.config.processing.file_extension,
                "No log files found"
            );
            return Ok(summary.with_duration(start_time.elapsed()));
        }

        tracing::info!(files = files.len(), "Collecting identifiers");

        // Collection pass
        let builder = match self.generator.take() {
            Some(generator) => MappingBuilder::new(generator),
            None => MappingBuilder::with_random_tokens(self.config.anonymization.token_length),
        };
        let extractor = self.extractor.clone();
        let collect_files = files.clone();
        let force = self.options.force;
        let builder = tokio::task::spawn_blocking(move || {
            collect(builder, &extractor, &collect_files, force)
        })
        .await
        .map_err(|e| ScrubError::Other(format!("Collection task failed: {e}")))??;

        summary.degraded = builder.degraded().clone();
        let snapshot = builder.build();
        summary.mapping_counts = snapshot.counts();

        tracing::info!(entries = snapshot.total_entries(), "Mapping built");

        self.audit
            .log_snapshot(&snapshot)
            .map_err(|e| ScrubError::Other(format!("{e:#}")))?;

        if self.options.show_mapping {
            let report = MappingReport::new(&snapshot, &summary.degraded);
            report.log_entries();
            summary.mapping_report = Some(report);
        }

        if self.options.write_dictionary {
            summary.dictionary_path = Some(self.write_dictionary(&snapshot)?);
        }

        // Application pass
        let engine = Arc::new(SubstitutionEngine::new(&snapshot, &self.config.anonymization)?);
        for (category, rules) in engine.plan() {
            tracing::debug!(category = %category, rules, "Substitution step");
        }
        let total = files.len();
        let verbose = self.options.verbose;
        let shutdown = self.shutdown_signal.clone();

        let mut outcomes = stream::iter(files.into_iter().enumerate())
            .map(|(index, file)| {
                let engine = engine.clone();
                let shutdown = shutdown.clone();
                async move {
                    if *shutdown.borrow() {
                        return Ok::<_, ScrubError>(None);
                    }
                    if verbose {
                        tracing::info!(
                            "[{}/{}] {} ({:.2} MB)",
                            index + 1,
                            total,
                            file.input.display(),
                            file.size_mb()
                        );
                    }
                    crate::log_file_start!(file.input, index + 1, total);

                    tokio::task::spawn_blocking(move || anonymize_file(&engine, &file))
                        .await
                        .map_err(|e| ScrubError::Other(format!("Anonymization task failed: {e}")))?
                        .map(Some)
                }
            })
            .buffered(self.config.processing.parallel_files.max(1));

        while let Some(outcome) = outcomes.next().await {
            match outcome? {
                Some(outcome) => {
                    crate::log_file_complete!(
                        outcome.output,
                        outcome.total_replacements(),
                        outcome.duration
                    );
                    if let Err(e) = self.audit.log_file(&outcome.input, &outcome.stats) {
                        tracing::warn!(error = %e, "Failed to write audit entry");
                    }
                    summary.record_file(&outcome);
                }
                None => summary.interrupted = true,
            }
        }

        if summary.interrupted {
            tracing::warn!(
                completed = summary.files_anonymized,
                remaining = summary.files_skipped(),
                "Run interrupted before all files were anonymized"
            );
        }

        let summary = summary.with_duration(start_time.elapsed());
        summary.log_summary();
        Ok(summary)
    }

    fn prepare_output_dir(&self) -> Result<()> {
        let output_dir = &self.options.output_dir;
        if output_dir.is_dir() {
            return Ok(());
        }
        if output_dir.exists() {
            return Err(ScrubError::output(output_dir, "not a directory"));
        }
        if !self.options.force {
            return Err(ScrubError::output(
                output_dir,
                "output directory does not exist (use --force to create it)",
            ));
        }

        std::fs::create_dir_all(output_dir).map_err(|e| ScrubError::output(output_dir, e))?;
        tracing::info!(path = %output_dir.display(), "Created output directory");
        Ok(())
    }

    fn write_dictionary(&self, snapshot: &MappingSnapshot) -> Result<PathBuf> {
        let prefix = &self.config.processing.dictionary_prefix;
        let existing = existing_dictionaries(&self.options.output_dir, prefix);
        if let Some(latest) = existing.last() {
            tracing::warn!(
                path = %latest.display(),
                "A dictionary from an earlier run exists; tokens in it do not apply to this run"
            );
        }

        let path = dictionary_path(&self.options.output_dir, prefix, chrono::Local::now());
        update_dictionary_file(&path, snapshot)?;
        Ok(path)
    }
}

/// Read every file once and feed it to the builder
fn collect(
    mut builder: MappingBuilder,
    extractor: &RegexExtractor,
    files: &[LogFile],
    force: bool,
) -> Result<MappingBuilder> {
    for file in files {
        if !force && file.output.exists() {
            return Err(ScrubError::output(
                &file.output,
                "output file already exists (use --force to overwrite)",
            ));
        }

        let content = read_log_file(&file.input)?;
        builder.ingest_content(extractor, &content);
        tracing::trace!(file = %file.input.display(), "Collected");
    }
    Ok(builder)
}

/// Anonymize one file, writing through a temporary sibling
fn anonymize_file(engine: &SubstitutionEngine, file: &LogFile) -> Result<FileOutcome> {
    let started = Instant::now();
    let content = read_log_file(&file.input)?;
    let substitution = engine.apply_with_stats(&content);

    if let Some(parent) = file.output.parent() {
        std::fs::create_dir_all(parent).map_err(|e| ScrubError::output(parent, e))?;
    }

    let partial = partial_path(&file.output);
    std::fs::write(&partial, substitution.content.as_bytes())
        .map_err(|e| ScrubError::output(&partial, e))?;
    std::fs::rename(&partial, &file.output).map_err(|e| {
        let _ = std::fs::remove_file(&partial);
        ScrubError::output(&file.output, e)
    })?;

    Ok(FileOutcome {
        input: file.input.clone(),
        output: file.output.clone(),
        stats: substitution.stats,
        duration: started.elapsed(),
    })
}

fn partial_path(output: &Path) -> PathBuf {
    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(".partial");
    output.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_path() {
        assert_eq!(
            partial_path(Path::new("/out/Job.log")),
            PathBuf::from("/out/Job.log.partial")
        );
    }

    #[test]
    fn test_run_options_defaults() {
        let options = RunOptions::new(InputSource::File(PathBuf::from("a.log")), "/out");
        assert!(!options.force);
        assert!(!options.show_mapping);
        assert!(!options.write_dictionary);
        assert_eq!(options.output_dir, PathBuf::from("/out"));
    }
}
