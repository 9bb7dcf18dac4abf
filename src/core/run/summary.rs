//! Run summary and reporting

use crate::anonymization::engine::SubstitutionStats;
use crate::anonymization::models::Category;
use crate::anonymization::report::MappingReport;
use std::collections::BTreeMap;
use std::path::PathBuf;
use std::time::Duration;

/// Result of anonymizing one file
#[derive(Debug, Clone)]
pub struct FileOutcome {
    /// Source path
    pub input: PathBuf,
    /// Written path
    pub output: PathBuf,
    /// What was replaced
    pub stats: SubstitutionStats,
    /// Time spent on this file
    pub duration: Duration,
}

impl FileOutcome {
    /// Total replacements including masking
    pub fn total_replacements(&self) -> usize {
        self.stats.total()
    }
}

/// Summary of an anonymization run
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Files discovered
    pub total_files: usize,

    /// Files written
    pub files_anonymized: usize,

    /// Mapping entries per category
    pub mapping_counts: BTreeMap<Category, usize>,

    /// Replacements per category across all files
    pub replacements: BTreeMap<Category, usize>,

    /// IPv4 literals masked across all files
    pub masked_ipv4: usize,

    /// Categories skipped during collection
    pub degraded: BTreeMap<Category, String>,

    /// Dictionary written by this run
    pub dictionary_path: Option<PathBuf>,

    /// Mapping report, when requested
    pub mapping_report: Option<MappingReport>,

    /// Files written, in completion order
    pub outputs: Vec<PathBuf>,

    /// Files whose IPv4 masking pass failed
    pub masking_skipped: Vec<PathBuf>,

    /// Whether a shutdown signal stopped the run early
    pub interrupted: bool,

    /// Duration of the run
    pub duration: Duration,
}

impl RunSummary {
    /// Create a new empty summary
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the duration
    pub fn with_duration(mut self, duration: Duration) -> Self {
        self.duration = duration;
        self
    }

    /// Add the outcome of one file
    pub fn record_file(&mut self, outcome: &FileOutcome) {
        self.files_anonymized += 1;
        for (category, count) in &outcome.stats.replacements {
            *self.replacements.entry(*category).or_insert(0) += count;
        }
        self.masked_ipv4 += outcome.stats.masked_ipv4;
        if outcome.stats.masking_skipped {
            self.masking_skipped.push(outcome.input.clone());
        }
        self.outputs.push(outcome.output.clone());
    }

    /// Files discovered but not written
    pub fn files_skipped(&self) -> usize {
        self.total_files.saturating_sub(self.files_anonymized)
    }

    /// Total replacements across all files, masking included
    pub fn total_replacements(&self) -> usize {
        self.replacements.values().sum::<usize>() + self.masked_ipv4
    }

    /// Check if every discovered file was written
    pub fn is_successful(&self) -> bool {
        !self.interrupted && self.files_anonymized == self.total_files
    }

    /// Log the summary
    pub fn log_summary(&self) {
        tracing::info!(
            total_files = self.total_files,
            anonymized = self.files_anonymized,
            skipped = self.files_skipped(),
            replacements = self.total_replacements(),
            masked_ipv4 = self.masked_ipv4,
            duration_secs = format!("{:.2}", self.duration.as_secs_f64()),
            "Anonymization completed"
        );

        for (category, reason) in &self.degraded {
            tracing::warn!(category = %category, reason = %reason, "Category was skipped");
        }

        for path in &self.masking_skipped {
            tracing::warn!(file = %path.display(), "IPv4 masking was skipped");
        }
    }

    /// Format summary for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push_str("📊 Anonymization Summary:\n");
        output.push_str(&format!("  Files discovered: {}\n", self.total_files));
        output.push_str(&format!("  Files anonymized: {}\n", self.files_anonymized));
        if self.files_skipped() > 0 {
            output.push_str(&format!("  Files skipped: {}\n", self.files_skipped()));
        }
        output.push_str(&format!(
            "  Mapping entries: {}\n",
            self.mapping_counts.values().sum::<usize>()
        ));
        output.push_str(&format!("  Replacements: {}\n", self.total_replacements()));
        output.push_str(&format!("  IPv4 addresses masked: {}\n", self.masked_ipv4));
        if let Some(path) = &self.dictionary_path {
            output.push_str(&format!("  Dictionary: {}\n", path.display()));
        }
        output.push_str(&format!("  Duration: {:.2}s\n", self.duration.as_secs_f64()));

        if !self.replacements.is_empty() {
            output.push('\n');
            output.push_str("  Replacements by category:\n");
            for (category, count) in &self.replacements {
                output.push_str(&format!("    {:24} {:>8}\n", category.display_name(), count));
            }
        }

        if !self.degraded.is_empty() {
            output.push('\n');
            output.push_str("⚠️  Skipped categories:\n");
            for (category, reason) in &self.degraded {
                output.push_str(&format!("  - {}: {}\n", category.display_name(), reason));
            }
        }

        output
    }
}
