//! Mapping reports
//!
//! Shows what the collection pass found: every (original, token) pair per
//! category, the primary server, and the categories that were skipped.

use crate::anonymization::models::{Category, MappingEntry, MappingSnapshot};
use serde::Serialize;
use std::collections::BTreeMap;

/// Mapping report built from a frozen snapshot
#[derive(Debug, Clone, Serialize)]
pub struct MappingReport {
    /// Entries per category, in collection order
    pub sections: Vec<ReportSection>,

    /// Categories skipped during collection, with the reason
    pub degraded: BTreeMap<Category, String>,

    /// Total entries across all categories
    pub total_entries: usize,
}

/// One category of the report
#[derive(Debug, Clone, Serialize)]
pub struct ReportSection {
    pub category: Category,
    pub entries: Vec<MappingEntry>,
}

impl MappingReport {
    /// Build a report from a snapshot and the categories skipped while collecting it
    pub fn new(snapshot: &MappingSnapshot, degraded: &BTreeMap<Category, String>) -> Self {
        let sections = Category::ALL
            .iter()
            .map(|&category| ReportSection {
                category,
                entries: snapshot.entries(category).to_vec(),
            })
            .collect();

        Self {
            sections,
            degraded: degraded.clone(),
            total_entries: snapshot.total_entries(),
        }
    }

    /// Log every pair through `tracing`
    pub fn log_entries(&self) {
        for section in &self.sections {
            if section.entries.is_empty() {
                tracing::info!(category = %section.category, "No values collected");
                continue;
            }
            for entry in &section.entries {
                tracing::info!(
                    category = %section.category,
                    original = %entry.original,
                    token = %entry.token,
                    "Mapping"
                );
            }
        }
        for (category, reason) in &self.degraded {
            tracing::warn!(category = %category, reason = %reason, "Category skipped");
        }
    }

    /// Format report for console output
    pub fn format_console(&self) -> String {
        let mut output = String::new();

        output.push('\n');
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push_str("                     ANONYMIZATION MAPPING                     \n");
        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output.push_str("📊 SUMMARY\n");
        output.push_str("───────────────────────────────────────────────────────────────\n");
        for section in &self.sections {
            output.push_str(&format!(
                "  {:30} {:>5}\n",
                section.category.display_name(),
                section.entries.len()
            ));
        }
        output.push_str(&format!("  {:30} {:>5}\n", "Total", self.total_entries));
        output.push('\n');

        for section in self.sections.iter().filter(|s| !s.entries.is_empty()) {
            output.push_str(&format!("🔍 {}\n", section.category.display_name().to_uppercase()));
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for entry in &section.entries {
                output.push_str(&format!("  {} -> {}\n", entry.original, entry.token));
            }
            output.push('\n');
        }

        if !self.degraded.is_empty() {
            output.push_str("⚠️  SKIPPED CATEGORIES\n");
            output.push_str("───────────────────────────────────────────────────────────────\n");
            for (category, reason) in &self.degraded {
                output.push_str(&format!("  • {}: {}\n", category.display_name(), reason));
            }
            output.push('\n');
        }

        output.push_str("═══════════════════════════════════════════════════════════════\n");
        output.push('\n');

        output
    }

    /// Format report as JSON
    pub fn format_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
