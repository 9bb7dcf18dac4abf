//! Regex-based identifier extractor

use super::{patterns::PatternTable, Extraction, IdentifierExtractor};
use crate::anonymization::models::Category;
use crate::domain::{Result, ScrubError};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

/// Regex-based extractor over a shared pattern table
#[derive(Debug, Clone)]
pub struct RegexExtractor {
    pattern_table: Arc<PatternTable>,
}

impl RegexExtractor {
    /// Create an extractor with the built-in patterns
    pub fn new() -> Result<Self> {
        Ok(Self::with_table(PatternTable::default_patterns()?))
    }

    /// Create an extractor with a custom pattern table
    pub fn with_table(table: PatternTable) -> Self {
        Self {
            pattern_table: Arc::new(table),
        }
    }

    /// The pattern table backing this extractor
    pub fn table(&self) -> &PatternTable {
        &self.pattern_table
    }

    /// Find-all over `content`
    ///
    /// Group 1 is the value when the pattern captures, otherwise the whole
    /// match. Empty values are dropped; duplicates keep their first position.
    fn find_all(regex: &::regex::Regex, content: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        let mut values = Vec::new();

        for captures in regex.captures_iter(content) {
            let matched = if regex.captures_len() > 1 {
                captures.get(1)
            } else {
                captures.get(0)
            };
            let Some(matched) = matched else { continue };
            let value = matched.as_str();
            if !value.is_empty() && seen.insert(value) {
                values.push(value.to_string());
            }
        }

        values
    }
}

impl IdentifierExtractor for RegexExtractor {
    fn extract(&self, category: Category, content: &str) -> Extraction {
        let regex = match self.pattern_table.for_category(category) {
            Ok(regex) => regex,
            Err(e) => return Extraction::Degraded(e.to_string()),
        };

        let values = Self::find_all(regex, content);
        if values.is_empty() {
            Extraction::Empty
        } else {
            Extraction::Found(values)
        }
    }
}

/// Read a log file permissively
///
/// Invalid UTF-8 sequences are skipped rather than raising or being replaced.
///
/// # Errors
///
/// Returns [`ScrubError::InputUnavailable`] if the file cannot be read.
pub fn read_log_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| ScrubError::input(path, e))?;
    Ok(decode_permissive(&bytes))
}

/// Decode bytes as UTF-8, dropping undecodable sequences
pub fn decode_permissive(bytes: &[u8]) -> String {
    let mut text = String::with_capacity(bytes.len());
    for chunk in bytes.utf8_chunks() {
        text.push_str(chunk.valid());
    }
    text
}
