//! External pattern table
//!
//! A flat key→regex mapping, one entry per extractable category, read from a
//! TOML or JSON side file:
//!
//! ```toml
//! VeeamServer = '(?i)backup server[:=]\s*([A-Za-z0-9.-]+)'
//! Email = '[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+\.[A-Za-z]{2,}'
//! ```
//!
//! A missing file is fatal. A missing or uncompilable key is not: it surfaces
//! as an error for that key only, which the extractor degrades to an empty result.

use crate::anonymization::models::Category;
use crate::domain::{Result, ScrubError};
use regex::Regex;
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

/// Built-in pattern table shipped with the crate
pub const DEFAULT_PATTERNS_TOML: &str = include_str!("../../../../patterns/default_patterns.toml");

/// Compiled pattern table
#[derive(Debug, Clone)]
pub struct PatternTable {
    patterns: HashMap<String, Regex>,
    invalid: HashMap<String, String>,
}

impl PatternTable {
    /// Load a pattern table from a `.json` or `.toml` file
    ///
    /// # Errors
    ///
    /// Returns [`ScrubError::ConfigurationMissing`] if the file does not exist,
    /// [`ScrubError::Configuration`] if it cannot be read or parsed.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ScrubError::ConfigurationMissing(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            ScrubError::Configuration(format!(
                "Failed to read pattern table {}: {e}",
                path.display()
            ))
        })?;

        let table = match path.extension().and_then(|s| s.to_str()) {
            Some("json") => Self::from_json(&content)?,
            _ => Self::from_toml(&content)?,
        };

        tracing::debug!(
            path = %path.display(),
            patterns = table.patterns.len(),
            invalid = table.invalid.len(),
            "Pattern table loaded"
        );
        Ok(table)
    }

    /// Parse a pattern table from TOML content
    pub fn from_toml(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = toml::from_str(content)
            .map_err(|e| ScrubError::Configuration(format!("Failed to parse pattern table: {e}")))?;
        Ok(Self::compile(raw))
    }

    /// Parse a pattern table from JSON content
    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, String> = serde_json::from_str(content)
            .map_err(|e| ScrubError::Configuration(format!("Failed to parse pattern table: {e}")))?;
        Ok(Self::compile(raw))
    }

    /// Built-in pattern table
    pub fn default_patterns() -> Result<Self> {
        Self::from_toml(DEFAULT_PATTERNS_TOML)
    }

    /// Build a table from already-known key/expression pairs
    pub fn from_pairs<I, K, V>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self::compile(pairs.into_iter().map(|(k, v)| (k.into(), v.into())))
    }

    fn compile(raw: impl IntoIterator<Item = (String, String)>) -> Self {
        let mut patterns = HashMap::new();
        let mut invalid = HashMap::new();

        for (key, expression) in raw {
            match Regex::new(&expression) {
                Ok(regex) => {
                    patterns.insert(key, regex);
                }
                Err(e) => {
                    tracing::warn!(key = %key, error = %e, "Invalid pattern in pattern table");
                    invalid.insert(key, e.to_string());
                }
            }
        }

        Self { patterns, invalid }
    }

    /// Compiled pattern for a key
    pub fn get(&self, key: &str) -> Result<&Regex> {
        if let Some(reason) = self.invalid.get(key) {
            return Err(ScrubError::InvalidPattern {
                key: key.to_string(),
                reason: reason.clone(),
            });
        }
        self.patterns
            .get(key)
            .ok_or_else(|| ScrubError::PatternNotFound(key.to_string()))
    }

    /// Compiled pattern for a category
    pub fn for_category(&self, category: Category) -> Result<&Regex> {
        let key = category.pattern_key().ok_or_else(|| {
            ScrubError::PatternNotFound(category.display_name().to_string())
        })?;
        self.get(key)
    }

    /// Extractable categories with no usable pattern
    pub fn missing_categories(&self) -> Vec<Category> {
        Category::ALL
            .into_iter()
            .filter(|c| c.pattern_key().is_some() && self.for_category(*c).is_err())
            .collect()
    }

    /// Number of compiled patterns
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// Whether no pattern compiled
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
