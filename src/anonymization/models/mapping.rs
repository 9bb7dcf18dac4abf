//! Original-to-token mapping tables

use super::Category;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// One anonymized identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MappingEntry {
    /// Exact substring as captured from the source text
    pub original: String,
    /// Replacement emitted for every occurrence of `original`
    pub token: String,
}

impl MappingEntry {
    /// Create a new mapping entry
    pub fn new(original: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            original: original.into(),
            token: token.into(),
        }
    }
}

/// Insertion-ordered table keyed by original value
///
/// Once an original is present its token never changes; a repeated insert
/// returns the existing token without calling the token factory.
#[derive(Debug, Clone, Default)]
pub struct MappingTable {
    entries: Vec<MappingEntry>,
    index: HashMap<String, usize>,
    // Lower-cased original to its first entry
    folded: HashMap<String, usize>,
}

impl MappingTable {
    /// Create an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Look up `original`, inserting a token produced by `make_token` if absent
    pub fn get_or_insert_with<F>(&mut self, original: &str, make_token: F) -> &str
    where
        F: FnOnce() -> String,
    {
        let idx = match self.index.get(original) {
            Some(&idx) => idx,
            None => {
                let idx = self.entries.len();
                self.entries.push(MappingEntry::new(original, make_token()));
                self.index.insert(original.to_string(), idx);
                self.folded.entry(original.to_lowercase()).or_insert(idx);
                idx
            }
        };
        &self.entries[idx].token
    }

    /// Like [`get_or_insert_with`](Self::get_or_insert_with), but an original
    /// differing only in case from a registered one gets that entry's token
    pub fn get_or_insert_folded_with<F>(&mut self, original: &str, make_token: F) -> &str
    where
        F: FnOnce() -> String,
    {
        let existing = self
            .folded
            .get(&original.to_lowercase())
            .map(|&idx| self.entries[idx].token.clone());
        match existing {
            Some(token) => self.get_or_insert_with(original, || token),
            None => self.get_or_insert_with(original, make_token),
        }
    }

    /// Token registered for `original`, if any
    pub fn get(&self, original: &str) -> Option<&str> {
        self.index
            .get(original)
            .map(|&idx| self.entries[idx].token.as_str())
    }

    /// Whether `original` is registered
    pub fn contains(&self, original: &str) -> bool {
        self.index.contains_key(original)
    }

    /// Whether `original` is registered in any letter case
    pub fn contains_folded(&self, original: &str) -> bool {
        self.folded.contains_key(&original.to_lowercase())
    }

    /// Entries in insertion order
    pub fn entries(&self) -> &[MappingEntry] {
        &self.entries
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keep only the entries matching `keep`, preserving order
    pub fn retain<F>(&mut self, mut keep: F)
    where
        F: FnMut(&MappingEntry) -> bool,
    {
        self.entries.retain(|e| keep(e));
        self.index.clear();
        self.folded.clear();
        for (idx, e) in self.entries.iter().enumerate() {
            self.index.insert(e.original.clone(), idx);
            self.folded.entry(e.original.to_lowercase()).or_insert(idx);
        }
    }
}

/// Frozen set of per-category mapping tables
///
/// Produced by [`MappingBuilder::build`](crate::anonymization::builder::MappingBuilder::build)
/// and read-only afterwards, so it can be shared across threads behind an `Arc`.
#[derive(Debug, Clone, Default)]
pub struct MappingSnapshot {
    tables: BTreeMap<Category, MappingTable>,
}

impl MappingSnapshot {
    pub(crate) fn from_tables(tables: BTreeMap<Category, MappingTable>) -> Self {
        Self { tables }
    }

    /// Entries for a category (empty slice when nothing was collected)
    pub fn entries(&self, category: Category) -> &[MappingEntry] {
        self.tables
            .get(&category)
            .map(|t| t.entries())
            .unwrap_or(&[])
    }

    /// Token for an original value within a category
    pub fn token_for(&self, category: Category, original: &str) -> Option<&str> {
        self.tables.get(&category).and_then(|t| t.get(original))
    }

    /// The primary server mapping, if a server identity was ever found
    pub fn primary_server(&self) -> Option<&MappingEntry> {
        self.entries(Category::ServerIdentity).first()
    }

    /// Number of entries per category, skipping empty categories
    pub fn counts(&self) -> BTreeMap<Category, usize> {
        self.tables
            .iter()
            .filter(|(_, t)| !t.is_empty())
            .map(|(c, t)| (*c, t.len()))
            .collect()
    }

    /// Total number of entries across all categories
    pub fn total_entries(&self) -> usize {
        self.tables.values().map(MappingTable::len).sum()
    }

    /// Whether no category holds any entry
    pub fn is_empty(&self) -> bool {
        self.total_entries() == 0
    }
}
