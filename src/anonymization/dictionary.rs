//! Dictionary persistence
//!
//! Records a mapping snapshot as JSON keyed by category display name, each
//! value an ordered list of single-key `{original: token}` objects:
//!
//! ```json
//! {
//!     "vCenter Servers": [
//!         { "vcenter01": "Xk2pQ9aLm3Zt" }
//!     ]
//! }
//! ```
//!
//! Writing to an existing file merges: a known `(section, original)` pair is
//! updated in place and a new one is appended. The file is never read back
//! into the mapping engine.

use crate::anonymization::models::{Category, MappingSnapshot};
use crate::domain::{Result, ScrubError};
use chrono::{DateTime, Local};
use serde::Serialize;
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};

/// Default file name prefix for dictionaries
pub const DEFAULT_DICTIONARY_PREFIX: &str = "logscrub-dictionary";

/// In-memory dictionary document
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dictionary {
    sections: Map<String, Value>,
}

impl Dictionary {
    /// Create an empty dictionary
    pub fn new() -> Self {
        Self::default()
    }

    /// Load an existing dictionary, or start empty if the file does not exist
    pub fn load_or_default(path: &Path) -> Result<Self> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(ScrubError::output(path, e)),
        };

        match serde_json::from_str::<Value>(&content)? {
            Value::Object(sections) => Ok(Self { sections }),
            _ => Err(ScrubError::Serialization(format!(
                "Dictionary {} is not a JSON object",
                path.display()
            ))),
        }
    }

    /// Insert or update one `(section, original)` pair
    pub fn upsert(&mut self, section: &str, original: &str, token: &str) {
        let list = self
            .sections
            .entry(section.to_string())
            .or_insert_with(|| Value::Array(Vec::new()));

        if !list.is_array() {
            *list = Value::Array(Vec::new());
        }
        let Value::Array(items) = list else { return };

        for item in items.iter_mut() {
            if let Value::Object(pair) = item {
                if let Some(existing) = pair.get_mut(original) {
                    *existing = Value::String(token.to_string());
                    return;
                }
            }
        }

        let mut pair = Map::new();
        pair.insert(original.to_string(), Value::String(token.to_string()));
        items.push(Value::Object(pair));
    }

    /// Merge every entry of a snapshot, section per category
    pub fn merge_snapshot(&mut self, snapshot: &MappingSnapshot) {
        for category in Category::ALL {
            for entry in snapshot.entries(category) {
                self.upsert(category.display_name(), &entry.original, &entry.token);
            }
        }
    }

    /// Token recorded for an original in a section
    pub fn get(&self, section: &str, original: &str) -> Option<&str> {
        self.sections
            .get(section)?
            .as_array()?
            .iter()
            .find_map(|item| item.get(original))
            .and_then(Value::as_str)
    }

    /// Number of pairs recorded in a section
    pub fn section_len(&self, section: &str) -> usize {
        self.sections
            .get(section)
            .and_then(Value::as_array)
            .map_or(0, Vec::len)
    }

    /// Serialize with four-space indentation
    pub fn to_json(&self) -> Result<String> {
        let mut buf = Vec::new();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut buf, formatter);
        self.sections.serialize(&mut serializer)?;
        String::from_utf8(buf).map_err(|e| ScrubError::Serialization(e.to_string()))
    }

    /// Write the dictionary to `path`
    pub fn write(&self, path: &Path) -> Result<()> {
        std::fs::write(path, self.to_json()?).map_err(|e| ScrubError::output(path, e))
    }
}

/// Timestamped dictionary path inside `output_dir`
pub fn dictionary_path(output_dir: &Path, prefix: &str, now: DateTime<Local>) -> PathBuf {
    output_dir.join(format!("{prefix}-{}.json", now.format("%Y-%m-%d_%H-%M-%S")))
}

/// Dictionaries left in `output_dir` by earlier runs
pub fn existing_dictionaries(output_dir: &Path, prefix: &str) -> Vec<PathBuf> {
    let Ok(entries) = std::fs::read_dir(output_dir) else {
        return Vec::new();
    };

    let mut found: Vec<PathBuf> = entries
        .filter_map(|e| e.ok())
        .map(|e| e.path())
        .filter(|p| {
            p.file_name()
                .and_then(|n| n.to_str())
                .is_some_and(|n| n.starts_with(&format!("{prefix}-")) && n.ends_with(".json"))
        })
        .collect();
    found.sort();
    found
}

/// Merge a snapshot into the dictionary file at `path`
pub fn update_dictionary_file(path: &Path, snapshot: &MappingSnapshot) -> Result<Dictionary> {
    let mut dictionary = Dictionary::load_or_default(path)?;
    dictionary.merge_snapshot(snapshot);
    dictionary.write(path)?;

    tracing::info!(path = %path.display(), "Dictionary written");
    Ok(dictionary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::anonymization::anonymizer::SequentialTokenGenerator;
    use crate::anonymization::builder::MappingBuilder;
    use chrono::TimeZone;
    use tempfile::tempdir;

    #[test]
    fn test_upsert_updates_in_place() {
        let mut dict = Dictionary::new();
        dict.upsert("VeeamUsers", "jdoe", "AAA");
        dict.upsert("VeeamUsers", "asmith", "BBB");
        dict.upsert("VeeamUsers", "jdoe", "CCC");

        assert_eq!(dict.section_len("VeeamUsers"), 2);
        assert_eq!(dict.get("VeeamUsers", "jdoe"), Some("CCC"));
        assert_eq!(dict.get("VeeamUsers", "asmith"), Some("BBB"));
    }

    #[test]
    fn test_layout_is_list_of_single_key_objects() {
        let mut dict = Dictionary::new();
        dict.upsert("ESXi hosts", "esx01", "T1");

        let value: Value = serde_json::from_str(&dict.to_json().unwrap()).unwrap();
        assert_eq!(value, serde_json::json!({"ESXi hosts": [{"esx01": "T1"}]}));
    }

    #[test]
    fn test_merge_with_existing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("dict.json");
        std::fs::write(
            &path,
            r#"{"VeeamUsers": [{"jdoe": "OLD"}], "Custom": [{"x": "y"}]}"#,
        )
        .unwrap();

        let mut builder = MappingBuilder::new(Box::new(SequentialTokenGenerator::new("N")));
        builder.add(Category::SystemAccount, r"CORP\jdoe");
        builder.add(Category::SystemAccount, r"CORP\asmith");
        let snapshot = builder.build();

        let dict = update_dictionary_file(&path, &snapshot).unwrap();
        assert_eq!(dict.get("VeeamUsers", "jdoe"), Some("N1"));
        assert_eq!(dict.get("VeeamUsers", "asmith"), Some("N2"));
        assert_eq!(dict.get("Custom", "x"), Some("y"));

        let reloaded = Dictionary::load_or_default(&path).unwrap();
        assert_eq!(reloaded, dict);
    }

    #[test]
    fn test_case_variants_record_applied_token() {
        let mut builder = MappingBuilder::new(Box::new(SequentialTokenGenerator::new("N")));
        builder.add(Category::MailRelay, "smtp.corp.local");
        builder.add(Category::MailRelay, "SMTP.CORP.LOCAL");
        let snapshot = builder.build();

        let mut dict = Dictionary::new();
        dict.merge_snapshot(&snapshot);

        assert_eq!(dict.get("SMTP Servers", "smtp.corp.local"), Some("N2"));
        assert_eq!(dict.get("SMTP Servers", "SMTP.CORP.LOCAL"), Some("N2"));
        assert_eq!(dict.get("Domain names", "corp.local"), Some("N1"));
        assert_eq!(dict.get("Domain names", "CORP.LOCAL"), Some("N1"));
    }

    #[test]
    fn test_dictionary_path_format() {
        let now = Local.with_ymd_and_hms(2025, 3, 4, 5, 6, 7).unwrap();
        let path = dictionary_path(Path::new("/out"), "logscrub-dictionary", now);
        assert_eq!(
            path,
            PathBuf::from("/out/logscrub-dictionary-2025-03-04_05-06-07.json")
        );
    }

    #[test]
    fn test_existing_dictionaries() {
        let dir = tempdir().unwrap();
        std::fs::write(dir.path().join("logscrub-dictionary-1.json"), "{}").unwrap();
        std::fs::write(dir.path().join("other.json"), "{}").unwrap();

        let found = existing_dictionaries(dir.path(), DEFAULT_DICTIONARY_PREFIX);
        assert_eq!(found.len(), 1);
        assert!(existing_dictionaries(&dir.path().join("missing"), "x").is_empty());
    }
}
