//! Identifier extraction module
//!
//! Provides the trait-based extraction interface and the regex implementation
//! driven by the external [`PatternTable`](patterns::PatternTable).

pub mod patterns;
pub mod regex;

pub use self::patterns::PatternTable;
pub use self::regex::RegexExtractor;

use crate::anonymization::models::Category;

/// Outcome of extracting one category from one file
///
/// "Nothing matched" and "the category could not be evaluated" stay distinct
/// so callers can report them, while both contribute no values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// Distinct matched values in order of first appearance
    Found(Vec<String>),
    /// The pattern ran and matched nothing
    Empty,
    /// The category was skipped (missing or invalid pattern)
    Degraded(String),
}

impl Extraction {
    /// Values carried by this outcome (empty unless [`Extraction::Found`])
    pub fn values(&self) -> &[String] {
        match self {
            Extraction::Found(values) => values,
            Extraction::Empty | Extraction::Degraded(_) => &[],
        }
    }

    /// Whether the category was skipped
    pub fn is_degraded(&self) -> bool {
        matches!(self, Extraction::Degraded(_))
    }
}

/// Trait for identifier extraction implementations
pub trait IdentifierExtractor: Send + Sync {
    /// Extract the distinct values of `category` found in `content`
    fn extract(&self, category: Category, content: &str) -> Extraction;
}
