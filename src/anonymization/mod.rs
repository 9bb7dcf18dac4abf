//! Log anonymization engine
//!
//! Scrubs server names, accounts, domains, email addresses, object paths and
//! IPv4 addresses out of diagnostic logs while keeping them internally
//! consistent: every occurrence of an original value becomes the same token.
//!
//! # Architecture
//!
//! The pipeline runs in two passes:
//! - **Collection**: pattern extraction and classification feed a
//!   [`MappingBuilder`], which derives domain entries and freezes into a
//!   [`MappingSnapshot`]
//! - **Application**: a [`SubstitutionEngine`] compiled from the snapshot
//!   rewrites each file, finishing with the IPv4 masking pass
//!
//! The snapshot can be printed as a mapping report or merged into a
//! dictionary file.
//!
//! # Usage
//!
//! ```rust,ignore
//! use logscrub::anonymization::{AnonymizationConfig, MappingBuilder, RegexExtractor, SubstitutionEngine};
//!
//! let extractor = RegexExtractor::new()?;
//! let mut builder = MappingBuilder::with_random_tokens(12);
//! builder.ingest_content(&extractor, &content);
//! let snapshot = builder.build();
//!
//! let engine = SubstitutionEngine::new(&snapshot, &AnonymizationConfig::default())?;
//! let anonymized = engine.apply(&content);
//! ```

pub mod anonymizer;
pub mod audit;
pub mod builder;
pub mod classifier;
pub mod config;
pub mod detector;
pub mod dictionary;
pub mod engine;
pub mod models;
pub mod report;

// Re-export main types
pub use builder::MappingBuilder;
pub use config::AnonymizationConfig;
pub use detector::{Extraction, IdentifierExtractor, RegexExtractor};
pub use dictionary::Dictionary;
pub use engine::{Substitution, SubstitutionEngine, SubstitutionStats};
pub use models::{Category, MappingEntry, MappingSnapshot};
pub use report::MappingReport;
