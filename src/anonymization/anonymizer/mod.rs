//! Replacement strategies
//!
//! Random tokens for named identifiers and partial masking for IPv4 literals.

pub mod masking;
pub mod tokenization;

pub use masking::Ipv4Masker;
pub use tokenization::{RandomTokenGenerator, SequentialTokenGenerator};

/// Source of replacement tokens
pub trait TokenGenerator: Send {
    /// Produce a fresh token
    fn generate(&mut self) -> String;
}
