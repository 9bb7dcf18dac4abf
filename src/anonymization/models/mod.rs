//! Anonymization data models

pub mod category;
pub mod mapping;

pub use category::Category;
pub use mapping::{MappingEntry, MappingSnapshot, MappingTable};
