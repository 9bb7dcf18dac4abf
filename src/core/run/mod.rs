//! Anonymization runs
//!
//! Discovery of input files, the collection and application passes, and the
//! run summary.

pub mod coordinator;
pub mod discovery;
pub mod summary;

pub use coordinator::{RunCoordinator, RunOptions};
pub use discovery::{discover, InputSource, LogFile};
pub use summary::{FileOutcome, RunSummary};
