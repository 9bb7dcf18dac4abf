//! Logging and observability
//!
//! Structured `tracing` output to the console and, optionally, to rolling
//! JSON log files.
//!
//! # Example
//!
//! ```no_run
//! use logscrub::logging::init_logging;
//! use logscrub::config::LoggingConfig;
//!
//! let config = LoggingConfig::default();
//! let _guard = init_logging("info", &config).expect("Failed to initialize logging");
//!
//! tracing::info!("Application started");
//! ```

pub mod structured;

// Re-export commonly used items
pub use structured::{init_logging, LoggingGuard};

/// Log the start of anonymizing one file
///
/// # Example
///
/// ```no_run
/// use logscrub::log_file_start;
/// use std::path::Path;
///
/// log_file_start!(Path::new("logs/Job.log"), 3, 10);
/// ```
#[macro_export]
macro_rules! log_file_start {
    ($path:expr, $index:expr, $total:expr) => {
        tracing::debug!(
            file = %$path.display(),
            index = $index,
            total = $total,
            "Anonymizing file"
        );
    };
}

/// Log the completion of one file
///
/// # Example
///
/// ```no_run
/// use logscrub::log_file_complete;
/// use std::path::Path;
/// use std::time::Duration;
///
/// log_file_complete!(Path::new("out/Job.log"), 42, Duration::from_millis(15));
/// ```
#[macro_export]
macro_rules! log_file_complete {
    ($path:expr, $replacements:expr, $duration:expr) => {
        tracing::debug!(
            file = %$path.display(),
            replacements = $replacements,
            duration_ms = $duration.as_millis() as u64,
            "File anonymized"
        );
    };
}

/// Log a category that contributed nothing to the mapping
///
/// # Example
///
/// ```no_run
/// use logscrub::log_category_skipped;
///
/// log_category_skipped!("EmailAddress", "pattern key 'Email' not found");
/// ```
#[macro_export]
macro_rules! log_category_skipped {
    ($category:expr, $reason:expr) => {
        tracing::warn!(
            category = %$category,
            reason = %$reason,
            "Category skipped"
        );
    };
}
