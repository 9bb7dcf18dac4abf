//! Core orchestration for logscrub.
//!
//! # Modules
//!
//! - [`run`] - Input discovery, the two anonymization passes, and run summaries
//!
//! # Workflow
//!
//! 1. **Discover**: resolve the input file or directory into log files
//! 2. **Collect**: read each file once and build the mapping
//! 3. **Report**: optionally print the mapping and write a dictionary
//! 4. **Apply**: rewrite every file with the frozen mapping
//! 5. **Summarize**: report counts and duration
//!
//! # Example
//!
//! ```rust,no_run
//! use logscrub::config::ScrubConfig;
//! use logscrub::core::run::{InputSource, RunCoordinator, RunOptions};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScrubConfig::default();
//! let options = RunOptions::new(InputSource::Directory("logs".into()), "scrubbed");
//!
//! let (_shutdown_tx, shutdown_rx) = tokio::sync::watch::channel(false);
//! let coordinator = RunCoordinator::new(config, options, shutdown_rx)?;
//!
//! let summary = coordinator.execute().await?;
//! println!("Anonymized {} files", summary.files_anonymized);
//! # Ok(())
//! # }
//! ```

pub mod run;
