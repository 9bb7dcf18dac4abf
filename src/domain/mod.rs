//! Domain error handling for logscrub.
//!
//! All fallible operations in the library return [`Result<T, ScrubError>`]:
//!
//! ```rust
//! use logscrub::domain::{Result, ScrubError};
//!
//! fn example() -> Result<()> {
//!     Err(ScrubError::Configuration("token_length must be >= 4".to_string()))
//! }
//! ```

pub mod errors;
pub mod result;

pub use errors::ScrubError;
pub use result::Result;
