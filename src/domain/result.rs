//! Result type alias for logscrub

use super::errors::ScrubError;

/// Result type alias for logscrub operations
///
/// # Examples
///
/// ```
/// use logscrub::domain::result::Result;
/// use logscrub::domain::errors::ScrubError;
///
/// fn example_function() -> Result<String> {
///     Ok("success".to_string())
/// }
///
/// fn failing_function() -> Result<()> {
///     Err(ScrubError::Configuration("Invalid input".to_string()))
/// }
/// ```
pub type Result<T> = std::result::Result<T, ScrubError>;
