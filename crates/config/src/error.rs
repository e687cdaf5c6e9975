//! Configuration Error Types
//!
//! Structured errors using `exn` for automatic location tracking and error
//! tree construction, matching the other crates in this workspace.

use derive_more::{Display, Error};

/// A configuration error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for configuration operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// A provider (file or environment) could not be read or deserialized.
    #[display("failed to load configuration")]
    Load,
    /// Configuration loaded, but a value is unusable.
    #[display("invalid configuration value: {_0}")]
    InvalidValue(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_kind_display() {
        assert_eq!(ErrorKind::Load.to_string(), "failed to load configuration");
        assert_eq!(
            ErrorKind::InvalidValue("database.path".to_string()).to_string(),
            "invalid configuration value: database.path"
        );
    }
}
