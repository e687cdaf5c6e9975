//! Logging Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction, matching the other crates in this
//! workspace.

use derive_more::{Display, Error};

/// A logging setup error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for logging setup.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    #[display("invalid log filter: {_0}")]
    Filter(#[error(not(source))] String),
    /// Another global subscriber was installed first.
    #[display("a global logger is already installed")]
    AlreadyInstalled,
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
        assert_eq!(ErrorKind::Filter("loud".to_string()).to_string(), "invalid log filter: loud");
        assert_eq!(ErrorKind::AlreadyInstalled.to_string(), "a global logger is already installed");
        assert!(!ErrorKind::AlreadyInstalled.is_retryable());
    }
}
