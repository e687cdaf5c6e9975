//! Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction. Engine errors from `redb` are kept as
//! the source of the [`ErrorKind`] frame they are raised into.

use derive_more::{Display, Error};
use std::path::PathBuf;

/// A store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The store file could not be opened or created (permissions, corruption,
    /// or another handle holding the lock).
    #[display("failed to open package store: {}", _0.display())]
    Open(#[error(not(source))] PathBuf),
    /// A read or read-write transaction could not begin, run or commit.
    #[display("transaction failed")]
    Transaction,
    /// The schema has not been created yet.
    #[display("package store is not initialized")]
    NotInitialized,
    /// The sequence entry exists but is not exactly four bytes wide.
    #[display("malformed sequence value ({_0} bytes)")]
    MalformedSequence(#[error(not(source))] usize),
    #[display("sequence counter overflow")]
    SequenceOverflow,
    /// Package identifier or revision cannot be used as (part of) a key.
    #[display("invalid key: {_0}")]
    InvalidKey(#[error(not(source))] String),
    /// Document is not a serialized JSON object.
    #[display("invalid document")]
    InvalidDocument,
    /// Stored bytes could not be decoded.
    #[display("invalid stored data: {_0}")]
    InvalidData(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Open(_) | Self::Transaction)
    }
}
