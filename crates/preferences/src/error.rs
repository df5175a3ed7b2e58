//! Preference Store Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A preference store error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for preference store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Keys are plain names; anything that could escape the store is refused.
    #[display("invalid preference key: {_0:?}")]
    InvalidKey(#[error(not(source))] String),
    /// The store location exists but is not a directory.
    #[display("invalid preference directory: {}", _0.display())]
    InvalidPath(#[error(not(source))] PathBuf),
    /// No home directory to derive a default store location from.
    #[display("could not determine a data directory for preferences")]
    NoDataDir,
    /// Access denied
    #[display("permission denied: {}", _0.display())]
    PermissionDenied(#[error(not(source))] PathBuf),
    /// Underlying I/O error
    #[display("I/O error: {_0}")]
    Io(IoError),
}
impl From<IoError> for ErrorKind {
    fn from(err: IoError) -> Self {
        Self::Io(err)
    }
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Io(_))
    }
}
