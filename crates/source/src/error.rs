//! Source Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A dataset source error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for dataset source operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// The server answered, but not with a 2xx status.
    #[display("failed to fetch dataset: HTTP {_0}")]
    Fetch(#[error(not(source))] u16),
    /// DNS, connection, TLS, timeout or body read failure.
    #[display("network error: {_0}")]
    Network(#[error(not(source))] String),
    /// The dataset location is not a usable URL.
    #[display("invalid dataset URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("HTTP client error")]
    Client,
    /// Local dataset file does not exist
    #[display("dataset file not found: {}", _0.display())]
    NotFound(#[error(not(source))] PathBuf),
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
    ///
    /// Nothing in this workspace retries; callers that want to can use this.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Fetch(status) => *status >= 500 || *status == 429,
            Self::Network(_) | Self::Io(_) => true,
            _ => false,
        }
    }
}
