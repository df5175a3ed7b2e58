//! Scraper Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};
use std::io::Error as IoError;
use std::path::PathBuf;

/// A scraper error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scraper operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// A page answered with a non-2xx status.
    #[display("HTTP {status} from {url}")]
    Status { url: String, status: u16 },
    /// DNS, connection, TLS, timeout or body read failure.
    #[display("network error fetching {_0}")]
    Network(#[error(not(source))] String),
    /// The configured base URL is unusable.
    #[display("invalid base URL: {_0}")]
    InvalidUrl(#[error(not(source))] String),
    /// The HTTP client could not be constructed.
    #[display("HTTP client error")]
    Client,
    /// The category index could not be loaded; nothing was scraped.
    #[display("could not load the category index")]
    Categories,
    /// The output file could not be written.
    #[display("could not write scraped products to {}", _0.display())]
    Output(#[error(not(source))] PathBuf),
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
        match self {
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            Self::Network(_) | Self::Categories | Self::Io(_) => true,
            _ => false,
        }
    }
}
