//! Catalog Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.
//!
//! Almost nothing in this crate is allowed to fail outright: bad dataset
//! lines are skipped and lookups miss. These errors only describe why a single
//! line could not become a [`Product`](crate::Product).

use derive_more::{Display, Error};

/// A catalog error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for catalog operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The line is not valid JSON.
    #[display("malformed JSON record")]
    MalformedJson,
    /// The line is valid JSON, but not an object.
    #[display("expected a JSON object, found {_0}")]
    NotAnObject(#[error(not(source))] &'static str),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        // The dataset is fixed for the session; a bad line stays bad.
        false
    }
}
