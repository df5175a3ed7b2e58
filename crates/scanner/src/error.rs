//! Scanner Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// A scanner error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for scanner operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// These describe what the caller should *do*, not what went wrong internally.
#[derive(Debug, Display, Error, Clone, PartialEq, Eq)]
pub enum ErrorKind {
    /// The camera could not be started with any constraints; tell the user
    /// and close the scanner.
    #[display("could not access the camera to start the scanner: {_0}")]
    CameraAccess(#[error(not(source))] String),
    /// The scanner cannot satisfy the requested constraints.
    #[display("unsupported scanner constraints: {_0}")]
    InvalidConstraints(#[error(not(source))] String),
    /// The scanner was already started and cannot be started again.
    #[display("scanner already started")]
    AlreadyStarted,
    /// The device failed while running or stopping.
    #[display("scanner device error: {_0}")]
    Device(#[error(not(source))] String),
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::InvalidConstraints(_))
    }
}
