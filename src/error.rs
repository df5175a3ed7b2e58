//! Application Error Types
//!
//! This module provides structured errors using `exn` for automatic location
//! tracking and error tree construction.

use derive_more::{Display, Error};

/// An application error with automatic location tracking.
pub type Error = exn::Exn<ErrorKind>;
/// Result type alias for command execution.
pub type Result<T> = std::result::Result<T, Error>;

/// Actionable error categories.
///
/// Failing to load the dataset is not an error: a session without a
/// dataset still runs, every lookup just misses.
#[derive(Debug, Display, Error)]
pub enum ErrorKind {
    /// Fix the config file or environment and try again.
    #[display("configuration error")]
    Config,
    /// The dataset location given is unusable.
    #[display("invalid dataset location: {_0}")]
    Dataset(#[error(not(source))] String),
    /// Preferences could not be read or written.
    #[display("could not access preferences")]
    Preferences,
    /// The scanner could not be started; scanning is closed.
    #[display("could not start the barcode scanner")]
    Scanner,
    /// The scanner ran but did not shut down cleanly.
    #[display("could not stop the barcode scanner")]
    ScannerStop,
    /// The scraper failed before producing a dataset.
    #[display("scraping failed")]
    Scrape,
    /// Writing results to stdout failed (closed pipe, full disk...).
    #[display("could not write output")]
    Output,
}

impl ErrorKind {
    /// Returns `true` if retrying might succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Scanner | Self::Scrape)
    }
}
