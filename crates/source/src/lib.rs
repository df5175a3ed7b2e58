//! Dataset sources.
//!
//! The product catalog is a single newline-delimited JSON document. This crate
//! only knows how to get hold of its text; parsing lives in
//! `bezglutena-catalog`.

pub mod error;
mod file;
mod http;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::file::FileSource;
pub use crate::http::{DEFAULT_DATASET_URL, HttpSource};
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MockSource;
use crate::error::Result;
use async_trait::async_trait;
use std::sync::Arc;

pub type SourceHandle = Arc<dyn DatasetSource + Send + Sync>;

/// Somewhere the raw dataset text can be fetched from.
///
/// Every call to [`fetch()`](Self::fetch) is a single best-effort attempt: no
/// retries, no caching.
///
/// # Examples
///
/// ```no_run
/// use bezglutena_source::{DatasetSource, HttpSource, DEFAULT_DATASET_URL};
/// # async fn example() -> bezglutena_source::error::Result<()> {
/// let source = HttpSource::new(DEFAULT_DATASET_URL)?;
/// let payload = source.fetch().await?;
/// println!("{} bytes from {}", payload.len(), source.name());
/// # Ok(())
/// # }
/// ```
#[async_trait]
pub trait DatasetSource: Send + Sync {
    /// Human-readable location of the dataset (URL or path), for logging.
    fn name(&self) -> &str;

    /// Retrieve the whole dataset as text.
    async fn fetch(&self) -> Result<String>;
}

/// Open a dataset location: `http://` and `https://` URLs are fetched over
/// HTTP, anything else is treated as a local file path.
pub fn open(location: &str) -> Result<SourceHandle> {
    let lower = location.trim_start().to_ascii_lowercase();
    if lower.starts_with("http://") || lower.starts_with("https://") {
        Ok(Arc::new(HttpSource::new(location.trim())?))
    } else {
        Ok(Arc::new(FileSource::new(location)))
    }
}
