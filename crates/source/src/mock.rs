//! In-memory dataset source for testing.

use crate::DatasetSource;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};

enum Response {
    Payload(String),
    Status(u16),
    Unreachable,
}

/// Dataset source that answers from memory.
///
/// Counts how many times it has been fetched so tests can assert that a
/// session only loads the catalog once.
///
/// # Examples
///
/// ```
/// use bezglutena_source::{DatasetSource, MockSource};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() {
/// let source = MockSource::with_payload("{\"EAN\":\"1\"}\n");
/// assert!(source.fetch().await.is_ok());
/// assert!(MockSource::with_status(404).fetch().await.is_err());
/// assert_eq!(source.fetches(), 1);
/// # }
/// ```
pub struct MockSource {
    response: Response,
    fetches: AtomicUsize,
}

impl MockSource {
    /// Always succeed with `payload`.
    pub fn with_payload(payload: impl Into<String>) -> Self {
        Self::new(Response::Payload(payload.into()))
    }

    /// Always fail as if the server answered with `status`.
    pub fn with_status(status: u16) -> Self {
        Self::new(Response::Status(status))
    }

    /// Always fail as if the server could not be reached.
    pub fn unreachable() -> Self {
        Self::new(Response::Unreachable)
    }

    fn new(response: Response) -> Self {
        Self {
            response,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of times [`fetch()`](DatasetSource::fetch) has been called.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DatasetSource for MockSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch(&self) -> Result<String> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match &self.response {
            Response::Payload(payload) => Ok(payload.clone()),
            Response::Status(status) => exn::bail!(ErrorKind::Fetch(*status)),
            Response::Unreachable => exn::bail!(ErrorKind::Network("mock".to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_payload() {
        let source = MockSource::with_payload("data");
        assert_eq!(source.fetch().await.unwrap(), "data");
        assert_eq!(source.fetch().await.unwrap(), "data");
        assert_eq!(source.fetches(), 2);
    }

    #[tokio::test]
    async fn test_failures() {
        let err = MockSource::with_status(503).fetch().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Fetch(503)));
        let err = MockSource::unreachable().fetch().await.unwrap_err();
        assert!(matches!(&*err, ErrorKind::Network(_)));
    }
}
