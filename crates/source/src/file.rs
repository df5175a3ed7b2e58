//! Local file dataset source.
//!
//! Useful offline, and for pointing the shell at the output of a fresh scrape
//! before it has been published.

use crate::DatasetSource;
use crate::error::{ErrorKind, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tracing::instrument;

/// Reads the dataset from a file on disk.
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
    name: String,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: path.display().to_string(),
            path,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::NotFound => ErrorKind::NotFound(path.to_path_buf()),
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl DatasetSource for FileSource {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn fetch(&self) -> Result<String> {
        let mut payload = tokio::fs::read_to_string(&self.path).await.map_err(|e| Self::map_io_error(e, &self.path))?;
        tracing::debug!(bytes = payload.len(), "Read dataset file");
        // Match the HTTP path, where the client drops the byte order mark.
        if payload.starts_with('\u{feff}') {
            payload.drain(..'\u{feff}'.len_utf8());
        }
        Ok(payload)
    }
}
