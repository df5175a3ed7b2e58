//! Filesystem preference store.

use crate::error::{ErrorKind, Result};
use crate::{FlagStore, validate_key};
use async_trait::async_trait;
use directories::ProjectDirs;
use std::fs::create_dir_all as sync_create_dir;
use std::path::{Path, PathBuf};
use tokio::fs;

/// Stores each key as a file of the same name in one directory.
///
/// # Examples
///
/// ```no_run
/// use bezglutena_preferences::{FileFlagStore, FlagStore};
///
/// # async fn example() -> bezglutena_preferences::error::Result<()> {
/// let store = FileFlagStore::new(FileFlagStore::default_dir()?)?;
/// store.set("gf_disclaimer_hidden", "true").await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct FileFlagStore {
    name: String,
    root: PathBuf,
}

impl FileFlagStore {
    /// Open (and create, if needed) a store in `root`.
    pub fn new(root: impl AsRef<Path>) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        if root.exists() {
            if !root.is_dir() {
                exn::bail!(ErrorKind::InvalidPath(root));
            }
        } else {
            // Only happens once per run; not worth an async constructor.
            sync_create_dir(&root).map_err(|e| Self::map_io_error(e, &root))?;
        }
        Ok(Self {
            name: root.display().to_string(),
            root,
        })
    }

    /// Platform data directory for this application, e.g.
    /// `~/.local/share/bezglutena` on Linux.
    pub fn default_dir() -> Result<PathBuf> {
        match ProjectDirs::from("hr", "bezglutena", "bezglutena") {
            Some(dirs) => Ok(dirs.data_dir().to_path_buf()),
            None => exn::bail!(ErrorKind::NoDataDir),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn map_io_error(e: std::io::Error, path: &Path) -> ErrorKind {
        match e.kind() {
            std::io::ErrorKind::PermissionDenied => ErrorKind::PermissionDenied(path.to_path_buf()),
            _ => ErrorKind::Io(e),
        }
    }
}

#[async_trait]
impl FlagStore for FileFlagStore {
    fn name(&self) -> &str {
        &self.name
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let path = self.root.join(validate_key(key)?);
        match fs::read_to_string(&path).await {
            Ok(value) => Ok(Some(value)),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(Self::map_io_error(err, &path).into()),
        }
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let path = self.root.join(validate_key(key)?);
        fs::write(&path, value).await.map_err(|e| Self::map_io_error(e, &path))?;
        tracing::debug!(store = %self.name, key, "Stored preference");
        Ok(())
    }
}
