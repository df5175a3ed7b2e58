//! Persisted user preferences.
//!
//! The only preference so far is whether the "always check the label"
//! disclaimer has been dismissed. Values are plain strings stored under plain
//! keys, the way a browser's `localStorage` would hold them.

mod disclaimer;
pub mod error;
mod file;
#[cfg(any(test, feature = "mock"))]
mod mock;

pub use crate::disclaimer::{DISCLAIMER_HIDDEN_KEY, Disclaimer};
use crate::error::{ErrorKind, Result};
pub use crate::file::FileFlagStore;
#[cfg(any(test, feature = "mock"))]
pub use crate::mock::MemoryFlagStore;
use async_trait::async_trait;
use std::sync::Arc;

pub type FlagStoreHandle = Arc<dyn FlagStore + Send + Sync>;

/// A string key/value store that survives between runs.
#[async_trait]
pub trait FlagStore: Send + Sync {
    /// Name of the store, for logging.
    fn name(&self) -> &str;

    /// Value stored under `key`, or `None` if nothing was ever stored.
    async fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing whatever was there.
    async fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// Keys must be usable as a single file name on every platform.
pub fn validate_key(key: &str) -> Result<&str> {
    let valid = !key.is_empty()
        && key != "."
        && !key.contains("..")
        && !key.contains(['/', '\\', '\0']);
    match valid {
        true => Ok(key),
        false => exn::bail!(ErrorKind::InvalidKey(key.to_string())),
    }
}
