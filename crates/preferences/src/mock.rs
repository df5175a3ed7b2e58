//! In-memory preference store for testing.

use crate::error::Result;
use crate::{FlagStore, validate_key};
use async_trait::async_trait;
use std::collections::HashMap;
use tokio::sync::RwLock;

/// Preference store backed by a `HashMap`.
///
/// # Examples
///
/// ```
/// use bezglutena_preferences::{FlagStore, MemoryFlagStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryFlagStore::with_flags([("gf_disclaimer_hidden", "true")]);
/// assert_eq!(store.get("gf_disclaimer_hidden").await?.as_deref(), Some("true"));
/// assert_eq!(store.get("anything_else").await?, None);
/// # Ok(())
/// # }
/// ```
#[derive(Default)]
pub struct MemoryFlagStore {
    flags: RwLock<HashMap<String, String>>,
}

impl MemoryFlagStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store pre-populated with flags.
    ///
    /// Panics on invalid keys; test setup that's wrong should not pass.
    pub fn with_flags(flags: impl IntoIterator<Item = (impl Into<String>, impl Into<String>)>) -> Self {
        let mut map = HashMap::new();
        for (key, value) in flags {
            let key = key.into();
            if validate_key(&key).is_err() {
                panic!("MemoryFlagStore::with_flags: invalid key {key:?}");
            }
            map.insert(key, value.into());
        }
        Self {
            flags: RwLock::new(map),
        }
    }
}

#[async_trait]
impl FlagStore for MemoryFlagStore {
    fn name(&self) -> &str {
        "mock"
    }

    async fn get(&self, key: &str) -> Result<Option<String>> {
        let key = validate_key(key)?;
        Ok(self.flags.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> Result<()> {
        let key = validate_key(key)?;
        self.flags.write().await.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
