use crate::FlagStore;
use crate::error::Result;

/// Key under which the dismissal is stored.
pub const DISCLAIMER_HIDDEN_KEY: &str = "gf_disclaimer_hidden";
const HIDDEN: &str = "true";

/// The "always check the packaging" disclaimer shown alongside results.
///
/// Visible until the user dismisses it; the dismissal is remembered in a
/// [`FlagStore`]. Anything stored other than exactly `"true"` counts as not
/// dismissed.
///
/// # Examples
///
/// ```
/// use bezglutena_preferences::{Disclaimer, MemoryFlagStore};
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let store = MemoryFlagStore::new();
/// let mut disclaimer = Disclaimer::load(&store).await?;
/// assert!(disclaimer.is_visible());
/// disclaimer.dismiss(&store).await?;
/// assert!(!Disclaimer::load(&store).await?.is_visible());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Disclaimer {
    visible: bool,
}

impl Default for Disclaimer {
    /// Visible, as if nothing was ever stored.
    fn default() -> Self {
        Self { visible: true }
    }
}

impl Disclaimer {
    pub const TEXT: &'static str =
        "Always check the product packaging. Listing in the registry does not guarantee that a product is gluten-free.";

    /// Read the dismissal flag once.
    pub async fn load(store: &(impl FlagStore + ?Sized)) -> Result<Self> {
        let stored = store.get(DISCLAIMER_HIDDEN_KEY).await?;
        Ok(Self {
            visible: stored.as_deref() != Some(HIDDEN),
        })
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Hide the disclaimer, now and in future sessions.
    pub async fn dismiss(&mut self, store: &(impl FlagStore + ?Sized)) -> Result<()> {
        store.set(DISCLAIMER_HIDDEN_KEY, HIDDEN).await?;
        self.visible = false;
        tracing::info!(store = store.name(), "Disclaimer dismissed");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FileFlagStore, MemoryFlagStore};
    use rstest::rstest;

    #[tokio::test]
    async fn test_visible_by_default() {
        let store = MemoryFlagStore::new();
        assert!(Disclaimer::load(&store).await.unwrap().is_visible());
    }

    #[rstest]
    #[case("true", false)]
    #[case("false", true)]
    #[case("TRUE", true)]
    #[case(" true", true)]
    #[case("1", true)]
    #[tokio::test]
    async fn test_only_exact_true_hides(#[case] stored: &str, #[case] visible: bool) {
        let store = MemoryFlagStore::with_flags([(DISCLAIMER_HIDDEN_KEY, stored)]);
        assert_eq!(Disclaimer::load(&store).await.unwrap().is_visible(), visible);
    }

    #[tokio::test]
    async fn test_dismiss_persists() {
        let store = MemoryFlagStore::new();
        let mut disclaimer = Disclaimer::load(&store).await.unwrap();
        disclaimer.dismiss(&store).await.unwrap();
        assert!(!disclaimer.is_visible());
        assert_eq!(store.get(DISCLAIMER_HIDDEN_KEY).await.unwrap().as_deref(), Some("true"));
    }

    #[tokio::test]
    async fn test_dismiss_survives_reopen() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store = FileFlagStore::new(temp_dir.path()).unwrap();
        Disclaimer::load(&store).await.unwrap().dismiss(&store).await.unwrap();

        let reopened = FileFlagStore::new(temp_dir.path()).unwrap();
        assert!(!Disclaimer::load(&reopened).await.unwrap().is_visible());
    }

    #[tokio::test]
    async fn test_works_through_handle() {
        let store: crate::FlagStoreHandle = std::sync::Arc::new(MemoryFlagStore::new());
        let mut disclaimer = Disclaimer::load(store.as_ref()).await.unwrap();
        disclaimer.dismiss(store.as_ref()).await.unwrap();
        assert!(!Disclaimer::load(store.as_ref()).await.unwrap().is_visible());
    }
}
