use bezglutena_catalog::{BuildReport, EanPolicy, Index, Match};
use bezglutena_source::DatasetSource;
use tracing::instrument;

/// Everything a run needs to answer lookups: the index, built exactly once.
///
/// Loading never fails outright. If the dataset can't be fetched the session
/// is still usable, with an empty index and a [`load_error()`](Self::load_error)
/// to show the user.
#[derive(Debug)]
pub struct Session {
    source: String,
    index: Index,
    report: BuildReport,
    load_error: Option<String>,
}

impl Session {
    #[instrument(skip(source), fields(source = source.name()))]
    pub async fn load(source: &(impl DatasetSource + ?Sized), policy: EanPolicy) -> Self {
        let (index, report, load_error) = match source.fetch().await {
            Ok(payload) => {
                let (index, report) = Index::from_ndjson(&payload, policy);
                (index, report, None)
            },
            Err(err) => {
                tracing::error!(error = ?err, "Failed to load dataset");
                let message = format!("Could not load the product list ({err}); every lookup will come up empty.");
                (Index::empty(), BuildReport::default(), Some(message))
            },
        };
        Self {
            source: source.name().to_string(),
            index,
            report,
            load_error,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn index(&self) -> &Index {
        &self.index
    }

    pub fn report(&self) -> &BuildReport {
        &self.report
    }

    /// User-facing message if the dataset could not be loaded.
    pub fn load_error(&self) -> Option<&str> {
        self.load_error.as_deref()
    }

    /// Look up a code as delivered by a scanner or typed by the user.
    pub fn lookup(&self, code: &str) -> Option<Match<'_>> {
        self.index.lookup_scanned(code)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bezglutena_catalog::MatchedBy;
    use bezglutena_source::MockSource;
    use rstest::rstest;

    const PAYLOAD: &str = concat!(
        r#"{"title":"Ajvar blagi 195 g","details":{"EAN":"3850104022517"}}"#,
        "\n",
        "not json\n",
        r#"{"title":"Bez EAN-a","details":{}}"#,
        "\n",
        r#"{"title":"Pašteta","EAN":"3850104000010"}"#,
        "\n",
    );

    #[tokio::test]
    async fn test_load() {
        let source = MockSource::with_payload(PAYLOAD);
        let session = Session::load(&source, EanPolicy::Strict).await;
        assert!(session.load_error().is_none());
        assert_eq!(session.index().len(), 2);
        assert_eq!(session.report().indexed, 2);
        assert_eq!(session.report().without_ean, 1);
        assert_eq!(session.report().parse.malformed, 1);
        assert_eq!(source.fetches(), 1);

        let found = session.lookup(" 385 0104022517\n").unwrap();
        assert_eq!(found.product.title.as_deref(), Some("Ajvar blagi 195 g"));
        assert_eq!(found.matched_by, MatchedBy::Normalized);
        assert!(session.lookup("0000000000000").is_none());
        assert!(session.lookup("").is_none());
    }

    #[rstest]
    #[case(MockSource::with_status(404), "HTTP 404")]
    #[case(MockSource::with_status(500), "HTTP 500")]
    #[case(MockSource::unreachable(), "network error")]
    #[tokio::test]
    async fn test_failed_load_is_empty(#[case] source: MockSource, #[case] reason: &str) {
        let session = Session::load(&source, EanPolicy::Strict).await;
        assert!(session.index().is_empty());
        assert_eq!(*session.report(), BuildReport::default());
        let message = session.load_error().unwrap();
        assert!(message.contains(reason), "{message}");
        assert!(session.lookup("3850104022517").is_none());
        assert_eq!(source.fetches(), 1);
    }

    #[tokio::test]
    async fn test_empty_payload() {
        let source = MockSource::with_payload("");
        let session = Session::load(&source, EanPolicy::Strict).await;
        assert!(session.load_error().is_none());
        assert!(session.index().is_empty());
    }

    #[tokio::test]
    async fn test_through_handle() {
        let source: bezglutena_source::SourceHandle = std::sync::Arc::new(MockSource::with_payload(PAYLOAD));
        let session = Session::load(source.as_ref(), EanPolicy::Loose).await;
        assert_eq!(session.source(), "mock");
        assert!(session.lookup("3850104000010").is_some());
    }
}
