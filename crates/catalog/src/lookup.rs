//! Barcode lookups against a built [`Index`].

use crate::ean::{is_space, trim};
use crate::index::Index;
use crate::product::Product;

/// Which query produced a [`Match`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchedBy {
    /// The scanned text with all whitespace removed.
    Normalized,
    /// The scanned text exactly as decoded (trimmed).
    Raw,
}

/// A successful lookup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Match<'a> {
    pub product: &'a Product,
    pub matched_by: MatchedBy,
}

/// Look up `raw` after trimming surrounding whitespace.
///
/// Empty input is a miss, never an error.
pub fn lookup<'a>(index: &'a Index, raw: &str) -> Option<&'a Product> {
    let ean = trim(raw);
    if ean.is_empty() {
        return None;
    }
    index.get(ean)
}

/// Look up text delivered by a barcode scanner.
///
/// Decoders sometimes inject stray whitespace into the payload, so every
/// whitespace character is stripped first. If that misses, the untouched
/// decoded text is tried as-is.
///
/// # Examples
///
/// ```
/// use bezglutena_catalog::{Index, MatchedBy, lookup_scanned};
/// # use bezglutena_catalog::EanPolicy;
///
/// let (index, _) = Index::from_ndjson(r#"{"details":{"EAN":"3850104022517"}}"#, EanPolicy::Strict);
/// let found = lookup_scanned(&index, "385 0104022517").unwrap();
/// assert_eq!(found.matched_by, MatchedBy::Normalized);
/// assert!(lookup_scanned(&index, "000").is_none());
/// ```
pub fn lookup_scanned<'a>(index: &'a Index, decoded: &str) -> Option<Match<'a>> {
    let normalized: String = decoded.chars().filter(|&c| !is_space(c)).collect();
    if let Some(product) = lookup(index, &normalized) {
        return Some(Match {
            product,
            matched_by: MatchedBy::Normalized,
        });
    }
    let product = lookup(index, decoded)?;
    tracing::debug!(decoded, "Matched scanned text without normalization");
    Some(Match {
        product,
        matched_by: MatchedBy::Raw,
    })
}

impl Index {
    /// See [`lookup()`].
    pub fn lookup(&self, raw: &str) -> Option<&Product> {
        lookup(self, raw)
    }

    /// See [`lookup_scanned()`].
    pub fn lookup_scanned(&self, decoded: &str) -> Option<Match<'_>> {
        lookup_scanned(self, decoded)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ean::EanPolicy;
    use rstest::rstest;
    use serde_json::json;

    fn index(payload: &str) -> Index {
        Index::from_ndjson(payload, EanPolicy::Strict).0
    }

    #[test]
    fn test_end_to_end() {
        let index = index("{\"EAN\":\"123\"}\n{\"ean\":\"456\",\"title\":\"X\"}\n{\"details\":{\"EAN\":\"789\"}}");
        let expected = Product::try_from(json!({"EAN": "123"})).unwrap();
        assert_eq!(index.lookup("123"), Some(&expected));
        assert_eq!(index.lookup("000"), None);
        assert_eq!(index.lookup("789").unwrap().detail("EAN"), Some(&json!("789")));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n")]
    fn test_empty_input_misses(#[case] raw: &str) {
        let index = index("{\"EAN\":\"123\"}");
        assert!(index.lookup(raw).is_none());
        assert!(index.lookup_scanned(raw).is_none());
    }

    #[test]
    fn test_lookup_trims() {
        let index = index("{\"EAN\":\"123\"}");
        assert!(index.lookup("  123\t").is_some());
    }

    #[rstest]
    #[case("385 0104022517")]
    #[case("3850104022517\n")]
    #[case(" 385\t010 402 2517 ")]
    #[case("\u{feff}3850104022517")]
    fn test_whitespace_is_stripped(#[case] decoded: &str) {
        let index = index("{\"details\":{\"EAN\":\"3850104022517\"}}");
        let found = index.lookup_scanned(decoded).unwrap();
        assert_eq!(found.matched_by, MatchedBy::Normalized);
        assert_eq!(found.product.detail("EAN"), Some(&json!("3850104022517")));
    }

    #[test]
    fn test_fallback_to_raw_text() {
        // Only reachable when the key itself contains whitespace.
        let index = index("{\"EAN\":\"ABC 123\"}");
        let found = index.lookup_scanned("ABC 123").unwrap();
        assert_eq!(found.matched_by, MatchedBy::Raw);
    }

    #[test]
    fn test_no_partial_matches() {
        let index = index("{\"EAN\":\"3850104022517\"}");
        assert!(index.lookup_scanned("385010402251").is_none());
        assert!(index.lookup_scanned("38501040225170").is_none());
    }

    #[test]
    fn test_empty_index_always_misses() {
        assert!(Index::empty().lookup_scanned("3850104022517").is_none());
    }
}
