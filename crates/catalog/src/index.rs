//! The EAN → product index.

use crate::ean::{Ean, EanPolicy};
use crate::parse::{ParseStats, records};
use crate::product::Product;
use std::collections::HashMap;
use tracing::instrument;

/// What happened while building an [`Index`] from a payload.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildReport {
    pub parse: ParseStats,
    /// Records that parsed but had no resolvable EAN.
    pub without_ean: usize,
    /// Distinct EANs in the finished index.
    pub indexed: usize,
}

/// In-memory map from [`Ean`] to the last [`Product`] seen with that EAN.
///
/// Built once, then only read. There is no way to insert into an index after
/// it has been built.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Index {
    entries: HashMap<Ean, Product>,
}

impl Index {
    /// An index with nothing in it; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from records using the default EAN policy.
    pub fn build(products: impl IntoIterator<Item = Product>) -> Self {
        Self::build_with(products, EanPolicy::default()).0
    }

    /// Build an index from records. Later records overwrite earlier records
    /// with the same EAN. Returns the index and how many records had no EAN.
    pub fn build_with(products: impl IntoIterator<Item = Product>, policy: EanPolicy) -> (Self, usize) {
        let mut entries = HashMap::new();
        let mut without_ean = 0;
        for product in products {
            match policy.extract(&product) {
                Some(ean) => {
                    entries.insert(ean, product);
                },
                None => without_ean += 1,
            }
        }
        (Self { entries }, without_ean)
    }

    /// Parse a newline-delimited JSON payload and index every record in it.
    #[instrument(skip(payload), fields(payload_size = payload.len()))]
    pub fn from_ndjson(payload: &str, policy: EanPolicy) -> (Self, BuildReport) {
        let mut parsed = records(payload);
        let (index, without_ean) = Self::build_with(parsed.by_ref(), policy);
        let report = BuildReport {
            parse: parsed.stats(),
            without_ean,
            indexed: index.len(),
        };
        tracing::info!(
            lines = report.parse.lines,
            malformed = report.parse.malformed,
            without_ean,
            indexed = report.indexed,
            "Built product index"
        );
        (index, report)
    }

    /// Exact match on an already-normalized key.
    pub fn get(&self, ean: &str) -> Option<&Product> {
        self.entries.get(ean)
    }

    pub fn contains(&self, ean: &str) -> bool {
        self.entries.contains_key(ean)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<Product> for Index {
    fn from_iter<T: IntoIterator<Item = Product>>(iter: T) -> Self {
        Self::build(iter)
    }
}
