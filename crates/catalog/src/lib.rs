//! Gluten-free product catalog: records, EAN extraction and lookups.
//!
//! The dataset is newline-delimited JSON, one product per line, with no
//! guaranteed schema. Building the catalog is a single pass:
//!
//! 1. [`parse::records`] splits the payload into [`Product`]s, skipping (and
//!    logging) anything that isn't a JSON object.
//! 2. [`EanPolicy::extract`] finds each product's barcode by probing a fixed
//!    list of [`ean::CANDIDATES`].
//! 3. [`Index`] keeps the last product seen for each [`Ean`].
//!
//! After that the index is read-only; [`lookup_scanned`] is what a scanner
//! callback should call for each decoded barcode.
//!
//! This crate does no I/O and reads no configuration. Fetching the payload is
//! somebody else's job.

pub mod ean;
pub mod error;
mod index;
mod lookup;
pub mod parse;
mod product;

pub use crate::ean::{Ean, EanPolicy, find_ean};
pub use crate::index::{BuildReport, Index};
pub use crate::lookup::{Match, MatchedBy, lookup, lookup_scanned};
pub use crate::parse::ParseStats;
pub use crate::product::{Details, Product};
