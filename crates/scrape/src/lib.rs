//! Dataset scraper.
//!
//! Rebuilds the newline-delimited product dataset from the public registry
//! at [`DEFAULT_BASE_URL`]. Category pages are discovered from the home page,
//! product pages from each category, and each product page becomes one
//! [`Product`](bezglutena_catalog::Product) record.
//!
//! The records are shaped exactly like the ones the lookup side reads, so a
//! freshly scraped file can be fed straight back in as the dataset.

mod consts;
mod crawl;
pub mod error;
pub mod parse;

pub use crate::consts::{DEFAULT_BASE_URL, DEFAULT_USER_AGENT};
pub use crate::crawl::{Crawler, Options, Report};
