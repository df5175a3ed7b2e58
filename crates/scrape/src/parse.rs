//! Extraction from registry HTML pages.
//!
//! Every function here is infallible: a page that doesn't have what we look
//! for yields nothing (or a record with missing fields), never an error.

use crate::consts;
use bezglutena_catalog::{Details, Product};
use reqwest::Url;
use scraper::{ElementRef, Html};
use serde_json::Value;
use std::collections::BTreeSet;
use tracing::instrument;

/// All category pages linked from the home page, deduplicated and sorted.
#[instrument(level = "trace", skip(html), fields(html_size = html.len()))]
pub fn categories(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let unique: BTreeSet<Url> = self::links(&document, &consts::LINK_SELECTOR, consts::CATEGORY_MARKER, base).collect();
    unique.into_iter().collect()
}

/// Product pages linked from a category page, in page order.
#[instrument(level = "trace", skip(html), fields(html_size = html.len()))]
pub fn product_links(html: &str, base: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    self::links(&document, &consts::PRODUCT_LINK_SELECTOR, consts::PRODUCT_MARKER, base).collect()
}

/// Turn a product page into a dataset record.
///
/// `title`, `short_description` and `image` are always present in the
/// written record; a field missing from the page is written as `null`.
#[instrument(level = "trace", skip(html), fields(html_size = html.len(), %url))]
pub fn product(html: &str, url: &Url, base: &Url) -> Product {
    let document = Html::parse_document(html);
    let mut product = Product {
        title: self::title(&document),
        url: Some(url.to_string()),
        short_description: self::short_description(&document),
        details: Some(self::details(&document)),
        image: self::image(&document, base),
        ..Product::default()
    };
    let missing = [
        ("title", product.title.is_none()),
        ("short_description", product.short_description.is_none()),
        ("image", product.image.is_none()),
    ];
    for (key, is_missing) in missing {
        if is_missing {
            product.extra.insert(key.to_string(), Value::Null);
        }
    }
    product
}

fn links<'a>(
    document: &'a Html,
    selector: &'a scraper::Selector,
    marker: &'a str,
    base: &'a Url,
) -> impl Iterator<Item = Url> + 'a {
    document
        .select(selector)
        .filter_map(|a| a.value().attr("href"))
        .filter(move |href| href.contains(marker))
        .filter_map(move |href| base.join(href).ok())
}

/// Text of an element with every text node trimmed and empty ones dropped,
/// glued together with `separator`.
fn stripped_text(element: ElementRef<'_>, separator: &str) -> String {
    element
        .text()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join(separator)
}

fn title(document: &Html) -> Option<String> {
    document.select(&consts::TITLE_SELECTOR).next().map(|el| self::stripped_text(el, ""))
}

fn short_description(document: &Html) -> Option<String> {
    document
        .select(&consts::SHORT_DESCRIPTION_SELECTOR)
        .next()
        .map(|el| self::stripped_text(el, "\n"))
}

/// `Key: value` paragraphs of the description tab become entries, anything
/// without a colon is collected under `notes`. The tab's first link is kept
/// as `external_link`.
fn details(document: &Html) -> Details {
    let mut details = Details::new();
    let Some(tab) = document.select(&consts::DESCRIPTION_TAB_SELECTOR).next() else {
        return details;
    };
    let mut notes = Vec::new();
    for paragraph in tab.select(&consts::PARAGRAPH_SELECTOR) {
        let text = self::stripped_text(paragraph, "");
        match text.split_once(':') {
            Some((key, value)) => {
                details.insert(key.trim().to_string(), Value::String(value.trim().to_string()));
            },
            None => notes.push(Value::String(text)),
        }
    }
    if !notes.is_empty() {
        // A paragraph literally labelled "notes:" loses to the collected notes.
        details.insert(consts::NOTES_KEY.to_string(), Value::Array(notes));
    }
    if let Some(href) = tab.select(&consts::LINK_SELECTOR).next().and_then(|a| a.value().attr("href")) {
        details.insert(consts::EXTERNAL_LINK_KEY.to_string(), Value::String(href.to_string()));
    }
    details
}

/// The last product image on the page wins; earlier ones are thumbnails.
fn image(document: &Html, base: &Url) -> Option<String> {
    let base = base.as_str().trim_end_matches('/');
    document
        .select(&consts::IMAGE_SELECTOR)
        .filter_map(|img| img.value().attr("src"))
        .map(str::trim)
        .filter(|src| src.starts_with(consts::IMAGE_PREFIX))
        .last()
        .map(|src| format!("{base}{src}"))
}
