use scraper::Selector;
use std::sync::LazyLock;

/// The registry the published dataset is scraped from.
pub const DEFAULT_BASE_URL: &str = "https://bezglutena.celivita.hr";
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (compatible; GlutenFreeBot/1.0)";

pub(crate) const CATEGORY_MARKER: &str = "/Products/Category?cid=";
pub(crate) const PRODUCT_MARKER: &str = "/Products/Details?id=";
pub(crate) const IMAGE_PREFIX: &str = "/image/product";
pub(crate) const NOTES_KEY: &str = "notes";
pub(crate) const EXTERNAL_LINK_KEY: &str = "external_link";

macro_rules! selector {
    ($name:ident, $css:expr) => {
        pub(crate) static $name: LazyLock<Selector> = LazyLock::new(|| Selector::parse($css).unwrap());
    };
}

selector!(LINK_SELECTOR, "a[href]");
// Product tiles on a category page; other links there point back at categories.
selector!(PRODUCT_LINK_SELECTOR, "a.auxshp-label[href]");
selector!(TITLE_SELECTOR, "h2.product_title");
selector!(SHORT_DESCRIPTION_SELECTOR, "div.woocommerce-product-details__short-description");
selector!(DESCRIPTION_TAB_SELECTOR, "li.description_tab");
selector!(PARAGRAPH_SELECTOR, "p");
selector!(IMAGE_SELECTOR, "img[src]");
