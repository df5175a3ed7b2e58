//! EAN extraction.
//!
//! Records put the barcode in different places depending on who wrote them, so
//! extraction probes a fixed list of locations in priority order and takes the
//! first usable value.

use crate::product::Product;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Borrow;
use std::fmt;

/// A normalized (trimmed, non-empty) EAN used as an index key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Ean(String);

impl Ean {
    /// Trim `raw` and wrap it, or `None` if nothing is left.
    pub fn new(raw: impl AsRef<str>) -> Option<Self> {
        let trimmed = self::trim(raw.as_ref());
        match trimmed.is_empty() {
            true => None,
            false => Some(Self(trimmed.to_string())),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for Ean {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl AsRef<str> for Ean {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Ean {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Whitespace as browsers see it: Unicode whitespace plus the byte order mark.
pub(crate) fn is_space(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

pub(crate) fn trim(s: &str) -> &str {
    s.trim_matches(self::is_space)
}

/// Where in a record an EAN may be found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    /// A key inside the nested `details` mapping.
    Detail(&'static str),
    /// A top-level key.
    Attribute(&'static str),
}

impl Location {
    fn probe(self, product: &Product) -> Option<&Value> {
        match self {
            Self::Detail(key) => product.detail(key),
            Self::Attribute(key) => product.attribute(key),
        }
    }
}

/// Probe order. The odd one out (`details.Ean`) is last because only a handful
/// of records use it.
pub const CANDIDATES: [Location; 5] = [
    Location::Detail("EAN"),
    Location::Detail("ean"),
    Location::Attribute("EAN"),
    Location::Attribute("ean"),
    Location::Detail("Ean"),
];

/// Decides which candidate values count as an identifier.
///
/// The product owner has not yet confirmed whether a literal `0` is a real
/// barcode, so both behaviours are available.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EanPolicy {
    /// Non-blank strings and any JSON number are identifiers; `0` and `"0"`
    /// included. Anything else is skipped and probing continues.
    #[default]
    Strict,
    /// The first "truthy" candidate wins (`""`, `0`, `null` and `false` are
    /// not), stringified and trimmed. A winner that trims to nothing means the
    /// record has no EAN.
    Loose,
}

impl EanPolicy {
    /// Extract the EAN from `product`, if it has one.
    pub fn extract(self, product: &Product) -> Option<Ean> {
        if product.is_empty() {
            return None;
        }
        let mut values = CANDIDATES.iter().filter_map(|location| location.probe(product));
        match self {
            Self::Strict => values.find_map(strict_identifier),
            Self::Loose => values.find(|value| is_truthy(value)).and_then(|value| Ean::new(loose_string(value))),
        }
    }
}

/// Extract an EAN using the default ([`Strict`](EanPolicy::Strict)) policy.
pub fn find_ean(product: &Product) -> Option<Ean> {
    EanPolicy::default().extract(product)
}

fn strict_identifier(value: &Value) -> Option<Ean> {
    match value {
        Value::String(s) => Ean::new(s),
        Value::Number(n) => Ean::new(n.to_string()),
        _ => None,
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// String conversion with the same results a browser would produce.
fn loose_string(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => match n.as_f64() {
            Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e21 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(loose_string).collect::<Vec<_>>().join(","),
        Value::Object(_) => "[object Object]".to_string(),
    }
}
