//! Product records.
//!
//! The dataset is externally maintained and has no guaranteed schema. A
//! [`Product`] keeps the handful of fields every record conventionally has in
//! typed form, and everything else in an open map. Nothing is ever dropped: a
//! known key holding an unexpected JSON type simply stays in [`Product::extra`]
//! under its original name.

use crate::error::{ErrorKind, Result};
use exn::ResultExt;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};

/// Free-form `details` mapping (manufacturer, packaging, `EAN`, notes, ...).
pub type Details = Map<String, Value>;

const TITLE: &str = "title";
const URL: &str = "url";
const SHORT_DESCRIPTION: &str = "short_description";
const DETAILS: &str = "details";
const IMAGE: &str = "image";

/// A single gluten-free product from the catalog dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Product {
    /// Product name, including the net quantity (e.g. "Ajvar blagi 195 g").
    pub title: Option<String>,
    /// Page the record was scraped from.
    pub url: Option<String>,
    /// Ingredients and nutrition summary.
    pub short_description: Option<String>,
    /// Key/value details table; this is where the EAN usually lives.
    pub details: Option<Details>,
    /// Absolute URL of the product image.
    pub image: Option<String>,
    /// Every other top-level key, untouched.
    pub extra: Map<String, Value>,
}

impl Product {
    /// Parse a single line of the dataset.
    ///
    /// Returns [`MalformedJson`](ErrorKind::MalformedJson) if the line is not
    /// JSON at all, or [`NotAnObject`](ErrorKind::NotAnObject) if it is valid
    /// JSON but not an object.
    pub fn from_json(line: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(line).or_raise(|| ErrorKind::MalformedJson)?;
        Self::try_from(value)
    }

    /// Look up a key in the nested `details` mapping.
    pub fn detail(&self, key: &str) -> Option<&Value> {
        self.details.as_ref()?.get(key)
    }

    /// Look up an unrecognised top-level key.
    pub fn attribute(&self, key: &str) -> Option<&Value> {
        self.extra.get(key)
    }

    /// A record with no fields at all; equivalent to having no record.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.url.is_none()
            && self.short_description.is_none()
            && self.details.is_none()
            && self.image.is_none()
            && self.extra.is_empty()
    }

    /// Reassemble the record into the open JSON mapping it was parsed from.
    pub fn to_map(&self) -> Map<String, Value> {
        let mut map = self.extra.clone();
        let strings = [
            (TITLE, &self.title),
            (URL, &self.url),
            (SHORT_DESCRIPTION, &self.short_description),
            (IMAGE, &self.image),
        ];
        for (key, value) in strings {
            if let Some(value) = value {
                map.insert(key.to_string(), Value::String(value.clone()));
            }
        }
        if let Some(details) = &self.details {
            map.insert(DETAILS.to_string(), Value::Object(details.clone()));
        }
        map
    }
}

impl From<Map<String, Value>> for Product {
    fn from(mut map: Map<String, Value>) -> Self {
        let title = take_string(&mut map, TITLE);
        let url = take_string(&mut map, URL);
        let short_description = take_string(&mut map, SHORT_DESCRIPTION);
        let image = take_string(&mut map, IMAGE);
        let details = match map.remove(DETAILS) {
            Some(Value::Object(details)) => Some(details),
            Some(other) => {
                map.insert(DETAILS.to_string(), other);
                None
            },
            None => None,
        };
        Self {
            title,
            url,
            short_description,
            details,
            image,
            extra: map,
        }
    }
}

impl TryFrom<Value> for Product {
    type Error = crate::error::Error;

    fn try_from(value: Value) -> Result<Self> {
        match value {
            Value::Object(map) => Ok(Self::from(map)),
            other => exn::bail!(ErrorKind::NotAnObject(json_kind(&other))),
        }
    }
}

impl Serialize for Product {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        self.to_map().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Product {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Map::deserialize(deserializer).map(Self::from)
    }
}

/// Move a string out of the map, leaving any other JSON type where it was.
fn take_string(map: &mut Map<String, Value>, key: &str) -> Option<String> {
    match map.remove(key)? {
        Value::String(s) => Some(s),
        other => {
            map.insert(key.to_string(), other);
            None
        },
    }
}

pub(crate) fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[test]
    fn test_known_fields() {
        let product = Product::from_json(
            r#"{"title":"Ajvar blagi 195 g","url":"https://example.org/404","details":{"EAN":"3850104022517","Proizvođač":"Podravka"},"image":"https://example.org/404.png"}"#,
        )
        .unwrap();
        assert_eq!(product.title.as_deref(), Some("Ajvar blagi 195 g"));
        assert_eq!(product.url.as_deref(), Some("https://example.org/404"));
        assert_eq!(product.image.as_deref(), Some("https://example.org/404.png"));
        assert_eq!(product.detail("EAN"), Some(&json!("3850104022517")));
        assert_eq!(product.detail("Proizvođač"), Some(&json!("Podravka")));
        assert!(product.short_description.is_none());
        assert!(product.extra.is_empty());
    }

    #[test]
    fn test_unexpected_types_stay_in_extra() {
        let product = Product::from_json(r#"{"title":42,"details":"n/a","EAN":"123"}"#).unwrap();
        assert!(product.title.is_none());
        assert!(product.details.is_none());
        assert_eq!(product.attribute("title"), Some(&json!(42)));
        assert_eq!(product.attribute("details"), Some(&json!("n/a")));
        assert_eq!(product.attribute("EAN"), Some(&json!("123")));
    }

    #[test]
    fn test_null_title_is_preserved() {
        let product = Product::from_json(r#"{"title":null,"ean":"1"}"#).unwrap();
        assert!(product.title.is_none());
        assert_eq!(serde_json::to_value(&product).unwrap(), json!({"title": null, "ean": "1"}));
    }

    #[test]
    fn test_serialize_reproduces_input() {
        let input = json!({
            "title": "X",
            "short_description": "rice flour",
            "details": {"EAN": "789", "notes": ["Izjava proizvođača"]},
            "origin": {"country": "HR"},
        });
        let product: Product = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(serde_json::to_value(&product).unwrap(), input);
    }

    #[rstest]
    #[case("not json", ErrorKind::MalformedJson)]
    #[case(r#"{"title": "unterminated"#, ErrorKind::MalformedJson)]
    #[case("null", ErrorKind::NotAnObject("null"))]
    #[case("[1, 2]", ErrorKind::NotAnObject("array"))]
    #[case(r#""3850104022517""#, ErrorKind::NotAnObject("string"))]
    fn test_from_json_errors(#[case] line: &str, #[case] expected: ErrorKind) {
        let err = Product::from_json(line).unwrap_err();
        assert_eq!(*err, expected);
    }

    #[test]
    fn test_is_empty() {
        assert!(Product::from_json("{}").unwrap().is_empty());
        assert!(!Product::from_json(r#"{"a":1}"#).unwrap().is_empty());
    }
}
