//! Tolerant newline-delimited JSON parsing.

use crate::error::ErrorKind;
use crate::product::Product;
use std::iter::Enumerate;
use std::str::Lines;

/// Counters describing how a payload was parsed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Non-blank lines seen so far.
    pub lines: usize,
    /// Lines that were not valid JSON.
    pub malformed: usize,
    /// Lines that were valid JSON but not an object.
    pub not_objects: usize,
}

/// Iterator over the records of a newline-delimited JSON payload.
///
/// Bad lines never end the iteration: they are logged, counted in
/// [`stats()`](Self::stats), and skipped.
pub struct Records<'a> {
    lines: Enumerate<Lines<'a>>,
    stats: ParseStats,
}

impl Records<'_> {
    pub fn stats(&self) -> ParseStats {
        self.stats
    }
}

impl Iterator for Records<'_> {
    type Item = Product;

    fn next(&mut self) -> Option<Product> {
        for (index, line) in self.lines.by_ref() {
            let line = crate::ean::trim(line);
            if line.is_empty() {
                continue;
            }
            self.stats.lines += 1;
            match Product::from_json(line) {
                Ok(product) => return Some(product),
                Err(err) => {
                    match &*err {
                        ErrorKind::MalformedJson => {
                            self.stats.malformed += 1;
                            tracing::warn!(line = index + 1, error = ?err, "Skipping bad line in dataset");
                        },
                        ErrorKind::NotAnObject(kind) => {
                            self.stats.not_objects += 1;
                            tracing::debug!(line = index + 1, kind, "Dataset line is not a record");
                        },
                    }
                    continue;
                },
            }
        }
        None
    }
}

/// Parse a newline-delimited JSON payload into [`Product`] records.
///
/// A blank payload yields nothing. Both `\n` and `\r\n` line endings are
/// accepted.
///
/// # Examples
///
/// ```
/// use bezglutena_catalog::parse::records;
///
/// let payload = "{\"EAN\":\"123\"}\r\nnot json\n\n{\"ean\":\"456\"}\n";
/// let mut parsed = records(payload);
/// assert_eq!(parsed.by_ref().count(), 2);
/// assert_eq!(parsed.stats().malformed, 1);
/// ```
pub fn records(payload: &str) -> Records<'_> {
    Records {
        lines: crate::ean::trim(payload).lines().enumerate(),
        stats: ParseStats::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("\n\r\n\t\n")]
    fn test_blank_payload(#[case] payload: &str) {
        let mut parsed = records(payload);
        assert!(parsed.next().is_none());
        assert_eq!(parsed.stats(), ParseStats::default());
    }

    #[test]
    fn test_line_endings() {
        let parsed: Vec<_> = records("{\"a\":1}\r\n{\"b\":2}\n{\"c\":3}").collect();
        assert_eq!(parsed.len(), 3);
        assert!(parsed[0].attribute("a").is_some());
        assert!(parsed[2].attribute("c").is_some());
    }

    #[test]
    fn test_malformed_lines_are_skipped() {
        let payload = "{\"EAN\":\"1\"}\n{broken\n{\"EAN\":\"2\"}\n\n[1,2]\n\"text\"\n{\"EAN\":\"3\"}\n";
        let mut parsed = records(payload);
        let products: Vec<_> = parsed.by_ref().collect();
        assert_eq!(products.len(), 3);
        assert_eq!(
            parsed.stats(),
            ParseStats {
                lines: 6,
                malformed: 1,
                not_objects: 2,
            }
        );
    }

    #[test]
    fn test_leading_byte_order_mark() {
        let mut parsed = records("\u{feff}{\"EAN\":\"1\"}\n{\"EAN\":\"2\"}");
        assert_eq!(parsed.by_ref().count(), 2);
        assert_eq!(parsed.stats().malformed, 0);
    }

    #[test]
    fn test_surrounding_whitespace_on_lines() {
        let parsed: Vec<_> = records("   {\"EAN\":\"1\"}   \n\t{\"EAN\":\"2\"}").collect();
        assert_eq!(parsed.len(), 2);
    }
}
