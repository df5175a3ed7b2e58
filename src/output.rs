//! Rendering results for humans or as JSON lines.

use crate::session::Session;
use bezglutena_catalog::{Match, MatchedBy, Product};
use serde_json::{Value, json};
use std::io::{self, Write};
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Output {
    json: bool,
}

impl Output {
    pub fn new(json: bool) -> Self {
        Self { json }
    }

    /// One lookup result: the product, or a miss.
    pub fn lookup(&self, w: &mut impl Write, code: &str, found: Option<Match<'_>>) -> io::Result<()> {
        if self.json {
            let line = match found {
                Some(found) => json!({
                    "code": code,
                    "found": true,
                    "matched_by": matched_by(found.matched_by),
                    "product": found.product,
                }),
                None => json!({ "code": code, "found": false }),
            };
            return writeln!(w, "{line}");
        }
        let Some(found) = found else {
            return writeln!(w, "{}: not found", code.trim());
        };
        self::product(w, found.product)
    }

    pub fn stats(&self, w: &mut impl Write, session: &Session) -> io::Result<()> {
        let report = session.report();
        if self.json {
            let line = json!({
                "source": session.source(),
                "loaded": session.load_error().is_none(),
                "lines": report.parse.lines,
                "malformed": report.parse.malformed,
                "not_objects": report.parse.not_objects,
                "without_ean": report.without_ean,
                "indexed": report.indexed,
            });
            return writeln!(w, "{line}");
        }
        writeln!(w, "Source:           {}", session.source())?;
        writeln!(w, "Lines:            {}", report.parse.lines)?;
        writeln!(w, "Malformed:        {}", report.parse.malformed)?;
        writeln!(w, "Not objects:      {}", report.parse.not_objects)?;
        writeln!(w, "Without EAN:      {}", report.without_ean)?;
        writeln!(w, "Indexed products: {}", report.indexed)
    }

    pub fn scraped(&self, w: &mut impl Write, report: &bezglutena_scrape::Report, path: &Path) -> io::Result<()> {
        if self.json {
            let line = json!({
                "output": path.display().to_string(),
                "categories": report.categories,
                "products": report.products,
                "written": report.written,
                "failed": report.failed,
            });
            return writeln!(w, "{line}");
        }
        writeln!(
            w,
            "Wrote {} of {} products from {} categories to {} ({} failed)",
            report.written,
            report.products,
            report.categories,
            path.display(),
            report.failed
        )
    }
}

fn matched_by(matched_by: MatchedBy) -> &'static str {
    match matched_by {
        MatchedBy::Normalized => "normalized",
        MatchedBy::Raw => "raw",
    }
}

fn product(w: &mut impl Write, product: &Product) -> io::Result<()> {
    writeln!(w, "{}", product.title.as_deref().unwrap_or("(untitled product)"))?;
    if let Some(details) = &product.details {
        for (key, value) in details {
            if let Some(value) = self::detail_text(value) {
                writeln!(w, "  {key}: {value}")?;
            }
        }
    }
    if let Some(description) = &product.short_description {
        for line in description.lines().filter(|line| !line.trim().is_empty()) {
            writeln!(w, "  | {}", line.trim())?;
        }
    }
    if let Some(url) = &product.url {
        writeln!(w, "  {url}")?;
    }
    Ok(())
}

/// Details are free-form; anything that isn't readable as a line of text is
/// left out of the human output.
fn detail_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.trim().to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => {
            let items: Vec<_> = items.iter().filter_map(self::detail_text).collect();
            (!items.is_empty()).then(|| items.join("; "))
        },
        _ => None,
    }
}
