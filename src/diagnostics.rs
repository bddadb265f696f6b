//! Fancy diagnostics of load errors using `ariadne`.
//!
//! [`LoadError`] carries the byte range of the offending element where it is known, and the XML parser reports a row and a column. This module turns both into an `ariadne::Report` pointing into the source text.
//!
//! # Usage Example
//!
//! ```rust
//! use ddc_improver::{diagnostics::emit_load_error, xml::decode_str};
//!
//! let source = r#"<song version="7"><title>T</title></song>"#;
//! if let Err(error) = decode_str(source) {
//!     emit_load_error("lead.xml", source, &error);
//! }
//! ```

use std::ops::Range;

use ariadne::{Color, Label, Report, ReportKind, Source};

use crate::xml::LoadError;

/// Simple source container that holds the filename and source text.
pub struct SimpleSource<'a> {
    name: &'a str,
    text: &'a str,
}

impl<'a> SimpleSource<'a> {
    /// Creates a new source container.
    #[must_use]
    pub const fn new(name: &'a str, text: &'a str) -> Self {
        Self { name, text }
    }

    /// Source text content.
    #[must_use]
    pub const fn text(&self) -> &'a str {
        self.text
    }

    /// Source file name.
    #[must_use]
    pub const fn name(&self) -> &'a str {
        self.name
    }

    /// Byte offset of a 1-based row and column, clamped to the text.
    #[must_use]
    pub fn offset_of(&self, row: u32, col: u32) -> usize {
        let line_start: usize = self
            .text
            .split_inclusive('\n')
            .take(row.saturating_sub(1) as usize)
            .map(str::len)
            .sum();
        let line = &self.text[line_start..];
        let column: usize = line
            .chars()
            .take(col.saturating_sub(1) as usize)
            .map(char::len_utf8)
            .sum();
        line_start + column
    }
}

/// Trait for converting positioned errors to `ariadne::Report`.
pub trait ToAriadne {
    /// Converts the error into a report on `src`.
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)>;
}

/// Builds a report with one label.
#[must_use]
pub fn build_report<'a>(
    src: &SimpleSource<'a>,
    kind: ReportKind<'a>,
    range: Range<usize>,
    title: &str,
    label_message: impl ToString,
    color: Color,
) -> Report<'a, (String, Range<usize>)> {
    let filename = src.name().to_string();
    Report::build(kind, (filename.clone(), range.clone()))
        .with_message(title)
        .with_label(
            Label::new((filename, range))
                .with_message(label_message.to_string())
                .with_color(color),
        )
        .finish()
}

impl ToAriadne for LoadError {
    fn to_report<'a>(&self, src: &SimpleSource<'a>) -> Report<'a, (String, Range<usize>)> {
        let range = match self {
            Self::Xml(error) => {
                let pos = error.pos();
                let offset = src.offset_of(pos.row, pos.col);
                offset..offset
            }
            _ => self.range().unwrap_or(0..0),
        };
        build_report(
            src,
            ReportKind::Error,
            range,
            "Failed to load the arrangement",
            self,
            Color::Red,
        )
    }
}

/// Prints `error` as a report on `source` to stderr.
pub fn emit_load_error(name: &str, source: &str, error: &LoadError) {
    let simple = SimpleSource::new(name, source);
    let report = error.to_report(&simple);
    let _ = report.eprint((name.to_string(), Source::from(source)));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn offsets_of_rows_and_columns() {
        let source = SimpleSource::new("a.xml", "<a>\n  <b/>\n</a>");
        assert_eq!(source.offset_of(1, 1), 0);
        assert_eq!(source.offset_of(2, 3), 6);
        assert_eq!(source.offset_of(3, 1), 11);
    }
}
