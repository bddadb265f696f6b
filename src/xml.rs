//! Reading and writing arrangement XML files.
//!
//! Raw XML == [`decode`] ==> [`Arrangement`] == [`encode`] ==> Raw XML
//!
//! Round trips are faithful: decoding the output of [`encode`] gives back an equal [`Arrangement`]. With [`WriteMode::Abridged`], attributes equal to their documented default are omitted, and decoding restores the defaults.
//!
//! Collections carry a `count` attribute which must match the number of their children. Elements this module does not know are skipped.

mod read;
mod write;

use std::{ops::Range, path::Path};

use thiserror::Error;

use crate::model::Arrangement;

/// How [`encode`] writes attributes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WriteMode {
    /// Every attribute is written.
    #[default]
    Full,
    /// Attributes equal to their default value are omitted.
    Abridged,
}

/// An error which makes a file unusable as an arrangement.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum LoadError {
    /// The source is not UTF-8.
    #[error("the file is not valid UTF-8: {0}")]
    Utf8(#[from] std::str::Utf8Error),
    /// The source is not well-formed XML.
    #[error("malformed XML: {0}")]
    Xml(#[from] roxmltree::Error),
    /// The root element is not `song`.
    #[error("expected root element `song` but found `{0}`")]
    UnexpectedRoot(String),
    /// A tag required for any arrangement is missing.
    #[error("missing required tag `{0}`")]
    MissingTag(&'static str),
    /// An attribute required by the element is missing.
    #[error("missing attribute `{attribute}` on `{element}`")]
    MissingAttribute {
        /// Name of the element.
        element: String,
        /// Name of the missing attribute.
        attribute: &'static str,
        /// Byte range of the element in the source.
        range: Range<usize>,
    },
    /// An attribute or text value could not be parsed.
    #[error("invalid value `{value}` for `{attribute}` on `{element}`")]
    InvalidValue {
        /// Name of the element.
        element: String,
        /// Name of the attribute, `#text` for the text content.
        attribute: String,
        /// The value found.
        value: String,
        /// Byte range of the element in the source.
        range: Range<usize>,
    },
    /// A collection declares a different number of children than it has.
    #[error("`{element}` declares {expected} children but contains {actual}")]
    CountMismatch {
        /// Name of the collection element.
        element: String,
        /// The declared count.
        expected: usize,
        /// The number of children found.
        actual: usize,
        /// Byte range of the element in the source.
        range: Range<usize>,
    },
    /// The file could not be read.
    #[error("failed to read the file: {0}")]
    Io(#[from] std::io::Error),
}

impl LoadError {
    /// Byte range of the offending element in the source, when known.
    #[must_use]
    pub fn range(&self) -> Option<Range<usize>> {
        match self {
            Self::MissingAttribute { range, .. }
            | Self::InvalidValue { range, .. }
            | Self::CountMismatch { range, .. } => Some(range.clone()),
            _ => None,
        }
    }
}

/// Decodes an arrangement from the bytes of a file.
///
/// # Errors
///
/// Returns [`LoadError`] if the bytes are not an arrangement.
pub fn decode(bytes: &[u8]) -> Result<Arrangement, LoadError> {
    decode_str(std::str::from_utf8(bytes)?)
}

/// Decodes an arrangement from source text.
///
/// # Errors
///
/// Returns [`LoadError`] if the text is not an arrangement.
pub fn decode_str(source: &str) -> Result<Arrangement, LoadError> {
    let source = source.strip_prefix('\u{feff}').unwrap_or(source);
    let document = roxmltree::Document::parse(source)?;
    read::read_arrangement(document.root_element())
}

/// Encodes an arrangement into source text.
#[must_use]
pub fn encode_to_string(arrangement: &Arrangement, mode: WriteMode) -> String {
    write::write_arrangement(arrangement, mode)
}

/// Encodes an arrangement into the bytes of a file.
#[must_use]
pub fn encode(arrangement: &Arrangement, mode: WriteMode) -> Vec<u8> {
    encode_to_string(arrangement, mode).into_bytes()
}

/// Loads an arrangement from a file.
///
/// # Errors
///
/// Returns [`LoadError`] if the file cannot be read or is not an arrangement.
pub fn load(path: impl AsRef<Path>) -> Result<Arrangement, LoadError> {
    decode(&std::fs::read(path)?)
}

/// Saves an arrangement into a file.
///
/// # Errors
///
/// Returns the I/O error of writing the file.
pub fn save(
    arrangement: &Arrangement,
    path: impl AsRef<Path>,
    mode: WriteMode,
) -> std::io::Result<()> {
    std::fs::write(path, encode(arrangement, mode))
}
