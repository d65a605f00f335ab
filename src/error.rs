//! Error types for the docsift library.

use std::io;
use thiserror::Error;

/// Result type alias for docsift operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while extracting or ranking documents.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The input is not recognized as a PDF.
    #[error("Unknown file format: not a valid PDF")]
    UnknownFormat,

    /// Error parsing PDF structure.
    #[error("PDF parsing error: {0}")]
    PdfParse(String),

    /// Page number is out of range.
    #[error("Page {0} is out of range (document has {1} pages)")]
    PageOutOfRange(u32, u32),

    /// Error extracting text content from a page.
    #[error("Text extraction error: {0}")]
    TextExtract(String),

    /// Error extracting table grids from a page.
    #[error("Table extraction error: {0}")]
    TableExtract(String),

    /// A record failed constructor-time validation.
    #[error("Invalid {kind}: {reason}")]
    InvalidRecord {
        /// Record type name (e.g. "span").
        kind: &'static str,
        /// What was wrong with it.
        reason: String,
    },

    /// Outline cache failure.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Configuration could not be used.
    #[error("Configuration error: {0}")]
    Config(String),

    /// JSON (de)serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Error during rendering.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl Error {
    /// Shorthand for an [`Error::InvalidRecord`].
    pub fn invalid(kind: &'static str, reason: impl Into<String>) -> Self {
        Error::InvalidRecord {
            kind,
            reason: reason.into(),
        }
    }
}

impl From<lopdf::Error> for Error {
    fn from(err: lopdf::Error) -> Self {
        match err {
            lopdf::Error::IO(e) => Error::Io(e),
            _ => Error::PdfParse(err.to_string()),
        }
    }
}
