//! Error types for docxdown.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for docxdown operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while turning a DOCX package into Markdown.
#[derive(Error, Debug)]
pub enum Error {
    /// The input path does not exist.
    #[error("Input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The package could not be parsed as a DOCX document.
    #[error("Failed to parse DOCX file: {0}")]
    DocxParse(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// A relationship pointed at a media part that is absent from the archive.
    #[error("Media not found: {0}")]
    MediaNotFound(String),

    /// Footnote, endnote or comment references without a definition.
    /// Only raised under strict reference validation.
    #[error("Missing reference: {0}")]
    MissingReference(String),

    #[error("Conversion error: {0}")]
    Conversion(String),
}

impl Error {
    pub(crate) fn parse<E: std::fmt::Debug>(err: E) -> Self {
        Self::DocxParse(format!("{:?}", err))
    }
}
