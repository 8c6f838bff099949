//! # docxdown
//!
//! DOCX to Markdown conversion on top of `rs_docx`.
//!
//! ## Example
//!
//! ```no_run
//! use docxdown::{ConvertOptions, DocxToMarkdown, ImageHandling};
//!
//! let options = ConvertOptions {
//!     image_handling: ImageHandling::SaveToDir("./images".into()),
//!     ..Default::default()
//! };
//!
//! let converter = DocxToMarkdown::new(options);
//! let markdown = converter.convert("document.docx").unwrap();
//! println!("{}", markdown);
//! ```
//!
//! For the common case there is a one-call helper:
//!
//! ```no_run
//! let markdown = docxdown::convert_docx("document.docx").unwrap();
//! ```

pub mod converter;
pub mod document;
pub mod error;
pub mod localization;
pub mod reader;
pub mod render;

pub use converter::DocxToMarkdown;
pub use error::{Error, Result};
pub use localization::{DefaultLocalization, KoreanLocalization, LocalizationStrategy};

use std::path::{Path, PathBuf};

/// Options for DOCX to Markdown conversion.
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// How to handle images in the document.
    pub image_handling: ImageHandling,
    /// Keep leading/trailing paragraph whitespace instead of trimming it.
    pub preserve_whitespace: bool,
    /// Render underlined text with `<u>`.
    pub html_underline: bool,
    /// Render strikethrough with `<s>` instead of `~~`.
    pub html_strikethrough: bool,
    /// Fail when a footnote, endnote or comment reference has no definition.
    pub strict_reference_validation: bool,
    /// Language conventions for headings and numbering.
    pub language: Language,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            image_handling: ImageHandling::Inline,
            preserve_whitespace: false,
            html_underline: true,
            html_strikethrough: false,
            strict_reference_validation: false,
            language: Language::Default,
        }
    }
}

/// Specifies how images should be handled during conversion.
#[derive(Debug, Clone)]
pub enum ImageHandling {
    /// Save images to a directory and reference them by path.
    SaveToDir(PathBuf),
    /// Embed images as base64 data URIs.
    Inline,
    /// Skip images entirely.
    Skip,
}

/// Language conventions applied while converting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Language {
    #[default]
    Default,
    /// Korean documents: `제목 N` heading styles and `제N조` article numbering.
    Korean,
}

impl Language {
    pub(crate) fn strategy(self) -> &'static dyn LocalizationStrategy {
        match self {
            Language::Default => &DefaultLocalization,
            Language::Korean => &KoreanLocalization,
        }
    }
}

/// Converts the DOCX file at `path` to Markdown using default options.
pub fn convert_docx<P: AsRef<Path>>(path: P) -> Result<String> {
    DocxToMarkdown::with_defaults().convert(path)
}

/// Converts an in-memory DOCX package to Markdown using default options.
pub fn convert_docx_bytes(bytes: &[u8]) -> Result<String> {
    DocxToMarkdown::with_defaults().convert_bytes(bytes)
}

// Python bindings (only when 'python' feature is enabled)
#[cfg(feature = "python")]
mod python_bindings {
    use pyo3::prelude::*;

    /// Converts a DOCX file to Markdown.
    #[pyfunction]
    fn convert_docx(path: String) -> PyResult<String> {
        super::convert_docx(&path)
            .map_err(|e| PyErr::new::<pyo3::exceptions::PyRuntimeError, _>(e.to_string()))
    }

    #[pymodule]
    pub fn docxdown(m: &Bound<'_, PyModule>) -> PyResult<()> {
        m.add_function(wrap_pyfunction!(convert_docx, m)?)?;
        Ok(())
    }
}
