//! Converter modules for DOCX to Markdown transformation.

mod context;
mod grid;
mod inline;
mod media;
mod notes;
mod numbering;
mod paragraph;
mod styles;
mod table;

use crate::reader::{BlockExtractor, DocxReader};
use crate::render::{MarkdownRenderer, Renderer};
use crate::{error::Error, ConvertOptions, Result};
use rs_docx::{Docx, DocxFile};
use std::io::Cursor;
use std::path::Path;
use tracing::debug;

pub use self::context::ConversionContext;
pub use self::media::MediaExtractor;
pub use self::notes::NoteRegistry;
pub use self::numbering::ListTracker;
pub use self::paragraph::ParagraphConverter;
pub use self::styles::StyleSheet;
pub use self::table::TableConverter;

/// Main converter struct that orchestrates DOCX to Markdown conversion.
///
/// Block extraction and output rendering are pluggable through `E` and `R`.
pub struct DocxToMarkdown<E = DocxReader, R = MarkdownRenderer> {
    options: ConvertOptions,
    extractor: E,
    renderer: R,
}

impl DocxToMarkdown<DocxReader, MarkdownRenderer> {
    /// Creates a new converter with the given options.
    pub fn new(options: ConvertOptions) -> Self {
        Self::with_components(options, DocxReader, MarkdownRenderer)
    }

    /// Creates a new converter with default options.
    pub fn with_defaults() -> Self {
        Self::new(ConvertOptions::default())
    }
}

impl<E, R> DocxToMarkdown<E, R>
where
    E: BlockExtractor,
    R: Renderer,
{
    /// Creates a converter with custom extraction and rendering stages.
    pub fn with_components(options: ConvertOptions, extractor: E, renderer: R) -> Self {
        Self {
            options,
            extractor,
            renderer,
        }
    }

    /// Converts a DOCX file to Markdown.
    ///
    /// Fails with [`Error::InputNotFound`] before any parsing when `path`
    /// does not exist.
    pub fn convert<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        let path = path.as_ref();
        if !path.exists() {
            return Err(Error::InputNotFound(path.to_path_buf()));
        }
        debug!(path = %path.display(), "parsing docx package");

        let docx_file = DocxFile::from_file(path).map_err(Error::parse)?;
        let docx = docx_file.parse().map_err(Error::parse)?;
        let media = MediaExtractor::from_file(path, &self.options.image_handling)?;

        self.convert_document(&docx, media)
    }

    /// Converts an in-memory DOCX package to Markdown.
    pub fn convert_bytes(&self, bytes: &[u8]) -> Result<String> {
        debug!(bytes = bytes.len(), "parsing docx package from memory");

        let docx_file = DocxFile::from_reader(Cursor::new(bytes)).map_err(Error::parse)?;
        let docx = docx_file.parse().map_err(Error::parse)?;
        let media = MediaExtractor::from_bytes(bytes, &self.options.image_handling)?;

        self.convert_document(&docx, media)
    }

    fn convert_document<'a>(&'a self, docx: &'a Docx<'a>, media: MediaExtractor) -> Result<String> {
        let mut context = ConversionContext::new(docx, &self.options, media);

        let mut document = self
            .extractor
            .extract(&docx.document.body.content, &mut context)?;
        document.notes = context.note_definitions();
        debug!(
            blocks = document.blocks.len(),
            footnotes = document.notes.footnotes.len(),
            endnotes = document.notes.endnotes.len(),
            comments = document.notes.comments.len(),
            "extracted document"
        );

        let missing = context.take_missing_references();
        if self.options.strict_reference_validation && !missing.is_empty() {
            return Err(Error::MissingReference(missing.join(", ")));
        }

        self.renderer.render(&document)
    }
}
