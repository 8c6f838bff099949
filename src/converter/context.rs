use super::{ListTracker, MediaExtractor, NoteRegistry, StyleSheet};
use crate::document::NoteDefinitions;
use crate::localization::LocalizationStrategy;
use crate::{ConvertOptions, Result};
use rs_docx::document::{Drawing, Pict};
use rs_docx::formatting::{CharacterProperty, ParagraphProperty};
use rs_docx::Docx;
use std::collections::HashMap;

/// Mutable state shared by every converter during one document conversion.
pub struct ConversionContext<'a> {
    rels: HashMap<String, String>,
    styles: StyleSheet<'a>,
    lists: ListTracker,
    notes: NoteRegistry,
    media: MediaExtractor,
    options: &'a ConvertOptions,
    localization: &'static dyn LocalizationStrategy,
}

impl<'a> ConversionContext<'a> {
    pub fn new(docx: &'a Docx<'a>, options: &'a ConvertOptions, media: MediaExtractor) -> Self {
        let rels: HashMap<String, String> = docx
            .document_rels
            .as_ref()
            .map(|doc_rels| {
                doc_rels
                    .relationships
                    .iter()
                    .map(|rel| (rel.id.to_string(), rel.target.to_string()))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            rels,
            styles: StyleSheet::new(&docx.styles),
            lists: ListTracker::new(docx),
            notes: NoteRegistry::new(
                docx.comments.as_ref(),
                docx.footnotes.as_ref(),
                docx.endnotes.as_ref(),
            ),
            media,
            options,
            localization: options.language.strategy(),
        }
    }

    pub fn relationship_target(&self, id: &str) -> Option<&str> {
        self.rels.get(id).map(String::as_str)
    }

    pub fn drawing_image(&mut self, drawing: &Drawing) -> Result<Option<String>> {
        self.media.drawing_markup(drawing, &self.rels)
    }

    pub fn pict_image(&mut self, pict: &Pict) -> Result<Option<String>> {
        self.media.pict_markup(pict, &self.rels)
    }

    pub fn run_property(
        &self,
        direct: Option<&CharacterProperty<'a>>,
        run_style_id: Option<&str>,
        para_style_id: Option<&str>,
    ) -> CharacterProperty<'a> {
        self.styles.run_property(direct, run_style_id, para_style_id)
    }

    pub fn paragraph_property(
        &self,
        direct: Option<&ParagraphProperty<'a>>,
        para_style_id: Option<&str>,
    ) -> ParagraphProperty<'a> {
        self.styles.paragraph_property(direct, para_style_id)
    }

    pub fn next_list_marker(&mut self, num_id: i32, ilvl: i32) -> String {
        self.lists.next_marker(num_id, ilvl)
    }

    pub fn list_indent(&self, num_id: i32, ilvl: i32) -> usize {
        self.lists.indent(num_id, ilvl)
    }

    pub fn localization(&self) -> &'static dyn LocalizationStrategy {
        self.localization
    }

    pub fn notes(&mut self) -> &mut NoteRegistry {
        &mut self.notes
    }

    pub fn note_definitions(&self) -> NoteDefinitions {
        self.notes.definitions()
    }

    pub fn take_missing_references(&mut self) -> Vec<String> {
        self.notes.take_missing()
    }

    pub fn preserve_whitespace(&self) -> bool {
        self.options.preserve_whitespace
    }

    pub fn html_underline(&self) -> bool {
        self.options.html_underline
    }

    pub fn html_strikethrough(&self) -> bool {
        self.options.html_strikethrough
    }
}
