use crate::document::{Document, NoteDefinitions};
use crate::render::Renderer;
use crate::Result;
use std::fmt::Write;

/// Joins blocks with blank lines and appends note definitions.
#[derive(Debug, Default, Clone, Copy)]
pub struct MarkdownRenderer;

impl MarkdownRenderer {
    fn write_notes(out: &mut String, notes: &NoteDefinitions) {
        out.push_str("---\n\n");
        for (i, text) in notes.footnotes.iter().enumerate() {
            let _ = writeln!(out, "[^{}]: {}", i + 1, text);
        }
        for (i, text) in notes.endnotes.iter().enumerate() {
            let _ = writeln!(out, "[^en{}]: {}", i + 1, text);
        }
        for (id, text) in &notes.comments {
            let _ = writeln!(out, "[^c{}]: {}", id, text);
        }
    }
}

impl Renderer for MarkdownRenderer {
    fn render(&self, document: &Document) -> Result<String> {
        let mut out = String::new();

        for block in document.blocks.iter().map(|b| b.text()) {
            if block.is_empty() {
                continue;
            }
            out.push_str(block);
            out.push_str("\n\n");
        }

        if !document.notes.is_empty() {
            Self::write_notes(&mut out, &document.notes);
        }

        Ok(out)
    }
}
