//! Footnote, endnote and comment reference bookkeeping.

use crate::document::NoteDefinitions;
use rs_docx::document::{BodyContent, Comments, EndNotes, FootNotes};
use std::collections::HashMap;
use tracing::warn;

/// Numbered notes (footnotes or endnotes) in first-reference order.
#[derive(Debug, Default)]
struct NoteSeries {
    /// Marker prefix inside `[^…]`.
    prefix: &'static str,
    kind: &'static str,
    bodies: HashMap<isize, String>,
    order: Vec<String>,
    index_by_id: HashMap<isize, usize>,
}

impl NoteSeries {
    fn new(prefix: &'static str, kind: &'static str, bodies: HashMap<isize, String>) -> Self {
        Self {
            prefix,
            kind,
            bodies,
            ..Default::default()
        }
    }

    fn reference(&mut self, id: isize, missing: &mut Vec<String>) -> String {
        let index = match self.index_by_id.get(&id) {
            Some(index) => *index,
            None => {
                let body = self.bodies.get(&id).cloned().unwrap_or_else(|| {
                    warn!(kind = self.kind, id, "reference without a definition");
                    missing.push(format!("{}:{}", self.kind, id));
                    String::new()
                });
                self.order.push(body);
                let index = self.order.len();
                self.index_by_id.insert(id, index);
                index
            }
        };
        format!("[^{}{}]", self.prefix, index)
    }
}

/// Tracks which notes and comments a document body references.
#[derive(Debug)]
pub struct NoteRegistry {
    footnotes: NoteSeries,
    endnotes: NoteSeries,
    comment_bodies: HashMap<String, String>,
    comments: Vec<(String, String)>,
    missing: Vec<String>,
}

fn note_text(content: &[BodyContent<'_>]) -> String {
    content
        .iter()
        .filter_map(|block| match block {
            BodyContent::Paragraph(p) => Some(p.text().to_string()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

impl Default for NoteRegistry {
    fn default() -> Self {
        Self::new(None, None, None)
    }
}

impl NoteRegistry {
    pub fn new(
        comments: Option<&Comments<'_>>,
        footnotes: Option<&FootNotes<'_>>,
        endnotes: Option<&EndNotes<'_>>,
    ) -> Self {
        let comment_bodies: HashMap<String, String> = comments
            .map(|c| {
                c.comments
                    .iter()
                    .filter_map(|comment| {
                        let id = comment.id?;
                        Some((id.to_string(), comment.content.text().to_string()))
                    })
                    .collect()
            })
            .unwrap_or_default();

        let footnote_bodies: HashMap<isize, String> = footnotes
            .map(|f| {
                f.content
                    .iter()
                    .filter_map(|note| Some((note.id?, note_text(&note.content))))
                    .collect()
            })
            .unwrap_or_default();

        let endnote_bodies: HashMap<isize, String> = endnotes
            .map(|e| {
                e.content
                    .iter()
                    .filter_map(|note| Some((note.id?, note_text(&note.content))))
                    .collect()
            })
            .unwrap_or_default();

        Self {
            footnotes: NoteSeries::new("", "footnote", footnote_bodies),
            endnotes: NoteSeries::new("en", "endnote", endnote_bodies),
            comment_bodies,
            comments: Vec::new(),
            missing: Vec::new(),
        }
    }

    /// Returns the `[^N]` marker for a footnote, registering it on first use.
    pub fn footnote(&mut self, id: isize) -> String {
        self.footnotes.reference(id, &mut self.missing)
    }

    /// Returns the `[^enN]` marker for an endnote, registering it on first use.
    pub fn endnote(&mut self, id: isize) -> String {
        self.endnotes.reference(id, &mut self.missing)
    }

    /// Returns the `[^cID]` marker for a comment, registering it on first use.
    pub fn comment(&mut self, id: &str) -> String {
        if !self.comments.iter().any(|(seen, _)| seen == id) {
            let body = self.comment_bodies.get(id).cloned().unwrap_or_else(|| {
                warn!(kind = "comment", id, "reference without a definition");
                self.missing.push(format!("comment:{}", id));
                String::new()
            });
            self.comments.push((id.to_string(), body));
        }
        format!("[^c{}]", id)
    }

    pub fn footnote_count(&self) -> usize {
        self.footnotes.order.len()
    }

    pub fn endnote_count(&self) -> usize {
        self.endnotes.order.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    pub fn definitions(&self) -> NoteDefinitions {
        NoteDefinitions {
            footnotes: self.footnotes.order.clone(),
            endnotes: self.endnotes.order.clone(),
            comments: self.comments.clone(),
        }
    }

    /// Drains the `kind:id` list of references that had no definition.
    pub fn take_missing(&mut self) -> Vec<String> {
        std::mem::take(&mut self.missing)
    }
}
