//! Intermediate document model produced by a [`crate::reader::BlockExtractor`]
//! and consumed by a [`crate::render::Renderer`].

#[derive(Debug, Clone, Default)]
pub struct Document {
    pub blocks: Vec<Block>,
    pub notes: NoteDefinitions,
}

/// A top-level block, already rendered to its final text.
#[derive(Debug, Clone, PartialEq)]
pub enum Block {
    Paragraph(String),
    /// HTML table markup.
    Table(String),
    /// Standalone `<a id>` anchor from a body-level bookmark.
    Anchor(String),
}

impl Block {
    pub fn text(&self) -> &str {
        match self {
            Block::Paragraph(text) | Block::Table(text) | Block::Anchor(text) => text,
        }
    }
}

/// Note and comment bodies in the order they were first referenced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NoteDefinitions {
    pub footnotes: Vec<String>,
    pub endnotes: Vec<String>,
    /// `(comment id, comment text)` pairs.
    pub comments: Vec<(String, String)>,
}

impl NoteDefinitions {
    pub fn is_empty(&self) -> bool {
        self.footnotes.is_empty() && self.endnotes.is_empty() && self.comments.is_empty()
    }
}
