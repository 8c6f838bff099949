mod escape;
mod markdown;

use crate::document::Document;
use crate::Result;

pub use escape::{escape_html_attr, escape_link_destination, escape_link_text};
pub use markdown::MarkdownRenderer;

/// Final output stage of the conversion pipeline.
pub trait Renderer {
    fn render(&self, document: &Document) -> Result<String>;
}
