use super::BlockExtractor;
use crate::converter::{ConversionContext, ParagraphConverter, TableConverter};
use crate::document::{Block, Document};
use crate::render::escape_html_attr;
use crate::Result;
use rs_docx::document::BodyContent;

/// Default extractor: paragraphs, tables, content controls and bookmarks.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocxReader;

impl BlockExtractor for DocxReader {
    fn extract<'a>(
        &self,
        body: &[BodyContent<'a>],
        context: &mut ConversionContext<'a>,
    ) -> Result<Document> {
        let mut document = Document::default();
        for content in body {
            self.read_content(content, context, &mut document)?;
        }
        Ok(document)
    }
}

impl DocxReader {
    fn read_content<'a>(
        &self,
        content: &BodyContent<'a>,
        context: &mut ConversionContext<'a>,
        document: &mut Document,
    ) -> Result<()> {
        match content {
            BodyContent::Paragraph(para) => {
                let converted = ParagraphConverter::convert(para, context)?;
                if !converted.is_empty() {
                    document.blocks.push(Block::Paragraph(converted));
                }
            }
            BodyContent::Table(table) => {
                let converted = TableConverter::convert(table, context)?;
                document.blocks.push(Block::Table(converted));
            }
            BodyContent::Sdt(sdt) => {
                if let Some(sdt_content) = &sdt.content {
                    for child in &sdt_content.content {
                        self.read_content(child, context, document)?;
                    }
                }
            }
            BodyContent::BookmarkStart(bookmark) => {
                if let Some(name) = &bookmark.name {
                    document.blocks.push(Block::Anchor(format!(
                        "<a id=\"{}\"></a>",
                        escape_html_attr(name)
                    )));
                }
            }
            _ => {}
        }
        Ok(())
    }
}
