//! Block extraction - walks the document body into a [`Document`].

mod docx;

use crate::converter::ConversionContext;
use crate::document::Document;
use crate::Result;
use rs_docx::document::BodyContent;

pub use docx::DocxReader;

pub trait BlockExtractor {
    fn extract<'a>(
        &self,
        body: &[BodyContent<'a>],
        context: &mut ConversionContext<'a>,
    ) -> Result<Document>;
}
