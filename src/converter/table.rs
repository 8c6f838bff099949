//! Table converter - converts tables to HTML with merge support.

use super::grid::CellGrid;
use super::{ConversionContext, ParagraphConverter};
use crate::Result;
use rs_docx::document::{Table, TableCell, TableCellContent};

/// Converter for Table elements.
pub struct TableConverter;

impl TableConverter {
    /// Converts a Table to an HTML `<table>`.
    pub fn convert<'a>(table: &Table<'a>, context: &mut ConversionContext<'a>) -> Result<String> {
        let grid = CellGrid::build(table, |cell| Self::convert_cell(cell, context))?;
        Ok(grid.to_html())
    }

    fn convert_cell<'a>(cell: &TableCell<'a>, context: &mut ConversionContext<'a>) -> Result<String> {
        let mut parts: Vec<String> = Vec::new();
        for item in &cell.content {
            match item {
                TableCellContent::Paragraph(para) => {
                    let converted = ParagraphConverter::convert(para, context)?;
                    if !converted.is_empty() {
                        parts.push(converted);
                    }
                }
                TableCellContent::Table(nested) => parts.push(Self::convert(nested, context)?),
            }
        }
        Ok(parts.join("<br/>"))
    }
}
