//! Logical cell grid for tables with horizontal and vertical merges.

use crate::Result;
use rs_docx::document::{Table, TableCell, TableRowContent};
use rs_docx::formatting::VMergeType;

#[derive(Clone, Debug, PartialEq)]
enum Slot {
    Master {
        content: String,
        rowspan: usize,
        colspan: usize,
    },
    /// Covered by a master to the left (`gridSpan`).
    SpannedLeft,
    /// Covered by a master above (`vMerge` continuation).
    SpannedUp,
    Empty,
}

/// Rows of grid slots, one per table grid column.
#[derive(Debug, Default)]
pub(crate) struct CellGrid {
    rows: Vec<Vec<Slot>>,
}

impl CellGrid {
    /// Lays out `table`, converting master cells with `convert_cell`.
    ///
    /// Continuation cells are never converted.
    pub fn build<'a, F>(table: &Table<'a>, mut convert_cell: F) -> Result<Self>
    where
        F: FnMut(&TableCell<'a>) -> Result<String>,
    {
        let mut grid = Self::default();

        for (row, table_row) in table.rows.iter().enumerate() {
            grid.rows.push(Vec::new());
            let mut col = 0;

            for entry in &table_row.cells {
                let TableRowContent::TableCell(cell) = entry else {
                    continue;
                };
                col = grid.next_free(row, col);

                let span = cell
                    .property
                    .grid_span
                    .as_ref()
                    .map(|g| g.val as usize)
                    .unwrap_or(1)
                    .max(1);
                let continues = cell
                    .property
                    .v_merge
                    .as_ref()
                    .is_some_and(|v| !matches!(v.val, Some(VMergeType::Restart)));

                if continues {
                    grid.extend_master_above(row, col);
                    for offset in 0..span {
                        grid.set(row, col + offset, Slot::SpannedUp);
                    }
                } else {
                    let content = convert_cell(cell)?;
                    grid.set(
                        row,
                        col,
                        Slot::Master {
                            content,
                            rowspan: 1,
                            colspan: span,
                        },
                    );
                    for offset in 1..span {
                        grid.set(row, col + offset, Slot::SpannedLeft);
                    }
                }

                col += span;
            }
        }

        Ok(grid)
    }

    fn next_free(&self, row: usize, mut col: usize) -> usize {
        let cells = &self.rows[row];
        while col < cells.len() && cells[col] != Slot::Empty {
            col += 1;
        }
        col
    }

    fn set(&mut self, row: usize, col: usize, slot: Slot) {
        let cells = &mut self.rows[row];
        if cells.len() <= col {
            cells.resize(col + 1, Slot::Empty);
        }
        cells[col] = slot;
    }

    fn slot(&self, row: usize, col: usize) -> Option<&Slot> {
        self.rows.get(row).and_then(|cells| cells.get(col))
    }

    /// Grows the rowspan of the master covering `(row - 1, col)`.
    fn extend_master_above(&mut self, row: usize, col: usize) {
        let mut target = row;
        while target > 0 {
            target -= 1;
            match self.slot(target, col) {
                Some(Slot::SpannedUp) => continue,
                Some(Slot::Master { .. }) => {
                    self.bump_rowspan(target, col);
                    return;
                }
                Some(Slot::SpannedLeft) => {
                    let master = (0..col)
                        .rev()
                        .find(|&c| !matches!(self.slot(target, c), Some(Slot::SpannedLeft)));
                    if let Some(master) = master {
                        if let Some(Slot::Master { colspan, .. }) = self.slot(target, master) {
                            if master + colspan > col {
                                self.bump_rowspan(target, master);
                            }
                        }
                    }
                    return;
                }
                Some(Slot::Empty) | None => return,
            }
        }
    }

    fn bump_rowspan(&mut self, row: usize, col: usize) {
        if let Some(Slot::Master { rowspan, .. }) = self.rows[row].get_mut(col) {
            *rowspan += 1;
        }
    }

    /// HTML table markup. Missing cells render as `<td></td>`.
    pub fn to_html(&self) -> String {
        let mut html = String::from("<table>\n");
        for cells in &self.rows {
            html.push_str("  <tr>\n");
            for slot in cells {
                match slot {
                    Slot::Master {
                        content,
                        rowspan,
                        colspan,
                    } => {
                        let mut attrs = String::new();
                        if *rowspan > 1 {
                            attrs.push_str(&format!(" rowspan=\"{}\"", rowspan));
                        }
                        if *colspan > 1 {
                            attrs.push_str(&format!(" colspan=\"{}\"", colspan));
                        }
                        html.push_str(&format!("    <td{}>{}</td>\n", attrs, content));
                    }
                    Slot::SpannedLeft | Slot::SpannedUp => {}
                    Slot::Empty => html.push_str("    <td></td>\n"),
                }
            }
            html.push_str("  </tr>\n");
        }
        html.push_str("</table>");
        html
    }
}
