//! Table types.

use super::{Alignment, Paragraph};
use serde::{Deserialize, Serialize};

/// A table structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table
    pub rows: Vec<TableRow>,

    /// Column widths in inches
    pub column_widths: Vec<f32>,

    /// Horizontal placement of the table
    pub alignment: Alignment,

    /// Draw single borders around every cell
    pub borders: bool,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self {
            rows: Vec::new(),
            column_widths: Vec::new(),
            alignment: Alignment::Left,
            borders: true,
        }
    }

    /// Create an empty table with fixed column widths.
    pub fn with_widths(widths: impl Into<Vec<f32>>) -> Self {
        Self {
            column_widths: widths.into(),
            ..Self::new()
        }
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of grid columns.
    pub fn column_count(&self) -> usize {
        if !self.column_widths.is_empty() {
            return self.column_widths.len();
        }
        self.rows
            .iter()
            .map(TableRow::grid_span)
            .max()
            .unwrap_or(0)
    }

    /// Get plain text representation of the table.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.rows
            .iter()
            .map(|row| row.plain_text())
            .collect::<Vec<_>>()
            .join("\n")
    }

    /// Iterate over every paragraph in the table.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.rows
            .iter()
            .flat_map(|r| &r.cells)
            .flat_map(|c| &c.content)
    }
}

impl Default for Table {
    fn default() -> Self {
        Self::new()
    }
}

/// How a row height is enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeightRule {
    /// Exactly the given height
    Exact,
    /// At least the given height
    AtLeast,
}

/// A table row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row
    pub cells: Vec<TableCell>,

    /// Whether this is a header row (repeated on each page)
    pub is_header: bool,

    /// Row height in inches and its rule
    pub height: Option<(f32, HeightRule)>,

    /// Keep the row on a single page
    pub cant_split: bool,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<TableCell>) -> Self {
        Self {
            cells,
            is_header: false,
            height: None,
            cant_split: false,
        }
    }

    /// Create a header row.
    pub fn header(cells: Vec<TableCell>) -> Self {
        Self {
            is_header: true,
            ..Self::new(cells)
        }
    }

    /// Set the height and rule and return self.
    pub fn height(mut self, inches: f32, rule: HeightRule) -> Self {
        self.height = Some((inches, rule));
        self
    }

    /// Prevent the row from breaking across pages.
    pub fn cant_split(mut self) -> Self {
        self.cant_split = true;
        self
    }

    /// Number of grid columns the row covers.
    pub fn grid_span(&self) -> usize {
        self.cells.iter().map(|c| c.colspan as usize).sum()
    }

    /// Get plain text representation.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.cells
            .iter()
            .map(|c| c.plain_text())
            .collect::<Vec<_>>()
            .join("\t")
    }
}

/// A table cell.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableCell {
    /// Cell content (paragraphs)
    pub content: Vec<Paragraph>,

    /// Number of columns this cell spans
    pub colspan: u8,

    /// Vertical alignment
    pub vertical_alignment: VerticalAlignment,
}

impl TableCell {
    /// Create a new cell with text content.
    pub fn text(text: impl Into<String>) -> Self {
        Self::with_content(vec![Paragraph::with_text(text)])
    }

    /// Create a cell with a single paragraph.
    pub fn paragraph(paragraph: Paragraph) -> Self {
        Self::with_content(vec![paragraph])
    }

    /// Create an empty cell.
    pub fn empty() -> Self {
        Self::with_content(Vec::new())
    }

    /// Create a cell with multiple paragraphs.
    pub fn with_content(content: Vec<Paragraph>) -> Self {
        Self {
            content,
            colspan: 1,
            vertical_alignment: VerticalAlignment::Top,
        }
    }

    /// Set colspan and return self.
    pub fn colspan(mut self, span: u8) -> Self {
        self.colspan = span.max(1);
        self
    }

    /// Span `columns` grid columns, saturating at `u8::MAX`.
    pub fn span(self, columns: usize) -> Self {
        self.colspan(u8::try_from(columns).unwrap_or(u8::MAX))
    }

    /// Set vertical alignment and return self.
    pub fn valign(mut self, alignment: VerticalAlignment) -> Self {
        self.vertical_alignment = alignment;
        self
    }

    /// Get plain text content.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|p| p.plain_text())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Vertical alignment for table cells.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VerticalAlignment {
    /// Top alignment
    #[default]
    Top,
    /// Middle/center alignment
    Middle,
    /// Bottom alignment
    Bottom,
}
