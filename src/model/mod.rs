//! Data model types.
//!
//! Two halves live here: the typed records read from the workbook, and the
//! format-agnostic report tree that the builder produces and the renderers
//! consume.

mod document;
mod paragraph;
mod record;
mod resource;
mod table;
mod value;
mod workbook;

pub use document::{Block, Metadata, ReportDocument};
pub use paragraph::{
    Alignment, InlineContent, LinkTarget, Paragraph, ParagraphStyle, TextRun, TextStyle,
};
pub use record::{Field, Record, RecordKind};
pub use resource::Resource;
pub use table::{HeightRule, Table, TableCell, TableRow, VerticalAlignment};
pub use value::{CellValue, DATE_DISPLAY_FORMAT};
pub use workbook::{ImageIndex, PatentWorkbook};
