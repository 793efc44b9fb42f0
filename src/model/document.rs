//! Document-level types.

use super::{LinkTarget, Paragraph, Resource, Table};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

/// A generated report, ready to be rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportDocument {
    /// Document metadata (title, creator, etc.)
    pub metadata: Metadata,

    /// Body content in document order
    pub blocks: Vec<Block>,

    /// Embedded resources (images), keyed by resource ID
    pub resources: BTreeMap<String, Resource>,
}

impl ReportDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self {
            metadata: Metadata::default(),
            blocks: Vec::new(),
            resources: BTreeMap::new(),
        }
    }

    /// Add a paragraph.
    pub fn add_paragraph(&mut self, paragraph: Paragraph) {
        self.blocks.push(Block::Paragraph(paragraph));
    }

    /// Add a table.
    pub fn add_table(&mut self, table: Table) {
        self.blocks.push(Block::Table(table));
    }

    /// Add a manual page break.
    pub fn add_page_break(&mut self) {
        self.blocks.push(Block::PageBreak);
    }

    /// Add a resource to the document.
    pub fn add_resource(&mut self, id: impl Into<String>, resource: Resource) {
        self.resources.insert(id.into(), resource);
    }

    /// Get a resource by ID.
    pub fn get_resource(&self, id: &str) -> Option<&Resource> {
        self.resources.get(id)
    }

    /// Check if the document has any content.
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over every paragraph, including those inside tables.
    pub fn paragraphs(&self) -> impl Iterator<Item = &Paragraph> {
        self.blocks.iter().flat_map(|block| -> Box<dyn Iterator<Item = &Paragraph> + '_> {
            match block {
                Block::Paragraph(p) => Box::new(std::iter::once(p)),
                Block::Table(t) => Box::new(t.paragraphs()),
                Block::PageBreak => Box::new(std::iter::empty()),
            }
        })
    }

    /// Link anchors that name no bookmark in the document.
    pub fn dangling_anchors(&self) -> Vec<&str> {
        let bookmarks: HashSet<&str> = self.paragraphs().flat_map(|p| p.bookmarks()).collect();
        self.paragraphs()
            .flat_map(|p| p.links())
            .filter_map(|target| match target {
                LinkTarget::Anchor(name) if !bookmarks.contains(name.as_str()) => {
                    Some(name.as_str())
                }
                _ => None,
            })
            .collect()
    }

    /// Get plain text content of the entire document.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.blocks
            .iter()
            .filter_map(|block| match block {
                Block::Paragraph(p) => Some(p.plain_text()),
                Block::Table(t) => Some(t.plain_text()),
                Block::PageBreak => None,
            })
            .collect::<Vec<_>>()
            .join("\n\n")
    }
}

impl Default for ReportDocument {
    fn default() -> Self {
        Self::new()
    }
}

/// Document metadata, written to the package core properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Metadata {
    /// Document title
    pub title: Option<String>,

    /// Document subject
    pub subject: Option<String>,

    /// Creator application
    pub creator: Option<String>,

    /// Creation date
    pub created: Option<DateTime<Utc>>,
}

/// A top-level content block.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Block {
    /// A paragraph of text
    Paragraph(Paragraph),

    /// A table
    Table(Table),

    /// A manual page break
    PageBreak,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{TableCell, TableRow, TextRun};

    #[test]
    fn test_document_new() {
        let doc = ReportDocument::new();
        assert!(doc.is_empty());
        assert!(doc.dangling_anchors().is_empty());
    }

    #[test]
    fn test_paragraphs_include_table_cells() {
        let mut doc = ReportDocument::new();
        doc.add_paragraph(Paragraph::with_text("INDEX"));
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![TableCell::text("a"), TableCell::text("b")]));
        doc.add_table(table);
        doc.add_page_break();

        assert_eq!(doc.paragraphs().count(), 3);
        assert_eq!(doc.plain_text(), "INDEX\n\na\tb");
    }

    #[test]
    fn test_dangling_anchors() {
        let mut doc = ReportDocument::new();
        let mut heading = Paragraph::with_text("INDEX");
        heading.wrap_in_bookmark(0, "index");
        doc.add_paragraph(heading);

        let mut links = Paragraph::new();
        links.add_link(TextRun::new("<<INDEX"), LinkTarget::Anchor("index".into()));
        links.add_link(TextRun::new("Marine"), LinkTarget::Anchor("cat_fp_marine".into()));
        links.add_link(
            TextRun::new("PDF"),
            LinkTarget::External("https://example.com/doc".into()),
        );
        let mut table = Table::new();
        table.add_row(TableRow::new(vec![TableCell::paragraph(links)]));
        doc.add_table(table);

        assert_eq!(doc.dangling_anchors(), vec!["cat_fp_marine"]);
    }
}
