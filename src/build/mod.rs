//! Report building.
//!
//! [`ReportBuilder`] owns all mutable state of one generation pass: the
//! document being written, the page cursor, the bookmark registry and the
//! statistics. Parts are written in document order; each part after the
//! first starts on a new page.

mod bookmarks;
mod details;
mod style;
mod summary;
mod title;

pub use bookmarks::{sanitize_bookmark, BookmarkRegistry, INDEX_ANCHOR, MAX_BOOKMARK_LEN};
pub use details::{detail_height, estimate_detail_pages};
pub use style::Styler;

use crate::config::{ReportConfig, ReportPart};
use crate::fetch::ImageFetcher;
use crate::layout::{Estimator, PageBudget, PageCursor};
use crate::model::{
    LinkTarget, Metadata, Paragraph, PatentWorkbook, Record, RecordKind, ReportDocument, Table,
};
use crate::render::{GeneratedReport, ReportStats};
use chrono::Utc;

/// Anchor of a summary section heading.
pub fn section_anchor(kind: RecordKind) -> &'static str {
    match kind {
        RecordKind::FirstPublication => "first_publications",
        RecordKind::GrantedPatent => "granted_patents",
    }
}

type RecordCallback<'a> = Box<dyn FnMut(&Record) + 'a>;

/// Builds a [`ReportDocument`] from workbook records.
pub struct ReportBuilder<'a> {
    config: &'a ReportConfig,
    workbook: &'a PatentWorkbook,
    fetcher: &'a dyn ImageFetcher,
    styler: Styler<'a>,
    bookmarks: BookmarkRegistry,
    cursor: PageCursor,
    document: ReportDocument,
    stats: ReportStats,
    next_image: u32,
    on_record: Option<RecordCallback<'a>>,
}

impl<'a> ReportBuilder<'a> {
    /// Create a builder for one report.
    pub fn new(
        config: &'a ReportConfig,
        workbook: &'a PatentWorkbook,
        fetcher: &'a dyn ImageFetcher,
    ) -> Self {
        let estimator = Estimator::new(config.pagination.clone());
        let cursor = PageCursor::new(estimator, PageBudget::from_geometry(&config.page));

        let mut bookmarks = BookmarkRegistry::new();
        bookmarks.reserve(INDEX_ANCHOR);
        for kind in [RecordKind::FirstPublication, RecordKind::GrantedPatent] {
            bookmarks.reserve(section_anchor(kind));
        }

        Self {
            config,
            workbook,
            fetcher,
            styler: Styler::new(&config.style),
            bookmarks,
            cursor,
            document: ReportDocument::new(),
            stats: ReportStats::new(),
            next_image: 1,
            on_record: None,
        }
    }

    /// Call `callback` after each detail block is written.
    pub fn on_record(mut self, callback: impl FnMut(&Record) + 'a) -> Self {
        self.on_record = Some(Box::new(callback));
        self
    }

    /// Build the report.
    pub fn build(mut self) -> GeneratedReport {
        let workbook = self.workbook;
        self.stats.first_publications = workbook.first_publications.len() as u32;
        self.stats.granted_patents = workbook.granted_patents.len() as u32;

        for kind in [RecordKind::FirstPublication, RecordKind::GrantedPatent] {
            for record in workbook.records(kind) {
                self.bookmarks.assign_record(record);
                if !self
                    .config
                    .category_names()
                    .any(|name| record.matches_category(name))
                {
                    log::warn!(
                        "{} row {} ({}) matches no category",
                        kind,
                        record.row,
                        record.text(crate::model::Field::Number)
                    );
                    self.stats.uncategorized += 1;
                }
            }
        }

        for part in ReportPart::ALL {
            if !self.config.parts.includes(part) {
                continue;
            }
            if !self.document.is_empty() {
                self.document.add_page_break();
            }
            log::info!("Writing {}", part);
            match part {
                ReportPart::Title => self.write_title_page(),
                ReportPart::FirstPublicationIndex => self.write_summary(RecordKind::FirstPublication),
                ReportPart::GrantedIndex => self.write_summary(RecordKind::GrantedPatent),
                ReportPart::FirstPublicationDetails => {
                    self.write_details(RecordKind::FirstPublication)
                }
                ReportPart::GrantedDetails => self.write_details(RecordKind::GrantedPatent),
            }
        }

        for anchor in self.document.dangling_anchors() {
            log::warn!("Link to missing bookmark {}", anchor);
        }

        self.document.metadata = Metadata {
            title: Some(self.config.title.clone()),
            subject: Some("Patent watch report".to_string()),
            creator: Some(format!("patwatch {}", crate::VERSION)),
            created: Some(Utc::now()),
        };

        log::info!(
            "Report built: {} detail blocks, {} forced breaks, {} images ({} failed)",
            self.stats.detail_blocks,
            self.stats.forced_breaks,
            self.stats.images_embedded,
            self.stats.image_failures
        );
        GeneratedReport::new(self.document, self.stats)
    }

    fn emit_paragraph(&mut self, paragraph: Paragraph) {
        self.stats.add_paragraph();
        self.document.add_paragraph(paragraph);
    }

    fn emit_table(&mut self, table: Table) {
        self.stats.add_table();
        self.document.add_table(table);
    }

    fn bookmark(&mut self, mut paragraph: Paragraph, name: &str) -> Paragraph {
        let id = self.bookmarks.next_id();
        paragraph.wrap_in_bookmark(id, name);
        paragraph
    }

    /// Link target of the INDEX heading, when the title page is written.
    fn index_target(&self) -> Option<LinkTarget> {
        self.config
            .parts
            .includes(ReportPart::Title)
            .then(|| LinkTarget::Anchor(INDEX_ANCHOR.to_string()))
    }

    /// Link target of a summary heading, when that summary is written.
    fn section_target(&self, kind: RecordKind) -> Option<LinkTarget> {
        self.config
            .parts
            .includes(ReportPart::index_for(kind))
            .then(|| LinkTarget::Anchor(section_anchor(kind).to_string()))
    }

    /// Link target of a record's detail block, when details are written.
    fn record_target(&self, record: &Record) -> Option<LinkTarget> {
        if !self.config.parts.includes(ReportPart::details_for(record.kind)) {
            return None;
        }
        self.bookmarks
            .record_anchor(record)
            .map(|name| LinkTarget::Anchor(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PartSelection;
    use crate::fetch::DisabledFetcher;
    use crate::model::{Block, Field, InlineContent};
    use std::collections::HashSet;

    fn workbook() -> PatentWorkbook {
        let mut wb = PatentWorkbook::new();
        wb.first_publications.push(
            Record::new(RecordKind::FirstPublication, 2)
                .with(Field::SerialNo, "1")
                .with(Field::Number, "WO2024000001A1")
                .with(Field::Title, "Marine streamer")
                .with(Field::Category, "Marine"),
        );
        wb.granted_patents.push(
            Record::new(RecordKind::GrantedPatent, 2)
                .with(Field::SerialNo, "1")
                .with(Field::Number, "US11000001B2")
                .with(Field::Category, "Land; Processing"),
        );
        wb.granted_patents.push(
            Record::new(RecordKind::GrantedPatent, 3)
                .with(Field::Number, "US11000002B1")
                .with(Field::Category, "Astrology"),
        );
        wb
    }

    fn all_bookmarks(doc: &ReportDocument) -> Vec<(u32, String)> {
        doc.paragraphs()
            .flat_map(|p| &p.content)
            .filter_map(|c| match c {
                InlineContent::BookmarkStart { id, name } => Some((*id, name.clone())),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_full_report_parts_in_order() {
        let config = ReportConfig::default().with_images(false);
        let wb = workbook();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        let text = report.document.plain_text();
        let title = text.find("INDEX").unwrap();
        let fp = text.find("FIRST PUBLICATIONS").unwrap();
        let gp = text.find("GRANTED PATENTS").unwrap();
        assert!(title < fp && fp < gp);

        assert_eq!(report.stats.detail_blocks, 3);
        assert_eq!(report.stats.uncategorized, 1);
        assert_eq!(report.stats.record_count(), 3);
        assert_eq!(report.document.metadata.title.as_deref(), Some("PATENT WATCH"));
    }

    #[test]
    fn test_bookmarks_unique_and_links_resolve() {
        let config = ReportConfig::default().with_images(false);
        let wb = workbook();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        let marks = all_bookmarks(&report.document);
        let ids: HashSet<u32> = marks.iter().map(|(id, _)| *id).collect();
        let names: HashSet<&str> = marks.iter().map(|(_, n)| n.as_str()).collect();
        assert_eq!(ids.len(), marks.len());
        assert_eq!(names.len(), marks.len());

        assert!(report.document.dangling_anchors().is_empty());
    }

    #[test]
    fn test_partial_parts_do_not_link_missing_sections() {
        let config = ReportConfig::default()
            .with_images(false)
            .with_parts(PartSelection::parse("fp-index").unwrap());
        let wb = workbook();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        assert_eq!(report.stats.detail_blocks, 0);
        assert!(!matches!(report.document.blocks.first(), Some(Block::PageBreak)));
        let record_links = report
            .document
            .paragraphs()
            .flat_map(|p| p.links())
            .filter(|t| matches!(t, LinkTarget::Anchor(a) if a.starts_with("fp_")))
            .count();
        assert_eq!(record_links, 0);
    }

    #[test]
    fn test_progress_callback() {
        let config = ReportConfig::default().with_images(false);
        let wb = workbook();
        let mut seen = Vec::new();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher)
            .on_record(|r| seen.push(r.row))
            .build();

        assert_eq!(report.stats.detail_blocks, 3);
        assert_eq!(seen, vec![2, 2, 3]);
    }
}
