//! Detail sections: one bordered two-column table per record, with forced
//! page breaks decided by the pagination estimator.

use super::ReportBuilder;
use crate::config::ReportConfig;
use crate::fetch::ImageLoader;
use crate::layout::{BreakDecision, Estimator, FieldLayout, PageBudget, PageCursor};
use crate::model::{
    Alignment, Field, HeightRule, LinkTarget, Paragraph, PatentWorkbook, Record, RecordKind,
    Table, TableCell, TableRow, VerticalAlignment,
};

impl<'a> ReportBuilder<'a> {
    pub(super) fn write_details(&mut self, kind: RecordKind) {
        let style = self.styler.config();
        self.cursor.start_section();

        let mut heading = self.styler.heading(kind.heading(), style.detail_heading_size);
        heading.style.underline = true;
        self.emit_paragraph(Paragraph::with_run(heading).align(Alignment::Center));
        self.emit_paragraph(self.styler.index_link(self.index_target()));

        let workbook = self.workbook;
        for record in workbook.records(kind) {
            self.write_detail_block(record);
        }
    }

    fn write_detail_block(&mut self, record: &Record) {
        let config = self.config;
        let workbook = self.workbook;
        let image_url = if config.images.enabled {
            workbook.images.for_record(record, config.images.key_field)
        } else {
            None
        };

        let fields = config.details.fields(record.kind);
        let required = detail_height(config, self.cursor.estimator(), record, image_url.is_some());

        if self.cursor.place(required) == BreakDecision::BreakBefore {
            log::debug!(
                "Page break before {} row {} (needs {:.2} in)",
                record.kind,
                record.row,
                required
            );
            self.document.add_page_break();
            self.emit_paragraph(self.styler.index_link(self.index_target()));
            self.stats.add_forced_break();
        }

        let style = self.styler.config();
        let mut table = Table::with_widths(vec![style.label_width, style.value_width]);
        for (i, detail) in fields.iter().enumerate() {
            let mut label = self
                .styler
                .tight(Paragraph::with_run(self.styler.bold(detail.label.clone())));
            if i == 0 {
                if let Some(anchor) = self.bookmarks.record_anchor(record).map(String::from) {
                    label = self.bookmark(label, &anchor);
                }
            }
            let value = if detail.field == Field::Link {
                self.link_value(record)
            } else {
                let p = self.styler.tight(Paragraph::with_run(
                    self.styler.body(record.text(detail.field)),
                ));
                if self.cursor.estimator().is_long_text(&detail.label) {
                    p.align(Alignment::Justify)
                } else {
                    p
                }
            };
            table.add_row(
                TableRow::new(vec![TableCell::paragraph(label), TableCell::paragraph(value)])
                    .height(style.row_height, HeightRule::AtLeast),
            );
        }

        if let Some(url) = image_url {
            let label = self
                .styler
                .tight(Paragraph::with_run(self.styler.bold(config.details.image_label.clone())));
            let value = self.image_value(record, url);
            table.add_row(
                TableRow::new(vec![
                    TableCell::paragraph(label).valign(VerticalAlignment::Middle),
                    TableCell::paragraph(value),
                ])
                .cant_split(),
            );
        }

        self.emit_table(table);
        self.emit_paragraph(self.styler.tight(self.styler.blank()));
        self.stats.detail_blocks += 1;
        if let Some(callback) = self.on_record.as_mut() {
            callback(record);
        }
    }

    fn link_value(&mut self, record: &Record) -> Paragraph {
        let details = &self.config.details;
        let url = record.text(Field::Link);
        let url = url.trim();
        if url.is_empty() {
            self.stats.missing_links += 1;
            return self
                .styler
                .tight(Paragraph::with_run(self.styler.body(details.no_link_text.clone())));
        }
        self.styler.tight(self.styler.link_paragraph(
            details.link_text.clone(),
            Some(LinkTarget::External(url.to_string())),
        ))
    }

    fn image_value(&mut self, record: &Record, url: &str) -> Paragraph {
        let config = self.config;
        let key = record.text(config.images.key_field);
        let loader = ImageLoader::new(self.fetcher, &config.images);

        match loader.load(url, &key) {
            Ok(prepared) => {
                let id = format!("image{}", self.next_image);
                self.next_image += 1;
                let (width, height) = (prepared.width, prepared.height);
                self.document.add_resource(id.clone(), prepared.into_resource(url));
                self.stats.add_image();

                let mut p = self.styler.tight(Paragraph::new()).align(Alignment::Center);
                p.add_image(id, width, height);
                p
            }
            Err(e) => {
                log::warn!(
                    "Image for {} row {} ({}) unavailable: {}",
                    record.kind,
                    record.row,
                    url,
                    e
                );
                self.stats.add_image_failure();
                self.styler
                    .tight(Paragraph::with_run(
                        self.styler.body(config.details.image_placeholder.clone()),
                    ))
                    .align(Alignment::Center)
            }
        }
    }
}

/// Estimated height of a record's detail block, in inches.
pub fn detail_height(
    config: &ReportConfig,
    estimator: &Estimator,
    record: &Record,
    has_image: bool,
) -> f64 {
    let layouts: Vec<FieldLayout> = config
        .details
        .fields(record.kind)
        .iter()
        .map(|f| {
            let chars = record.get(f.field).map(|v| v.char_len()).unwrap_or(0);
            estimator.field_layout(&f.label, chars)
        })
        .collect();
    estimator.estimate_height(&layouts, has_image)
}

/// Number of pages the detail section of one record kind is estimated to
/// fill.
pub fn estimate_detail_pages(
    config: &ReportConfig,
    workbook: &PatentWorkbook,
    kind: RecordKind,
) -> usize {
    let estimator = Estimator::new(config.pagination.clone());
    let mut cursor = PageCursor::new(estimator, PageBudget::from_geometry(&config.page));
    cursor.start_section();
    for record in workbook.records(kind) {
        let has_image = config.images.enabled
            && workbook
                .images
                .for_record(record, config.images.key_field)
                .is_some();
        let required = detail_height(config, cursor.estimator(), record, has_image);
        cursor.place(required);
    }
    cursor.breaks() + 1
}

#[cfg(test)]
mod tests {
    use crate::build::ReportBuilder;
    use crate::config::{PartSelection, ReportConfig};
    use crate::error::Result;
    use crate::fetch::{DisabledFetcher, ImageFetcher};
    use crate::layout::Estimator;
    use crate::model::{
        Block, CellValue, Field, InlineContent, LinkTarget, PatentWorkbook, Record, RecordKind,
    };
    use image::{DynamicImage, ImageFormat, RgbImage};
    use std::io::Cursor;

    struct PngFetcher;

    impl ImageFetcher for PngFetcher {
        fn fetch(&self, _url: &str) -> Result<Vec<u8>> {
            let mut out = Cursor::new(Vec::new());
            DynamicImage::ImageRgb8(RgbImage::new(200, 100))
                .write_to(&mut out, ImageFormat::Png)
                .unwrap();
            Ok(out.into_inner())
        }
    }

    fn details_config(parts: &str) -> ReportConfig {
        ReportConfig::default().with_parts(PartSelection::parse(parts).unwrap())
    }

    fn publication(row: usize) -> Record {
        Record::new(RecordKind::FirstPublication, row)
            .with(Field::SerialNo, (row - 1).to_string())
            .with(Field::FamilyNumber, format!("{}", 1000 + row))
            .with(Field::Number, format!("WO2024{:06}A1", row))
            .with(Field::Title, "Seismic source array")
            .with(Field::Category, "Marine")
            .with(Field::Abstract, "A short abstract.")
    }

    #[test]
    fn test_forced_breaks_follow_estimate() {
        let config = details_config("fp-details").with_images(false);
        let mut wb = PatentWorkbook::new();
        wb.first_publications = (2..7).map(publication).collect();

        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        // 3.48 in per block on a 9 in page starting at 1.0 in: breaks
        // before the third and the fifth block.
        assert_eq!(report.stats.detail_blocks, 5);
        assert_eq!(report.stats.forced_breaks, 2);
        assert_eq!(
            report
                .document
                .blocks
                .iter()
                .filter(|b| matches!(b, Block::PageBreak))
                .count(),
            2
        );
        assert!(!matches!(report.document.blocks[0], Block::PageBreak));

        let index_lines = report
            .document
            .blocks
            .iter()
            .filter(|b| matches!(b, Block::Paragraph(p) if p.plain_text() == "<<INDEX"))
            .count();
        assert_eq!(index_lines, 3);
    }

    #[test]
    fn test_detail_table_rows_and_link() {
        let config = details_config("fp-details").with_images(false);
        let mut wb = PatentWorkbook::new();
        wb.first_publications
            .push(publication(2).with(Field::Link, "https://patents.example/WO1"));
        wb.first_publications.push(publication(3));

        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();
        let tables: Vec<_> = report
            .document
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) => Some(t),
                _ => None,
            })
            .collect();

        assert_eq!(tables.len(), 2);
        assert_eq!(tables[0].rows.len(), 12);
        assert!((tables[0].column_widths[0] - 1.38).abs() < f32::EPSILON);
        assert_eq!(tables[0].rows[1].plain_text(), "Publication No\tWO2024000002A1");

        let links: Vec<_> = tables[0].paragraphs().flat_map(|p| p.links()).collect();
        assert_eq!(
            links,
            vec![&LinkTarget::External("https://patents.example/WO1".to_string())]
        );
        assert!(tables[1].plain_text().contains("Patent Link\tNo Link Available"));
        assert_eq!(report.stats.missing_links, 1);

        let first_label = &tables[0].rows[0].cells[0].content[0];
        assert_eq!(first_label.bookmarks().collect::<Vec<_>>(), vec!["fp_WO2024000002A1"]);
    }

    #[test]
    fn test_image_embedded_when_indexed() {
        let config = details_config("fp-details");
        let mut wb = PatentWorkbook::new();
        wb.first_publications.push(publication(2));
        wb.first_publications.push(publication(3));
        wb.images
            .insert(&CellValue::Number(1002.0), "https://img.example/1002.png");

        let report = ReportBuilder::new(&config, &wb, &PngFetcher).build();

        assert_eq!(report.stats.images_embedded, 1);
        assert_eq!(report.stats.image_failures, 0);
        let resource = report.document.get_resource("image1").expect("image1");
        assert_eq!(resource.mime_type, "image/png");

        let image = report
            .document
            .paragraphs()
            .flat_map(|p| &p.content)
            .find_map(|c| match c {
                InlineContent::Image { width, height, .. } => Some((*width, *height)),
                _ => None,
            })
            .expect("inline image");
        assert!((image.0 - 5.61).abs() < 0.01);
        assert!((image.1 - 2.805).abs() < 0.01);
    }

    #[test]
    fn test_image_failure_uses_placeholder() {
        let config = details_config("fp-details");
        let mut wb = PatentWorkbook::new();
        wb.first_publications.push(publication(2));
        wb.images
            .insert(&CellValue::text("1002").unwrap(), "https://img.example/1002.png");

        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        assert_eq!(report.stats.images_embedded, 0);
        assert_eq!(report.stats.image_failures, 1);
        assert_eq!(report.stats.detail_blocks, 1);
        assert!(report
            .document
            .plain_text()
            .contains("Image\tImage Not Available"));
        assert!(report.document.resources.is_empty());
    }

    #[test]
    fn test_missing_abstract_counts_one_line() {
        let config = ReportConfig::default();
        let estimator = Estimator::new(config.pagination.clone());

        let mut absent = publication(2);
        absent.set(Field::Abstract, None);
        let empty = publication(2).with(Field::Abstract, "");
        assert!(absent.get(Field::Abstract).is_none());

        // 11 fixed rows at 0.28 in, one 0.2 in line, 0.2 in padding.
        for record in [&absent, &empty, &publication(2)] {
            let height = super::detail_height(&config, &estimator, record, false);
            assert!((height - 3.48).abs() < 1e-9, "got {}", height);
        }
    }

    #[test]
    fn test_failed_image_keeps_image_row_estimate() {
        let config = details_config("fp-details");
        let estimator = Estimator::new(config.pagination.clone());
        let record = publication(2);

        let plain = super::detail_height(&config, &estimator, &record, false);
        let with_image = super::detail_height(&config, &estimator, &record, true);
        assert!((with_image - plain - 3.0).abs() < 1e-9);

        // Two indexed records whose fetch fails: 1.0 + 6.48 in leaves too
        // little room for the second block.
        let mut wb = PatentWorkbook::new();
        wb.first_publications = vec![publication(2), publication(3)];
        wb.images
            .insert(&CellValue::text("1002").unwrap(), "https://img.example/1002.png");
        wb.images
            .insert(&CellValue::text("1003").unwrap(), "https://img.example/1003.png");

        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();
        assert_eq!(report.stats.image_failures, 2);
        assert_eq!(report.stats.forced_breaks, 1);
        assert_eq!(
            super::estimate_detail_pages(&config, &wb, RecordKind::FirstPublication),
            2
        );
    }

    #[test]
    fn test_estimate_detail_pages_matches_build() {
        let config = details_config("fp-details").with_images(false);
        let mut wb = PatentWorkbook::new();
        wb.first_publications = (2..7).map(publication).collect();

        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();
        let pages = super::estimate_detail_pages(&config, &wb, RecordKind::FirstPublication);
        assert_eq!(pages, report.stats.forced_breaks as usize + 1);
        assert_eq!(
            super::estimate_detail_pages(&config, &wb, RecordKind::GrantedPatent),
            1
        );
    }
}
