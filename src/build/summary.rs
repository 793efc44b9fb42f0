//! Summary sections: category index, heading and the summary table.

use super::{section_anchor, ReportBuilder};
use crate::model::{
    Alignment, Field, HeightRule, LinkTarget, Paragraph, RecordKind, Table, TableCell, TableRow,
    VerticalAlignment,
};

impl<'a> ReportBuilder<'a> {
    pub(super) fn write_summary(&mut self, kind: RecordKind) {
        let config = self.config;
        let style = self.styler.config();

        let anchors: Vec<String> = config
            .categories
            .iter()
            .map(|c| {
                self.bookmarks
                    .reserve(&format!("cat_{}_{}", kind.bookmark_prefix(), c.name))
            })
            .collect();

        // Category index: one row of links to the category rows below.
        let widths: Vec<f32> = config.categories.iter().map(|c| c.index_width).collect();
        let cells = config
            .categories
            .iter()
            .zip(&anchors)
            .map(|(category, anchor)| {
                let mut cell = self
                    .styler
                    .link_cell(category.name.clone(), Some(LinkTarget::Anchor(anchor.clone())))
                    .valign(VerticalAlignment::Middle);
                for p in &mut cell.content {
                    p.style.alignment = Alignment::Center;
                }
                cell
            })
            .collect();
        let mut index = Table::with_widths(widths).align(Alignment::Center);
        index.add_row(TableRow::new(cells));
        self.emit_table(index);
        self.emit_paragraph(self.styler.blank());

        let heading = Paragraph::with_run(self.styler.heading(kind.heading(), style.heading_size))
            .align(Alignment::Center);
        let heading = self.bookmark(heading, section_anchor(kind));
        self.emit_paragraph(heading);

        let mut table = Table::with_widths(config.summary_widths(kind).to_vec());
        let header = ["Sl No", kind.number_label(), "Title", "Assignee", "Inventors"]
            .into_iter()
            .map(|label| {
                TableCell::paragraph(
                    self.styler
                        .tight(Paragraph::with_run(self.styler.bold(label)))
                        .align(Alignment::Center),
                )
                .valign(VerticalAlignment::Middle)
            })
            .collect();
        table.add_row(TableRow::header(header));

        let columns = table.column_count();
        for (category, anchor) in config.categories.iter().zip(anchors) {
            let label = Paragraph::with_run(
                self.styler
                    .bold(format!("> {}", category.name.to_uppercase())),
            );
            let label = self.bookmark(self.styler.tight(label), &anchor);
            let row = TableRow::new(vec![TableCell::paragraph(label)
                .span(columns)
                .valign(VerticalAlignment::Middle)])
            .height(style.category_row_height, HeightRule::Exact);
            table.add_row(row);

            for record in self.workbook.in_category(kind, &category.name) {
                let cells = vec![
                    self.styler.centered_cell(record.text(Field::SerialNo)),
                    self.styler
                        .link_cell(record.text(Field::Number), self.record_target(record)),
                    self.styler.text_cell(record.text(Field::Title)),
                    self.styler.text_cell(record.text(Field::Assignee)),
                    self.styler.text_cell(record.text(Field::Inventors)),
                ];
                table.add_row(TableRow::new(cells));
            }
        }
        self.emit_table(table);
    }
}

#[cfg(test)]
mod tests {
    use crate::build::ReportBuilder;
    use crate::config::{PartSelection, ReportConfig};
    use crate::fetch::DisabledFetcher;
    use crate::model::{Block, Field, InlineContent, PatentWorkbook, Record, RecordKind, Table};

    fn summary_table(blocks: &[Block]) -> &Table {
        blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) if t.rows.first().map_or(false, |r| r.is_header) => Some(t),
                _ => None,
            })
            .expect("summary table")
    }

    #[test]
    fn test_summary_rows_grouped_by_category() {
        let config = ReportConfig::default()
            .with_images(false)
            .with_parts(PartSelection::parse("gp-index").unwrap());
        let mut wb = PatentWorkbook::new();
        wb.granted_patents.push(
            Record::new(RecordKind::GrantedPatent, 2)
                .with(Field::SerialNo, "1")
                .with(Field::Number, "US1")
                .with(Field::Title, "Ocean bottom node")
                .with(Field::Category, "Seafloor, Marine"),
        );
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();
        let table = summary_table(&report.document.blocks);

        assert_eq!(table.column_count(), 5);
        assert_eq!(
            table.rows[0].plain_text(),
            "Sl No\tPatent No\tTitle\tAssignee\tInventors"
        );
        // header + 9 category rows + the record twice
        assert_eq!(table.rows.len(), 12);
        assert_eq!(table.rows[1].plain_text(), "> SEAFLOOR");
        assert_eq!(table.rows[1].cells[0].colspan, 5);
        assert!(table.rows[2].plain_text().starts_with("1\tUS1\tOcean bottom node"));
        assert_eq!(table.rows[4].plain_text(), "> MARINE");
        assert!(table.rows[5].plain_text().contains("US1"));
    }

    #[test]
    fn test_category_index_links_to_category_rows() {
        let config = ReportConfig::default()
            .with_images(false)
            .with_parts(PartSelection::parse("fp-index").unwrap());
        let wb = PatentWorkbook::new();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        let index = match &report.document.blocks[0] {
            Block::Table(t) => t,
            other => panic!("expected index table, got {:?}", other),
        };
        assert_eq!(index.rows.len(), 1);
        assert_eq!(index.column_count(), 9);
        assert!((index.column_widths.iter().sum::<f32>() - 6.77).abs() < 0.01);

        let marks: Vec<String> = report
            .document
            .paragraphs()
            .flat_map(|p| p.bookmarks().map(String::from).collect::<Vec<_>>())
            .collect();
        assert!(marks.contains(&"first_publications".to_string()));
        assert!(marks.contains(&"cat_fp_Seafloor".to_string()));

        let first_cell = &index.rows[0].cells[0].content[0];
        assert!(matches!(
            &first_cell.content[0],
            InlineContent::Link { run, .. } if run.text == "Seafloor"
        ));
    }
}
