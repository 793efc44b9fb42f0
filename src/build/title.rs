//! Title page: title, company table, section links and category index.

use super::{ReportBuilder, INDEX_ANCHOR};
use crate::model::{
    Alignment, Field, HeightRule, Paragraph, RecordKind, Table, TableCell, TableRow, TextRun,
    TextStyle, VerticalAlignment,
};

impl<'a> ReportBuilder<'a> {
    pub(super) fn write_title_page(&mut self) {
        let style = self.styler.config();

        let title = TextRun::new(self.config.title.clone()).with_style(TextStyle {
            bold: true,
            all_caps: true,
            font_size: Some(style.title_size),
            font_name: style.font_name.clone(),
            ..Default::default()
        });
        self.emit_paragraph(Paragraph::with_run(title).align(Alignment::Center));

        let index = TextRun::new("INDEX").with_style(TextStyle {
            bold: true,
            underline: true,
            all_caps: true,
            font_size: Some(style.heading_size),
            font_name: style.font_name.clone(),
            ..Default::default()
        });
        let index = Paragraph::with_run(index).align(Alignment::Center);
        let index = self.bookmark(index, INDEX_ANCHOR);
        self.emit_paragraph(index);

        self.write_company_table();
        self.emit_paragraph(self.styler.blank());
        self.write_section_links();
        self.emit_paragraph(self.styler.blank());

        let config = self.config;
        let split = config.index_split;
        for (i, category) in config.categories.iter().enumerate() {
            if i == split && split > 0 {
                self.emit_paragraph(self.styler.blank());
                self.write_company_table();
                self.emit_paragraph(self.styler.blank());
            }
            self.write_category_numbers(&category.name);
        }
    }

    fn write_company_table(&mut self) {
        let style = self.styler.config();
        let columns = self
            .config
            .companies
            .iter()
            .map(Vec::len)
            .max()
            .unwrap_or(0);
        if columns == 0 {
            return;
        }

        let mut table =
            Table::with_widths(vec![style.index_cell_width; columns]).align(Alignment::Center);
        for names in &self.config.companies {
            let mut cells: Vec<TableCell> = names
                .iter()
                .map(|name| {
                    self.styler
                        .centered_cell(name.clone())
                        .valign(VerticalAlignment::Middle)
                })
                .collect();
            // A short row merges its trailing cells into the last one.
            let short_by = columns - names.len();
            if short_by > 0 {
                match cells.pop() {
                    Some(last) => cells.push(last.span(short_by + 1)),
                    None => cells.push(TableCell::empty().span(columns)),
                }
            }
            table.add_row(TableRow::new(cells).height(style.company_row_height, HeightRule::Exact));
        }
        self.emit_table(table);
    }

    fn write_section_links(&mut self) {
        let mut p = Paragraph::new().align(Alignment::Center);
        for (i, kind) in [RecordKind::FirstPublication, RecordKind::GrantedPatent]
            .into_iter()
            .enumerate()
        {
            if i > 0 {
                p.add_tab();
                p.add_tab();
            }
            match self.section_target(kind) {
                Some(target) => p.add_link(self.styler.link(kind.label()), target),
                None => p.add_run(self.styler.body(kind.label())),
            }
        }
        self.emit_paragraph(p);
    }

    /// Arrow heading for a category followed by a grid of the matching
    /// publication and patent numbers.
    fn write_category_numbers(&mut self, category: &str) {
        let style = self.styler.config();
        let heading = Paragraph::with_run(self.styler.bold(format!("\u{2192} {}", category)));
        self.emit_paragraph(heading.keep_with_next());

        let workbook = self.workbook;
        let cells: Vec<TableCell> = [RecordKind::FirstPublication, RecordKind::GrantedPatent]
            .into_iter()
            .flat_map(|kind| workbook.in_category(kind, category))
            .filter(|record| record.number.is_some())
            .map(|record| {
                self.styler
                    .link_cell(record.text(Field::Number), self.record_target(record))
                    .valign(VerticalAlignment::Middle)
            })
            .map(|mut cell| {
                for p in &mut cell.content {
                    p.style.alignment = Alignment::Center;
                }
                cell
            })
            .collect();

        if cells.is_empty() {
            let none =
                Paragraph::with_run(self.styler.body(format!("No records found for {}", category)))
                    .align(Alignment::Center);
            self.emit_paragraph(none);
        } else {
            let columns = style.index_columns.max(1);
            let mut table =
                Table::with_widths(vec![style.index_cell_width; columns]).align(Alignment::Right);
            let mut cells = cells.into_iter().peekable();
            while cells.peek().is_some() {
                let mut row: Vec<TableCell> = cells.by_ref().take(columns).collect();
                row.resize_with(columns, TableCell::empty);
                table.add_row(TableRow::new(row).height(style.row_height, HeightRule::Exact));
            }
            self.emit_table(table);
        }
        self.emit_paragraph(self.styler.blank());
    }
}

#[cfg(test)]
mod tests {
    use crate::build::ReportBuilder;
    use crate::config::{PartSelection, ReportConfig};
    use crate::fetch::DisabledFetcher;
    use crate::model::{Block, Field, PatentWorkbook, Record, RecordKind};

    fn title_only() -> ReportConfig {
        ReportConfig::default()
            .with_images(false)
            .with_parts(PartSelection::parse("title").unwrap())
    }

    #[test]
    fn test_company_table_repeats_after_split() {
        let config = title_only();
        let wb = PatentWorkbook::new();
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        let company_tables: Vec<_> = report
            .document
            .blocks
            .iter()
            .filter_map(|b| match b {
                Block::Table(t) if t.plain_text().contains("WESTERNGECO") => Some(t),
                _ => None,
            })
            .collect();
        assert_eq!(company_tables.len(), 2);

        let first = company_tables[0];
        assert_eq!(first.column_count(), 6);
        assert_eq!(first.rows[0].cells.len(), 5);
        assert_eq!(first.rows[0].cells[4].colspan, 2);
        assert_eq!(first.rows[1].grid_span(), 6);
    }

    #[test]
    fn test_empty_categories_say_so() {
        let config = title_only();
        let wb = PatentWorkbook::new();
        let text = ReportBuilder::new(&config, &wb, &DisabledFetcher)
            .build()
            .document
            .plain_text();

        assert!(text.contains("No records found for Seafloor"));
        assert!(text.contains("No records found for Downhole"));
        assert!(text.contains("First Publications\t\tGranted Patents"));
    }

    #[test]
    fn test_numbers_grid_lists_fp_then_gp() {
        let config = title_only();
        let mut wb = PatentWorkbook::new();
        for i in 0..3 {
            wb.granted_patents.push(
                Record::new(RecordKind::GrantedPatent, i + 2)
                    .with(Field::Number, format!("US{}", i))
                    .with(Field::Category, "Marine"),
            );
        }
        for i in 0..2 {
            wb.first_publications.push(
                Record::new(RecordKind::FirstPublication, i + 2)
                    .with(Field::Number, format!("WO{}", i))
                    .with(Field::Category, "marine acquisition"),
            );
        }
        let report = ReportBuilder::new(&config, &wb, &DisabledFetcher).build();

        let grid = report
            .document
            .blocks
            .iter()
            .find_map(|b| match b {
                Block::Table(t) if t.plain_text().starts_with("WO0") => Some(t),
                _ => None,
            })
            .expect("number grid for Marine");
        assert_eq!(grid.rows.len(), 2);
        assert_eq!(grid.plain_text(), "WO0\tWO1\tUS0\tUS1\nUS2\t\t\t");
    }
}
