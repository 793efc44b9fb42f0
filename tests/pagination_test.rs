mod common;

use common::{fp_row, read_part, write_xlsx, FP_HEADERS, GP_HEADERS};
use patwatch::build::estimate_detail_pages;
use patwatch::{PatentWatch, RecordKind, ReportConfig};

fn long_abstract_workbook(dir: &std::path::Path, records: usize) -> std::path::PathBuf {
    let mut fp = vec![FP_HEADERS.iter().map(|s| s.to_string()).collect::<Vec<_>>()];
    for i in 0..records {
        let mut row = fp_row(
            i + 1,
            &format!("WO2024{:06}A1", i),
            "Processing",
            "https://example.com/doc",
        );
        // Abstract is the last column.
        if let Some(last) = row.last_mut() {
            *last = "wavefield separation ".repeat(60);
        }
        fp.push(row);
    }
    let gp = vec![GP_HEADERS.iter().map(|s| s.to_string()).collect()];

    let path = dir.join("long.xlsx");
    write_xlsx(&path, &[("First Publication", fp), ("Granted", gp)]);
    path
}

#[test]
fn test_page_breaks_match_estimate() {
    let dir = tempfile::tempdir().unwrap();
    let input = long_abstract_workbook(dir.path(), 8);
    let output = dir.path().join("long.docx");

    let config = ReportConfig::default().with_images(false);
    let watch = PatentWatch::with_config(config.clone());
    let workbook = watch.read(&input).unwrap();
    let pages = estimate_detail_pages(&config, &workbook, RecordKind::FirstPublication);
    assert!(pages > 1);

    let stats = watch.generate(&input, &output).unwrap();
    assert_eq!(stats.forced_breaks as usize, pages - 1);

    let data = std::fs::read(&output).unwrap();
    let document = read_part(&data, "word/document.xml").unwrap();
    let breaks = document.matches(r#"<w:br w:type="page"/>"#).count();
    // Four breaks separate the five parts.
    assert_eq!(breaks, 4 + stats.forced_breaks as usize);
}

#[test]
fn test_short_blocks_share_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = long_abstract_workbook(dir.path(), 1);

    let config = ReportConfig::default().with_images(false);
    let workbook = PatentWatch::with_config(config.clone()).read(&input).unwrap();
    assert_eq!(
        estimate_detail_pages(&config, &workbook, RecordKind::FirstPublication),
        1
    );
    assert_eq!(
        estimate_detail_pages(&config, &workbook, RecordKind::GrantedPatent),
        1
    );
}

#[test]
fn test_shorter_rows_need_fewer_pages() {
    let dir = tempfile::tempdir().unwrap();
    let input = long_abstract_workbook(dir.path(), 8);

    let config = ReportConfig::default().with_images(false);
    let workbook = PatentWatch::with_config(config.clone()).read(&input).unwrap();
    let normal = estimate_detail_pages(&config, &workbook, RecordKind::FirstPublication);

    // Each block fills most of a page at the default row height.
    assert_eq!(normal, 8);

    let mut short = config.clone();
    short.pagination.row_height = 0.1;
    let shorter = estimate_detail_pages(&short, &workbook, RecordKind::FirstPublication);
    assert_eq!(shorter, 4);
}
