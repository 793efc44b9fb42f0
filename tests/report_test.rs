//! End-to-end tests: workbook in, DOCX package out.

mod common;

use std::fs;
use std::io::{Cursor, Write};

use common::{read_part, sample_sheets, sample_workbook, write_xlsx, PngFetcher};
use patwatch::{Error, PartSelection, PatentWatch, RecordKind};
use zip::write::SimpleFileOptions;
use zip::ZipWriter;

const NS_W: &str = "http://schemas.openxmlformats.org/wordprocessingml/2006/main";

fn attribute_values(xml: &str, element: &str, attribute: &str) -> Vec<String> {
    let doc = roxmltree::Document::parse(xml).unwrap();
    doc.descendants()
        .filter(|n| n.has_tag_name((NS_W, element)))
        .filter_map(|n| n.attribute((NS_W, attribute)).map(String::from))
        .collect()
}

fn png_watch() -> PatentWatch {
    PatentWatch::new()
        .with_title("WATCH 2024")
        .with_fetcher(Box::new(PngFetcher {
            width: 200,
            height: 100,
        }))
}

#[test]
fn test_read_sample_workbook() {
    let dir = tempfile::tempdir().unwrap();
    let path = sample_workbook(dir.path());

    let workbook = patwatch::read_workbook(&path).unwrap();
    assert_eq!(workbook.sheet_names, vec!["First Publication", "Granted", "Sheet1"]);
    assert_eq!(workbook.first_publications.len(), 3);
    assert_eq!(workbook.granted_patents.len(), 2);
    assert_eq!(workbook.images.len(), 1);

    let first = &workbook.first_publications[0];
    assert_eq!(first.row, 2);
    assert_eq!(first.kind, RecordKind::FirstPublication);
    assert_eq!(first.text(patwatch::Field::Number), "WO2024051234A1");
    assert_eq!(first.text(patwatch::Field::Category), "Marine");

    let granted = &workbook.granted_patents[1];
    assert_eq!(granted.row, 3);
    assert_eq!(granted.text(patwatch::Field::FamilyNumber), "F-1002");
}

#[test]
fn test_generate_writes_linked_report() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());
    let output = dir.path().join("watch.docx");

    let stats = png_watch().generate(&input, &output).unwrap();
    assert_eq!(stats.first_publications, 3);
    assert_eq!(stats.granted_patents, 2);
    assert_eq!(stats.detail_blocks, 5);
    assert_eq!(stats.images_embedded, 1);
    assert_eq!(stats.image_failures, 0);
    assert_eq!(stats.missing_links, 1);
    assert_eq!(stats.uncategorized, 0);

    let data = fs::read(&output).unwrap();
    let document = read_part(&data, "word/document.xml").unwrap();
    assert!(document.contains("WATCH 2024"));

    let bookmarks = attribute_values(&document, "bookmarkStart", "name");
    for name in [
        "index",
        "first_publications",
        "granted_patents",
        "fp_WO2024051234A1",
        "gp_US11900002B2",
    ] {
        assert!(bookmarks.iter().any(|b| b == name), "missing bookmark {}", name);
    }

    // Every internal link points at a bookmark that exists.
    let anchors = attribute_values(&document, "hyperlink", "anchor");
    assert!(anchors.iter().any(|a| a == "fp_US20240123456A1"));
    for anchor in &anchors {
        assert!(bookmarks.contains(anchor), "dangling link {}", anchor);
    }

    assert!(read_part(&data, "word/media/pw_image1.png").is_some());
    let types = read_part(&data, "[Content_Types].xml").unwrap();
    assert!(types.contains(r#"Extension="png""#));
}

#[test]
fn test_multi_category_record_listed_under_each() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());

    let watch = PatentWatch::new().with_images(false);
    let workbook = watch.read(&input).unwrap();
    let report = watch.build(&workbook).unwrap();
    let json = patwatch::render::to_json(&report.document, patwatch::JsonFormat::Compact).unwrap();

    // "Land; Processing" appears in both category rows of the summary.
    assert!(json.contains("> LAND"));
    assert!(json.contains("> PROCESSING"));
    assert_eq!(
        workbook
            .in_category(RecordKind::FirstPublication, "Processing")
            .count(),
        2
    );
    assert_eq!(
        workbook.in_category(RecordKind::FirstPublication, "Land").count(),
        1
    );
}

#[test]
fn test_title_only_has_no_dangling_links() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());
    let output = dir.path().join("title.docx");

    let stats = PatentWatch::new()
        .with_images(false)
        .with_parts(PartSelection::parse("title").unwrap())
        .generate(&input, &output)
        .unwrap();
    assert_eq!(stats.detail_blocks, 0);

    let data = fs::read(&output).unwrap();
    let document = read_part(&data, "word/document.xml").unwrap();
    let bookmarks = attribute_values(&document, "bookmarkStart", "name");
    let anchors = attribute_values(&document, "hyperlink", "anchor");

    assert!(bookmarks.iter().all(|b| !b.starts_with("fp_")));
    assert!(anchors.is_empty());
    assert!(document.contains("WO2024051234A1"));
}

#[test]
fn test_missing_granted_sheet_fails_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("partial.xlsx");
    let sheets: Vec<_> = sample_sheets()
        .into_iter()
        .filter(|(name, _)| *name != "Granted")
        .collect();
    write_xlsx(&input, &sheets);
    let output = dir.path().join("partial.docx");

    let result = PatentWatch::new().with_images(false).generate(&input, &output);
    match result {
        Err(Error::MissingSheet { wanted, available }) => {
            assert!(wanted.contains("Granted"));
            assert!(available.contains("First Publication"));
        }
        other => panic!("expected MissingSheet, got {:?}", other.map(|_| ())),
    }
    assert!(!output.exists());
}

#[test]
fn test_missing_input_names_file_without_output() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("nope.xlsx");
    let output = dir.path().join("nope.docx");

    let result = PatentWatch::new().with_images(false).generate(&input, &output);
    match result {
        Err(err @ Error::FileNotFound(_)) => {
            assert!(err.to_string().contains("nope.xlsx"), "{}", err);
        }
        other => panic!("expected FileNotFound, got {:?}", other.map(|_| ())),
    }
    assert!(!output.exists());
}

#[test]
fn test_images_sheet_is_optional() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("noimages.xlsx");
    let sheets: Vec<_> = sample_sheets()
        .into_iter()
        .filter(|(name, _)| *name != "Sheet1")
        .collect();
    write_xlsx(&input, &sheets);

    let watch = png_watch();
    let workbook = watch.read(&input).unwrap();
    assert!(workbook.images.is_empty());

    let report = watch.build(&workbook).unwrap();
    assert_eq!(report.stats.images_embedded, 0);
    assert_eq!(report.stats.detail_blocks, 5);
}

fn template_docx() -> Vec<u8> {
    let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
    let options = SimpleFileOptions::default();
    let parts = [
        (
            "[Content_Types].xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">"#,
                r#"<Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>"#,
                r#"<Default Extension="xml" ContentType="application/xml"/>"#,
                r#"<Override PartName="/word/document.xml" ContentType="application/vnd.openxmlformats-officedocument.wordprocessingml.document.main+xml"/>"#,
                "</Types>"
            ),
        ),
        (
            "_rels/.rels",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
                r#"<Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="word/document.xml"/>"#,
                "</Relationships>"
            ),
        ),
        (
            "word/document.xml",
            concat!(
                r#"<?xml version="1.0" encoding="UTF-8"?>"#,
                r#"<w:document xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
                "<w:body><w:p><w:r><w:t>Cover letter</w:t></w:r></w:p>",
                r#"<w:sectPr><w:pgSz w:w="11906" w:h="16838"/>"#,
                r#"<w:pgMar w:top="1134" w:right="1134" w:bottom="1134" w:left="1134"/></w:sectPr>"#,
                "</w:body></w:document>"
            ),
        ),
    ];
    for (name, xml) in parts {
        zip.start_file(name, options).unwrap();
        zip.write_all(xml.as_bytes()).unwrap();
    }
    zip.finish().unwrap().into_inner()
}

#[test]
fn test_template_merge_keeps_template_content() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());
    let template = dir.path().join("template.docx");
    fs::write(&template, template_docx()).unwrap();
    let output = dir.path().join("merged.docx");

    png_watch()
        .with_template(&template)
        .generate(&input, &output)
        .unwrap();

    let data = fs::read(&output).unwrap();
    let document = read_part(&data, "word/document.xml").unwrap();
    let cover = document.find("Cover letter").unwrap();
    let title = document.find("WATCH 2024").unwrap();
    let section = document.rfind("<w:sectPr").unwrap();
    assert!(cover < title && title < section);
    assert!(document.contains(r#"w:h="16838""#));

    let rels = read_part(&data, "word/_rels/document.xml.rels").unwrap();
    assert!(rels.contains(r#"Id="rIdPw1""#));
    assert!(read_part(&data, "word/media/pw_image1.png").is_some());
}

#[test]
fn test_template_that_is_not_docx_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());
    let template = dir.path().join("template.docx");
    fs::write(&template, b"plain text, not a package").unwrap();
    let output = dir.path().join("out.docx");

    let result = PatentWatch::new()
        .with_images(false)
        .with_template(&template)
        .generate(&input, &output);
    assert!(matches!(result, Err(Error::Template(_))));
    assert!(!output.exists());
}

#[test]
fn test_to_json_includes_stats() {
    let dir = tempfile::tempdir().unwrap();
    let input = sample_workbook(dir.path());

    let json = patwatch::to_json(&input, patwatch::JsonFormat::Pretty).unwrap();
    assert!(json.contains("\"detail_blocks\": 5"));
    assert!(json.contains("WO2024051999A1"));
}
