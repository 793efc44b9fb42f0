//! Shared fixtures: minimal xlsx workbooks written with `zip`.

#![allow(dead_code)]

use std::fs::File;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageFormat, RgbImage};
use patwatch::ImageFetcher;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

pub type Rows = Vec<Vec<String>>;

pub const FP_HEADERS: &[&str] = &[
    "Serial No",
    "Publication No",
    "Kind Code",
    "Title",
    "Publication Date",
    "Earliest Priority Date",
    "Assignee",
    "Inventors",
    "Category",
    "IPC",
    "Patent Link",
    "Abstract",
];

pub const GP_HEADERS: &[&str] = &[
    "Serial No",
    "Family number",
    "Patent No",
    "Kind Code",
    "Title",
    "Publication Date",
    "Earliest Priority",
    "Assignee",
    "Inventors",
    "Category",
    "IPC",
    "Patent Link",
    "Abstract",
];

fn column_name(mut index: usize) -> String {
    let mut name = String::new();
    loop {
        name.insert(0, (b'A' + (index % 26) as u8) as char);
        if index < 26 {
            break;
        }
        index = index / 26 - 1;
    }
    name
}

fn escape(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

fn sheet_xml(rows: &Rows) -> String {
    let mut xml = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><worksheet xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main"><sheetData>"#,
    );
    for (r, row) in rows.iter().enumerate() {
        xml.push_str(&format!(r#"<row r="{}">"#, r + 1));
        for (c, value) in row.iter().enumerate() {
            if value.is_empty() {
                continue;
            }
            xml.push_str(&format!(
                r#"<c r="{}{}" t="inlineStr"><is><t>{}</t></is></c>"#,
                column_name(c),
                r + 1,
                escape(value)
            ));
        }
        xml.push_str("</row>");
    }
    xml.push_str("</sheetData></worksheet>");
    xml
}

/// Write an xlsx file with the given sheets, in order.
pub fn write_xlsx(path: &Path, sheets: &[(&str, Rows)]) {
    let file = File::create(path).unwrap();
    let mut zip = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    let mut content_types = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/>"#,
    );
    let mut workbook = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><workbook xmlns="http://schemas.openxmlformats.org/spreadsheetml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships"><sheets>"#,
    );
    let mut rels = String::from(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">"#,
    );

    for (i, (name, _)) in sheets.iter().enumerate() {
        let n = i + 1;
        content_types.push_str(&format!(
            r#"<Override PartName="/xl/worksheets/sheet{}.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/>"#,
            n
        ));
        workbook.push_str(&format!(
            r#"<sheet name="{}" sheetId="{}" r:id="rId{}"/>"#,
            escape(name),
            n,
            n
        ));
        rels.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet{}.xml"/>"#,
            n, n
        ));
    }
    content_types.push_str("</Types>");
    workbook.push_str("</sheets></workbook>");
    rels.push_str("</Relationships>");

    let mut add = |name: &str, data: &str| {
        zip.start_file(name, options).unwrap();
        zip.write_all(data.as_bytes()).unwrap();
    };
    add("[Content_Types].xml", &content_types);
    add(
        "_rels/.rels",
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?><Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#,
    );
    add("xl/workbook.xml", &workbook);
    add("xl/_rels/workbook.xml.rels", &rels);
    for (i, (_, rows)) in sheets.iter().enumerate() {
        add(&format!("xl/worksheets/sheet{}.xml", i + 1), &sheet_xml(rows));
    }
    zip.finish().unwrap();
}

fn row(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

/// A first publication row.
pub fn fp_row(serial: usize, number: &str, category: &str, link: &str) -> Vec<String> {
    row(&[
        &serial.to_string(),
        number,
        "A1",
        "Marine seismic source with reduced bubble noise",
        "2024-03-14",
        "2022-09-01",
        "PGS",
        "A. Nordmann; B. Hansen",
        category,
        "G01V1/38",
        link,
        "A marine seismic source comprising an array of air guns tuned so that \
         the secondary pulses cancel.",
    ])
}

/// A granted patent row.
pub fn gp_row(serial: usize, family: &str, number: &str, category: &str) -> Vec<String> {
    row(&[
        &serial.to_string(),
        family,
        number,
        "B2",
        "Seafloor node deployment system",
        "2024-02-20",
        "2021-05-11",
        "CGG",
        "C. Dupont",
        category,
        "G01V1/20",
        "https://example.com/patents/US11900000",
        "Nodes are deployed from a remotely operated vehicle.",
    ])
}

/// Sheets of a small but complete patent watch workbook.
pub fn sample_sheets() -> Vec<(&'static str, Rows)> {
    let fp = vec![
        row(FP_HEADERS),
        fp_row(1, "WO2024051234A1", "Marine", "https://example.com/WO2024051234"),
        fp_row(2, "WO2024051999A1", "Processing", ""),
        fp_row(3, "US20240123456A1", "Land; Processing", "https://example.com/US20240123456"),
    ];
    let gp = vec![
        row(GP_HEADERS),
        gp_row(1, "F-1001", "US11900001B2", "Seafloor"),
        gp_row(2, "F-1002", "US11900002B2", "Reservoir"),
    ];
    let images = vec![
        row(&["Family number", "Image"]),
        row(&["F-1001", "https://example.com/img/F-1001.png"]),
    ];
    vec![("First Publication", fp), ("Granted", gp), ("Sheet1", images)]
}

/// Write the sample workbook into `dir`.
pub fn sample_workbook(dir: &Path) -> PathBuf {
    let path = dir.join("watch.xlsx");
    write_xlsx(&path, &sample_sheets());
    path
}

/// Fetcher returning a generated PNG for every URL.
pub struct PngFetcher {
    pub width: u32,
    pub height: u32,
}

impl ImageFetcher for PngFetcher {
    fn fetch(&self, _url: &str) -> patwatch::Result<Vec<u8>> {
        let mut out = Cursor::new(Vec::new());
        DynamicImage::ImageRgb8(RgbImage::new(self.width, self.height))
            .write_to(&mut out, ImageFormat::Png)
            .unwrap();
        Ok(out.into_inner())
    }
}

/// Read one part of a ZIP package as text.
pub fn read_part(data: &[u8], name: &str) -> Option<String> {
    use std::io::Read;
    let mut archive = zip::ZipArchive::new(Cursor::new(data)).ok()?;
    let mut file = archive.by_name(name).ok()?;
    let mut text = String::new();
    file.read_to_string(&mut text).ok()?;
    Some(text)
}
