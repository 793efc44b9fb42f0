//! Workbook reading.
//!
//! Opens the workbook with calamine, checks that the required sheets exist
//! and maps each sheet onto typed records.

mod sheet;

pub use sheet::{read_image_index, read_records, HeaderIndex};

use crate::config::ReportConfig;
use crate::detect;
use crate::error::{Error, Result};
use crate::model::{ImageIndex, PatentWorkbook, RecordKind};
use calamine::{open_workbook_auto, open_workbook_auto_from_rs, Reader, Sheets};
use std::io::{Cursor, Read, Seek};
use std::path::Path;

/// Reads patent watch workbooks.
#[derive(Debug, Clone)]
pub struct WorkbookReader<'a> {
    config: &'a ReportConfig,
}

impl<'a> WorkbookReader<'a> {
    /// Create a reader using the given configuration.
    pub fn new(config: &'a ReportConfig) -> Self {
        Self { config }
    }

    /// Read a workbook from a file path.
    pub fn read_path<P: AsRef<Path>>(&self, path: P) -> Result<PatentWorkbook> {
        let path = path.as_ref();
        detect::ensure_workbook(path)?;
        log::info!("Reading workbook {}", path.display());
        let mut workbook = open_workbook_auto(path)?;
        self.read_sheets(&mut workbook)
    }

    /// Read a workbook from bytes.
    pub fn read_bytes(&self, data: Vec<u8>) -> Result<PatentWorkbook> {
        detect::detect_format_from_bytes(&data)?;
        let mut workbook = open_workbook_auto_from_rs(Cursor::new(data))?;
        self.read_sheets(&mut workbook)
    }

    fn read_sheets<RS: Read + Seek>(&self, workbook: &mut Sheets<RS>) -> Result<PatentWorkbook> {
        let sheet_names = workbook.sheet_names();
        let sheets = &self.config.sheets;

        // Resolve both required sheets before reading anything.
        let fp_sheet = require_sheet(&sheet_names, sheets.for_kind(RecordKind::FirstPublication))?;
        let gp_sheet = require_sheet(&sheet_names, sheets.for_kind(RecordKind::GrantedPatent))?;

        let mut result = PatentWorkbook::new();
        for (kind, name) in [
            (RecordKind::FirstPublication, fp_sheet),
            (RecordKind::GrantedPatent, gp_sheet),
        ] {
            let range = workbook.worksheet_range(&name)?;
            let records = read_records(&range, &self.config.columns, kind, &name);
            log::info!("{}: {} records from sheet '{}'", kind, records.len(), name);
            match kind {
                RecordKind::FirstPublication => result.first_publications = records,
                RecordKind::GrantedPatent => result.granted_patents = records,
            }
        }

        result.images = match find_sheet(&sheet_names, &sheets.images) {
            Some(name) => match workbook.worksheet_range(&name) {
                Ok(range) => read_image_index(&range, &self.config.columns, &name),
                Err(e) => {
                    log::warn!("Could not read image sheet '{}': {}", name, e);
                    ImageIndex::new()
                }
            },
            None => {
                log::warn!(
                    "No image sheet found (looked for {}); reports will have no images",
                    sheets.images.join(", ")
                );
                ImageIndex::new()
            }
        };

        result.sheet_names = sheet_names;
        Ok(result)
    }
}

/// Find the first candidate present in the workbook.
///
/// Exact names win over case-insensitive matches.
pub fn find_sheet(available: &[String], candidates: &[String]) -> Option<String> {
    candidates
        .iter()
        .find_map(|c| available.iter().find(|a| *a == c))
        .or_else(|| {
            candidates.iter().find_map(|c| {
                available
                    .iter()
                    .find(|a| a.trim().eq_ignore_ascii_case(c.trim()))
            })
        })
        .cloned()
}

fn require_sheet(available: &[String], candidates: &[String]) -> Result<String> {
    find_sheet(available, candidates).ok_or_else(|| Error::MissingSheet {
        wanted: candidates
            .iter()
            .map(|c| format!("\"{}\"", c))
            .collect::<Vec<_>>()
            .join(" or "),
        available: available.join(", "),
    })
}

/// Read a workbook from a file path with the given configuration.
pub fn read_workbook<P: AsRef<Path>>(path: P, config: &ReportConfig) -> Result<PatentWorkbook> {
    WorkbookReader::new(config).read_path(path)
}
