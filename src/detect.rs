//! Container format detection for workbooks and templates.

use crate::error::{Error, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Container format of an input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContainerFormat {
    /// ZIP package (xlsx, xlsm, xlsb, ods, docx)
    Zip,
    /// OLE compound file (legacy xls)
    Ole,
}

impl std::fmt::Display for ContainerFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ContainerFormat::Zip => write!(f, "ZIP package"),
            ContainerFormat::Ole => write!(f, "OLE compound file"),
        }
    }
}

/// ZIP local file header: PK\x03\x04
const ZIP_MAGIC: &[u8] = &[0x50, 0x4B, 0x03, 0x04];
/// OLE compound file header
const OLE_MAGIC: &[u8] = &[0xD0, 0xCF, 0x11, 0xE0, 0xA1, 0xB1, 0x1A, 0xE1];

/// Detect the container format from a file path.
///
/// # Example
/// ```no_run
/// use patwatch::detect::{detect_format_from_path, ContainerFormat};
///
/// let format = detect_format_from_path("watch.xlsm").unwrap();
/// assert_eq!(format, ContainerFormat::Zip);
/// ```
pub fn detect_format_from_path<P: AsRef<Path>>(path: P) -> Result<ContainerFormat> {
    let mut header = Vec::with_capacity(OLE_MAGIC.len());
    File::open(path)?
        .take(OLE_MAGIC.len() as u64)
        .read_to_end(&mut header)?;
    detect_format_from_bytes(&header)
}

/// Detect the container format from the first bytes of a file.
pub fn detect_format_from_bytes(data: &[u8]) -> Result<ContainerFormat> {
    if data.starts_with(ZIP_MAGIC) {
        return Ok(ContainerFormat::Zip);
    }
    if data.starts_with(OLE_MAGIC) {
        return Ok(ContainerFormat::Ole);
    }
    Err(Error::UnknownFormat(describe_header(data)))
}

/// Check that a file can be opened as a workbook.
pub fn ensure_workbook<P: AsRef<Path>>(path: P) -> Result<ContainerFormat> {
    let path = path.as_ref();
    ensure_exists(path)?;
    detect_format_from_path(path).map_err(|e| match e {
        Error::UnknownFormat(header) => {
            Error::UnknownFormat(format!("{} is not a workbook ({})", path.display(), header))
        }
        other => other,
    })
}

/// Check that a file can be opened as a DOCX template.
pub fn ensure_docx<P: AsRef<Path>>(path: P) -> Result<()> {
    let path = path.as_ref();
    ensure_exists(path)?;
    match detect_format_from_path(path) {
        Ok(ContainerFormat::Zip) => Ok(()),
        Ok(other) => Err(Error::Template(format!(
            "{} is an {}, not a DOCX package",
            path.display(),
            other
        ))),
        Err(Error::UnknownFormat(header)) => Err(Error::Template(format!(
            "{} is not a DOCX package ({})",
            path.display(),
            header
        ))),
        Err(e) => Err(e),
    }
}

fn ensure_exists(path: &Path) -> Result<()> {
    if path.exists() {
        Ok(())
    } else {
        Err(Error::FileNotFound(path.to_path_buf()))
    }
}

fn describe_header(data: &[u8]) -> String {
    if data.is_empty() {
        return "empty file".to_string();
    }
    let hex: Vec<String> = data.iter().take(4).map(|b| format!("{:02X}", b)).collect();
    format!("header {}", hex.join(" "))
}
