//! Error types for patwatch library.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for patwatch operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur while reading workbooks and generating reports.
#[derive(Error, Debug)]
pub enum Error {
    /// I/O error when reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// An input workbook or template does not exist.
    #[error("File not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// The file is not a recognized spreadsheet or DOCX container.
    #[error("Unknown file format: {0}")]
    UnknownFormat(String),

    /// Error opening or reading the workbook.
    #[error("Workbook error: {0}")]
    Workbook(String),

    /// None of the candidate names for a required sheet exist in the workbook.
    #[error("Missing required sheet {wanted} (workbook has: {available})")]
    MissingSheet {
        /// Candidate sheet names that were looked for
        wanted: String,
        /// Sheet names present in the workbook
        available: String,
    },

    /// The DOCX template is unusable.
    #[error("Template error: {0}")]
    Template(String),

    /// Error reading or writing the DOCX package container.
    #[error("Package error: {0}")]
    Package(String),

    /// Malformed XML inside a DOCX part.
    #[error("XML error: {0}")]
    Xml(String),

    /// Error decoding or encoding an image.
    #[error("Image error: {0}")]
    Image(String),

    /// Error downloading a remote resource.
    #[error("Fetch error: {0}")]
    Fetch(String),

    /// Invalid configuration file.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Error during rendering (DOCX, JSON).
    #[error("Rendering error: {0}")]
    Render(String),

    /// Invalid report part selection.
    #[error("Invalid part selection: {0}")]
    InvalidPartSelection(String),

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl From<calamine::Error> for Error {
    fn from(err: calamine::Error) -> Self {
        match err {
            calamine::Error::Io(e) => Error::Io(e),
            _ => Error::Workbook(err.to_string()),
        }
    }
}

impl From<zip::result::ZipError> for Error {
    fn from(err: zip::result::ZipError) -> Self {
        match err {
            zip::result::ZipError::Io(e) => Error::Io(e),
            _ => Error::Package(err.to_string()),
        }
    }
}

impl From<roxmltree::Error> for Error {
    fn from(err: roxmltree::Error) -> Self {
        Error::Xml(err.to_string())
    }
}

impl From<quick_xml::Error> for Error {
    fn from(err: quick_xml::Error) -> Self {
        match err {
            quick_xml::Error::Io(e) => Error::Io(io::Error::new(e.kind(), e.to_string())),
            _ => Error::Xml(err.to_string()),
        }
    }
}

impl From<image::ImageError> for Error {
    fn from(err: image::ImageError) -> Self {
        Error::Image(err.to_string())
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Config(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::MissingSheet {
            wanted: "\"Granted\" or \"Grant\"".to_string(),
            available: "FP, Sheet1".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Missing required sheet \"Granted\" or \"Grant\" (workbook has: FP, Sheet1)"
        );

        let err = Error::InvalidPartSelection("bogus".to_string());
        assert_eq!(err.to_string(), "Invalid part selection: bogus");
    }

    #[test]
    fn test_file_not_found_names_path() {
        let err = Error::FileNotFound(PathBuf::from("watch/nope.xlsx"));
        assert_eq!(err.to_string(), "File not found: watch/nope.xlsx");
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_toml_error_conversion() {
        let parse = toml::from_str::<toml::Value>("title = ");
        let err: Error = parse.unwrap_err().into();
        assert!(matches!(err, Error::Config(_)));
    }
}
