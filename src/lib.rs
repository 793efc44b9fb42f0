//! # patwatch
//!
//! Patent watch report generator.
//!
//! Reads a spreadsheet workbook of first publications and granted patents
//! and writes a paginated DOCX report: a title page with a category index,
//! summary tables per record kind, and one detail block per record with an
//! optional illustration.
//!
//! ## Quick Start
//!
//! ```no_run
//! use patwatch::{generate_report, ReportConfig};
//!
//! fn main() -> patwatch::Result<()> {
//!     let config = ReportConfig::default().with_title("PATENT WATCH Q3");
//!     let stats = generate_report("watch.xlsx", "watch.docx", &config)?;
//!     println!("{} detail blocks", stats.detail_blocks);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Workbook input**: `.xlsx`, `.xlsm`, `.xlsb`, `.xls` and `.ods` via calamine
//! - **DOCX output**: internal links, bookmarks, fixed-width tables, inline images
//! - **Templates**: merge the report into an existing `.docx`
//! - **Pagination estimate**: forced page breaks keep detail blocks whole
//! - **JSON**: dump the parsed records or the report model

pub mod build;
pub mod config;
pub mod detect;
pub mod error;
pub mod fetch;
pub mod layout;
pub mod model;
pub mod reader;
pub mod render;

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Re-export commonly used types
pub use build::ReportBuilder;
pub use config::{PageGeometry, PartSelection, ReportConfig, ReportPart};
pub use detect::{detect_format_from_bytes, detect_format_from_path, ContainerFormat};
pub use error::{Error, Result};
pub use fetch::{DisabledFetcher, ImageFetcher};
pub use model::{
    Block, CellValue, Field, ImageIndex, PatentWorkbook, Record, RecordKind, ReportDocument,
};
pub use reader::WorkbookReader;
pub use render::{DocxOptions, DocxTemplate, GeneratedReport, JsonFormat, ReportStats};

use std::path::Path;

/// Read a workbook with the default configuration.
///
/// # Example
///
/// ```no_run
/// let workbook = patwatch::read_workbook("watch.xlsx").unwrap();
/// println!("Records: {}", workbook.record_count());
/// ```
pub fn read_workbook<P: AsRef<Path>>(path: P) -> Result<PatentWorkbook> {
    reader::read_workbook(path, &ReportConfig::default())
}

/// Read a workbook and write the report to `output`.
///
/// # Arguments
///
/// * `input` - Path to the workbook
/// * `output` - Path of the DOCX file to write
/// * `config` - Report configuration
pub fn generate_report<P: AsRef<Path>, Q: AsRef<Path>>(
    input: P,
    output: Q,
    config: &ReportConfig,
) -> Result<ReportStats> {
    PatentWatch::with_config(config.clone()).generate(input, output)
}

/// Read a workbook and serialize the report model as JSON.
///
/// # Example
///
/// ```no_run
/// use patwatch::{to_json, JsonFormat};
///
/// let json = to_json("watch.xlsx", JsonFormat::Pretty).unwrap();
/// std::fs::write("watch.json", json).unwrap();
/// ```
pub fn to_json<P: AsRef<Path>>(path: P, format: JsonFormat) -> Result<String> {
    let watch = PatentWatch::new().with_images(false);
    let workbook = watch.read(path)?;
    let report = watch.build(&workbook)?;
    render::to_json(&report, format)
}

/// Builder for reading workbooks and generating reports.
///
/// # Example
///
/// ```no_run
/// use patwatch::{PartSelection, PatentWatch};
///
/// let stats = PatentWatch::new()
///     .with_title("PATENT WATCH")
///     .with_images(false)
///     .with_parts(PartSelection::parse("title,fp-index")?)
///     .generate("watch.xlsx", "watch.docx")?;
/// # Ok::<(), patwatch::Error>(())
/// ```
pub struct PatentWatch {
    config: ReportConfig,
    fetcher: Option<Box<dyn ImageFetcher>>,
}

impl PatentWatch {
    /// Create a new builder with the default configuration.
    pub fn new() -> Self {
        Self::with_config(ReportConfig::default())
    }

    /// Create a builder with the given configuration.
    pub fn with_config(config: ReportConfig) -> Self {
        Self {
            config,
            fetcher: None,
        }
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.config = self.config.with_title(title);
        self
    }

    /// Merge the report into a DOCX template.
    pub fn with_template(mut self, path: impl Into<std::path::PathBuf>) -> Self {
        self.config = self.config.with_template(path);
        self
    }

    /// Select the report parts to generate.
    pub fn with_parts(mut self, parts: PartSelection) -> Self {
        self.config = self.config.with_parts(parts);
        self
    }

    /// Enable or disable image fetching.
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.config = self.config.with_images(enabled);
        self
    }

    /// Save fetched images into a directory.
    pub fn with_image_dir(mut self, dir: impl Into<std::path::PathBuf>) -> Self {
        self.config = self.config.with_image_dir(dir);
        self
    }

    /// Use a custom image fetcher.
    pub fn with_fetcher(mut self, fetcher: Box<dyn ImageFetcher>) -> Self {
        self.fetcher = Some(fetcher);
        self
    }

    /// The configuration in use.
    pub fn config(&self) -> &ReportConfig {
        &self.config
    }

    /// Read a workbook.
    pub fn read<P: AsRef<Path>>(&self, path: P) -> Result<PatentWorkbook> {
        WorkbookReader::new(&self.config).read_path(path)
    }

    /// Read a workbook from bytes.
    pub fn read_bytes(&self, data: Vec<u8>) -> Result<PatentWorkbook> {
        WorkbookReader::new(&self.config).read_bytes(data)
    }

    /// Build the report model.
    pub fn build(&self, workbook: &PatentWorkbook) -> Result<GeneratedReport> {
        self.build_with_progress(workbook, |_| {})
    }

    /// Build the report model, calling `on_record` after each detail block.
    pub fn build_with_progress<F: FnMut(&Record)>(
        &self,
        workbook: &PatentWorkbook,
        on_record: F,
    ) -> Result<GeneratedReport> {
        let (config, _) = self.resolve()?;
        let owned;
        let fetcher: &dyn ImageFetcher = match &self.fetcher {
            Some(fetcher) => fetcher.as_ref(),
            None => {
                owned = fetch::default_fetcher(&config.images)?;
                owned.as_ref()
            }
        };
        Ok(ReportBuilder::new(&config, workbook, fetcher)
            .on_record(on_record)
            .build())
    }

    /// Write a built report as a DOCX package.
    pub fn render(&self, report: &GeneratedReport) -> Result<Vec<u8>> {
        let (config, template) = self.resolve()?;
        let options = docx_options(&config);
        match template {
            Some(template) => template.render(&report.document, &options),
            None => render::to_docx(&report.document, &options),
        }
    }

    /// Read, build and write in one go. The output file is only written
    /// once the whole package has been built.
    pub fn generate<P: AsRef<Path>, Q: AsRef<Path>>(&self, input: P, output: Q) -> Result<ReportStats> {
        let workbook = self.read(input)?;
        let report = self.build(&workbook)?;
        let data = self.render(&report)?;
        let output = output.as_ref();
        std::fs::write(output, data)?;
        log::info!("Wrote {}", output.display());
        Ok(report.stats)
    }

    /// Configuration with the template's page geometry applied, plus the
    /// loaded template.
    fn resolve(&self) -> Result<(ReportConfig, Option<DocxTemplate>)> {
        let mut config = self.config.clone();
        let template = match &config.template {
            Some(path) => {
                let template = DocxTemplate::open(path)?;
                template.apply_geometry(&mut config.page)?;
                Some(template)
            }
            None => None,
        };
        config.validate()?;
        Ok((config, template))
    }
}

impl Default for PatentWatch {
    fn default() -> Self {
        Self::new()
    }
}

/// DOCX options matching a report configuration.
pub fn docx_options(config: &ReportConfig) -> DocxOptions {
    let options = DocxOptions::new().with_page(config.page);
    match &config.style.font_name {
        Some(font) => options.with_font(font.clone(), config.style.body_size),
        None => {
            let font = options.font_name.clone();
            options.with_font(font, config.style.body_size)
        }
    }
}
