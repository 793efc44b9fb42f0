//! Report configuration.
//!
//! Everything that differed between the old one-off report scripts (sheet
//! names, column headers, category lists, widths, pagination constants) is a
//! field here. Every field has a default, so a TOML file only needs to list
//! what it overrides.

mod parts;

pub use parts::{PartSelection, ReportPart};

use crate::error::{Error, Result};
use crate::model::{Field, RecordKind};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Top-level configuration for a report run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportConfig {
    /// Title shown on the title page
    pub title: String,

    /// Number of categories after which the company table repeats on the
    /// title page
    pub index_split: usize,

    /// Optional DOCX template to merge the report into
    pub template: Option<PathBuf>,

    /// Company names on the title page, one list per table row
    pub companies: Vec<Vec<String>>,

    /// Sheet names to look for
    pub sheets: SheetNames,

    /// Header aliases per record field
    pub columns: ColumnMap,

    /// Fields listed in detail blocks, per record kind
    pub details: DetailLayout,

    /// Categories in index order
    pub categories: Vec<CategorySpec>,

    /// Fonts, sizes and widths
    pub style: StyleConfig,

    /// Pagination estimator constants
    pub pagination: PaginationConfig,

    /// Page geometry (overridden by a template's section properties)
    pub page: PageGeometry,

    /// Image lookup and fetching behaviour
    pub images: ImageConfig,

    /// Report parts to generate
    #[serde(skip)]
    pub parts: PartSelection,
}

impl ReportConfig {
    /// Create a configuration with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Parse a configuration from TOML text.
    pub fn from_toml(content: &str) -> Result<Self> {
        let config: ReportConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize the configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::Config(e.to_string()))
    }

    /// Check values that would make the report unusable.
    pub fn validate(&self) -> Result<()> {
        if self.categories.is_empty() {
            return Err(Error::Config("at least one category is required".into()));
        }
        if self.pagination.chars_per_line == 0 {
            return Err(Error::Config("pagination.chars_per_line must be positive".into()));
        }
        if self.page.usable_height() <= 0.0 {
            return Err(Error::Config(format!(
                "page height {:.2} in leaves no room between margins",
                self.page.height
            )));
        }
        for (kind, widths) in [
            (RecordKind::FirstPublication, &self.style.fp_summary_widths),
            (RecordKind::GrantedPatent, &self.style.gp_summary_widths),
        ] {
            if widths.len() != SUMMARY_COLUMNS {
                return Err(Error::Config(format!(
                    "{} summary needs {} column widths, got {}",
                    kind,
                    SUMMARY_COLUMNS,
                    widths.len()
                )));
            }
        }
        Ok(())
    }

    /// Set the report title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Set the DOCX template.
    pub fn with_template(mut self, path: impl Into<PathBuf>) -> Self {
        self.template = Some(path.into());
        self
    }

    /// Set the report parts.
    pub fn with_parts(mut self, parts: PartSelection) -> Self {
        self.parts = parts;
        self
    }

    /// Enable or disable image fetching.
    pub fn with_images(mut self, enabled: bool) -> Self {
        self.images.enabled = enabled;
        self
    }

    /// Save fetched images into a directory.
    pub fn with_image_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.images.save_dir = Some(dir.into());
        self
    }

    /// Category names in index order.
    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    /// Summary column widths for a record kind.
    pub fn summary_widths(&self, kind: RecordKind) -> &[f32] {
        match kind {
            RecordKind::FirstPublication => &self.style.fp_summary_widths,
            RecordKind::GrantedPatent => &self.style.gp_summary_widths,
        }
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            title: "PATENT WATCH".to_string(),
            index_split: 5,
            template: None,
            companies: vec![
                strings(&["CGG", "WESTERNGECO", "PGS", "ION", "BGP/CNPC/PETROCHINA"]),
                strings(&[
                    "CHEVRON",
                    "HALLIBURTON/LANDMARK",
                    "FFA GEOTERIC",
                    "PARADIGM",
                    "WEATHERFORD",
                    "BAKER HUGHES",
                ]),
            ],
            sheets: SheetNames::default(),
            columns: ColumnMap::default(),
            details: DetailLayout::default(),
            categories: default_categories(),
            style: StyleConfig::default(),
            pagination: PaginationConfig::default(),
            page: PageGeometry::default(),
            images: ImageConfig::default(),
            parts: PartSelection::All,
        }
    }
}

/// Number of columns in a summary table.
pub const SUMMARY_COLUMNS: usize = 5;

/// Candidate sheet names; the first one present in the workbook is used.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SheetNames {
    /// First publications sheet
    pub first_publications: Vec<String>,
    /// Granted patents sheet
    pub granted_patents: Vec<String>,
    /// Image lookup sheet (optional)
    pub images: Vec<String>,
}

impl SheetNames {
    /// Candidates for a record kind.
    pub fn for_kind(&self, kind: RecordKind) -> &[String] {
        match kind {
            RecordKind::FirstPublication => &self.first_publications,
            RecordKind::GrantedPatent => &self.granted_patents,
        }
    }
}

impl Default for SheetNames {
    fn default() -> Self {
        Self {
            first_publications: strings(&["First Publication", "FP"]),
            granted_patents: strings(&["Granted", "Grant"]),
            images: strings(&["Sheet1"]),
        }
    }
}

/// Header aliases for each record field. Matching is trimmed and
/// case-insensitive.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    /// Serial number column
    pub serial_no: Vec<String>,
    /// Family number column
    pub family_number: Vec<String>,
    /// Publication number column (first publications)
    pub publication_no: Vec<String>,
    /// Patent number column (granted patents)
    pub patent_no: Vec<String>,
    /// Kind code column
    pub kind_code: Vec<String>,
    /// Title column
    pub title: Vec<String>,
    /// Publication date column
    pub publication_date: Vec<String>,
    /// Earliest priority date column
    pub earliest_priority: Vec<String>,
    /// Assignee column
    pub assignee: Vec<String>,
    /// Inventors column
    pub inventors: Vec<String>,
    /// Category column
    pub category: Vec<String>,
    /// IPC column
    pub ipc: Vec<String>,
    /// Document link column
    pub link: Vec<String>,
    /// Abstract column
    pub abstract_text: Vec<String>,
    /// Key column in the image lookup sheet
    pub image_key: Vec<String>,
    /// URL column in the image lookup sheet
    pub image_url: Vec<String>,
}

impl ColumnMap {
    /// Header aliases for a field of the given record kind.
    pub fn aliases(&self, kind: RecordKind, field: Field) -> &[String] {
        match field {
            Field::SerialNo => &self.serial_no,
            Field::FamilyNumber => &self.family_number,
            Field::Number => match kind {
                RecordKind::FirstPublication => &self.publication_no,
                RecordKind::GrantedPatent => &self.patent_no,
            },
            Field::KindCode => &self.kind_code,
            Field::Title => &self.title,
            Field::PublicationDate => &self.publication_date,
            Field::EarliestPriority => &self.earliest_priority,
            Field::Assignee => &self.assignee,
            Field::Inventors => &self.inventors,
            Field::Category => &self.category,
            Field::Ipc => &self.ipc,
            Field::Link => &self.link,
            Field::Abstract => &self.abstract_text,
        }
    }
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            serial_no: strings(&["Serial No", "Sl No", "S.No"]),
            family_number: strings(&["Family number", "Family No"]),
            publication_no: strings(&["Publication No", "Publication Number"]),
            patent_no: strings(&["Patent No", "Patent Number"]),
            kind_code: strings(&["Kind Code"]),
            title: strings(&["Title"]),
            publication_date: strings(&["Publication Date"]),
            earliest_priority: strings(&["Earliest Priority Date", "Earliest Priority"]),
            assignee: strings(&["Assignee"]),
            inventors: strings(&["Inventors", "Inventor"]),
            category: strings(&["Category"]),
            ipc: strings(&["IPC"]),
            link: strings(&["Patent Link", "PDF Document"]),
            abstract_text: strings(&["Abstract"]),
            image_key: strings(&["Family number"]),
            image_url: strings(&["Image"]),
        }
    }
}

/// One row of a detail block.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailField {
    /// Record field shown in the row
    pub field: Field,
    /// Label in the left column
    pub label: String,
}

impl DetailField {
    /// Create a detail row entry.
    pub fn new(field: Field, label: impl Into<String>) -> Self {
        Self {
            field,
            label: label.into(),
        }
    }
}

/// Detail block field lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetailLayout {
    /// Label of the image row
    pub image_label: String,
    /// Text shown for a link that is present
    pub link_text: String,
    /// Text shown when a record has no link
    pub no_link_text: String,
    /// Text shown when an image cannot be fetched
    pub image_placeholder: String,
    /// Rows for first publication details
    pub first_publication: Vec<DetailField>,
    /// Rows for granted patent details
    pub granted_patent: Vec<DetailField>,
}

impl DetailLayout {
    /// Detail rows for a record kind.
    pub fn fields(&self, kind: RecordKind) -> &[DetailField] {
        match kind {
            RecordKind::FirstPublication => &self.first_publication,
            RecordKind::GrantedPatent => &self.granted_patent,
        }
    }
}

impl Default for DetailLayout {
    fn default() -> Self {
        let common_tail = [
            DetailField::new(Field::KindCode, "Kind Code"),
            DetailField::new(Field::Title, "Title"),
            DetailField::new(Field::PublicationDate, "Publication Date"),
        ];
        let people = [
            DetailField::new(Field::Assignee, "Assignee"),
            DetailField::new(Field::Inventors, "Inventors"),
            DetailField::new(Field::Category, "Category"),
            DetailField::new(Field::Ipc, "IPC"),
            DetailField::new(Field::Link, "Patent Link"),
            DetailField::new(Field::Abstract, "Abstract"),
        ];

        let mut first_publication = vec![
            DetailField::new(Field::SerialNo, "Serial No"),
            DetailField::new(Field::Number, "Publication No"),
        ];
        first_publication.extend(common_tail.iter().cloned());
        first_publication.push(DetailField::new(Field::EarliestPriority, "Earliest Priority Date"));
        first_publication.extend(people.iter().cloned());

        let mut granted_patent = vec![
            DetailField::new(Field::SerialNo, "Serial No"),
            DetailField::new(Field::FamilyNumber, "Family number"),
            DetailField::new(Field::Number, "Patent No"),
        ];
        granted_patent.extend(common_tail.iter().cloned());
        granted_patent.push(DetailField::new(Field::EarliestPriority, "Earliest Priority"));
        granted_patent.extend(people.iter().cloned());

        Self {
            image_label: "Image".to_string(),
            link_text: "Link".to_string(),
            no_link_text: "No Link Available".to_string(),
            image_placeholder: "Image Not Available".to_string(),
            first_publication,
            granted_patent,
        }
    }
}

/// A category with its column width in the summary index table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategorySpec {
    /// Category name, matched as a case-insensitive substring
    pub name: String,
    /// Width of the category's cell in the index table, inches
    pub index_width: f32,
}

fn default_categories() -> Vec<CategorySpec> {
    [
        ("Seafloor", 0.69),
        ("Land", 0.58),
        ("Marine", 0.66),
        ("Microseismic & Multiphysics", 0.93),
        ("Processing", 0.78),
        ("Reservoir", 0.73),
        ("Geology", 0.69),
        ("Data Management & Computing", 0.95),
        ("Downhole", 0.76),
    ]
    .into_iter()
    .map(|(name, index_width)| CategorySpec {
        name: name.to_string(),
        index_width,
    })
    .collect()
}

/// Fonts, sizes (points) and widths (inches).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    /// Body font; `None` keeps the template's default
    pub font_name: Option<String>,
    /// Title size
    pub title_size: f32,
    /// Section heading size
    pub heading_size: f32,
    /// Detail section heading size
    pub detail_heading_size: f32,
    /// Table and body text size
    pub body_size: f32,
    /// Hyperlink color (hex)
    pub link_color: String,
    /// Detail label column width
    pub label_width: f32,
    /// Detail value column width
    pub value_width: f32,
    /// First publications summary column widths
    pub fp_summary_widths: Vec<f32>,
    /// Granted patents summary column widths
    pub gp_summary_widths: Vec<f32>,
    /// Cell width of the title page number tables
    pub index_cell_width: f32,
    /// Number of columns in the title page number tables
    pub index_columns: usize,
    /// Company table row height (exact)
    pub company_row_height: f32,
    /// Category row height in summary tables (exact)
    pub category_row_height: f32,
    /// Fixed row height of detail and title page tables (at least)
    pub row_height: f32,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            font_name: None,
            title_size: 14.0,
            heading_size: 12.0,
            detail_heading_size: 11.0,
            body_size: 10.0,
            link_color: "0563C1".to_string(),
            label_width: 1.38,
            value_width: 5.61,
            fp_summary_widths: vec![0.45, 1.13, 2.43, 1.35, 1.4],
            gp_summary_widths: vec![0.4, 1.08, 2.46, 1.38, 1.48],
            index_cell_width: 1.38,
            index_columns: 4,
            company_row_height: 0.37,
            category_row_height: 0.24,
            row_height: 0.28,
        }
    }
}

/// Pagination estimator constants, in inches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Height of each fixed detail row
    pub row_height: f64,
    /// Characters per line of long text
    pub chars_per_line: usize,
    /// Height of one long-text line
    pub line_height: f64,
    /// Label of the field whose height grows with its text
    pub long_text_label: String,
    /// Height reserved for an image row
    pub max_image_height: f64,
    /// Padding added to every block
    pub padding: f64,
    /// Height of the `<<INDEX` line written after a forced break
    pub header_height: f64,
    /// Height of a detail section heading
    pub section_heading_height: f64,
    /// Minimum free space needed to start a new block
    pub min_block_height: f64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            row_height: 0.28,
            chars_per_line: 100,
            line_height: 0.2,
            long_text_label: "Abstract".to_string(),
            max_image_height: 3.0,
            padding: 0.2,
            header_height: 0.4,
            section_heading_height: 0.6,
            min_block_height: 0.3,
        }
    }
}

/// Page geometry in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    /// Page height
    pub height: f64,
    /// Top margin
    pub margin_top: f64,
    /// Bottom margin
    pub margin_bottom: f64,
    /// Space reserved for a running page header
    pub header_reserve: f64,
}

impl PageGeometry {
    /// Height available for body content.
    pub fn usable_height(&self) -> f64 {
        self.height - self.margin_top - self.margin_bottom - self.header_reserve
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            height: 11.0,
            margin_top: 1.0,
            margin_bottom: 1.0,
            header_reserve: 0.0,
        }
    }
}

/// Image lookup and fetching settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Fetch and embed images
    pub enabled: bool,
    /// Record field joined against the lookup sheet key column
    pub key_field: Field,
    /// Maximum display width, inches
    pub max_width: f32,
    /// Maximum display height, inches
    pub max_height: f32,
    /// Download timeout, seconds
    pub timeout_secs: u64,
    /// User agent sent with image requests
    pub user_agent: String,
    /// Directory where fetched images are also saved
    pub save_dir: Option<PathBuf>,
    /// Read image URLs that are not http(s) as local file paths
    pub allow_local_files: bool,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            key_field: Field::FamilyNumber,
            max_width: 5.61,
            max_height: 3.0,
            timeout_secs: 30,
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            save_dir: None,
            allow_local_files: false,
        }
    }
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
