//! DOCX rendering options.

use crate::config::PageGeometry;

/// Options for writing a DOCX package.
#[derive(Debug, Clone)]
pub struct DocxOptions {
    /// Page height and vertical margins
    pub page: PageGeometry,

    /// Page width in inches
    pub page_width: f64,

    /// Left margin in inches
    pub margin_left: f64,

    /// Right margin in inches
    pub margin_right: f64,

    /// Default font of the generated styles part
    pub font_name: String,

    /// Default font size in points
    pub font_size: f32,

    /// Prefix for relationship ids of generated parts
    pub rel_prefix: String,

    /// Prefix for generated media file names
    pub media_prefix: String,
}

impl DocxOptions {
    /// Create new options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the page geometry.
    pub fn with_page(mut self, page: PageGeometry) -> Self {
        self.page = page;
        self
    }

    /// Set the default font.
    pub fn with_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.font_name = name.into();
        self.font_size = size;
        self
    }

    /// Set the relationship id prefix.
    pub fn with_rel_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.rel_prefix = prefix.into();
        self
    }

    /// Width available between the side margins.
    pub fn text_width(&self) -> f64 {
        self.page_width - self.margin_left - self.margin_right
    }
}

impl Default for DocxOptions {
    fn default() -> Self {
        Self {
            page: PageGeometry::default(),
            page_width: 8.5,
            margin_left: 0.75,
            margin_right: 0.75,
            font_name: "Calibri".to_string(),
            font_size: 10.0,
            rel_prefix: "rId".to_string(),
            media_prefix: "pw_".to_string(),
        }
    }
}
