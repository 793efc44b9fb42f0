//! Paragraph and text-level types.

use serde::{Deserialize, Serialize};

/// A paragraph of report content.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Paragraph {
    /// Inline content in the paragraph
    pub content: Vec<InlineContent>,

    /// Paragraph style
    pub style: ParagraphStyle,
}

impl Paragraph {
    /// Create a new empty paragraph.
    pub fn new() -> Self {
        Self {
            content: Vec::new(),
            style: ParagraphStyle::default(),
        }
    }

    /// Create a paragraph with plain text.
    pub fn with_text(text: impl Into<String>) -> Self {
        let mut p = Self::new();
        p.add_text(text);
        p
    }

    /// Create a paragraph holding a single styled run.
    pub fn with_run(run: TextRun) -> Self {
        let mut p = Self::new();
        p.add_run(run);
        p
    }

    /// Set alignment and return self.
    pub fn align(mut self, alignment: Alignment) -> Self {
        self.style.alignment = alignment;
        self
    }

    /// Set spacing (points) and return self.
    pub fn spacing(mut self, before: f32, after: f32) -> Self {
        self.style.space_before = Some(before);
        self.style.space_after = Some(after);
        self
    }

    /// Keep this paragraph on the same page as the next block.
    pub fn keep_with_next(mut self) -> Self {
        self.style.keep_with_next = true;
        self
    }

    /// Add plain text to the paragraph.
    pub fn add_text(&mut self, text: impl Into<String>) {
        self.content.push(InlineContent::Text(TextRun::new(text)));
    }

    /// Add a styled text run.
    pub fn add_run(&mut self, run: TextRun) {
        self.content.push(InlineContent::Text(run));
    }

    /// Add a tab stop.
    pub fn add_tab(&mut self) {
        self.content.push(InlineContent::Tab);
    }

    /// Add a hyperlink.
    pub fn add_link(&mut self, run: TextRun, target: LinkTarget) {
        self.content.push(InlineContent::Link { run, target });
    }

    /// Add an inline image sized in inches.
    pub fn add_image(&mut self, resource_id: impl Into<String>, width: f32, height: f32) {
        self.content.push(InlineContent::Image {
            resource_id: resource_id.into(),
            width,
            height,
        });
    }

    /// Wrap the current content in a bookmark.
    pub fn wrap_in_bookmark(&mut self, id: u32, name: impl Into<String>) {
        self.content.insert(
            0,
            InlineContent::BookmarkStart {
                id,
                name: name.into(),
            },
        );
        self.content.push(InlineContent::BookmarkEnd { id });
    }

    /// Get plain text content of the paragraph.
    #[cfg(test)]
    pub fn plain_text(&self) -> String {
        self.content
            .iter()
            .map(|c| match c {
                InlineContent::Text(run) => run.text.clone(),
                InlineContent::Tab => "\t".to_string(),
                InlineContent::Link { run, .. } => run.text.clone(),
                InlineContent::Image { .. }
                | InlineContent::BookmarkStart { .. }
                | InlineContent::BookmarkEnd { .. } => String::new(),
            })
            .collect()
    }

    /// Iterate over link targets in the paragraph.
    pub fn links(&self) -> impl Iterator<Item = &LinkTarget> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::Link { target, .. } => Some(target),
            _ => None,
        })
    }

    /// Iterate over bookmark names declared in the paragraph.
    pub fn bookmarks(&self) -> impl Iterator<Item = &str> {
        self.content.iter().filter_map(|c| match c {
            InlineContent::BookmarkStart { name, .. } => Some(name.as_str()),
            _ => None,
        })
    }
}

impl Default for Paragraph {
    fn default() -> Self {
        Self::new()
    }
}

/// Inline content within a paragraph.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InlineContent {
    /// A text run with styling
    Text(TextRun),

    /// A tab character
    Tab,

    /// A hyperlink
    Link {
        /// Link text and style
        run: TextRun,
        /// Where the link points
        target: LinkTarget,
    },

    /// An inline image
    Image {
        /// Resource ID
        resource_id: String,
        /// Display width in inches
        width: f32,
        /// Display height in inches
        height: f32,
    },

    /// Start of a named bookmark
    BookmarkStart {
        /// Unique bookmark id
        id: u32,
        /// Bookmark name (link anchor)
        name: String,
    },

    /// End of a bookmark
    BookmarkEnd {
        /// Id of the matching start
        id: u32,
    },
}

/// Destination of a hyperlink.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum LinkTarget {
    /// An external URL
    External(String),
    /// A bookmark inside the document
    Anchor(String),
}

/// A run of text with consistent styling.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Text styling
    pub style: TextStyle,
}

impl TextRun {
    /// Create a new text run with default style.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            style: TextStyle::default(),
        }
    }

    /// Create a bold text run.
    pub fn bold(text: impl Into<String>) -> Self {
        Self::new(text).with_style(TextStyle {
            bold: true,
            ..Default::default()
        })
    }

    /// Replace the style and return self.
    pub fn with_style(mut self, style: TextStyle) -> Self {
        self.style = style;
        self
    }

    /// Set font size in points and return self.
    pub fn size(mut self, points: f32) -> Self {
        self.style.font_size = Some(points);
        self
    }
}

/// Text styling properties.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Bold text
    pub bold: bool,

    /// Italic text
    pub italic: bool,

    /// Underlined text
    pub underline: bool,

    /// Rendered in capitals
    pub all_caps: bool,

    /// Font name
    pub font_name: Option<String>,

    /// Font size in points
    pub font_size: Option<f32>,

    /// Text color (hex, e.g. "0563C1")
    pub color: Option<String>,
}

impl TextStyle {
    /// Check if any styling is applied.
    pub fn has_styling(&self) -> bool {
        self.bold
            || self.italic
            || self.underline
            || self.all_caps
            || self.font_name.is_some()
            || self.font_size.is_some()
            || self.color.is_some()
    }
}

/// Paragraph styling properties.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParagraphStyle {
    /// Text alignment
    pub alignment: Alignment,

    /// Space before paragraph in points
    pub space_before: Option<f32>,

    /// Space after paragraph in points
    pub space_after: Option<f32>,

    /// Keep on the same page as the next paragraph
    pub keep_with_next: bool,
}

/// Text alignment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left alignment (default)
    #[default]
    Left,
    /// Center alignment
    Center,
    /// Right alignment
    Right,
    /// Justified alignment
    Justify,
}
