//! Run and paragraph presets shared by the report parts.

use crate::config::StyleConfig;
use crate::model::{Alignment, LinkTarget, Paragraph, TableCell, TextRun, TextStyle};

/// Builds styled runs from the configured fonts and sizes.
#[derive(Debug, Clone, Copy)]
pub struct Styler<'a> {
    style: &'a StyleConfig,
}

impl<'a> Styler<'a> {
    /// Create a styler.
    pub fn new(style: &'a StyleConfig) -> Self {
        Self { style }
    }

    /// Configured style values.
    pub fn config(&self) -> &'a StyleConfig {
        self.style
    }

    fn base(&self, size: f32) -> TextStyle {
        TextStyle {
            font_name: self.style.font_name.clone(),
            font_size: Some(size),
            ..Default::default()
        }
    }

    /// Plain body text.
    pub fn body(&self, text: impl Into<String>) -> TextRun {
        TextRun::new(text).with_style(self.base(self.style.body_size))
    }

    /// Bold body text.
    pub fn bold(&self, text: impl Into<String>) -> TextRun {
        TextRun::new(text).with_style(TextStyle {
            bold: true,
            ..self.base(self.style.body_size)
        })
    }

    /// Bold text at a heading size.
    pub fn heading(&self, text: impl Into<String>, size: f32) -> TextRun {
        TextRun::new(text).with_style(TextStyle {
            bold: true,
            ..self.base(size)
        })
    }

    /// Link text: underlined and colored.
    pub fn link(&self, text: impl Into<String>) -> TextRun {
        TextRun::new(text).with_style(TextStyle {
            underline: true,
            color: Some(self.style.link_color.clone()),
            ..self.base(self.style.body_size)
        })
    }

    /// Paragraph with no spacing around it.
    pub fn tight(&self, paragraph: Paragraph) -> Paragraph {
        paragraph.spacing(0.0, 0.0)
    }

    /// Cell holding body text.
    pub fn text_cell(&self, text: impl Into<String>) -> TableCell {
        TableCell::paragraph(self.tight(Paragraph::with_run(self.body(text))))
    }

    /// Cell holding centered body text.
    pub fn centered_cell(&self, text: impl Into<String>) -> TableCell {
        TableCell::paragraph(
            self.tight(Paragraph::with_run(self.body(text))).align(Alignment::Center),
        )
    }

    /// Cell holding a link, or plain text when there is no target.
    pub fn link_cell(&self, text: impl Into<String>, target: Option<LinkTarget>) -> TableCell {
        TableCell::paragraph(self.tight(self.link_paragraph(text, target)))
    }

    /// Paragraph holding a link, or plain text when there is no target.
    pub fn link_paragraph(&self, text: impl Into<String>, target: Option<LinkTarget>) -> Paragraph {
        let text = text.into();
        match target {
            Some(target) if !text.is_empty() => {
                let mut p = Paragraph::new();
                p.add_link(self.link(text), target);
                p
            }
            _ => Paragraph::with_run(self.body(text)),
        }
    }

    /// The right-aligned `<<INDEX` line that leads back to the title page.
    pub fn index_link(&self, target: Option<LinkTarget>) -> Paragraph {
        self.tight(self.link_paragraph("<<INDEX", target))
            .align(Alignment::Right)
    }

    /// An empty spacer paragraph.
    pub fn blank(&self) -> Paragraph {
        Paragraph::new()
    }
}
