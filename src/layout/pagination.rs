//! Detail block height estimation and forced page breaks.

use crate::config::{PageGeometry, PaginationConfig};
use serde::Serialize;

/// Tolerance for comparing accumulated heights.
const EPSILON: f64 = 1e-9;

/// How a detail row contributes to the block height.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FieldHeight {
    /// One row of fixed height
    Fixed,
    /// Wrapped text of the given character length
    LongText {
        /// Character count of the text
        chars: usize,
    },
}

/// One row of a detail block as seen by the estimator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldLayout {
    /// Row label
    pub name: String,
    /// Height contribution
    pub height: FieldHeight,
}

impl FieldLayout {
    /// A fixed-height row.
    pub fn fixed(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            height: FieldHeight::Fixed,
        }
    }

    /// A long-text row with the given character count.
    pub fn long_text(name: impl Into<String>, chars: usize) -> Self {
        Self {
            name: name.into(),
            height: FieldHeight::LongText { chars },
        }
    }
}

/// Vertical space available for body content on one page, in inches.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageBudget {
    /// Usable height
    pub usable: f64,
}

impl PageBudget {
    /// Budget with an explicit usable height.
    pub fn new(usable: f64) -> Self {
        Self { usable }
    }

    /// Page height minus both margins and the reserved header.
    pub fn from_geometry(page: &PageGeometry) -> Self {
        Self::new(page.usable_height())
    }
}

/// Height estimator for detail blocks.
#[derive(Debug, Clone)]
pub struct Estimator {
    config: PaginationConfig,
}

impl Estimator {
    /// Create an estimator from pagination constants.
    pub fn new(config: PaginationConfig) -> Self {
        Self { config }
    }

    /// Pagination constants in use.
    pub fn config(&self) -> &PaginationConfig {
        &self.config
    }

    /// Check whether a row label names the long-text field.
    pub fn is_long_text(&self, label: &str) -> bool {
        label.trim().eq_ignore_ascii_case(self.config.long_text_label.trim())
    }

    /// Build the layout entry for a labelled row.
    pub fn field_layout(&self, label: &str, chars: usize) -> FieldLayout {
        if self.is_long_text(label) {
            FieldLayout::long_text(label, chars)
        } else {
            FieldLayout::fixed(label)
        }
    }

    /// Number of wrapped lines for text of the given length, at least one.
    pub fn text_lines(&self, chars: usize) -> usize {
        chars.div_ceil(self.config.chars_per_line.max(1)).max(1)
    }

    /// Estimated block height in inches.
    ///
    /// Fixed rows each count `row_height`; long text counts its wrapped line
    /// count times `line_height`; an image adds `max_image_height`; padding
    /// is always added.
    pub fn estimate_height(&self, fields: &[FieldLayout], has_image: bool) -> f64 {
        let rows: f64 = fields
            .iter()
            .map(|f| match f.height {
                FieldHeight::Fixed => self.config.row_height,
                FieldHeight::LongText { chars } => {
                    self.text_lines(chars) as f64 * self.config.line_height
                }
            })
            .sum();
        let image = if has_image {
            self.config.max_image_height
        } else {
            0.0
        };
        rows + image + self.config.padding
    }

    /// True when `required` fits into `remaining`.
    ///
    /// The comparison allows `required` to exceed `remaining` by up to
    /// 1e-9 in, so a block that fills the page exactly after floating point
    /// sums still fits. Anything larger does not.
    pub fn has_space(&self, remaining: f64, required: f64) -> bool {
        required <= remaining + EPSILON
    }

    /// Cursor after consuming `consumed` inches. Not clamped.
    pub fn advance(&self, cursor: f64, consumed: f64) -> f64 {
        cursor + consumed
    }

    /// Cursor after a forced break: the post-break header height.
    pub fn break_page(&self, _cursor: f64) -> f64 {
        self.config.header_height
    }
}

/// Outcome of placing a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BreakDecision {
    /// The block fits on the current page
    Fits,
    /// A page break must be written before the block
    BreakBefore,
}

/// Running position on the current page.
#[derive(Debug, Clone)]
pub struct PageCursor {
    estimator: Estimator,
    budget: PageBudget,
    position: f64,
    breaks: usize,
}

impl PageCursor {
    /// Start at the top of a page.
    pub fn new(estimator: Estimator, budget: PageBudget) -> Self {
        Self {
            estimator,
            budget,
            position: 0.0,
            breaks: 0,
        }
    }

    /// Height consumed on the current page.
    pub fn position(&self) -> f64 {
        self.position
    }

    /// Height left on the current page (negative after an oversized block).
    pub fn remaining(&self) -> f64 {
        self.budget.usable - self.position
    }

    /// Number of breaks forced so far.
    pub fn breaks(&self) -> usize {
        self.breaks
    }

    /// The estimator driving this cursor.
    pub fn estimator(&self) -> &Estimator {
        &self.estimator
    }

    /// Check whether `required` fits on the current page.
    pub fn has_space(&self, required: f64) -> bool {
        self.estimator.has_space(self.remaining(), required)
    }

    /// Consume vertical space.
    pub fn advance(&mut self, consumed: f64) {
        self.position = self.estimator.advance(self.position, consumed);
    }

    /// Record a forced break; the caller writes the break and header.
    pub fn break_page(&mut self) {
        self.position = self.estimator.break_page(self.position);
        self.breaks += 1;
    }

    /// Reset for a section that starts on a new page with a heading and an
    /// index line.
    pub fn start_section(&mut self) {
        let config = self.estimator.config();
        self.position = config.section_heading_height + config.header_height;
    }

    /// Check whether nothing but the page header has been placed.
    pub fn at_page_top(&self) -> bool {
        self.position <= self.estimator.config().header_height + EPSILON
    }

    /// Decide whether a block of `required` inches needs a break first, then
    /// account for it.
    ///
    /// A block that does not fit even on a fresh page is placed without a
    /// break when the cursor is already at the top.
    pub fn place(&mut self, required: f64) -> BreakDecision {
        let needed = required.max(self.estimator.config().min_block_height);
        let decision = if self.has_space(needed) || self.at_page_top() {
            BreakDecision::Fits
        } else {
            self.break_page();
            BreakDecision::BreakBefore
        };
        self.advance(required);
        decision
    }
}
