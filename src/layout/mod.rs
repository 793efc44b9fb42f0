//! Page layout estimation.
//!
//! The report has no access to a real layout engine, so the vertical space
//! of each detail block is approximated from its row count, the length of
//! its long-text field and whether it carries an image. A [`PageCursor`]
//! tracks the running total and decides when a manual page break has to be
//! written before the next block.

mod pagination;
mod units;

pub use pagination::{BreakDecision, Estimator, FieldHeight, FieldLayout, PageBudget, PageCursor};
pub use units::{emu_from_inches, inches_from_twips, twips_from_inches, EMU_PER_INCH, TWIPS_PER_INCH};
