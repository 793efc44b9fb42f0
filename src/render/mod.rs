//! Rendering module for writing reports as DOCX or JSON.

mod docx;
mod json;
mod options;
mod result;
mod template;
mod xml;

pub use docx::{to_docx, write_docx, DocxRenderer, MediaPart, Relationship, RenderedBody};
pub use json::{to_json, JsonFormat};
pub use options::DocxOptions;
pub use result::{GeneratedReport, ReportStats};
pub use template::DocxTemplate;
