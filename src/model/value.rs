//! Spreadsheet cell values.

use calamine::Data;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use unicode_normalization::UnicodeNormalization;

/// Display format for dates in the report (e.g. `04/Nov/2024`).
pub const DATE_DISPLAY_FORMAT: &str = "%d/%b/%Y";

/// Text layouts accepted as dates when a date column holds strings.
const DATE_TIME_INPUT_FORMATS: &[&str] = &["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];
const DATE_INPUT_FORMATS: &[&str] = &["%Y-%m-%d", "%d/%m/%Y", "%d-%b-%Y"];

/// A non-empty value read from a workbook cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CellValue {
    /// Free text (trimmed, NFC-normalized)
    Text(String),
    /// Numeric value
    Number(f64),
    /// Date or date-time value
    Date(NaiveDateTime),
}

impl CellValue {
    /// Create a text value, returning `None` for blank strings.
    pub fn text(s: &str) -> Option<Self> {
        let normalized: String = s.trim().nfc().collect();
        if normalized.is_empty() {
            None
        } else {
            Some(CellValue::Text(normalized))
        }
    }

    /// Convert a calamine cell. Empty, NaN and error cells become `None`.
    pub fn from_data(data: &Data) -> Option<Self> {
        match data {
            Data::Empty => None,
            Data::String(s) => Self::text(s),
            Data::Float(f) if f.is_nan() => None,
            Data::Float(f) => Some(CellValue::Number(*f)),
            Data::Int(i) => Some(CellValue::Number(*i as f64)),
            Data::Bool(b) => Some(CellValue::Text(if *b { "TRUE" } else { "FALSE" }.to_string())),
            Data::DateTime(dt) => match dt.as_datetime() {
                Some(value) => Some(CellValue::Date(value)),
                None => Some(CellValue::Number(dt.as_f64())),
            },
            Data::DateTimeIso(s) => parse_date_text(s)
                .map(CellValue::Date)
                .or_else(|| Self::text(s)),
            Data::DurationIso(s) => Self::text(s),
            Data::Error(e) => {
                log::debug!("Ignoring cell error value: {e:?}");
                None
            }
        }
    }

    /// Reinterpret text as a date when it matches a known layout.
    ///
    /// Anything that does not parse is kept as-is so the report still shows
    /// the source text.
    pub fn into_date_lenient(self) -> Self {
        match self {
            CellValue::Text(ref s) => match parse_date_text(s) {
                Some(date) => CellValue::Date(date),
                None => {
                    log::debug!("Keeping unparseable date text {s:?}");
                    self
                }
            },
            other => other,
        }
    }

    /// Text shown in the report for this value.
    pub fn display(&self) -> String {
        match self {
            CellValue::Text(s) => s.clone(),
            CellValue::Number(n) => format_number(*n),
            CellValue::Date(d) => d.format(DATE_DISPLAY_FORMAT).to_string(),
        }
    }

    /// Normalized key for joining records with the image lookup sheet.
    pub fn lookup_key(&self) -> String {
        self.display().trim().to_uppercase()
    }

    /// Character count of the displayed value.
    pub fn char_len(&self) -> usize {
        match self {
            CellValue::Text(s) => s.chars().count(),
            other => other.display().chars().count(),
        }
    }

    /// Check if this is a date value.
    pub fn is_date(&self) -> bool {
        matches!(self, CellValue::Date(_))
    }
}

impl std::fmt::Display for CellValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.display())
    }
}

/// Format a number, dropping the fractional part of integral values.
fn format_number(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        format!("{}", n)
    }
}

fn parse_date_text(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    for fmt in DATE_TIME_INPUT_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(dt);
        }
    }
    for fmt in DATE_INPUT_FORMATS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return d.and_hms_opt(0, 0, 0);
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_text_is_none() {
        assert_eq!(CellValue::text("   "), None);
        assert_eq!(CellValue::from_data(&Data::Empty), None);
        assert_eq!(CellValue::from_data(&Data::Float(f64::NAN)), None);
    }

    #[test]
    fn test_integral_numbers_display_without_fraction() {
        assert_eq!(CellValue::Number(12345.0).display(), "12345");
        assert_eq!(CellValue::Number(1.5).display(), "1.5");
        assert_eq!(
            CellValue::from_data(&Data::Int(7)).unwrap().display(),
            "7"
        );
    }

    #[test]
    fn test_date_text_is_reformatted() {
        let value = CellValue::text("2024-11-04 00:00:00")
            .unwrap()
            .into_date_lenient();
        assert!(value.is_date());
        assert_eq!(value.display(), "04/Nov/2024");
    }

    #[test]
    fn test_malformed_date_is_kept() {
        let value = CellValue::text("sometime in 2024")
            .unwrap()
            .into_date_lenient();
        assert_eq!(value, CellValue::Text("sometime in 2024".to_string()));
    }

    #[test]
    fn test_lookup_key_normalizes() {
        let a = CellValue::text(" us2024001a1 ").unwrap();
        let b = CellValue::Text("US2024001A1".to_string());
        assert_eq!(a.lookup_key(), b.lookup_key());
        assert_eq!(CellValue::Number(98765.0).lookup_key(), "98765");
    }

    #[test]
    fn test_char_len_counts_chars() {
        let value = CellValue::Text("é".repeat(10));
        assert_eq!(value.char_len(), 10);
    }
}
