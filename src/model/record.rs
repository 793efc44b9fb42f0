//! Typed patent records.

use super::CellValue;
use serde::{Deserialize, Serialize};

/// Which record set a record was read from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Newly published applications
    FirstPublication,
    /// Granted patents
    GrantedPatent,
}

impl RecordKind {
    /// Human-readable section name ("First Publications").
    pub fn label(&self) -> &'static str {
        match self {
            RecordKind::FirstPublication => "First Publications",
            RecordKind::GrantedPatent => "Granted Patents",
        }
    }

    /// Upper-case section heading.
    pub fn heading(&self) -> &'static str {
        match self {
            RecordKind::FirstPublication => "FIRST PUBLICATIONS",
            RecordKind::GrantedPatent => "GRANTED PATENTS",
        }
    }

    /// Column header used for the record number in summary tables.
    pub fn number_label(&self) -> &'static str {
        match self {
            RecordKind::FirstPublication => "Publication No",
            RecordKind::GrantedPatent => "Patent No",
        }
    }

    /// Short prefix used in bookmark names.
    pub fn bookmark_prefix(&self) -> &'static str {
        match self {
            RecordKind::FirstPublication => "fp",
            RecordKind::GrantedPatent => "gp",
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// A record field that can be mapped from a workbook column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    /// Running serial number
    SerialNo,
    /// Patent family number
    FamilyNumber,
    /// Publication number or patent number
    Number,
    /// Kind code (A1, B2, ...)
    KindCode,
    /// Title
    Title,
    /// Publication date
    PublicationDate,
    /// Earliest priority date
    EarliestPriority,
    /// Assignee
    Assignee,
    /// Inventors
    Inventors,
    /// Category
    Category,
    /// IPC classification
    Ipc,
    /// Link to the patent document
    Link,
    /// Abstract text
    Abstract,
}

impl Field {
    /// Every field, in sheet order.
    pub const ALL: [Field; 13] = [
        Field::SerialNo,
        Field::FamilyNumber,
        Field::Number,
        Field::KindCode,
        Field::Title,
        Field::PublicationDate,
        Field::EarliestPriority,
        Field::Assignee,
        Field::Inventors,
        Field::Category,
        Field::Ipc,
        Field::Link,
        Field::Abstract,
    ];

    /// Whether values of this field are dates.
    pub fn is_date(&self) -> bool {
        matches!(self, Field::PublicationDate | Field::EarliestPriority)
    }
}

/// One patent or publication entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Source record set
    pub kind: RecordKind,
    /// 1-based row in the source sheet
    pub row: usize,
    /// Serial number
    pub serial_no: Option<CellValue>,
    /// Family number
    pub family_number: Option<CellValue>,
    /// Publication or patent number
    pub number: Option<CellValue>,
    /// Kind code
    pub kind_code: Option<CellValue>,
    /// Title
    pub title: Option<CellValue>,
    /// Publication date
    pub publication_date: Option<CellValue>,
    /// Earliest priority date
    pub earliest_priority: Option<CellValue>,
    /// Assignee
    pub assignee: Option<CellValue>,
    /// Inventors
    pub inventors: Option<CellValue>,
    /// Category
    pub category: Option<CellValue>,
    /// IPC classification
    pub ipc: Option<CellValue>,
    /// Link to the patent document
    pub link: Option<CellValue>,
    /// Abstract text
    pub abstract_text: Option<CellValue>,
}

impl Record {
    /// Create an empty record.
    pub fn new(kind: RecordKind, row: usize) -> Self {
        Self {
            kind,
            row,
            serial_no: None,
            family_number: None,
            number: None,
            kind_code: None,
            title: None,
            publication_date: None,
            earliest_priority: None,
            assignee: None,
            inventors: None,
            category: None,
            ipc: None,
            link: None,
            abstract_text: None,
        }
    }

    /// Get a field value.
    pub fn get(&self, field: Field) -> Option<&CellValue> {
        match field {
            Field::SerialNo => self.serial_no.as_ref(),
            Field::FamilyNumber => self.family_number.as_ref(),
            Field::Number => self.number.as_ref(),
            Field::KindCode => self.kind_code.as_ref(),
            Field::Title => self.title.as_ref(),
            Field::PublicationDate => self.publication_date.as_ref(),
            Field::EarliestPriority => self.earliest_priority.as_ref(),
            Field::Assignee => self.assignee.as_ref(),
            Field::Inventors => self.inventors.as_ref(),
            Field::Category => self.category.as_ref(),
            Field::Ipc => self.ipc.as_ref(),
            Field::Link => self.link.as_ref(),
            Field::Abstract => self.abstract_text.as_ref(),
        }
    }

    /// Set a field value. Date fields reinterpret date-like text.
    pub fn set(&mut self, field: Field, value: Option<CellValue>) {
        let value = if field.is_date() {
            value.map(CellValue::into_date_lenient)
        } else {
            value
        };
        let slot = match field {
            Field::SerialNo => &mut self.serial_no,
            Field::FamilyNumber => &mut self.family_number,
            Field::Number => &mut self.number,
            Field::KindCode => &mut self.kind_code,
            Field::Title => &mut self.title,
            Field::PublicationDate => &mut self.publication_date,
            Field::EarliestPriority => &mut self.earliest_priority,
            Field::Assignee => &mut self.assignee,
            Field::Inventors => &mut self.inventors,
            Field::Category => &mut self.category,
            Field::Ipc => &mut self.ipc,
            Field::Link => &mut self.link,
            Field::Abstract => &mut self.abstract_text,
        };
        *slot = value;
    }

    /// Set a field value and return self.
    pub fn with(mut self, field: Field, value: impl Into<String>) -> Self {
        let value = value.into();
        self.set(field, CellValue::text(&value));
        self
    }

    /// Displayed text of a field, empty when missing.
    pub fn text(&self, field: Field) -> String {
        self.get(field).map(CellValue::display).unwrap_or_default()
    }

    /// Check whether every field is empty.
    pub fn is_empty(&self) -> bool {
        Field::ALL.iter().all(|f| self.get(*f).is_none())
    }

    /// Case-insensitive substring match of a category name against the
    /// record's category cell.
    pub fn matches_category(&self, category: &str) -> bool {
        let needle = category.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.category
            .as_ref()
            .map(|c| c.display().to_lowercase().contains(&needle))
            .unwrap_or(false)
    }
}
