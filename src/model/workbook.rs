//! Parsed workbook contents.

use super::{CellValue, Field, Record, RecordKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Records and lookup tables read from a patent watch workbook.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PatentWorkbook {
    /// Sheet names present in the workbook
    pub sheet_names: Vec<String>,

    /// First publication records, in sheet order
    pub first_publications: Vec<Record>,

    /// Granted patent records, in sheet order
    pub granted_patents: Vec<Record>,

    /// Image URL lookup table
    pub images: ImageIndex,
}

impl PatentWorkbook {
    /// Create an empty workbook.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records of one kind.
    pub fn records(&self, kind: RecordKind) -> &[Record] {
        match kind {
            RecordKind::FirstPublication => &self.first_publications,
            RecordKind::GrantedPatent => &self.granted_patents,
        }
    }

    /// Total number of records.
    pub fn record_count(&self) -> usize {
        self.first_publications.len() + self.granted_patents.len()
    }

    /// Records of one kind that match a category.
    pub fn in_category<'a>(
        &'a self,
        kind: RecordKind,
        category: &'a str,
    ) -> impl Iterator<Item = &'a Record> + 'a {
        self.records(kind)
            .iter()
            .filter(move |r| r.matches_category(category))
    }
}

/// Mapping from a record key (family number by default) to an image URL.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ImageIndex {
    entries: BTreeMap<String, String>,
}

impl ImageIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an entry. The first URL seen for a key wins.
    pub fn insert(&mut self, key: &CellValue, url: impl Into<String>) {
        let url = url.into();
        let url = url.trim();
        if url.is_empty() {
            return;
        }
        self.entries
            .entry(key.lookup_key())
            .or_insert_with(|| url.to_string());
    }

    /// Look up the image URL for a key value.
    pub fn lookup(&self, key: &CellValue) -> Option<&str> {
        self.entries.get(&key.lookup_key()).map(String::as_str)
    }

    /// Look up the image URL for a record using the given key field.
    pub fn for_record(&self, record: &Record, key_field: Field) -> Option<&str> {
        record.get(key_field).and_then(|key| self.lookup(key))
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the index is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_index_lookup() {
        let mut index = ImageIndex::new();
        index.insert(&CellValue::Number(4242.0), "https://img.example/a.png");
        index.insert(&CellValue::Number(4242.0), "https://img.example/b.png");
        index.insert(&CellValue::Number(7.0), "   ");

        assert_eq!(index.len(), 1);
        assert_eq!(
            index.lookup(&CellValue::Text("4242".to_string())),
            Some("https://img.example/a.png")
        );
        assert_eq!(index.lookup(&CellValue::Number(7.0)), None);
    }

    #[test]
    fn test_record_lookup_uses_key_field() {
        let mut index = ImageIndex::new();
        index.insert(&CellValue::Number(100.0), "https://img.example/100.png");

        let record = Record::new(RecordKind::GrantedPatent, 2).with(Field::FamilyNumber, "100");
        assert!(index.for_record(&record, Field::FamilyNumber).is_some());
        assert!(index.for_record(&record, Field::Number).is_none());
    }

    #[test]
    fn test_in_category() {
        let mut wb = PatentWorkbook::new();
        wb.first_publications.push(
            Record::new(RecordKind::FirstPublication, 2).with(Field::Category, "Land"),
        );
        wb.first_publications.push(
            Record::new(RecordKind::FirstPublication, 3).with(Field::Category, "Marine"),
        );

        assert_eq!(wb.in_category(RecordKind::FirstPublication, "land").count(), 1);
        assert_eq!(wb.in_category(RecordKind::GrantedPatent, "land").count(), 0);
        assert_eq!(wb.record_count(), 2);
    }
}
