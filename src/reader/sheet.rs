//! Mapping worksheet rows to records.

use crate::config::ColumnMap;
use crate::model::{CellValue, Field, ImageIndex, Record, RecordKind};
use calamine::{Data, Range};
use std::collections::BTreeMap;

/// Column positions resolved from a sheet's header row.
#[derive(Debug, Clone, Default)]
pub struct HeaderIndex {
    positions: BTreeMap<Field, usize>,
    missing: Vec<Field>,
}

impl HeaderIndex {
    /// Resolve each field's column from the header cells.
    pub fn resolve(headers: &[Data], columns: &ColumnMap, kind: RecordKind) -> Self {
        let names: Vec<String> = headers.iter().map(normalize_header).collect();
        let mut index = HeaderIndex::default();

        for field in Field::ALL {
            let aliases = columns.aliases(kind, field);
            let found = aliases.iter().find_map(|alias| {
                let alias = alias.trim().to_lowercase();
                names.iter().position(|name| *name == alias)
            });
            match found {
                Some(col) => {
                    index.positions.insert(field, col);
                }
                None => index.missing.push(field),
            }
        }
        index
    }

    /// Column of a field, if present.
    pub fn column(&self, field: Field) -> Option<usize> {
        self.positions.get(&field).copied()
    }

    /// Fields with no matching column.
    pub fn missing(&self) -> &[Field] {
        &self.missing
    }
}

fn normalize_header(cell: &Data) -> String {
    CellValue::from_data(cell)
        .map(|v| v.display().to_lowercase())
        .unwrap_or_default()
}

/// Read records from a sheet whose first row holds the headers.
///
/// Missing columns are logged once and read as empty. Rows with no value in
/// any mapped column are skipped.
pub fn read_records(
    range: &Range<Data>,
    columns: &ColumnMap,
    kind: RecordKind,
    sheet_name: &str,
) -> Vec<Record> {
    let mut rows = range.rows();
    let Some(headers) = rows.next() else {
        log::warn!("Sheet '{}' is empty", sheet_name);
        return Vec::new();
    };

    let header_index = HeaderIndex::resolve(headers, columns, kind);
    for field in header_index.missing() {
        // Family numbers only exist on the granted sheet.
        if *field == Field::FamilyNumber && kind == RecordKind::FirstPublication {
            continue;
        }
        log::warn!(
            "Sheet '{}' has no column for {:?} (looked for {}); values will be empty",
            sheet_name,
            field,
            columns.aliases(kind, *field).join(", ")
        );
    }

    let first_row = range.start().map(|(row, _)| row as usize).unwrap_or(0);
    let mut records = Vec::new();

    for (offset, cells) in rows.enumerate() {
        // Header is row `first_row`, data starts one below; rows are 1-based.
        let row_number = first_row + offset + 2;
        let mut record = Record::new(kind, row_number);
        for field in Field::ALL {
            let value = header_index
                .column(field)
                .and_then(|col| cells.get(col))
                .and_then(CellValue::from_data);
            record.set(field, value);
        }

        if record.is_empty() {
            log::debug!("Skipping empty row {} in '{}'", row_number, sheet_name);
            continue;
        }
        records.push(record);
    }

    log::debug!("Read {} {} from '{}'", records.len(), kind, sheet_name);
    records
}

/// Read the image lookup table (key column to URL column).
pub fn read_image_index(range: &Range<Data>, columns: &ColumnMap, sheet_name: &str) -> ImageIndex {
    let mut index = ImageIndex::new();
    let mut rows = range.rows();
    let Some(headers) = rows.next() else {
        return index;
    };

    let names: Vec<String> = headers.iter().map(normalize_header).collect();
    let find = |aliases: &[String]| {
        aliases
            .iter()
            .find_map(|a| names.iter().position(|n| *n == a.trim().to_lowercase()))
    };
    let (Some(key_col), Some(url_col)) = (find(&columns.image_key), find(&columns.image_url))
    else {
        log::warn!(
            "Image sheet '{}' needs columns {} and {}; no images will be embedded",
            sheet_name,
            columns.image_key.join("/"),
            columns.image_url.join("/")
        );
        return index;
    };

    for cells in rows {
        let key = cells.get(key_col).and_then(CellValue::from_data);
        let url = cells.get(url_col).and_then(CellValue::from_data);
        if let (Some(key), Some(url)) = (key, url) {
            index.insert(&key, url.display());
        }
    }

    log::debug!("Read {} image entries from '{}'", index.len(), sheet_name);
    index
}
