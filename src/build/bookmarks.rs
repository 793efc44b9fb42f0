//! Bookmark naming.

use crate::model::{Field, Record, RecordKind};
use regex::Regex;
use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

/// Longest bookmark name Word accepts.
pub const MAX_BOOKMARK_LEN: usize = 40;

/// Anchor of the INDEX heading on the title page.
pub const INDEX_ANCHOR: &str = "index";

fn invalid_chars() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[^A-Za-z0-9_]+").expect("valid regex"))
}

/// Turn arbitrary text into a valid bookmark name.
///
/// Runs of disallowed characters become a single `_`; names that do not
/// start with a letter get a `b_` prefix; the result is cut to 40 characters.
pub fn sanitize_bookmark(raw: &str) -> String {
    let cleaned = invalid_chars().replace_all(raw.trim(), "_");
    let cleaned = cleaned.trim_matches('_');
    let mut name = if cleaned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        cleaned.to_string()
    } else {
        format!("b_{}", cleaned)
    };
    name.truncate(MAX_BOOKMARK_LEN);
    name
}

/// Hands out unique bookmark names and ids for one document.
#[derive(Debug, Default)]
pub struct BookmarkRegistry {
    next_id: u32,
    used: HashSet<String>,
    records: HashMap<(RecordKind, usize), String>,
}

impl BookmarkRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Next unused bookmark id.
    pub fn next_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Reserve a unique name derived from `raw`.
    pub fn reserve(&mut self, raw: &str) -> String {
        let base = sanitize_bookmark(raw);
        let mut name = base.clone();
        let mut n = 2;
        while self.used.contains(&name) {
            let suffix = format!("_{}", n);
            let mut stem = base.clone();
            stem.truncate(MAX_BOOKMARK_LEN - suffix.len());
            name = format!("{}{}", stem, suffix);
            n += 1;
        }
        self.used.insert(name.clone());
        name
    }

    /// Reserve the detail bookmark for a record, named from its number.
    pub fn assign_record(&mut self, record: &Record) -> String {
        let key = (record.kind, record.row);
        if let Some(name) = self.records.get(&key) {
            return name.clone();
        }
        let number = record.text(Field::Number);
        let raw = if number.is_empty() {
            format!("{}_row_{}", record.kind.bookmark_prefix(), record.row)
        } else {
            format!("{}_{}", record.kind.bookmark_prefix(), number)
        };
        let name = self.reserve(&raw);
        self.records.insert(key, name.clone());
        name
    }

    /// Detail bookmark of a record, if one was assigned.
    pub fn record_anchor(&self, record: &Record) -> Option<&str> {
        self.records
            .get(&(record.kind, record.row))
            .map(String::as_str)
    }
}
