//! Report part selection.

use crate::error::{Error, Result};
use crate::model::RecordKind;
use std::fmt;

/// A separately selectable part of the report, in document order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ReportPart {
    /// Title page with the category index
    Title,
    /// First publications summary table
    FirstPublicationIndex,
    /// Granted patents summary table
    GrantedIndex,
    /// First publication detail blocks
    FirstPublicationDetails,
    /// Granted patent detail blocks
    GrantedDetails,
}

impl ReportPart {
    /// Every part in document order.
    pub const ALL: [ReportPart; 5] = [
        ReportPart::Title,
        ReportPart::FirstPublicationIndex,
        ReportPart::GrantedIndex,
        ReportPart::FirstPublicationDetails,
        ReportPart::GrantedDetails,
    ];

    /// Short name used on the command line.
    pub fn name(&self) -> &'static str {
        match self {
            ReportPart::Title => "title",
            ReportPart::FirstPublicationIndex => "fp-index",
            ReportPart::GrantedIndex => "gp-index",
            ReportPart::FirstPublicationDetails => "fp-details",
            ReportPart::GrantedDetails => "gp-details",
        }
    }

    /// Summary part for a record kind.
    pub fn index_for(kind: RecordKind) -> Self {
        match kind {
            RecordKind::FirstPublication => ReportPart::FirstPublicationIndex,
            RecordKind::GrantedPatent => ReportPart::GrantedIndex,
        }
    }

    /// Detail part for a record kind.
    pub fn details_for(kind: RecordKind) -> Self {
        match kind {
            RecordKind::FirstPublication => ReportPart::FirstPublicationDetails,
            RecordKind::GrantedPatent => ReportPart::GrantedDetails,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|p| p.name() == name)
    }
}

impl fmt::Display for ReportPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Which report parts to generate.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum PartSelection {
    /// Generate the whole report
    #[default]
    All,
    /// Generate only the listed parts (kept in document order)
    Parts(Vec<ReportPart>),
}

impl PartSelection {
    /// Check if a part should be generated.
    pub fn includes(&self, part: ReportPart) -> bool {
        match self {
            PartSelection::All => true,
            PartSelection::Parts(parts) => parts.contains(&part),
        }
    }

    /// Parse a part list (e.g., "all", "title,fp-index", "details").
    ///
    /// `index` and `details` expand to both record kinds.
    pub fn parse(s: &str) -> Result<Self> {
        let s = s.trim();

        if s.is_empty() || s.eq_ignore_ascii_case("all") {
            return Ok(PartSelection::All);
        }

        let mut parts = Vec::new();
        for item in s.split(',') {
            let item = item.trim();
            if item.is_empty() {
                continue;
            }
            let expanded: Vec<ReportPart> = match item.to_ascii_lowercase().as_str() {
                "index" => vec![ReportPart::FirstPublicationIndex, ReportPart::GrantedIndex],
                "details" => vec![
                    ReportPart::FirstPublicationDetails,
                    ReportPart::GrantedDetails,
                ],
                _ => vec![ReportPart::from_name(item)
                    .ok_or_else(|| Error::InvalidPartSelection(item.to_string()))?],
            };
            for part in expanded {
                if !parts.contains(&part) {
                    parts.push(part);
                }
            }
        }

        if parts.is_empty() {
            return Err(Error::InvalidPartSelection(s.to_string()));
        }
        parts.sort();
        Ok(PartSelection::Parts(parts))
    }
}
