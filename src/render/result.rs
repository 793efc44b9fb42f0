//! Generation result with statistics.

use crate::model::ReportDocument;
use serde::{Deserialize, Serialize};

/// A built report and the statistics collected while building it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedReport {
    /// The report content
    pub document: ReportDocument,

    /// Build statistics
    pub stats: ReportStats,
}

impl GeneratedReport {
    /// Create a new result.
    pub fn new(document: ReportDocument, stats: ReportStats) -> Self {
        Self { document, stats }
    }
}

/// Statistics collected while building a report.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReportStats {
    /// First publication records read
    pub first_publications: u32,

    /// Granted patent records read
    pub granted_patents: u32,

    /// Detail blocks written
    pub detail_blocks: u32,

    /// Tables written
    pub table_count: u32,

    /// Top-level paragraphs written
    pub paragraph_count: u32,

    /// Page breaks forced by the pagination estimator
    pub forced_breaks: u32,

    /// Images embedded
    pub images_embedded: u32,

    /// Images that could not be fetched or decoded
    pub image_failures: u32,

    /// Records without a document link
    pub missing_links: u32,

    /// Records that match no configured category
    pub uncategorized: u32,
}

impl ReportStats {
    /// Create new empty statistics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment table count.
    pub fn add_table(&mut self) {
        self.table_count += 1;
    }

    /// Increment paragraph count.
    pub fn add_paragraph(&mut self) {
        self.paragraph_count += 1;
    }

    /// Increment forced break count.
    pub fn add_forced_break(&mut self) {
        self.forced_breaks += 1;
    }

    /// Increment embedded image count.
    pub fn add_image(&mut self) {
        self.images_embedded += 1;
    }

    /// Increment failed image count.
    pub fn add_image_failure(&mut self) {
        self.image_failures += 1;
    }

    /// Total records read.
    pub fn record_count(&self) -> u32 {
        self.first_publications + self.granted_patents
    }

    /// Merge another stats instance into this one.
    pub fn merge(&mut self, other: &ReportStats) {
        self.first_publications += other.first_publications;
        self.granted_patents += other.granted_patents;
        self.detail_blocks += other.detail_blocks;
        self.table_count += other.table_count;
        self.paragraph_count += other.paragraph_count;
        self.forced_breaks += other.forced_breaks;
        self.images_embedded += other.images_embedded;
        self.image_failures += other.image_failures;
        self.missing_links += other.missing_links;
        self.uncategorized += other.uncategorized;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_report_stats_merge() {
        let mut stats1 = ReportStats::new();
        stats1.table_count = 5;
        stats1.add_forced_break();

        let stats2 = ReportStats {
            table_count: 2,
            images_embedded: 4,
            first_publications: 3,
            ..Default::default()
        };

        stats1.merge(&stats2);

        assert_eq!(stats1.table_count, 7);
        assert_eq!(stats1.forced_breaks, 1);
        assert_eq!(stats1.images_embedded, 4);
        assert_eq!(stats1.record_count(), 3);
    }
}
