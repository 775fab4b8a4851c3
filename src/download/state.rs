//! Download state tracking.

use crate::fs::ExpandSummary;

/// Per-run statistics for one fan club.
#[derive(Debug, Default)]
pub struct DownloadState {
    pub fan_club_id: String,

    // Crawl
    pub pages_scanned: u64,
    pub posts_resolved: u64,
    pub items_planned: u64,

    // Download
    pub downloaded: u64,
    pub bytes_downloaded: u64,
    pub denied: u64,
    pub failed: u64,

    // Archives
    pub archives_expanded: u64,
    pub archives_corrupt: u64,
    pub entries_extracted: u64,
    pub entries_skipped: u64,
    pub files_consolidated: u64,
}

impl DownloadState {
    /// Create a new download state for a fan club.
    pub fn new(fan_club_id: impl Into<String>) -> Self {
        Self {
            fan_club_id: fan_club_id.into(),
            ..Default::default()
        }
    }

    /// Record a written file.
    pub fn record_download(&mut self, bytes: u64) {
        self.downloaded += 1;
        self.bytes_downloaded += bytes;
    }

    /// Increment denied count.
    pub fn increment_denied(&mut self) {
        self.denied += 1;
    }

    /// Increment failed count.
    pub fn increment_failed(&mut self) {
        self.failed += 1;
    }

    /// Fold in the result of archive expansion.
    pub fn add_expand_summary(&mut self, summary: &ExpandSummary) {
        self.archives_expanded += summary.archives;
        self.archives_corrupt += summary.corrupt;
        self.entries_extracted += summary.extracted;
        self.entries_skipped += summary.skipped;
    }
}
