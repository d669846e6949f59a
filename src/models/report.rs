use std::path::PathBuf;

use serde_json::Value;

use crate::images::ImageFormat;

/// Counters accumulated by a cleaning pass. Purely observational:
/// nothing here feeds back into what the cleaner does.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CleanReport {
    /// Payload strings replaced (extracted or discarded)
    pub items_cleaned: usize,
    /// Payloads successfully written to image files
    pub images_extracted: usize,
    /// Characters of payload text removed from the document
    pub bytes_removed: usize,
    /// Malformed payloads left in place
    pub items_skipped: usize,
    /// Confirmed images whose file write failed
    pub failed_extractions: usize,
}

impl CleanReport {
    pub fn removed_megabytes(&self) -> f64 {
        self.bytes_removed as f64 / 1024.0 / 1024.0
    }
}

/// One image recovered from the document and persisted to disk
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedImage {
    /// Relative reference embedded in the document marker
    pub reference: String,
    /// Absolute path the decoded bytes were written to
    pub path: PathBuf,
    pub format: ImageFormat,
    /// Decoded payload size in bytes
    pub byte_count: usize,
}

/// History found in the current document for one project that the backup
/// does not account for
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectDelta {
    pub project: String,
    /// New history items in current-document order, cloned from current
    pub new_items: Vec<Value>,
    /// Set when the backup's history was not a prefix of the current one,
    /// so positional matching fell back to the conservative policy
    pub diverged: bool,
}

/// Result of comparing the current document against a destructively
/// simulated backup
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeltaReport {
    /// Projects present in current but absent from backup, in current order
    pub new_projects: Vec<String>,
    /// Per-project new items for projects present in both documents
    pub changed: Vec<ProjectDelta>,
}

impl DeltaReport {
    /// True when current contains nothing the backup doesn't already cover
    pub fn is_empty(&self) -> bool {
        self.new_projects.is_empty() && self.changed.iter().all(|d| d.new_items.is_empty())
    }

    pub fn new_item_count(&self) -> usize {
        self.changed.iter().map(|d| d.new_items.len()).sum()
    }

    pub fn diverged_projects(&self) -> impl Iterator<Item = &str> {
        self.changed.iter().filter(|d| d.diverged).map(|d| d.project.as_str())
    }

    pub fn delta_for(&self, project: &str) -> Option<&ProjectDelta> {
        self.changed.iter().find(|d| d.project == project)
    }
}
