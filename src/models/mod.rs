//! Data models for the history document and run reports.
//!
//! - [`Document`] - the parsed history file: ordered project map with
//!   opaque, pass-through records
//! - [`CleanReport`] - counters from a cleaning pass
//! - [`ExtractedImage`] - one payload persisted to disk
//! - [`DeltaReport`] / [`ProjectDelta`] - what the current document has
//!   that a backup doesn't

pub mod document;
pub mod report;

pub use document::{Document, HISTORY_KEY};
pub use report::{CleanReport, DeltaReport, ExtractedImage, ProjectDelta};
