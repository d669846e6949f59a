//! Payload location and document cleaning.
//!
//! # Error Handling Strategy
//!
//! Cleaning follows the same graceful-degradation policy as the rest of the
//! tool: one bad payload never aborts a run. A payload that fails to decode
//! is left exactly as it was and counted as skipped; an image whose file
//! write fails is discarded with `[IMAGE_REMOVED]` rather than leaving a
//! dangling file reference; everything else proceeds. Warnings go to stderr,
//! counters go into the [`CleanReport`](crate::models::CleanReport).

pub mod locator;
pub mod walk;

/// Replacement for a payload whose bytes were extracted to a file;
/// the file reference sits between the prefix and the closing bracket
pub const IMAGE_FILE_PREFIX: &str = "[IMAGE_FILE:";
pub const IMAGE_FILE_CLOSE: &str = "]";

/// Replacement for a payload that was discarded outright
pub const IMAGE_REMOVED_MARKER: &str = "[IMAGE_REMOVED]";

/// True for marker strings a previous cleaning pass (either mode) left behind
pub fn is_clean_marker(s: &str) -> bool {
    s == IMAGE_REMOVED_MARKER || (s.starts_with(IMAGE_FILE_PREFIX) && s.ends_with(IMAGE_FILE_CLOSE))
}

pub use locator::{PayloadKind, PayloadPath, PathSegment, RAW_BASE64_MIN_CHARS, classify, locate};
pub use walk::{destructive_clean, lossless_clean};
