//! Document load/save with atomic writes, and timestamped backup handling.
//!
//! Write discipline: the original file is never modified until a full
//! backup copy exists and the new content has been completely written to a
//! temporary file; only then is the temp file renamed over the target.

pub mod backups;
pub mod persistence;

pub use backups::{AUTO_DETECT_MIN_BYTES, BackupInfo, auto_detect_backup, list_backups};
pub use persistence::{BackupKind, file_size, load_document, save_document_atomic, write_backup};
