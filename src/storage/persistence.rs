use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::models::Document;
use crate::utils::run_timestamp;

/// Which operation a backup copy protects
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BackupKind {
    /// Taken before a normal clean overwrites the config
    Clean,
    /// Taken before a recovery merge overwrites the config
    Recovery,
}

impl BackupKind {
    fn suffix(&self) -> &'static str {
        match self {
            BackupKind::Clean => "backup",
            BackupKind::Recovery => "recovery-backup",
        }
    }
}

/// Load and parse a history document from disk
pub fn load_document(path: &Path) -> Result<Document> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("Failed to read document: {}", path.display()))?;
    Document::parse(&text).with_context(|| format!("Failed to parse {}", path.display()))
}

pub fn file_size(path: &Path) -> Result<u64> {
    let metadata = fs::metadata(path)
        .with_context(|| format!("Failed to read file metadata: {}", path.display()))?;
    Ok(metadata.len())
}

/// Copy the file at `path` to a timestamped sibling
/// (`<path>.backup.<YYYYMMDD_HHMMSS>` or `<path>.recovery-backup.<...>`)
/// and return the backup's path. A byte copy, so the backup keeps full
/// fidelity even if the original has formatting we would not re-emit.
pub fn write_backup(path: &Path, kind: BackupKind) -> Result<PathBuf> {
    let backup_path =
        PathBuf::from(format!("{}.{}.{}", path.display(), kind.suffix(), run_timestamp()));
    fs::copy(path, &backup_path)
        .with_context(|| format!("Failed to write backup: {}", backup_path.display()))?;
    Ok(backup_path)
}

/// Serialize a document and atomically replace the file at `path`.
///
/// The new content is fully written and synced to a temporary file in the
/// same directory before the rename, so any failure up to the final step
/// leaves the original file untouched.
pub fn save_document_atomic(path: &Path, document: &Document) -> Result<()> {
    let json = document.to_json_string()?;

    let temp_path = PathBuf::from(format!("{}.tmp", path.display()));
    let mut temp_file = File::create(&temp_path)
        .with_context(|| format!("Failed to create temp file: {}", temp_path.display()))?;
    temp_file
        .write_all(json.as_bytes())
        .with_context(|| format!("Failed to write temp file: {}", temp_path.display()))?;
    temp_file
        .sync_all()
        .with_context(|| format!("Failed to flush temp file: {}", temp_path.display()))?;
    drop(temp_file);

    fs::rename(&temp_path, path)
        .with_context(|| format!("Failed to replace document: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_load_save_roundtrip() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("claude.json");
        fs::write(&path, r#"{"/p":{"history":[{"display":"hi"}]}}"#).unwrap();

        let doc = load_document(&path).unwrap();
        save_document_atomic(&path, &doc).unwrap();

        let reloaded = load_document(&path).unwrap();
        assert_eq!(doc, reloaded);
        // No temp file left behind
        assert!(!dir.path().join("claude.json.tmp").exists());
    }

    #[test]
    fn test_load_document_missing_file() {
        let dir = TempDir::new().unwrap();
        assert!(load_document(&dir.path().join("nope.json")).is_err());
    }

    #[test]
    fn test_load_document_invalid_json() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("claude.json");
        fs::write(&path, "{ definitely not json").unwrap();
        assert!(load_document(&path).is_err());
    }

    #[test]
    fn test_write_backup_names_and_content() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("claude.json");
        fs::write(&path, r#"{"/p":{"history":[]}}"#).unwrap();

        let clean_backup = write_backup(&path, BackupKind::Clean).unwrap();
        let recovery_backup = write_backup(&path, BackupKind::Recovery).unwrap();

        let clean_name = clean_backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(clean_name.starts_with("claude.json.backup."));
        let recovery_name = recovery_backup.file_name().unwrap().to_string_lossy().to_string();
        assert!(recovery_name.starts_with("claude.json.recovery-backup."));

        assert_eq!(fs::read(&path).unwrap(), fs::read(&clean_backup).unwrap());
    }

    #[test]
    fn test_save_failure_leaves_original_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("subdir-that-does-not-exist").join("claude.json");
        let Ok(doc) = Document::parse(&json!({"/p": {"history": []}}).to_string()) else {
            panic!("fixture document must parse");
        };
        // Temp file creation fails; nothing is written anywhere
        assert!(save_document_atomic(&path, &doc).is_err());
        assert!(!path.exists());
    }
}
