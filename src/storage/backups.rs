use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Backups smaller than this can't plausibly contain lost images, so
/// auto-detection ignores them
pub const AUTO_DETECT_MIN_BYTES: u64 = 5 * 1024 * 1024;

/// One timestamped backup file next to the config
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BackupInfo {
    pub path: PathBuf,
    pub file_name: String,
    pub size: u64,
}

impl BackupInfo {
    pub fn size_megabytes(&self) -> f64 {
        self.size as f64 / 1024.0 / 1024.0
    }
}

/// List `<config>.backup.*` files beside the config, sorted by file name.
/// The timestamp suffix sorts lexicographically, so this is oldest first.
pub fn list_backups(config_path: &Path) -> Result<Vec<BackupInfo>> {
    let dir = config_path.parent().context("Config path has no parent directory")?;
    let config_name =
        config_path.file_name().context("Config path has no file name")?.to_string_lossy();
    let prefix = format!("{}.backup.", config_name);

    let mut backups = Vec::new();
    let entries =
        fs::read_dir(dir).with_context(|| format!("Failed to read directory: {}", dir.display()))?;
    for entry in entries {
        let entry = entry.context("Failed to read directory entry")?;
        let file_name = entry.file_name().to_string_lossy().to_string();
        if !file_name.starts_with(&prefix) {
            continue;
        }
        let metadata = entry
            .metadata()
            .with_context(|| format!("Failed to read metadata for {}", file_name))?;
        if !metadata.is_file() {
            continue;
        }
        backups.push(BackupInfo { path: entry.path(), file_name, size: metadata.len() });
    }

    backups.sort_by(|a, b| a.file_name.cmp(&b.file_name));
    Ok(backups)
}

/// Pick the backup most likely to contain lost images: the largest one over
/// [`AUTO_DETECT_MIN_BYTES`]. Returns None when no backup qualifies.
pub fn auto_detect_backup(config_path: &Path) -> Result<Option<BackupInfo>> {
    let candidates = list_backups(config_path)?;
    Ok(candidates
        .into_iter()
        .filter(|b| b.size > AUTO_DETECT_MIN_BYTES)
        .max_by_key(|b| b.size))
}
