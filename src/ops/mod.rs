//! Top-level operations behind the CLI commands.
//!
//! Each operation is one run: load a snapshot, derive new structures, and
//! write results only at the end, behind a timestamped backup and an atomic
//! rename. Failures before the rename leave the original file untouched.

pub mod clean;
pub mod recover;

use std::path::{Path, PathBuf};

use anyhow::{Result, bail};

use crate::storage;
use crate::utils::find_claude_config;

pub use clean::run_clean;
pub use recover::run_recover;

/// Use the explicitly given config path, or fall back to platform discovery
fn resolve_config(config_file: Option<&Path>) -> Result<PathBuf> {
    match config_file {
        Some(path) => {
            if !path.exists() {
                bail!("Claude config file not found: {}", path.display());
            }
            Ok(path.to_path_buf())
        }
        None => find_claude_config(),
    }
}

/// Print the timestamped backups sitting next to the config file
pub fn run_list_backups(config_file: Option<&Path>) -> Result<()> {
    let config_path = resolve_config(config_file)?;
    let backups = storage::list_backups(&config_path)?;

    if backups.is_empty() {
        println!("No backup files found");
        return Ok(());
    }

    println!("Available backup files:");
    for backup in &backups {
        println!("  {} ({:.1} MB)", backup.file_name, backup.size_megabytes());
    }

    Ok(())
}
