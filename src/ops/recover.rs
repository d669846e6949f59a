use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};

use super::resolve_config;
use crate::cleaner::{destructive_clean, lossless_clean};
use crate::images::ImageStore;
use crate::recovery::{diff, merge};
use crate::storage::{self, BackupKind};
use crate::utils::{default_images_dir, format_path_with_tilde};

/// Recover images from a full-fidelity backup and merge them with whatever
/// the current (already-cleaned) config has accumulated since.
///
/// The backup is destructively simulated to look like the legacy cleaner's
/// output, diffed against the current document to isolate new conversation
/// data, then losslessly cleaned; the merge appends the new data to the
/// recovered backup. The current file is backed up before being replaced.
pub fn run_recover(
    backup_file: Option<&Path>,
    config_file: Option<&Path>,
    verbose: bool,
) -> Result<()> {
    let config_path = resolve_config(config_file)?;
    let backup_path = resolve_backup(backup_file, &config_path)?;

    println!("Starting data recovery");
    println!(
        "  Backup file: {} ({:.1} MB)",
        backup_path.display(),
        storage::file_size(&backup_path)? as f64 / 1024.0 / 1024.0
    );
    println!(
        "  Current file: {} ({:.1} MB)",
        format_path_with_tilde(&config_path),
        storage::file_size(&config_path)? as f64 / 1024.0 / 1024.0
    );

    // Backup unreadable is fatal here, and only here; plain cleaning never
    // depends on one
    let backup_doc = storage::load_document(&backup_path)
        .context("Recovery requires a readable backup document")?;
    let current_doc = storage::load_document(&config_path)?;

    println!("Simulating destructive clean of backup...");
    let (backup_destructive, simulation) = destructive_clean(&backup_doc);
    if verbose {
        println!("  Simulation removed {} payloads", simulation.items_cleaned);
    }

    println!("Analyzing differences between current and backup...");
    let delta = diff(&current_doc, &backup_destructive);
    for project in &delta.new_projects {
        println!("  Found new project: {}", project);
    }
    for project_delta in &delta.changed {
        if !project_delta.new_items.is_empty() {
            println!(
                "  Found {} new history items in {}",
                project_delta.new_items.len(),
                project_delta.project
            );
        }
    }
    for project in delta.diverged_projects() {
        eprintln!(
            "Warning: history of {} diverged from the backup; keeping the backup's \
             version of the overlap and appending unmatched current items. Inspect manually.",
            project
        );
    }

    println!("Extracting images from backup...");
    let images_root = default_images_dir()?;
    let mut store = ImageStore::new(&images_root);
    let (backup_recovered, report, _extracted) = lossless_clean(&backup_doc, &mut store);
    println!("  Extracted {} images from backup", report.images_extracted);
    if report.failed_extractions > 0 {
        eprintln!("Warning: {} images could not be written to disk", report.failed_extractions);
    }

    let merged = merge(&backup_recovered, &delta, &current_doc);

    let recovery_backup = storage::write_backup(&config_path, BackupKind::Recovery)
        .context("Failed to back up current config before recovery")?;
    println!("Current file backed up to: {}", recovery_backup.display());

    storage::save_document_atomic(&config_path, &merged)?;

    println!();
    println!("Data recovery completed");
    println!("  Images recovered: {}", report.images_extracted);
    println!("  New projects added: {}", delta.new_projects.len());
    println!("  New history items merged: {}", delta.new_item_count());
    println!(
        "  Final file size: {:.1} MB",
        storage::file_size(&config_path)? as f64 / 1024.0 / 1024.0
    );
    println!("  Images location: {}", format_path_with_tilde(&images_root));

    Ok(())
}

fn resolve_backup(backup_file: Option<&Path>, config_path: &Path) -> Result<PathBuf> {
    match backup_file {
        Some(path) => {
            if !path.exists() {
                bail!("Backup file not found: {}", path.display());
            }
            Ok(path.to_path_buf())
        }
        None => {
            let detected = storage::auto_detect_backup(config_path)?.with_context(|| {
                "No suitable backup files found (none over 5 MB). \
                 Specify a backup file, or run list-backups to see what exists."
            })?;
            println!(
                "Auto-detected backup file: {} ({:.1} MB)",
                detected.file_name,
                detected.size_megabytes()
            );
            Ok(detected.path)
        }
    }
}
