use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

use super::resolve_config;
use crate::cleaner::{locate, lossless_clean};
use crate::images::ImageStore;
use crate::storage::{self, BackupKind};
use crate::utils::{default_images_dir, format_path_with_tilde};

/// Clean the config file: back it up, extract every image payload to disk,
/// and atomically replace the file with the cleaned document.
///
/// When nothing needed cleaning the config is left alone and the backup is
/// removed again.
pub fn run_clean(config_file: Option<&Path>, verbose: bool) -> Result<()> {
    let config_path = resolve_config(config_file)?;
    println!("Found Claude config: {}", format_path_with_tilde(&config_path));

    let images_root = default_images_dir()?;
    println!("Images will be saved to: {}", format_path_with_tilde(&images_root));

    let original_size = storage::file_size(&config_path)?;
    println!("Original file size: {:.1} MB", megabytes(original_size));

    let document = storage::load_document(&config_path)?;

    if verbose {
        let candidates: usize =
            document.projects().map(|(_, record)| locate(record).len()).sum();
        println!("Image payload candidates: {}", candidates);
    }

    // Backup goes first; the original is never touched without one
    let backup_path = storage::write_backup(&config_path, BackupKind::Clean)
        .context("Failed to back up config before cleaning")?;
    println!("Backup saved to: {}", backup_path.display());

    let mut store = ImageStore::new(&images_root);
    let (cleaned, report, extracted) = lossless_clean(&document, &mut store);

    if verbose {
        for image in &extracted {
            println!("  Extracted {} bytes to {}", image.byte_count, image.reference);
        }
    }

    println!();
    println!("Items cleaned: {}", report.items_cleaned);
    println!("Images extracted: {}", report.images_extracted);
    println!("Total size removed: {:.1} MB", report.removed_megabytes());
    if report.items_skipped > 0 {
        eprintln!("Warning: {} malformed payloads left in place", report.items_skipped);
    }
    if report.failed_extractions > 0 {
        eprintln!("Warning: {} images could not be written to disk", report.failed_extractions);
    }

    if report.items_cleaned == 0 {
        println!("No images found to clean.");
        fs::remove_file(&backup_path).context("Failed to remove unneeded backup")?;
        println!("Backup removed (no changes made)");
        return Ok(());
    }

    storage::save_document_atomic(&config_path, &cleaned)?;
    println!("Cleaned config saved!");

    let new_size = storage::file_size(&config_path)?;
    println!("New file size: {:.1} MB", megabytes(new_size));
    if original_size > 0 {
        let reduction = (1.0 - new_size as f64 / original_size as f64) * 100.0;
        println!("Size reduction: {:.1}%", reduction);
    }

    Ok(())
}

fn megabytes(bytes: u64) -> f64 {
    bytes as f64 / 1024.0 / 1024.0
}
