/// CLI binary integration tests using assert_cmd
///
/// These tests invoke the actual binary and verify command-line behavior
mod common;

use std::fs;
use std::process::Command;

use assert_cmd::prelude::*;
use predicates::prelude::*;
use tempfile::TempDir;

use claude_history_image_cleaner::cleaner::destructive_clean;
use common::*;

fn cleaner_cmd(home: &TempDir, images: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_claude-history-image-cleaner"));
    cmd.env("HOME", home.path());
    cmd.env("CLAUDE_HISTORY_IMAGES_DIR", images.path());
    cmd
}

#[test]
fn test_cli_clean_extracts_and_rewrites_config() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();
    let config_path = ConfigBuilder::new()
        .with_project(
            "/Users/test/webapp",
            vec![history_item_with_payload("shot", &data_uri("png", &png_bytes(4_000)))],
        )
        .write_to(home.path());

    cleaner_cmd(&home, &images)
        .arg("clean")
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Images extracted: 1"))
        .stdout(predicate::str::contains("Cleaned config saved!"));

    // Config now references the file instead of carrying the payload
    let rewritten = fs::read_to_string(&config_path).unwrap();
    assert!(rewritten.contains("[IMAGE_FILE:"));
    assert!(!rewritten.contains("data:image/png"));

    // A timestamped backup sits next to the config
    let backups: Vec<_> = fs::read_dir(home.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
        .collect();
    assert_eq!(backups.len(), 1);

    // And the image file landed under the images root
    assert!(fs::read_dir(images.path()).unwrap().next().is_some());
}

#[test]
fn test_cli_clean_without_images_removes_backup() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();
    let config_path = ConfigBuilder::new()
        .with_project("/Users/test/app", vec![history_item("no images here")])
        .write_to(home.path());

    cleaner_cmd(&home, &images)
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No images found to clean."))
        .stdout(predicate::str::contains("Backup removed (no changes made)"));

    let backups: Vec<_> = fs::read_dir(home.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".backup."))
        .collect();
    assert!(backups.is_empty());
}

#[test]
fn test_cli_recover_merges_backup_and_current() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();

    // The full-fidelity backup still carries the payload
    let backup_doc = ConfigBuilder::new()
        .with_project(
            "/Users/test/app",
            vec![
                history_item_with_payload("img", &data_uri("png", &png_bytes(2_000))),
                history_item("older entry"),
            ],
        )
        .build();
    let backup_path = home.path().join("claude.json.backup.20240101_000000");
    fs::write(&backup_path, backup_doc.to_json_string().unwrap()).unwrap();

    // The current config was destructively cleaned, then gained an entry
    let (mut current, _) = destructive_clean(&backup_doc);
    current.append_history("/Users/test/app", [history_item("newer entry")]);
    let config_path = home.path().join("claude.json");
    fs::write(&config_path, current.to_json_string().unwrap()).unwrap();

    cleaner_cmd(&home, &images)
        .arg("recover")
        .arg(&backup_path)
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Found 1 new history items"))
        .stdout(predicate::str::contains("Images recovered: 1"))
        .stdout(predicate::str::contains("Data recovery completed"));

    let merged = fs::read_to_string(&config_path).unwrap();
    assert!(merged.contains("[IMAGE_FILE:"));
    assert!(merged.contains("newer entry"));
    assert!(merged.contains("older entry"));

    // The pre-recovery state was preserved separately
    let recovery_backups: Vec<_> = fs::read_dir(home.path())
        .unwrap()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_name().to_string_lossy().contains(".recovery-backup."))
        .collect();
    assert_eq!(recovery_backups.len(), 1);
}

#[test]
fn test_cli_recover_missing_backup_file_fails() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();
    let config_path =
        ConfigBuilder::new().with_project("/p", vec![history_item("x")]).write_to(home.path());

    cleaner_cmd(&home, &images)
        .arg("recover")
        .arg(home.path().join("does-not-exist.backup"))
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Backup file not found"));
}

#[test]
fn test_cli_recover_auto_detect_requires_large_backup() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();
    let config_path =
        ConfigBuilder::new().with_project("/p", vec![history_item("x")]).write_to(home.path());
    // A backup exists but is far below the 5 MB auto-detection floor
    fs::write(home.path().join("claude.json.backup.20240101_000000"), "{}").unwrap();

    cleaner_cmd(&home, &images)
        .arg("recover")
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("No suitable backup files found"));
}

#[test]
fn test_cli_list_backups() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();
    let config_path =
        ConfigBuilder::new().with_project("/p", vec![history_item("x")]).write_to(home.path());

    cleaner_cmd(&home, &images)
        .arg("list-backups")
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("No backup files found"));

    fs::write(home.path().join("claude.json.backup.20240101_000000"), "{}").unwrap();
    fs::write(home.path().join("claude.json.backup.20240202_000000"), "{}").unwrap();

    cleaner_cmd(&home, &images)
        .arg("list-backups")
        .arg("--config-file")
        .arg(&config_path)
        .assert()
        .success()
        .stdout(predicate::str::contains("claude.json.backup.20240101_000000"))
        .stdout(predicate::str::contains("claude.json.backup.20240202_000000"));
}

#[test]
fn test_cli_missing_config_file_fails() {
    let home = TempDir::new().unwrap();
    let images = TempDir::new().unwrap();

    cleaner_cmd(&home, &images)
        .arg("clean")
        .arg("--config-file")
        .arg(home.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found"));
}

#[test]
fn test_cli_help_flag() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_claude-history-image-cleaner"));
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Extract and preserve base64 images"))
        .stdout(predicate::str::contains("recover"))
        .stdout(predicate::str::contains("list-backups"));
}

#[test]
fn test_cli_version_flag() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_claude-history-image-cleaner"));
    cmd.arg("--version").assert().success().stdout(predicate::str::contains("0.1.0"));
}

#[test]
fn test_cli_invalid_command() {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_claude-history-image-cleaner"));
    cmd.arg("not-a-command").assert().failure();
}
