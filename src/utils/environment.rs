use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Candidate locations for the Claude Code config file, in search order
///
/// Unix/macOS: `~/.claude.json`, then `~/.config/claude/claude.json`.
/// Windows: `%USERPROFILE%\.claude.json`, then `%APPDATA%\claude\claude.json`,
/// then `%LOCALAPPDATA%\claude\claude.json`.
pub fn config_candidates() -> Vec<PathBuf> {
    let mut candidates = Vec::new();

    if cfg!(windows) {
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".claude.json"));
        }
        if let Some(appdata) = dirs::config_dir() {
            candidates.push(appdata.join("claude").join("claude.json"));
        }
        if let Some(local) = dirs::data_local_dir() {
            candidates.push(local.join("claude").join("claude.json"));
        }
    } else {
        if let Some(home) = dirs::home_dir() {
            candidates.push(home.join(".claude.json"));
            candidates.push(home.join(".config").join("claude").join("claude.json"));
        }
    }

    candidates
}

/// Find the Claude Code config file, returning the first candidate that exists
///
/// # Errors
///
/// Returns an error listing every searched location when none exists.
pub fn find_claude_config() -> Result<PathBuf> {
    let candidates = config_candidates();

    for candidate in &candidates {
        if candidate.exists() {
            return Ok(candidate.clone());
        }
    }

    let searched =
        candidates.iter().map(|p| format!("  - {}", p.display())).collect::<Vec<_>>().join("\n");
    anyhow::bail!("Claude config file not found. Searched in:\n{}", searched)
}

/// Root directory where extracted images are stored (~/.claude/history_images)
///
/// Honors `CLAUDE_HISTORY_IMAGES_DIR` as an override so tests and scripted
/// runs can redirect extraction without touching the real home directory.
pub fn default_images_dir() -> Result<PathBuf> {
    if let Ok(dir) = env::var("CLAUDE_HISTORY_IMAGES_DIR")
        && !dir.is_empty()
    {
        return Ok(PathBuf::from(dir));
    }

    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".claude").join("history_images"))
}
