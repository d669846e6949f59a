use std::borrow::Cow;
use std::env;
use std::path::Path;

use chrono::{DateTime, Local};
use xxhash_rust::xxh64::xxh64;

/// Derive the on-disk directory slug for a project identifier
///
/// The slug is the sanitized final path component plus an 8-hex-char xxh64
/// hash of the full identifier, so distinct projects with the same basename
/// (or with basenames that sanitize to the same string) never collide.
///
/// # Examples
///
/// ```
/// use claude_history_image_cleaner::project_slug;
///
/// let slug = project_slug("/Users/alice/my-app");
/// assert!(slug.starts_with("my-app_"));
/// assert_eq!(slug.len(), "my-app_".len() + 8);
/// ```
pub fn project_slug(project_id: &str) -> String {
    let name = Path::new(project_id)
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| "unknown".to_string());

    let sanitized: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') { c } else { '_' })
        .collect();

    let hash = xxh64(project_id.as_bytes(), 0);
    format!("{}_{:08x}", sanitized, (hash & 0xffff_ffff) as u32)
}

/// Format a timestamp as the directory/backup suffix form (YYYYMMDD_HHMMSS)
pub fn format_run_timestamp(at: DateTime<Local>) -> String {
    at.format("%Y%m%d_%H%M%S").to_string()
}

/// Current timestamp in the directory/backup suffix form
pub fn run_timestamp() -> String {
    format_run_timestamp(Local::now())
}

/// Formats a path with ~ substitution for the home directory
pub fn format_path_with_tilde(path: &Path) -> String {
    format_path_with_tilde_internal(path, None)
}

/// Internal helper for path formatting with optional home override (for testing)
pub(crate) fn format_path_with_tilde_internal(path: &Path, home_override: Option<&str>) -> String {
    let home_from_env = env::var("HOME").ok();
    let home = home_override.or(home_from_env.as_deref());

    let path_str = path.to_string_lossy();
    if let Some(home) = home
        && path_str.starts_with(home)
    {
        return path_str.replacen(home, "~", 1);
    }

    // Avoid double allocation when converting Cow to String
    match path_str {
        Cow::Borrowed(s) => s.to_string(),
        Cow::Owned(s) => s,
    }
}
