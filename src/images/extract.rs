use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use super::format::ImageFormat;
use crate::models::ExtractedImage;
use crate::utils::{project_slug, run_timestamp};

/// Destination for decoded image payloads.
///
/// Holds the run-wide sequence counter and the run timestamp as explicit
/// state, so two stores (or two tests) never interfere through globals.
/// Layout under the root: `<project-slug>/<run-timestamp>/image_NNN.<ext>`,
/// with NNN increasing across the whole run rather than per project.
#[derive(Debug)]
pub struct ImageStore {
    images_root: PathBuf,
    run_stamp: String,
    counter: usize,
    current_slug: Option<String>,
}

impl ImageStore {
    pub fn new(images_root: &Path) -> Self {
        Self::with_timestamp(images_root, run_timestamp())
    }

    /// Construct with a fixed run timestamp (used by tests for determinism)
    pub fn with_timestamp(images_root: &Path, run_stamp: String) -> Self {
        Self {
            images_root: images_root.to_path_buf(),
            run_stamp,
            counter: 0,
            current_slug: None,
        }
    }

    pub fn images_root(&self) -> &Path {
        &self.images_root
    }

    /// Number of images stored so far in this run
    pub fn stored_count(&self) -> usize {
        self.counter
    }

    /// Select the project the next stored images belong to.
    /// The project directory is only created once an image is stored.
    pub fn begin_project(&mut self, project_id: &str) {
        self.current_slug = Some(project_slug(project_id));
    }

    /// Write decoded image bytes to the next numbered file and return the
    /// reference to embed in the document.
    ///
    /// The reference is handed out only after the bytes have been written
    /// and synced; on any I/O failure no reference exists and the caller
    /// must fall back to discarding the payload.
    ///
    /// # Errors
    ///
    /// Returns an error if [`begin_project`](Self::begin_project) was never
    /// called, or if creating the directory or writing the file fails.
    pub fn store(&mut self, format: ImageFormat, bytes: &[u8]) -> Result<ExtractedImage> {
        let slug = self
            .current_slug
            .as_ref()
            .context("ImageStore::store called before begin_project")?
            .clone();

        self.counter += 1;
        let filename = format!("image_{:03}{}", self.counter, format.extension());

        let dir = self.images_root.join(&slug).join(&self.run_stamp);
        fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create image directory: {}", dir.display()))?;

        let path = dir.join(&filename);
        let mut file = File::create(&path)
            .with_context(|| format!("Failed to create image file: {}", path.display()))?;
        file.write_all(bytes)
            .with_context(|| format!("Failed to write image file: {}", path.display()))?;
        file.sync_all()
            .with_context(|| format!("Failed to flush image file: {}", path.display()))?;

        let reference = format!("{}/{}/{}", slug, self.run_stamp, filename);
        Ok(ExtractedImage { reference, path, format, byte_count: bytes.len() })
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;

    #[test]
    fn test_store_roundtrip() {
        let root = TempDir::new().unwrap();
        let mut store = ImageStore::with_timestamp(root.path(), "20240101_120000".to_string());
        store.begin_project("/Users/test/webapp");

        let bytes = b"\x89PNG\r\n\x1a\nfake-image-body";
        let image = store.store(ImageFormat::Png, bytes).unwrap();

        assert_eq!(std::fs::read(&image.path).unwrap(), bytes);
        assert_eq!(image.byte_count, bytes.len());
        assert!(image.reference.starts_with("webapp_"));
        assert!(image.reference.contains("/20240101_120000/image_001.png"));
        assert_eq!(image.path, root.path().join(&image.reference));
    }

    #[test]
    fn test_counter_spans_projects() {
        let root = TempDir::new().unwrap();
        let mut store = ImageStore::with_timestamp(root.path(), "20240101_120000".to_string());

        store.begin_project("/Users/test/alpha");
        let first = store.store(ImageFormat::Jpeg, b"\xff\xd8\xff\xe0").unwrap();
        store.begin_project("/Users/test/beta");
        let second = store.store(ImageFormat::Jpeg, b"\xff\xd8\xff\xe1").unwrap();

        assert!(first.reference.ends_with("image_001.jpg"));
        // Numbering continues in the second project, not reset
        assert!(second.reference.ends_with("image_002.jpg"));
        assert_eq!(store.stored_count(), 2);
    }

    #[test]
    fn test_store_without_project_fails() {
        let root = TempDir::new().unwrap();
        let mut store = ImageStore::new(root.path());
        assert!(store.store(ImageFormat::Png, b"bytes").is_err());
    }

    #[test]
    fn test_no_directory_created_until_first_store() {
        let root = TempDir::new().unwrap();
        let mut store = ImageStore::with_timestamp(root.path(), "20240101_120000".to_string());
        store.begin_project("/Users/test/empty-project");

        let entries: Vec<_> = std::fs::read_dir(root.path()).unwrap().collect();
        assert!(entries.is_empty());
    }
}
