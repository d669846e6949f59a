//! Claude History Image Cleaner - reclaim `~/.claude.json` from inline images
//!
//! Claude Code stores pasted images as base64 text inside its history file,
//! which balloons the file and slows startup. This library provides tools
//! for taking those payloads back out without losing anything:
//!
//! - Detecting embedded images, with or without a `data:image/` wrapper
//! - Extracting them to individually addressable files and replacing the
//!   inline payload with a file reference
//! - Reconciling a full-fidelity backup against an already-cleaned current
//!   file to recover images a destructive clean threw away
//!
//! # Example
//!
//! ```no_run
//! use claude_history_image_cleaner::cleaner::lossless_clean;
//! use claude_history_image_cleaner::images::ImageStore;
//! use claude_history_image_cleaner::models::Document;
//! use std::path::Path;
//!
//! let doc = Document::parse(r#"{"/Users/alice/app":{"history":[]}}"#)?;
//! let mut store = ImageStore::new(Path::new("/tmp/history_images"));
//! let (cleaned, report, images) = lossless_clean(&doc, &mut store);
//! println!("Extracted {} images", report.images_extracted);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod cleaner;
pub mod cli;
pub mod images;
pub mod models;
pub mod ops;
pub mod recovery;
pub mod storage;
pub mod utils;

// Re-export commonly used types
pub use cleaner::{destructive_clean, lossless_clean};
pub use images::{ImageFormat, ImageStore};
pub use models::{CleanReport, DeltaReport, Document, ExtractedImage};
pub use recovery::{diff, merge};
pub use utils::paths::project_slug;
