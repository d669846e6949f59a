//! Shared test utilities for integration tests
#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use serde_json::{Map, Value, json};

use claude_history_image_cleaner::models::Document;

/// A PNG-signature byte buffer padded with a recognizable body
pub fn png_bytes(body_len: usize) -> Vec<u8> {
    let mut bytes = b"\x89PNG\r\n\x1a\n".to_vec();
    bytes.extend((0..body_len).map(|i| (i % 251) as u8));
    bytes
}

/// A JPEG-signature byte buffer padded with a recognizable body
pub fn jpeg_bytes(body_len: usize) -> Vec<u8> {
    let mut bytes = vec![0xff, 0xd8, 0xff, 0xe0];
    bytes.extend((0..body_len).map(|i| (i % 249) as u8));
    bytes
}

/// Encode bytes as a data URI with the given subtype
pub fn data_uri(subtype: &str, bytes: &[u8]) -> String {
    format!("data:image/{};base64,{}", subtype, BASE64.encode(bytes))
}

/// Raw base64 (no wrapper) of JPEG bytes, at least `min_chars` long
pub fn raw_base64_jpeg(min_chars: usize) -> (Vec<u8>, String) {
    // 4 base64 chars per 3 bytes
    let bytes = jpeg_bytes(min_chars * 3 / 4 + 16);
    let encoded = BASE64.encode(&bytes);
    assert!(encoded.len() >= min_chars);
    (bytes, encoded)
}

/// A large base64 string that decodes fine but matches no image signature
pub fn unidentifiable_blob(min_chars: usize) -> String {
    BASE64.encode(vec![0u8; min_chars * 3 / 4 + 16])
}

/// A history item with just a display text
pub fn history_item(display: &str) -> Value {
    json!({"display": display, "pastedContents": {}})
}

/// A history item carrying one pasted payload
pub fn history_item_with_payload(display: &str, payload: &str) -> Value {
    json!({
        "display": display,
        "pastedContents": {"1": {"id": 1, "type": "image", "content": payload}}
    })
}

/// Builder for history documents shaped like Claude Code's config file
pub struct ConfigBuilder {
    root: Map<String, Value>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self { root: Map::new() }
    }

    /// Add a project with the given history items
    pub fn with_project(mut self, project_id: &str, items: Vec<Value>) -> Self {
        self.root.insert(project_id.to_string(), json!({"history": items}));
        self
    }

    /// Add a project with a full custom record
    pub fn with_record(mut self, project_id: &str, record: Value) -> Self {
        self.root.insert(project_id.to_string(), record);
        self
    }

    pub fn build(self) -> Document {
        Document::from_root(self.root)
    }

    /// Serialize and write the document to `dir/claude.json`
    pub fn write_to(self, dir: &Path) -> PathBuf {
        let path = dir.join("claude.json");
        let doc = self.build();
        fs::write(&path, doc.to_json_string().expect("serialize test config"))
            .expect("write test config");
        path
    }
}

impl Default for ConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}
