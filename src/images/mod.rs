//! Image format detection and extraction to disk.
//!
//! Payloads arrive either as `data:image/...;base64,` URIs (self-describing)
//! or as raw base64 with no framing at all. Raw payloads are identified by
//! magic numbers after decoding a short prefix; the data-URI subtype is
//! authoritative when present and recognized.

pub mod extract;
pub mod format;

pub use extract::ImageStore;
pub use format::{ImageFormat, decode_payload, detect, detect_base64, parse_data_uri};
