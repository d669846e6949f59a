use serde_json::{Map, Value};

use super::locator::{PayloadKind, classify};
use super::{IMAGE_FILE_CLOSE, IMAGE_FILE_PREFIX, IMAGE_REMOVED_MARKER};
use crate::images::{ImageStore, decode_payload, detect, parse_data_uri};
use crate::models::{CleanReport, Document, ExtractedImage};

/// Recursively rebuild a document with every image payload replaced by the
/// `[IMAGE_REMOVED]` marker. No decoding, no files: this reproduces what
/// the legacy destructive cleaner would have produced, which is exactly the
/// shape needed to diff a full-fidelity backup against an already-cleaned
/// current document.
pub fn destructive_clean(doc: &Document) -> (Document, CleanReport) {
    let mut ctx = WalkCtx { report: CleanReport::default(), extracted: Vec::new(), store: None };

    let mut root = Map::new();
    for (project_id, record) in doc.projects() {
        root.insert(project_id.clone(), clean_value(record, &mut ctx));
    }

    (Document::from_root(root), ctx.report)
}

/// Recursively rebuild a document with every image payload extracted to a
/// file and replaced by an `[IMAGE_FILE:<reference>]` marker.
///
/// Large base64 blobs whose format can't be identified have no usable file
/// extension and are discarded with `[IMAGE_REMOVED]` (counted as cleaned,
/// not extracted). Payloads that fail to decode are left untouched and
/// counted as skipped; a single bad entry never aborts the walk. An I/O
/// failure while writing an image also degrades that payload to
/// `[IMAGE_REMOVED]` so the document never references a file that was not
/// durably written.
pub fn lossless_clean(
    doc: &Document,
    store: &mut ImageStore,
) -> (Document, CleanReport, Vec<ExtractedImage>) {
    let mut ctx =
        WalkCtx { report: CleanReport::default(), extracted: Vec::new(), store: Some(store) };

    let mut root = Map::new();
    for (project_id, record) in doc.projects() {
        if let Some(store) = ctx.store.as_deref_mut() {
            store.begin_project(project_id);
        }
        root.insert(project_id.clone(), clean_value(record, &mut ctx));
    }

    (Document::from_root(root), ctx.report, ctx.extracted)
}

struct WalkCtx<'a> {
    report: CleanReport,
    extracted: Vec<ExtractedImage>,
    /// None selects destructive mode
    store: Option<&'a mut ImageStore>,
}

/// Rebuild one value bottom-up, copying non-candidate content by value and
/// preserving object key order and array element order
fn clean_value(value: &Value, ctx: &mut WalkCtx) -> Value {
    match value {
        Value::Object(map) => {
            let mut rebuilt = Map::new();
            for (key, child) in map {
                rebuilt.insert(key.clone(), clean_value(child, ctx));
            }
            Value::Object(rebuilt)
        }
        Value::Array(items) => {
            Value::Array(items.iter().map(|item| clean_value(item, ctx)).collect())
        }
        Value::String(s) => match classify(s) {
            Some(kind) => replace_payload(s, kind, ctx),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

fn replace_payload(payload: &str, kind: PayloadKind, ctx: &mut WalkCtx) -> Value {
    let WalkCtx { report, extracted, store } = ctx;

    // Destructive mode discards every candidate outright
    let Some(store) = store.as_deref_mut() else {
        report.items_cleaned += 1;
        report.bytes_removed += payload.len();
        return Value::String(IMAGE_REMOVED_MARKER.to_string());
    };

    let (declared_format, base64_text) = match kind {
        PayloadKind::DataUri => match parse_data_uri(payload) {
            Some((format, rest)) => (format, rest),
            None => {
                // data:image/ prefix but not the base64 form we can extract
                eprintln!("Warning: unparseable data URI payload, leaving in place");
                report.items_skipped += 1;
                return Value::String(payload.to_string());
            }
        },
        PayloadKind::RawBase64 => (None, payload),
    };

    let bytes = match decode_payload(base64_text) {
        Ok(bytes) => bytes,
        Err(e) => {
            eprintln!("Warning: failed to decode image payload, leaving in place: {e}");
            report.items_skipped += 1;
            return Value::String(payload.to_string());
        }
    };

    // Subtype wins when the data URI declared one we recognize; otherwise
    // fall back to magic numbers on the decoded bytes
    let format = declared_format.or_else(|| detect(&bytes));

    report.items_cleaned += 1;
    report.bytes_removed += payload.len();

    let Some(format) = format else {
        // No format means no extension, so the blob can't be restored from
        // a file; discard it like the legacy cleaner did
        return Value::String(IMAGE_REMOVED_MARKER.to_string());
    };

    match store.store(format, &bytes) {
        Ok(image) => {
            let marker = format!("{}{}{}", IMAGE_FILE_PREFIX, image.reference, IMAGE_FILE_CLOSE);
            report.images_extracted += 1;
            extracted.push(image);
            Value::String(marker)
        }
        Err(e) => {
            eprintln!("Warning: failed to extract image: {e}");
            report.failed_extractions += 1;
            Value::String(IMAGE_REMOVED_MARKER.to_string())
        }
    }
}
