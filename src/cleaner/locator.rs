use serde_json::Value;

/// Floor below which a bare string is never treated as a raw base64 image
/// candidate. Pasted images are far larger than this; ordinary prompt text
/// never reaches it.
pub const RAW_BASE64_MIN_CHARS: usize = 50_000;

/// Why a string qualifies as an image payload candidate
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PayloadKind {
    /// Carries the `data:image/...;base64,` prefix; always a candidate,
    /// whatever its length
    DataUri,
    /// No wrapper at all: qualifies by size plus base64 alphabet
    RawBase64,
}

/// One step into a nested JSON value
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegment {
    Key(String),
    Index(usize),
}

/// Abstract locator of a payload inside a document subtree, precise enough
/// to address the exact string for replacement
pub type PayloadPath = Vec<PathSegment>;

/// Decide whether a string is an image payload candidate
pub fn classify(s: &str) -> Option<PayloadKind> {
    if s.starts_with("data:image/") {
        return Some(PayloadKind::DataUri);
    }
    if s.len() > RAW_BASE64_MIN_CHARS && is_base64_text(s) {
        return Some(PayloadKind::RawBase64);
    }
    None
}

/// True when every character belongs to the base64 alphabet (padding and
/// line-wrapping whitespace included)
fn is_base64_text(s: &str) -> bool {
    s.bytes().all(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\n' | b'\r' | b' ' | b'\t')
    })
}

/// Enumerate every payload candidate in a subtree, depth first, as
/// (path, candidate string) pairs. Paths visit object entries in key order
/// and arrays in element order, so repeated calls over the same value yield
/// the same sequence, and each path addresses the exact string to replace.
pub fn locate(value: &Value) -> Vec<(PayloadPath, &str)> {
    let mut found = Vec::new();
    walk(value, &mut Vec::new(), &mut found);
    found
}

fn walk<'a>(value: &'a Value, path: &mut PayloadPath, found: &mut Vec<(PayloadPath, &'a str)>) {
    match value {
        Value::Object(map) => {
            for (key, child) in map {
                path.push(PathSegment::Key(key.clone()));
                walk(child, path, found);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, child) in items.iter().enumerate() {
                path.push(PathSegment::Index(index));
                walk(child, path, found);
                path.pop();
            }
        }
        Value::String(s) => {
            if classify(s).is_some() {
                found.push((path.clone(), s.as_str()));
            }
        }
        _ => {}
    }
}
