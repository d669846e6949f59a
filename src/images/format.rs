use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;

/// How far into a buffer the textual SVG probe looks for `<svg`
const SVG_PROBE_BYTES: usize = 256;

/// How many base64 characters to decode when sniffing a format.
/// 100 characters decode to 75 bytes, comfortably past every signature.
const SNIFF_BASE64_CHARS: usize = 100;

/// Image formats the cleaner can identify and extract
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Png,
    Jpeg,
    Gif,
    Webp,
    Bmp,
    Svg,
}

impl ImageFormat {
    /// Canonical file extension for this format (with leading dot)
    pub fn extension(&self) -> &'static str {
        match self {
            ImageFormat::Png => ".png",
            ImageFormat::Jpeg => ".jpg",
            ImageFormat::Gif => ".gif",
            ImageFormat::Webp => ".webp",
            ImageFormat::Bmp => ".bmp",
            ImageFormat::Svg => ".svg",
        }
    }

    /// Map a data-URI MIME subtype (e.g. "png", "jpeg", "svg+xml") to a format.
    /// Returns None for subtypes we don't know an extension for.
    pub fn from_subtype(subtype: &str) -> Option<Self> {
        match subtype.to_ascii_lowercase().as_str() {
            "png" => Some(ImageFormat::Png),
            "jpeg" | "jpg" => Some(ImageFormat::Jpeg),
            "gif" => Some(ImageFormat::Gif),
            "webp" => Some(ImageFormat::Webp),
            "bmp" => Some(ImageFormat::Bmp),
            "svg+xml" | "svg" => Some(ImageFormat::Svg),
            _ => None,
        }
    }
}

/// Detect an image format from raw bytes using magic numbers
///
/// Signatures are checked in order, each guarded by a minimum length so a
/// short buffer never reads out of bounds (it simply fails that signature).
/// The textual SVG probe runs only after every binary signature has failed.
pub fn detect(buffer: &[u8]) -> Option<ImageFormat> {
    // PNG: 89 50 4E 47 0D 0A 1A 0A
    if buffer.len() >= 8 && buffer.starts_with(b"\x89PNG\r\n\x1a\n") {
        return Some(ImageFormat::Png);
    }

    // JPEG: FF D8 FF
    if buffer.len() >= 3 && buffer.starts_with(b"\xff\xd8\xff") {
        return Some(ImageFormat::Jpeg);
    }

    // GIF: GIF87a or GIF89a
    if buffer.len() >= 6 && (buffer.starts_with(b"GIF87a") || buffer.starts_with(b"GIF89a")) {
        return Some(ImageFormat::Gif);
    }

    // WebP: RIFF container with WEBP fourcc at offset 8
    if buffer.len() >= 12 && buffer.starts_with(b"RIFF") && &buffer[8..12] == b"WEBP" {
        return Some(ImageFormat::Webp);
    }

    // BMP: BM
    if buffer.len() >= 2 && buffer.starts_with(b"BM") {
        return Some(ImageFormat::Bmp);
    }

    // SVG has no binary signature; look for the opening tag near the start
    let probe_len = buffer.len().min(SVG_PROBE_BYTES);
    let text_start = String::from_utf8_lossy(&buffer[..probe_len]).to_lowercase();
    if text_start.contains("<svg") {
        return Some(ImageFormat::Svg);
    }

    None
}

/// Detect an image format from a base64 string without decoding all of it
///
/// Strips whitespace, decodes a short prefix and delegates to [`detect`].
/// Any decode failure means "not identifiable", never an error.
pub fn detect_base64(text: &str) -> Option<ImageFormat> {
    let cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    // Base64 is pure ASCII; anything else can't be an image payload, and
    // byte-slicing it below could land inside a multibyte character
    if !cleaned.is_ascii() {
        return None;
    }

    // Truncate to a sniffing window, aligned down to a whole base64 quantum
    // so the truncation itself can't introduce a decode error.
    let mut prefix_len = cleaned.len().min(SNIFF_BASE64_CHARS);
    prefix_len -= prefix_len % 4;
    if prefix_len == 0 {
        return None;
    }

    let bytes = BASE64.decode(&cleaned[..prefix_len]).ok()?;
    detect(&bytes)
}

/// Parse a `data:image/<subtype>;base64,<payload>` string
///
/// Returns the format declared by the subtype (None when the subtype is one
/// we don't recognize, in which case the caller should fall back to magic
/// number detection on the decoded payload) and the payload portion.
pub fn parse_data_uri(text: &str) -> Option<(Option<ImageFormat>, &str)> {
    let rest = text.strip_prefix("data:image/")?;
    let (subtype, payload) = rest.split_once(";base64,")?;
    if subtype.is_empty() || payload.is_empty() {
        return None;
    }
    Some((ImageFormat::from_subtype(subtype), payload))
}

/// Fully decode a base64 payload, tolerating embedded whitespace and
/// missing trailing padding (both occur in pasted history payloads)
pub fn decode_payload(text: &str) -> anyhow::Result<Vec<u8>> {
    let mut cleaned: String = text.chars().filter(|c| !c.is_ascii_whitespace()).collect();
    let missing = cleaned.len() % 4;
    if missing != 0 {
        cleaned.extend(std::iter::repeat_n('=', 4 - missing));
    }
    BASE64.decode(cleaned.as_bytes()).map_err(|e| anyhow::anyhow!("invalid base64 payload: {e}"))
}
