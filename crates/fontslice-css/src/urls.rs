//! URL resolution and data URL decoding

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

/// Resolve a stylesheet-relative URL against a base URL.
///
/// Already-absolute candidates (`http://`, `https://`, `data:`) pass through
/// unchanged, so resolution is idempotent on its own output.
pub fn resolve_url(base: &str, candidate: &str) -> String {
    if candidate.starts_with("http://")
        || candidate.starts_with("https://")
        || candidate.starts_with("data:")
    {
        return candidate.to_string();
    }

    let (scheme, host, path) = split_base(base);

    if candidate.starts_with("//") {
        return format!("{scheme}:{candidate}");
    }
    if candidate.starts_with('/') {
        return format!("{scheme}://{host}{candidate}");
    }

    // Relative: walk segments against the base directory. `..` at the root
    // is a no-op, never an error.
    let directory = match path.rfind('/') {
        Some(i) => &path[..i],
        None => "",
    };
    let mut segments: Vec<&str> = directory.split('/').filter(|s| !s.is_empty()).collect();
    for segment in candidate.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    format!("{scheme}://{host}/{}", segments.join("/"))
}

/// Split a base URL into scheme, host and path.
///
/// A base without `://` degrades to scheme `https`, empty host, and the whole
/// string as path.
fn split_base(base: &str) -> (&str, &str, &str) {
    match base.split_once("://") {
        Some((scheme, rest)) => match rest.split_once('/') {
            Some((host, path)) => (scheme, host, path),
            None => (scheme, rest, ""),
        },
        None => ("https", "", base),
    }
}

/// Data URL decoding failure
#[derive(Debug, Clone, thiserror::Error)]
pub enum DataUrlError {
    #[error("not a data URL")]
    NotDataUrl,

    #[error("missing comma separator")]
    MissingComma,

    #[error("invalid base64 payload: {0}")]
    Base64(String),
}

/// Decode the payload of a `data:` URL.
///
/// A `;`-separated header segment equal to `base64` (any case) selects
/// base64 decoding with whitespace stripped first; otherwise the payload is
/// percent-decoded.
pub fn decode_data_url(url: &str) -> Result<Vec<u8>, DataUrlError> {
    let rest = url.strip_prefix("data:").ok_or(DataUrlError::NotDataUrl)?;
    let (header, payload) = rest.split_once(',').ok_or(DataUrlError::MissingComma)?;

    let is_base64 = header
        .split(';')
        .any(|segment| segment.trim().eq_ignore_ascii_case("base64"));

    if is_base64 {
        let stripped: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        STANDARD
            .decode(stripped.as_bytes())
            .map_err(|e| DataUrlError::Base64(e.to_string()))
    } else {
        Ok(percent_decode(payload))
    }
}

/// Percent-decode byte-by-byte; invalid `%XX` sequences pass through
/// literally.
fn percent_decode(input: &str) -> Vec<u8> {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len()
            && let (Some(high), Some(low)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2]))
        {
            out.push(high << 4 | low);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    out
}

fn hex_value(byte: u8) -> Option<u8> {
    match byte {
        b'0'..=b'9' => Some(byte - b'0'),
        b'a'..=b'f' => Some(byte - b'a' + 10),
        b'A'..=b'F' => Some(byte - b'A' + 10),
        _ => None,
    }
}
