//! `@font-face` stylesheet parsing
//!
//! Extracts font descriptors from stylesheet text. Malformed blocks are
//! skipped, never surfaced as errors.

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::descriptor::{FontDescriptor, FontSliceSource, FontSrc, FontStyle, FontWeight};
use crate::unicode_range::parse_unicode_ranges;
use crate::urls::resolve_url;

static COMMENT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)/\*.*?\*/").unwrap());
// Flat block matching: a block containing nested braces terminates early.
static FONT_FACE_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"@font-face\s*\{([^{}]*)\}").unwrap());
static SRC_URL: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"url\(\s*([^)]*?)\s*\)").unwrap());
static SRC_LOCAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"local\(\s*([^)]*?)\s*\)").unwrap());
static SRC_FORMAT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"format\(\s*([^)]*?)\s*\)").unwrap());
static SRC_TECH: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"tech\(\s*([^)]*?)\s*\)").unwrap());

/// Parse a stylesheet into font descriptors, one per usable `@font-face`
/// block, in source order.
///
/// Comments are stripped first. Blocks missing `font-family` or a `src` with
/// an extractable URL are skipped. When `base_url` is given, extracted URLs
/// are resolved against it.
pub fn parse_stylesheet(css: &str, base_url: Option<&str>) -> Vec<FontDescriptor> {
    let css = COMMENT.replace_all(css, "");
    FONT_FACE_BLOCK
        .captures_iter(&css)
        .filter_map(|block| parse_block(&block[1], base_url))
        .collect()
}

fn parse_block(body: &str, base_url: Option<&str>) -> Option<FontDescriptor> {
    let mut family = None;
    let mut src_value = None;
    let mut weight = FontWeight::NORMAL;
    let mut style = FontStyle::Normal;
    let mut ranges = Vec::new();

    for clause in body.split(';') {
        let Some((name, value)) = clause.split_once(':') else {
            continue;
        };
        // Property names are matched case-sensitively against their
        // lowercase forms; mixed-case names do not populate these fields.
        let name = name.trim();
        let value = strip_quotes(value.trim());
        match name {
            "font-family" => family = Some(value.to_string()),
            "src" => src_value = Some(value.to_string()),
            "font-weight" => weight = FontWeight::parse(value),
            "font-style" => style = FontStyle::parse(value),
            "unicode-range" => ranges = parse_unicode_ranges(value),
            _ => {}
        }
    }

    let Some(family) = family else {
        warn!("skipping @font-face block without font-family");
        return None;
    };
    let Some(src_value) = src_value else {
        warn!(family = %family, "skipping @font-face block without src");
        return None;
    };

    // First url() across all comma-separated alternatives wins; no format
    // negotiation. local() sources are modeled but never loaded.
    let Some(url) = SRC_URL
        .captures(&src_value)
        .map(|c| strip_quotes(c[1].trim()).to_string())
    else {
        warn!(family = %family, "skipping @font-face block without a loadable url");
        return None;
    };

    let url = match base_url {
        Some(base) => resolve_url(base, &url),
        None => url,
    };

    Some(FontDescriptor {
        family,
        weight,
        style,
        unicode_ranges: ranges,
        source: FontSliceSource::Url(url),
    })
}

/// Parse a `src` descriptor value into its comma-separated candidates.
///
/// Candidates naming neither a url nor a local face are discarded.
pub fn parse_src(value: &str) -> Vec<FontSrc> {
    value
        .split(',')
        .filter_map(|alternative| {
            let alternative = alternative.trim();
            if alternative.is_empty() {
                return None;
            }
            let src = FontSrc {
                url: capture(&SRC_URL, alternative),
                local: capture(&SRC_LOCAL, alternative),
                format: capture(&SRC_FORMAT, alternative),
                techs: SRC_TECH
                    .captures(alternative)
                    .map(|c| {
                        c[1].split(',')
                            .map(|t| strip_quotes(t.trim()).to_string())
                            .collect()
                    })
                    .unwrap_or_default(),
            };
            src.is_valid().then_some(src)
        })
        .collect()
}

fn capture(pattern: &Regex, haystack: &str) -> Option<String> {
    pattern
        .captures(haystack)
        .map(|c| strip_quotes(c[1].trim()).to_string())
}

fn strip_quotes(value: &str) -> &str {
    let bytes = value.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        if (first == b'"' && last == b'"') || (first == b'\'' && last == b'\'') {
            return &value[1..value.len() - 1];
        }
    }
    value
}
