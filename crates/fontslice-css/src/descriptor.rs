//! Font descriptor model

use std::fmt;

use crate::hash::fnv1a_64;
use crate::unicode_range::{UnicodeRange, char_in_ranges};

/// Font weight (1-1000)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FontWeight(pub u16);

impl FontWeight {
    pub const THIN: FontWeight = FontWeight(100);
    pub const EXTRA_LIGHT: FontWeight = FontWeight(200);
    pub const LIGHT: FontWeight = FontWeight(300);
    pub const NORMAL: FontWeight = FontWeight(400);
    pub const MEDIUM: FontWeight = FontWeight(500);
    pub const SEMI_BOLD: FontWeight = FontWeight(600);
    pub const BOLD: FontWeight = FontWeight(700);
    pub const EXTRA_BOLD: FontWeight = FontWeight(800);
    pub const BLACK: FontWeight = FontWeight(900);

    /// Parse a CSS `font-weight` value.
    ///
    /// `normal` and `bold` map to their numeric aliases; other values must be
    /// an integer in 1..=1000. Anything unusable maps to 400.
    pub fn parse(value: &str) -> FontWeight {
        let value = value.trim();
        if value.eq_ignore_ascii_case("normal") {
            return FontWeight::NORMAL;
        }
        if value.eq_ignore_ascii_case("bold") {
            return FontWeight::BOLD;
        }
        match value.parse::<u16>() {
            Ok(weight) if (1..=1000).contains(&weight) => FontWeight(weight),
            _ => FontWeight::NORMAL,
        }
    }
}

impl Default for FontWeight {
    fn default() -> Self {
        FontWeight::NORMAL
    }
}

impl fmt::Display for FontWeight {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font style; `oblique` collapses into `Italic`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum FontStyle {
    #[default]
    Normal,
    Italic,
}

impl FontStyle {
    /// Parse a CSS `font-style` value; anything unrecognized maps to Normal.
    pub fn parse(value: &str) -> FontStyle {
        let value = value.trim();
        if value.eq_ignore_ascii_case("italic") {
            return FontStyle::Italic;
        }
        // `oblique` may carry an angle (`oblique 14deg`); no distinct
        // representation is kept for it.
        if value
            .get(..7)
            .is_some_and(|prefix| prefix.eq_ignore_ascii_case("oblique"))
        {
            return FontStyle::Italic;
        }
        FontStyle::Normal
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FontStyle::Normal => "normal",
            FontStyle::Italic => "italic",
        }
    }
}

/// One candidate source inside a `src` descriptor
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FontSrc {
    pub url: Option<String>,
    pub local: Option<String>,
    pub format: Option<String>,
    pub techs: Vec<String>,
}

impl FontSrc {
    /// A source naming neither a url nor a local face loads nothing.
    pub fn is_valid(&self) -> bool {
        self.url.is_some() || self.local.is_some()
    }
}

/// Where a descriptor's bytes come from
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum FontSliceSource {
    /// Fetched over the network
    Url(String),
    /// Looked up in the host's bundled resources
    Resource(String),
}

/// Metadata and load capability for one font slice.
///
/// Equality is structural; two descriptors are interchangeable iff every
/// attribute matches, which is what cache keying and deduplication rely on.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FontDescriptor {
    pub family: String,
    pub weight: FontWeight,
    pub style: FontStyle,
    /// Empty means the descriptor covers every code point
    pub unicode_ranges: Vec<UnicodeRange>,
    pub source: FontSliceSource,
}

impl FontDescriptor {
    /// Descriptor for a network-loaded slice
    pub fn from_url(family: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            unicode_ranges: Vec::new(),
            source: FontSliceSource::Url(url.into()),
        }
    }

    /// Descriptor for a bundled-resource slice
    pub fn from_resource(family: impl Into<String>, resource_id: impl Into<String>) -> Self {
        Self {
            family: family.into(),
            weight: FontWeight::NORMAL,
            style: FontStyle::Normal,
            unicode_ranges: Vec::new(),
            source: FontSliceSource::Resource(resource_id.into()),
        }
    }

    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.weight = weight;
        self
    }

    pub fn with_style(mut self, style: FontStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_ranges(mut self, ranges: Vec<UnicodeRange>) -> Self {
        self.unicode_ranges = ranges;
        self
    }

    /// Unique key per loadable resource.
    pub fn cache_key(&self) -> String {
        match &self.source {
            FontSliceSource::Url(url) => format!("url:{url}"),
            FontSliceSource::Resource(id) => {
                let mut repr = format!("{id}:{}:{}", self.weight, self.style.as_str());
                for range in &self.unicode_ranges {
                    repr.push_str(&format!(":{:x}-{:x}", range.start, range.end));
                }
                format!("res:{:016x}", fnv1a_64(repr.as_bytes()))
            }
        }
    }

    /// Stable identity string for the decoded handle.
    pub fn identity(&self) -> String {
        format!(
            "{}-{}-{}-{:016x}",
            self.family,
            self.weight,
            self.style.as_str(),
            self.structural_hash()
        )
    }

    fn structural_hash(&self) -> u64 {
        let mut repr = format!("{}:{}:{}", self.family, self.weight, self.style.as_str());
        for range in &self.unicode_ranges {
            repr.push_str(&format!(":{:x}-{:x}", range.start, range.end));
        }
        match &self.source {
            FontSliceSource::Url(url) => repr.push_str(&format!(":url:{url}")),
            FontSliceSource::Resource(id) => repr.push_str(&format!(":res:{id}")),
        }
        fnv1a_64(repr.as_bytes())
    }

    /// Whether this slice covers the character.
    ///
    /// An empty range list matches every character; this is the one place
    /// that convention is applied.
    pub fn matches_char(&self, c: char) -> bool {
        self.unicode_ranges.is_empty() || char_in_ranges(c, &self.unicode_ranges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::unicode_range::parse_unicode_ranges;

    #[test]
    fn test_weight_parse_named() {
        assert_eq!(FontWeight::parse("normal"), FontWeight::NORMAL);
        assert_eq!(FontWeight::parse("BOLD"), FontWeight::BOLD);
    }

    #[test]
    fn test_weight_parse_numeric() {
        assert_eq!(FontWeight::parse("350"), FontWeight(350));
        assert_eq!(FontWeight::parse(" 900 "), FontWeight::BLACK);
    }

    #[test]
    fn test_weight_parse_fallback() {
        assert_eq!(FontWeight::parse("bolder"), FontWeight::NORMAL);
        assert_eq!(FontWeight::parse("0"), FontWeight::NORMAL);
        assert_eq!(FontWeight::parse("1001"), FontWeight::NORMAL);
        assert_eq!(FontWeight::parse(""), FontWeight::NORMAL);
    }

    #[test]
    fn test_style_parse() {
        assert_eq!(FontStyle::parse("italic"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("Italic"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("oblique"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("oblique 14deg"), FontStyle::Italic);
        assert_eq!(FontStyle::parse("normal"), FontStyle::Normal);
        assert_eq!(FontStyle::parse(""), FontStyle::Normal);
    }

    #[test]
    fn test_cache_key_url() {
        let descriptor = FontDescriptor::from_url("Inter", "https://a.com/f.woff2");
        assert_eq!(descriptor.cache_key(), "url:https://a.com/f.woff2");
    }

    #[test]
    fn test_cache_key_resource_varies_with_metadata() {
        let base = FontDescriptor::from_resource("Inter", "inter-latin");
        let bold = base.clone().with_weight(FontWeight::BOLD);
        assert_ne!(base.cache_key(), bold.cache_key());

        let ranged = base
            .clone()
            .with_ranges(parse_unicode_ranges("U+0-7F"));
        assert_ne!(base.cache_key(), ranged.cache_key());
    }

    #[test]
    fn test_structural_equality() {
        let a = FontDescriptor::from_url("Inter", "https://a.com/f.woff2")
            .with_weight(FontWeight::BOLD);
        let b = FontDescriptor::from_url("Inter", "https://a.com/f.woff2")
            .with_weight(FontWeight::BOLD);
        assert_eq!(a, b);
        assert_ne!(a, b.clone().with_style(FontStyle::Italic));
    }

    #[test]
    fn test_matches_char_empty_ranges_match_all() {
        let descriptor = FontDescriptor::from_url("Inter", "https://a.com/f.woff2");
        assert!(descriptor.matches_char('A'));
        assert!(descriptor.matches_char('世'));
    }

    #[test]
    fn test_matches_char_with_ranges() {
        let descriptor = FontDescriptor::from_url("Inter", "https://a.com/f.woff2")
            .with_ranges(parse_unicode_ranges("U+41-5A"));
        assert!(descriptor.matches_char('A'));
        assert!(!descriptor.matches_char('a'));
    }

    #[test]
    fn test_identity_stable_and_structural() {
        let a = FontDescriptor::from_url("Inter", "https://a.com/f.woff2");
        let b = FontDescriptor::from_url("Inter", "https://a.com/f.woff2");
        assert_eq!(a.identity(), b.identity());
        assert_ne!(
            a.identity(),
            FontDescriptor::from_url("Inter", "https://a.com/g.woff2").identity()
        );
    }
}
