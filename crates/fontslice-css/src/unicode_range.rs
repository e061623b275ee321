//! CSS `unicode-range` grammar
//!
//! Parses and evaluates unicode-range descriptor values.

/// Inclusive range of Unicode code points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct UnicodeRange {
    pub start: u32,
    pub end: u32,
}

impl UnicodeRange {
    /// Create a range, rejecting reversed bounds
    pub fn new(start: u32, end: u32) -> Option<Self> {
        if start <= end {
            Some(Self { start, end })
        } else {
            None
        }
    }

    /// Check whether a code point falls inside the range (inclusive)
    pub fn contains(&self, code_point: u32) -> bool {
        self.start <= code_point && code_point <= self.end
    }
}

/// Parse a comma-separated `unicode-range` value.
///
/// Each token is a `U+`/`u+`-prefixed single code point (`U+26`), range
/// (`U+4E00-9FFF`) or trailing-wildcard form (`U+4??`). Tokens that fail to
/// parse are dropped; the survivors keep their source order.
pub fn parse_unicode_ranges(value: &str) -> Vec<UnicodeRange> {
    value.split(',').filter_map(parse_token).collect()
}

/// Test whether any range in the list contains the character.
///
/// An empty list matches nothing here; the match-all convention for empty
/// lists is applied by `FontDescriptor::matches_char`, not this helper.
pub fn char_in_ranges(c: char, ranges: &[UnicodeRange]) -> bool {
    let code_point = c as u32;
    ranges.iter().any(|r| r.contains(code_point))
}

fn parse_token(token: &str) -> Option<UnicodeRange> {
    let token = token.trim();
    let body = token
        .strip_prefix("U+")
        .or_else(|| token.strip_prefix("u+"))?;
    if body.is_empty() {
        return None;
    }

    let stem = body.trim_end_matches('?');
    let wildcards = (body.len() - stem.len()) as u32;
    if wildcards > 0 {
        // Wildcard form: each `?` spans a full hex digit.
        if stem.contains('?') || stem.contains('-') {
            return None;
        }
        let base = if stem.is_empty() {
            0
        } else {
            parse_hex(stem)?
        };
        let span = 16u32.checked_pow(wildcards)?;
        let start = base.checked_mul(span)?;
        let end = start.checked_add(span - 1)?;
        return UnicodeRange::new(start, end);
    }

    if let Some((start, end)) = body.split_once('-') {
        return UnicodeRange::new(parse_hex(start)?, parse_hex(end)?);
    }

    let point = parse_hex(body)?;
    UnicodeRange::new(point, point)
}

fn parse_hex(digits: &str) -> Option<u32> {
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
        return None;
    }
    u32::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_single_code_point() {
        let ranges = parse_unicode_ranges("U+26");
        assert_eq!(ranges, vec![UnicodeRange { start: 0x26, end: 0x26 }]);
    }

    #[test]
    fn test_range() {
        let ranges = parse_unicode_ranges("U+4E00-9FFF");
        assert_eq!(ranges, vec![UnicodeRange { start: 0x4E00, end: 0x9FFF }]);
    }

    #[test]
    fn test_reversed_range_dropped() {
        assert!(parse_unicode_ranges("U+9FFF-4E00").is_empty());
    }

    #[test]
    fn test_wildcard() {
        assert_eq!(
            parse_unicode_ranges("U+4??"),
            vec![UnicodeRange { start: 0x400, end: 0x4FF }]
        );
        assert_eq!(
            parse_unicode_ranges("U+4???"),
            vec![UnicodeRange { start: 0x4000, end: 0x4FFF }]
        );
    }

    #[test]
    fn test_wildcard_only() {
        assert_eq!(
            parse_unicode_ranges("U+??"),
            vec![UnicodeRange { start: 0x00, end: 0xFF }]
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            parse_unicode_ranges("u+4e00-9fff"),
            parse_unicode_ranges("U+4E00-9FFF")
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(parse_unicode_ranges("").is_empty());
        assert!(parse_unicode_ranges("   ").is_empty());
    }

    #[test]
    fn test_multiple_tokens() {
        let ranges = parse_unicode_ranges("U+0-7F, U+A0-FF, U+131");
        assert_eq!(ranges.len(), 3);
        assert_eq!(ranges[0], UnicodeRange { start: 0x0, end: 0x7F });
        assert_eq!(ranges[2], UnicodeRange { start: 0x131, end: 0x131 });
    }

    #[test]
    fn test_malformed_tokens_dropped_individually() {
        // Bad tokens vanish without taking their siblings down.
        let ranges = parse_unicode_ranges("U+41, banana, U+ZZ, 26, U+61-7A");
        assert_eq!(ranges.len(), 2);
        assert_eq!(ranges[0], UnicodeRange { start: 0x41, end: 0x41 });
        assert_eq!(ranges[1], UnicodeRange { start: 0x61, end: 0x7A });
    }

    #[test]
    fn test_interior_wildcard_dropped() {
        assert!(parse_unicode_ranges("U+4?0").is_empty());
        assert!(parse_unicode_ranges("U+4?-5?").is_empty());
    }

    #[test]
    fn test_contains_inclusive() {
        let range = UnicodeRange { start: 0x400, end: 0x4FF };
        assert!(range.contains(0x400));
        assert!(range.contains(0x4FF));
        assert!(!range.contains(0x3FF));
        assert!(!range.contains(0x500));
    }

    #[test]
    fn test_char_in_ranges() {
        let ranges = parse_unicode_ranges("U+41-5A, U+61-7A");
        assert!(char_in_ranges('A', &ranges));
        assert!(char_in_ranges('z', &ranges));
        assert!(!char_in_ranges('0', &ranges));
    }

    #[test]
    fn test_char_in_ranges_empty_matches_nothing() {
        assert!(!char_in_ranges('A', &[]));
    }
}
