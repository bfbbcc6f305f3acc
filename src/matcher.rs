//! Pattern matching of card numbers against BIN patterns.
//!
//! A number matches a [`BinPattern`] when the pattern's BIN regex matches a
//! prefix of the number *and* the number's digit count is one of the
//! pattern's lengths. A BIN-only match is not a match.
//!
//! No normalization happens here: separators such as spaces or dashes make
//! the number invalid.

use crate::catalog::BinPattern;

/// Returns true if `number` is non-empty and consists of ASCII digits only.
#[inline]
pub fn is_digits(number: &str) -> bool {
    !number.is_empty() && number.bytes().all(|b| b.is_ascii_digit())
}

/// Tests one card number against one pattern.
///
/// Returns `false` (never panics) for empty or non-digit input.
///
/// # Example
///
/// ```
/// use card_identifier::catalog::BinPattern;
/// use card_identifier::matcher::matches;
///
/// let elo = BinPattern::new("^(506699|5067[0-6]\\d)", &[16], true, 3).unwrap();
/// assert!(matches("5066990000000000", &elo));
/// // Right BIN, wrong length
/// assert!(!matches("506699000000000", &elo));
/// ```
#[inline]
pub fn matches(number: &str, pattern: &BinPattern) -> bool {
    is_digits(number) && matches_digits(number, pattern)
}

/// Like [`matches`], for input already known to be all digits.
#[inline]
pub(crate) fn matches_digits(number: &str, pattern: &BinPattern) -> bool {
    // Leftmost-first search: if any match starts at 0, the first one found does.
    pattern.accepts_length(number.len())
        && pattern
            .regex()
            .find(number)
            .is_some_and(|m| m.start() == 0)
}

/// Returns the index of the first pattern in `patterns` that matches.
pub fn first_match(number: &str, patterns: &[BinPattern]) -> Option<usize> {
    if !is_digits(number) {
        return None;
    }
    patterns.iter().position(|p| matches_digits(number, p))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(bin: &str, lengths: &[usize]) -> BinPattern {
        BinPattern::new(bin, lengths, true, 3).unwrap()
    }

    #[test]
    fn test_bin_and_length_required() {
        let visa = pattern("^4", &[13, 16, 19]);
        assert!(matches("4012001037141112", &visa));
        assert!(matches("4222222222222", &visa));
        assert!(!matches("401200103714111", &visa));
        assert!(!matches("5012001037141112", &visa));
    }

    #[test]
    fn test_rejects_malformed_input() {
        let visa = pattern("^4", &[16]);
        assert!(!matches("", &visa));
        assert!(!matches("4012-0010-3714-1112", &visa));
        assert!(!matches("4012 0010 3714 111", &visa));
        assert!(!matches("abcdabcdabcdabcd", &visa));
    }

    #[test]
    fn test_unanchored_pattern_only_matches_prefix() {
        let p = pattern("50", &[16]);
        assert!(matches("5000000000000000", &p));
        assert!(!matches("1500000000000000", &p));
    }

    #[test]
    fn test_alternation_prefers_any_branch_at_start() {
        // The first branch would match later in the string, the second at 0
        let p = pattern("99|12", &[6]);
        assert!(matches("129900", &p));
    }

    #[test]
    fn test_first_match() {
        let patterns = vec![pattern("^62", &[16]), pattern("^6", &[16, 19])];
        assert_eq!(first_match("6200000000000000", &patterns), Some(0));
        assert_eq!(first_match("6500000000000000000", &patterns), Some(1));
        assert_eq!(first_match("7000000000000000", &patterns), None);
        assert_eq!(first_match("62a", &patterns), None);
    }
}
