//! Property-based tests using proptest.
//!
//! These tests verify invariants that should hold for all inputs,
//! helping discover edge cases that manual tests might miss.

use card_identifier::{
    cvv, luhn,
    mask::mask_number,
    matcher::matches,
    resolve::{candidates, classify},
    Catalog,
};
use proptest::prelude::*;
use std::sync::OnceLock;

fn catalog() -> &'static Catalog {
    static CATALOG: OnceLock<Catalog> = OnceLock::new();
    CATALOG.get_or_init(|| Catalog::builtin().unwrap())
}

// =============================================================================
// STRATEGIES
// =============================================================================

/// Generates a random digit string of a given length.
fn digit_string(len: usize) -> impl Strategy<Value = String> {
    proptest::collection::vec(prop::char::range('0', '9'), len)
        .prop_map(|chars| chars.into_iter().collect())
}

/// Generates a random digit string of a length within range.
fn digit_string_range(range: std::ops::RangeInclusive<usize>) -> impl Strategy<Value = String> {
    range.prop_flat_map(digit_string)
}

/// Generates numbers that start in the busiest BIN ranges of the catalog.
fn card_like_number() -> impl Strategy<Value = String> {
    let prefix = prop_oneof![
        Just("4"),
        Just("4011"),
        Just("50"),
        Just("5066"),
        Just("5067"),
        Just("509"),
        Just("38"),
        Just("3841"),
        Just("6062"),
        Just("65"),
        Just("6504"),
        Just("6011"),
        Just("62"),
        Just("2221"),
        Just("2200"),
    ];
    (prefix, 12usize..=19).prop_flat_map(|(prefix, len)| {
        digit_string(len - prefix.len()).prop_map(move |rest| format!("{}{}", prefix, rest))
    })
}

// =============================================================================
// CLASSIFICATION PROPERTIES
// =============================================================================

proptest! {
    /// Property: The winning brand really matches the number.
    #[test]
    fn winner_matches_number(number in card_like_number()) {
        if let Some(result) = classify(&number, catalog()) {
            prop_assert!(matches(&number, result.pattern));
            prop_assert!(result.brand.patterns.iter().any(|p| matches(&number, p)));
        }
    }

    /// Property: The winner follows the priority rule over the ambiguity set.
    #[test]
    fn priority_invariant(number in card_like_number()) {
        let matched = candidates(&number, catalog());
        let result = classify(&number, catalog());
        prop_assert_eq!(matched.is_empty(), result.is_none());

        if let Some(result) = result {
            let winner = matched
                .iter()
                .position(|b| b.scheme == result.brand.scheme)
                .unwrap();
            let outranks = |i: usize| {
                matched
                    .iter()
                    .any(|other| matched[i].has_priority_over(&other.scheme))
            };

            // No earlier candidate could have claimed priority
            for i in 0..winner {
                prop_assert!(!outranks(i));
            }
            // A non-first winner must hold priority itself
            if winner > 0 {
                prop_assert!(outranks(winner));
            }
        }
    }

    /// Property: Classification is pure.
    #[test]
    fn classify_is_idempotent(number in card_like_number()) {
        let first = classify(&number, catalog()).map(|c| c.summary());
        let second = classify(&number, catalog()).map(|c| c.summary());
        prop_assert_eq!(first, second);
    }

    /// Property: Classification never panics on arbitrary input.
    #[test]
    fn classify_never_panics(input in ".*") {
        let _ = classify(&input, catalog());
    }

    /// Property: Any non-digit character rules out a match.
    #[test]
    fn non_digit_input_never_matches(
        number in card_like_number(),
        pos in 0usize..19,
        c in "[^0-9]",
    ) {
        let mut input = number.clone();
        input.insert_str(pos.min(number.len()), &c);
        prop_assert!(classify(&input, catalog()).is_none());
        prop_assert!(!luhn::luhn_valid(&input));
    }
}

// =============================================================================
// LUHN ALGORITHM PROPERTIES
// =============================================================================

proptest! {
    /// Property: Appending the generated check digit makes any number valid.
    #[test]
    fn check_digit_makes_valid(partial in digit_string_range(1..=18)) {
        let digits: Vec<u8> = partial.bytes().map(|b| b - b'0').collect();
        let check = luhn::generate_check_digit(&digits);
        let full = format!("{}{}", partial, check);
        prop_assert!(luhn::luhn_valid(&full));
    }

    /// Property: Changing any single digit invalidates a valid number.
    #[test]
    fn single_digit_change_invalidates_luhn(
        partial in digit_string_range(11..=18),
        pos_seed in any::<usize>(),
        delta in 1u8..=9,
    ) {
        let mut digits: Vec<u8> = partial.bytes().map(|b| b - b'0').collect();
        digits.push(luhn::generate_check_digit(&digits));
        prop_assert!(luhn::validate(&digits));

        let pos = pos_seed % digits.len();
        digits[pos] = (digits[pos] + delta) % 10;
        prop_assert!(!luhn::validate(&digits));
    }

    /// Property: String and digit-slice forms agree.
    #[test]
    fn luhn_forms_agree(number in digit_string_range(1..=19)) {
        let digits: Vec<u8> = number.bytes().map(|b| b - b'0').collect();
        prop_assert_eq!(luhn::luhn_valid(&number), luhn::validate(&digits));
    }
}

// =============================================================================
// CVV PROPERTIES
// =============================================================================

proptest! {
    /// Property: Any three digits are a valid Visa CVV, never an Amex CID.
    #[test]
    fn three_digit_cvv(cvv_input in digit_string(3)) {
        prop_assert!(catalog().validate_cvv(&cvv_input, "visa"));
        prop_assert!(!catalog().validate_cvv(&cvv_input, "amex"));
    }

    /// Property: Any four digits are a valid Amex CID.
    #[test]
    fn four_digit_cvv(cvv_input in digit_string(4)) {
        prop_assert!(catalog().validate_cvv(&cvv_input, "amex"));
        prop_assert!(!catalog().validate_cvv(&cvv_input, "visa"));
    }

    /// Property: Validation agrees with the brand's declared length.
    #[test]
    fn cvv_length_rule(cvv_input in "[0-9]{0,6}") {
        for brand in catalog().brands() {
            let expected = brand.cvv_length().unwrap();
            prop_assert_eq!(cvv::validate_cvv(&cvv_input, brand), cvv_input.len() == expected);
        }
    }
}

// =============================================================================
// MASKING PROPERTIES
// =============================================================================

proptest! {
    /// Property: Masked output never exposes the middle digits.
    #[test]
    fn masked_hides_middle(number in digit_string_range(12..=19)) {
        let masked = mask_number(&number);
        prop_assert_eq!(masked.len(), number.len());
        prop_assert_eq!(&masked[..6], &number[..6]);
        prop_assert_eq!(&masked[number.len() - 4..], &number[number.len() - 4..]);
        prop_assert!(masked[6..number.len() - 4].chars().all(|c| c == '*'));
    }
}
