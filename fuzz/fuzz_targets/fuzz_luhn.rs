//! Fuzz target for Luhn algorithm.
//!
//! Tests that luhn functions never panic and maintain invariants.

#![no_main]

use card_identifier::luhn;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Clamp values to valid digit range
    let digits: Vec<u8> = data.iter().map(|&b| b % 10).collect();

    if digits.is_empty() {
        return;
    }

    // String and slice forms agree
    let text: String = digits.iter().map(|&d| (b'0' + d) as char).collect();
    assert_eq!(luhn::luhn_valid(&text), luhn::validate(&digits), "string/slice mismatch");

    // Raw bytes are arbitrary text; must not panic
    if let Ok(raw) = std::str::from_utf8(data) {
        let _ = luhn::luhn_valid(raw);
    }

    // Test check digit generation
    if digits.len() <= 18 {
        let check = luhn::generate_check_digit(&digits);
        assert!(check <= 9, "Check digit should be 0-9");

        // Adding check digit should make it valid
        let mut with_check = digits.clone();
        with_check.push(check);
        assert!(luhn::validate(&with_check), "Adding check digit should make valid");
    }
});
