//! Fuzz target for probe synthesis.
//!
//! Tests that the BIN regex parser never panics on arbitrary patterns and
//! that every probe satisfies the pattern it came from.

#![no_main]

use card_identifier::conflict::probe;
use card_identifier::{matcher, BinPattern};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|input: (&str, u8)| {
    let (bin, cap) = input;
    let cap = usize::from(cap % 16);

    let prefixes = probe::literal_prefixes(bin, cap);
    assert!(prefixes.len() <= cap.max(1));
    assert!(prefixes.iter().all(|p| matcher::is_digits(p)));

    if let Ok(pattern) = BinPattern::new(bin, &[12, 16, 19], true, 3) {
        for number in probe::probes(&pattern, cap) {
            assert!(matcher::matches(&number, &pattern), "probe fails its pattern");
        }
    }
});
