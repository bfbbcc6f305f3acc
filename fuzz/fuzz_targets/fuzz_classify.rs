//! Fuzz target for classification.
//!
//! Tests that classify() never panics and that every winner matches.

#![no_main]

use card_identifier::{matcher, Catalog};
use libfuzzer_sys::fuzz_target;
use std::sync::OnceLock;

static CATALOG: OnceLock<Catalog> = OnceLock::new();

fuzz_target!(|data: &str| {
    let catalog = CATALOG.get_or_init(|| Catalog::builtin().unwrap());

    let result = catalog.classify(data);
    if let Some(result) = result {
        assert!(matcher::is_digits(data), "non-digit input classified");
        assert!(matcher::matches(data, result.pattern), "winner pattern does not match");
        let _ = result.summary();
        let _ = format!("{}", result);
    }
    let _ = catalog.is_recognized(data);
    let _ = card_identifier::mask::mask_number(data);
});
