//! Fuzz target for CVV validation.
//!
//! Tests that CVV functions never panic on arbitrary input.

#![no_main]

use card_identifier::{cvv, Catalog};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &str| {
    let catalog = Catalog::builtin().unwrap();

    // Test with all brands
    for brand in catalog.brands() {
        let ok = cvv::validate_cvv(data, brand);
        assert_eq!(ok, catalog.validate_cvv(data, &brand.scheme));

        // If validation succeeds, test other methods
        if let Ok(validated) = cvv::check_cvv(data, brand) {
            assert_eq!(validated.as_str(), data);
            assert_eq!(Some(validated.length()), brand.cvv_length());
            let _ = validated.digits();
            assert!(!format!("{:?}", validated).contains(data));
            let _ = format!("{}", validated);
        }
    }

    for expected in 0..=10 {
        let _ = cvv::validate_cvv_length(data, expected);
    }
});
