//! Integration tests for card_identifier.
//!
//! These tests cover the built-in catalog, catalog loading from disk, and
//! conflict detection end to end.

use card_identifier::{
    batch, conflict, cvv, detail, luhn, mask, BinPattern, Brand, CardType, Catalog, FineBinRecord,
};

// =============================================================================
// REAL-WORLD TEST CARD NUMBERS
// =============================================================================
// These are official test card numbers from payment processors.
// They pass Luhn validation but are not real cards.

mod test_cards {
    pub const VISA: &[&str] = &[
        "4111111111111111",
        "4012888888881881",
        "4222222222222",
        "4000056655665556",
        "4242424242424242",
    ];
    pub const MASTERCARD: &[&str] = &[
        "5555555555554444",
        "5105105105105100",
        "5200828282828210",
        "2223000048400011",
        "2223520043560014",
    ];
    pub const AMEX: &[&str] = &["378282246310005", "371449635398431", "340000000000009"];
    pub const DISCOVER: &[&str] = &["6011111111111117", "6011000990139424", "6445644564456445"];
    pub const DINERS: &[&str] = &["30569309025904", "38520000023237", "36700102000000"];
    pub const JCB: &[&str] = &["3530111333300000", "3566002020360505"];
    pub const ELO: &[&str] = &["5066991111111118", "5090000000000000", "6504310000000000"];
    pub const HIPERCARD: &[&str] = &["6062825624254001", "3841001111222233"];
}

fn builtin() -> Catalog {
    Catalog::builtin().expect("built-in catalog is valid")
}

// =============================================================================
// CLASSIFICATION
// =============================================================================

#[test]
fn test_builtin_test_cards() {
    let catalog = builtin();
    for (scheme, cards) in [
        ("visa", test_cards::VISA),
        ("mastercard", test_cards::MASTERCARD),
        ("amex", test_cards::AMEX),
        ("discover", test_cards::DISCOVER),
        ("diners", test_cards::DINERS),
        ("jcb", test_cards::JCB),
        ("elo", test_cards::ELO),
        ("hipercard", test_cards::HIPERCARD),
    ] {
        for card in cards {
            let result = catalog
                .classify(card)
                .unwrap_or_else(|| panic!("{} not recognized", card));
            assert_eq!(result.scheme(), scheme, "{}", card);
        }
    }
}

#[test]
fn test_winner_pattern_matches_number() {
    let catalog = builtin();
    for card in test_cards::VISA.iter().chain(test_cards::ELO) {
        let result = catalog.classify(card).unwrap();
        assert!(card_identifier::matcher::matches(card, result.pattern));
    }
}

#[test]
fn test_classification_does_not_require_luhn() {
    let catalog = builtin();
    // Brand identification is independent of the check digit
    assert_eq!(catalog.classify("4111111111111112").unwrap().scheme(), "visa");
    assert!(!luhn::luhn_valid("4111111111111112"));
}

#[test]
fn test_length_outside_brand_range() {
    let catalog = builtin();
    // 17-digit Visa is not a declared length
    assert!(catalog.classify("41111111111111111").is_none());
    // 14-digit Amex likewise
    assert!(catalog.classify("37828224631000").is_none());
}

#[test]
fn test_separators_are_not_stripped() {
    let catalog = builtin();
    assert!(catalog.classify("4111 1111 1111 1111").is_none());
    assert!(catalog.classify("4111-1111-1111-1111").is_none());
}

#[test]
fn test_elo_wins_over_visa_and_aura() {
    let catalog = builtin();
    assert_eq!(catalog.classify("4011780000000000").unwrap().scheme(), "elo");
    assert_eq!(catalog.classify("5067000000000000").unwrap().scheme(), "elo");
    // Outside Elo ranges the broader brands win again
    assert_eq!(catalog.classify("4011770000000000").unwrap().scheme(), "visa");
    assert_eq!(catalog.classify("5000000000000000").unwrap().scheme(), "aura");
}

#[test]
fn test_hipercard_wins_over_diners() {
    let catalog = builtin();
    let result = catalog.classify("3841001111222233").unwrap();
    assert_eq!(result.scheme(), "hipercard");
    assert_eq!(detail::detail("3841001111222233", &result).unwrap().bin, "384100");
}

#[test]
fn test_maestro_is_debit() {
    let catalog = builtin();
    let result = catalog.classify("6759649826438453").unwrap();
    assert_eq!(result.scheme(), "maestro");
    assert_eq!(result.brand.card_type, CardType::Debit);
}

// =============================================================================
// CVV
// =============================================================================

#[test]
fn test_cvv_per_scheme() {
    let catalog = builtin();
    assert!(catalog.validate_cvv("123", "visa"));
    assert!(!catalog.validate_cvv("1234", "visa"));
    assert!(catalog.validate_cvv("1234", "amex"));
    assert!(!catalog.validate_cvv("", "visa"));
    assert!(!catalog.validate_cvv("123", "unknown-scheme"));
}

#[test]
fn test_cvv_follows_classification() {
    let catalog = builtin();
    let result = catalog.classify("378282246310005").unwrap();
    assert!(cvv::validate_cvv("1234", result.brand));
    assert!(!cvv::validate_cvv("123", result.brand));
}

// =============================================================================
// SECURITY
// =============================================================================

#[test]
fn test_masking_preserves_bin_and_last_four() {
    for card in test_cards::VISA.iter().chain(test_cards::AMEX) {
        let masked = mask::mask_number(card);
        assert_ne!(&masked, card);
        assert_eq!(&masked[..6], &card[..6]);
        assert_eq!(&masked[masked.len() - 4..], &card[card.len() - 4..]);
    }
}

#[test]
fn test_cvv_not_exposed() {
    let catalog = builtin();
    let validated = cvv::check_cvv("9876", catalog.brand("amex").unwrap()).unwrap();
    assert!(!format!("{:?}", validated).contains("9876"));
    assert!(!format!("{}", validated).contains("9876"));
}

// =============================================================================
// BATCH
// =============================================================================

#[test]
fn test_batch_over_all_test_cards() {
    let catalog = builtin();
    let cards: Vec<&str> = test_cards::VISA
        .iter()
        .chain(test_cards::MASTERCARD)
        .chain(test_cards::AMEX)
        .copied()
        .collect();

    let counts = batch::BatchClassifier::new(&catalog).scheme_counts(&cards);
    assert_eq!(counts["visa"], 5);
    assert_eq!(counts["mastercard"], 5);
    assert_eq!(counts["amex"], 3);
}

// =============================================================================
// CONFLICTS
// =============================================================================

#[test]
fn test_builtin_conflicts() {
    let catalog = builtin();
    let conflicts = conflict::detect_conflicts(&catalog);

    let has = |a: &str, b: &str| conflicts.iter().any(|c| c.brand_a == a && c.brand_b == b);
    assert!(has("elo", "aura"));
    assert!(has("elo", "visa"));
    assert!(has("hipercard", "diners"));
    assert!(!has("visa", "amex"));

    for c in &conflicts {
        let a = catalog.position(&c.brand_a).unwrap();
        let b = catalog.position(&c.brand_b).unwrap();
        assert!(a < b);
        assert_eq!(c.shared_bin_prefix, &c.example_number[..6]);
        // Both named patterns really match the example
        let pa = &catalog.brand(&c.brand_a).unwrap().patterns[c.pattern_a.index];
        let pb = &catalog.brand(&c.brand_b).unwrap().patterns[c.pattern_b.index];
        assert!(card_identifier::matcher::matches(&c.example_number, pa));
        assert!(card_identifier::matcher::matches(&c.example_number, pb));
    }
}

#[test]
fn test_conflict_winner_agrees_with_classifier() {
    let catalog = builtin();
    for c in conflict::detect_conflicts(&catalog) {
        let candidates: Vec<_> = card_identifier::resolve::candidates(&c.example_number, &catalog)
            .iter()
            .map(|b| b.scheme.clone())
            .collect();
        // With only the two brands involved, the pairwise winner is the answer
        if candidates.len() == 2 {
            assert_eq!(
                catalog.classify(&c.example_number).unwrap().scheme(),
                c.winner,
                "{}",
                c
            );
        }
    }
}

#[test]
fn test_unresolved_conflict_reported() {
    let catalog = Catalog::new(vec![
        Brand::new("discover", "Discover", CardType::Credit)
            .pattern(BinPattern::new("^65", &[16], true, 3).unwrap()),
        Brand::new("rupay", "RuPay", CardType::Debit)
            .pattern(BinPattern::new("^65[2-3]", &[16], true, 3).unwrap())
            .fine_bin(FineBinRecord::with_bin("652150").issuer("Test")),
    ])
    .unwrap();

    let report = conflict::ConflictReport::generate(&catalog, &conflict::DetectorConfig::default());
    assert_eq!(report.unresolved().count(), report.conflicts.len());
    assert!(report.to_string().contains("by catalog order"));
}

// =============================================================================
// JSON CATALOGS
// =============================================================================

#[cfg(feature = "json")]
mod json {
    use card_identifier::{conflict, CatalogError, JsonCatalogLoader};
    use std::fs;

    const ELO: &str = r#"{
        "scheme": "elo",
        "brand": "Elo",
        "type": "credit",
        "countries": ["BR"],
        "priorityOver": ["aura"],
        "patterns": [
            { "bin": "^(506699|5067[0-6]\\d)", "length": 16, "luhn": true, "cvvLength": 3 }
        ]
    }"#;

    const AURA: &str = r#"{
        "scheme": "aura",
        "brand": "Aura",
        "countries": ["BR"],
        "patterns": [
            { "bin": "^50", "length": [16, 19], "luhn": true, "cvvLength": 3 }
        ]
    }"#;

    #[test]
    fn test_load_directory() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("elo.json"), ELO).unwrap();
        fs::write(dir.path().join("aura.json"), AURA).unwrap();
        fs::write(dir.path().join("README.md"), "not a source").unwrap();

        let catalog = JsonCatalogLoader::from_path(dir.path()).unwrap();
        assert_eq!(catalog.schemes(), vec!["aura", "elo"]);

        // Priority, not file order, decides
        assert_eq!(catalog.classify("5066990000000000").unwrap().scheme(), "elo");

        let conflicts = conflict::detect_conflicts(&catalog);
        assert!(conflicts
            .iter()
            .any(|c| c.brand_a == "aura" && c.brand_b == "elo" && c.shared_bin_prefix == "506699"));
    }

    #[test]
    fn test_load_split_scheme_directory() {
        let dir = tempfile::tempdir().unwrap();
        let elo_dir = dir.path().join("elo");
        fs::create_dir(&elo_dir).unwrap();
        fs::write(elo_dir.join("base.json"), ELO).unwrap();
        fs::write(
            elo_dir.join("bins.json"),
            r#"{
                "scheme": "elo",
                "countries": ["AR"],
                "bins": [{ "bin": "506699", "issuer": "Test Bank", "category": "classic" }]
            }"#,
        )
        .unwrap();

        let catalog = JsonCatalogLoader::from_path(dir.path()).unwrap();
        let elo = catalog.brand("elo").unwrap();
        assert_eq!(elo.patterns.len(), 1);
        assert_eq!(elo.countries, vec!["BR", "AR"]);

        let result = catalog.classify("5066990000000000").unwrap();
        let record = result.fine_bin.unwrap();
        assert_eq!(record.issuer.as_deref(), Some("Test Bank"));
        assert_eq!(record.category.as_deref(), Some("classic"));
    }

    #[test]
    fn test_load_single_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.json");
        fs::write(&path, format!("[{}, {}]", ELO, AURA)).unwrap();

        let catalog = JsonCatalogLoader::from_path(&path).unwrap();
        assert_eq!(catalog.schemes(), vec!["elo", "aura"]);
        assert!(catalog.lint().is_empty());
    }

    #[test]
    fn test_structural_error_names_source() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("bad.json"),
            r#"{ "scheme": "bad", "brand": "Bad", "patterns": [{ "bin": "^4", "luhn": true, "cvvLength": 3 }] }"#,
        )
        .unwrap();

        let err = JsonCatalogLoader::from_path(dir.path()).unwrap_err();
        match &err {
            CatalogError::Invalid(issues) => {
                assert_eq!(issues.len(), 1);
                assert_eq!(issues[0].source, "bad[pattern 0]");
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_oversized_cvv_length_rejected() {
        let err = JsonCatalogLoader::parse(
            r#"{ "scheme": "odd", "brand": "Odd", "patterns": [{ "bin": "^9", "length": 16, "luhn": true, "cvvLength": 9 }] }"#,
        )
        .unwrap_err();
        match &err {
            CatalogError::Invalid(issues) => {
                assert_eq!(issues[0].source, "odd[pattern 0]");
                assert!(issues[0].message.contains("CVV length"));
            }
            other => panic!("expected Invalid, got {:?}", other),
        }
    }

    #[test]
    fn test_syntax_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("broken.json"), "{ not json").unwrap();
        assert!(matches!(
            JsonCatalogLoader::from_path(dir.path()),
            Err(CatalogError::Parse(_))
        ));
    }

    #[test]
    fn test_missing_path() {
        assert!(matches!(
            JsonCatalogLoader::from_path("/nonexistent/catalog/dir"),
            Err(CatalogError::Io(_))
        ));
    }

    #[test]
    fn test_report_json_roundtrip() {
        let catalog = JsonCatalogLoader::parse(&format!("[{}, {}]", ELO, AURA)).unwrap();
        let report =
            conflict::ConflictReport::generate(&catalog, &conflict::DetectorConfig::default());
        let value: serde_json::Value = serde_json::from_str(&report.to_json().unwrap()).unwrap();
        assert_eq!(value["brands"], 2);
        assert_eq!(value["conflicts"][0]["shared_bin_prefix"], "506699");
        assert_eq!(value["conflicts"][0]["resolved_by_priority"], true);
    }
}
