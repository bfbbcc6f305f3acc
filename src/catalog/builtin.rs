//! Built-in catalog of common card brands.
//!
//! Brand order is significant: it is the tie-break when overlapping brands
//! declare no priority over each other.

use super::{BinPattern, Brand, Catalog, CardType, FineBinRecord, GLOBAL};
use crate::error::CatalogError;

const LENGTHS_16_19: &[usize] = &[16, 17, 18, 19];

impl Catalog {
    /// Builds the built-in catalog.
    ///
    /// Construction is cheap and deterministic; callers that need the
    /// catalog repeatedly should build it once and share the reference.
    ///
    /// | Scheme | BIN | Lengths | CVV |
    /// |--------|-----|---------|-----|
    /// | elo | 401178, 4389 35, 5067, 509, 6500 ranges, ... | 16 | 3 |
    /// | hipercard | 606282, 384100, 384140, 384160 | 16, 19 | 3 |
    /// | aura | 50 | 16, 19 | 3 |
    /// | visa | 4 | 13, 16, 19 | 3 |
    /// | mastercard | 51-55, 2221-2720 | 16 | 3 |
    /// | amex | 34, 37 | 15 | 4 |
    /// | diners | 300-305, 36, 38, 39 | 14, 16 | 3 |
    /// | discover | 6011, 644-649, 65 | 16, 19 | 3 |
    /// | jcb | 3528-3589 | 16-19 | 3 |
    /// | unionpay | 62 | 16-19 | 3 |
    /// | maestro | 5018, 5020, 5038, 5893, 6304, 6759, 6761-6763 | 12-19 | 3 |
    /// | mir | 2200-2204 | 16-19 | 3 |
    ///
    /// # Example
    ///
    /// ```
    /// use card_identifier::Catalog;
    ///
    /// let catalog = Catalog::builtin().unwrap();
    /// assert!(catalog.validate_cvv("1234", "amex"));
    /// assert!(!catalog.validate_cvv("1234", "visa"));
    /// ```
    pub fn builtin() -> Result<Self, CatalogError> {
        let brands = vec![
            Brand::new("elo", "Elo", CardType::Credit)
                .pattern(BinPattern::new(
                    "^(401178|401179|431274|438935|451416|457393|457631|457632|504175|627780|636297|636368)",
                    &[16],
                    true,
                    3,
                )?)
                .pattern(BinPattern::new("^(506699|5067[0-6]\\d|50677[0-8])", &[16], true, 3)?)
                .pattern(BinPattern::new("^509\\d{3}", &[16], true, 3)?)
                .pattern(BinPattern::new(
                    "^(65003[1-3]|65003[5-9]|65004\\d|65005[01]|65040[5-9]|6504[1-3]\\d)",
                    &[16],
                    true,
                    3,
                )?)
                .countries(["BR"])
                .priority_over(["visa", "aura", "discover", "unionpay", "maestro"]),
            Brand::new("hipercard", "Hipercard", CardType::Credit)
                .pattern(BinPattern::new("^(606282|3841[046]0)", &[16, 19], true, 3)?)
                .countries(["BR"])
                .priority_over(["diners"])
                .fine_bin(FineBinRecord::with_bin("606282").issuer("Hipercard").countries(["BR"]))
                .fine_bin(FineBinRecord::with_bin("384100").issuer("Hipercard").countries(["BR"]))
                .fine_bin(FineBinRecord::with_bin("384140").issuer("Hipercard").countries(["BR"]))
                .fine_bin(FineBinRecord::with_bin("384160").issuer("Hipercard").countries(["BR"])),
            Brand::new("aura", "Aura", CardType::Credit)
                .pattern(BinPattern::new("^50", &[16, 19], true, 3)?)
                .countries(["BR"]),
            Brand::new("visa", "Visa", CardType::Credit)
                .pattern(BinPattern::new("^4", &[13, 16, 19], true, 3)?)
                .countries([GLOBAL]),
            Brand::new("mastercard", "Mastercard", CardType::Credit)
                .pattern(BinPattern::new(
                    "^(5[1-5]|222[1-9]|22[3-9]\\d|2[3-6]\\d{2}|27[01]\\d|2720)",
                    &[16],
                    true,
                    3,
                )?)
                .countries([GLOBAL]),
            Brand::new("amex", "American Express", CardType::Credit)
                .pattern(BinPattern::new("^3[47]", &[15], true, 4)?)
                .countries([GLOBAL]),
            Brand::new("diners", "Diners Club", CardType::Credit)
                .pattern(BinPattern::new("^(30[0-5]|36|38|39)", &[14, 16], true, 3)?)
                .countries([GLOBAL]),
            Brand::new("discover", "Discover", CardType::Credit)
                .pattern(BinPattern::new("^(6011|64[4-9]|65)", &[16, 19], true, 3)?)
                .countries([GLOBAL]),
            Brand::new("jcb", "JCB", CardType::Credit)
                .pattern(BinPattern::new("^35(2[89]|[3-8]\\d)", LENGTHS_16_19, true, 3)?)
                .countries([GLOBAL]),
            Brand::new("unionpay", "UnionPay", CardType::Credit)
                .pattern(BinPattern::new("^62", LENGTHS_16_19, false, 3)?)
                .countries([GLOBAL]),
            Brand::new("maestro", "Maestro", CardType::Debit)
                .pattern(BinPattern::new(
                    "^(5018|5020|5038|5893|6304|6759|676[1-3])",
                    &[12, 13, 14, 15, 16, 17, 18, 19],
                    true,
                    3,
                )?)
                .countries([GLOBAL])
                .priority_over(["aura"]),
            Brand::new("mir", "Mir", CardType::Credit)
                .pattern(BinPattern::new("^220[0-4]", LENGTHS_16_19, true, 3)?)
                .countries(["RU"]),
        ];

        Catalog::new(brands)
    }
}
