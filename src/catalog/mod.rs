//! Card brand catalog.
//!
//! A [`Catalog`] is an ordered list of [`Brand`] definitions, each carrying
//! one or more [`BinPattern`]s and optional fine-grained [`FineBinRecord`]s.
//! It is built once, validated structurally at construction time, and is
//! read-only afterwards, so a single instance can be shared by reference
//! across threads.
//!
//! # Example
//!
//! ```
//! use card_identifier::catalog::{BinPattern, Brand, Catalog, CardType};
//!
//! let visa = Brand::new("visa", "Visa", CardType::Credit)
//!     .pattern(BinPattern::new("^4", &[13, 16, 19], true, 3).unwrap());
//! let catalog = Catalog::new(vec![visa]).unwrap();
//!
//! assert_eq!(catalog.schemes(), vec!["visa"]);
//! assert!(catalog.is_recognized("4012001037141112"));
//! ```
//!
//! # Features
//!
//! - `json` - JSON source loader ([`JsonCatalogLoader`])

mod builtin;
#[cfg(feature = "json")]
mod json;
pub mod lint;

#[cfg(feature = "json")]
pub use json::JsonCatalogLoader;
pub use lint::CatalogWarning;

use crate::error::{CatalogError, CatalogIssue};
use regex::Regex;
use std::collections::HashMap;
use std::fmt;

/// Sentinel country code for brands issued worldwide.
pub const GLOBAL: &str = "GLOBAL";

/// One BIN rule of a brand: a prefix regex plus the card lengths it accepts.
#[derive(Clone)]
pub struct BinPattern {
    bin: String,
    regex: Regex,
    lengths: Vec<usize>,
    requires_checksum: bool,
    cvv_length: usize,
}

impl BinPattern {
    /// Compiles a new pattern.
    ///
    /// `bin` is matched against the start of the card number; a leading `^`
    /// is conventional but not required. `lengths` must be non-empty and
    /// `cvv_length` between 1 and [`MAX_CVV_DIGITS`](crate::cvv::MAX_CVV_DIGITS).
    pub fn new(
        bin: &str,
        lengths: &[usize],
        requires_checksum: bool,
        cvv_length: usize,
    ) -> Result<Self, CatalogIssue> {
        let regex = Regex::new(bin)
            .map_err(|e| CatalogIssue::new(bin, format!("invalid BIN regex: {}", e)))?;

        if lengths.is_empty() || lengths.contains(&0) {
            return Err(CatalogIssue::new(
                bin,
                "pattern lengths must be a non-empty set of positive numbers",
            ));
        }
        if cvv_length == 0 || cvv_length > crate::cvv::MAX_CVV_DIGITS {
            return Err(CatalogIssue::new(
                bin,
                format!(
                    "CVV length must be between 1 and {}",
                    crate::cvv::MAX_CVV_DIGITS
                ),
            ));
        }

        let mut lengths = lengths.to_vec();
        lengths.sort_unstable();
        lengths.dedup();

        Ok(Self {
            bin: bin.to_string(),
            regex,
            lengths,
            requires_checksum,
            cvv_length,
        })
    }

    /// Returns the BIN regex source.
    #[inline]
    pub fn bin(&self) -> &str {
        &self.bin
    }

    /// Returns the compiled BIN regex.
    #[inline]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Returns the accepted total digit counts, ascending.
    #[inline]
    pub fn lengths(&self) -> &[usize] {
        &self.lengths
    }

    /// Returns true if `length` is one of the accepted digit counts.
    #[inline]
    pub fn accepts_length(&self, length: usize) -> bool {
        self.lengths.binary_search(&length).is_ok()
    }

    /// Returns true if numbers under this pattern carry a Luhn check digit.
    #[inline]
    pub fn requires_checksum(&self) -> bool {
        self.requires_checksum
    }

    /// Returns the CVV length for this pattern.
    #[inline]
    pub fn cvv_length(&self) -> usize {
        self.cvv_length
    }
}

impl fmt::Debug for BinPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinPattern")
            .field("bin", &self.bin)
            .field("lengths", &self.lengths)
            .field("requires_checksum", &self.requires_checksum)
            .field("cvv_length", &self.cvv_length)
            .finish()
    }
}

impl PartialEq for BinPattern {
    fn eq(&self, other: &Self) -> bool {
        self.bin == other.bin
            && self.lengths == other.lengths
            && self.requires_checksum == other.requires_checksum
            && self.cvv_length == other.cvv_length
    }
}

impl Eq for BinPattern {}

/// Whether a brand issues credit or debit cards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
#[cfg_attr(feature = "json", serde(rename_all = "lowercase"))]
pub enum CardType {
    /// Credit card.
    #[default]
    Credit,
    /// Debit card.
    Debit,
}

impl CardType {
    /// Parses `"credit"` or `"debit"` (case-insensitive).
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "credit" => Some(Self::Credit),
            "debit" => Some(Self::Debit),
            _ => None,
        }
    }

    /// Returns the lowercase name.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Credit => "credit",
            Self::Debit => "debit",
        }
    }
}

impl fmt::Display for CardType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A literal BIN prefix with issuer metadata.
///
/// Used only to enrich a classification; it never decides the brand.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct FineBinRecord {
    /// Literal digit prefix (not a regex).
    pub bin: String,
    /// Card type of this BIN, e.g. `"credit"`, `"debit"`, `"prepaid"`.
    pub card_type: Option<String>,
    /// Product category, e.g. `"gold"` or `"platinum"`.
    pub category: Option<String>,
    /// Issuing institution.
    pub issuer: Option<String>,
    /// ISO 3166-1 alpha-2 codes this BIN is issued in.
    pub countries: Option<Vec<String>>,
}

impl FineBinRecord {
    /// Creates a record for the given BIN prefix.
    pub fn with_bin(bin: impl Into<String>) -> Self {
        Self {
            bin: bin.into(),
            ..Default::default()
        }
    }

    /// Builder method to set the card type.
    pub fn card_type(mut self, card_type: impl Into<String>) -> Self {
        self.card_type = Some(card_type.into());
        self
    }

    /// Builder method to set the category.
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Builder method to set the issuer.
    pub fn issuer(mut self, issuer: impl Into<String>) -> Self {
        self.issuer = Some(issuer.into());
        self
    }

    /// Builder method to set the countries.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = Some(countries.into_iter().map(Into::into).collect());
        self
    }
}

/// A card brand (scheme) definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Brand {
    /// Unique lowercase identifier, e.g. `"visa"`.
    pub scheme: String,
    /// Human-readable name, e.g. `"Visa"`.
    pub display_name: String,
    /// Credit or debit.
    pub card_type: CardType,
    /// BIN patterns, in declaration order.
    pub patterns: Vec<BinPattern>,
    /// ISO 3166-1 alpha-2 codes or [`GLOBAL`].
    pub countries: Vec<String>,
    /// Schemes this brand wins over when both match the same number.
    pub priority_over: Vec<String>,
    /// Fine-grained BIN records, possibly empty.
    pub fine_bins: Vec<FineBinRecord>,
}

impl Brand {
    /// Creates a brand with no patterns. Add at least one with
    /// [`Brand::pattern`] before building a catalog.
    pub fn new(
        scheme: impl Into<String>,
        display_name: impl Into<String>,
        card_type: CardType,
    ) -> Self {
        Self {
            scheme: scheme.into(),
            display_name: display_name.into(),
            card_type,
            patterns: Vec::new(),
            countries: Vec::new(),
            priority_over: Vec::new(),
            fine_bins: Vec::new(),
        }
    }

    /// Builder method to append a pattern.
    pub fn pattern(mut self, pattern: BinPattern) -> Self {
        self.patterns.push(pattern);
        self
    }

    /// Builder method to set the countries.
    pub fn countries<I, S>(mut self, countries: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.countries = countries.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to declare priority over other schemes.
    pub fn priority_over<I, S>(mut self, schemes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.priority_over = schemes.into_iter().map(Into::into).collect();
        self
    }

    /// Builder method to append a fine BIN record.
    pub fn fine_bin(mut self, record: FineBinRecord) -> Self {
        self.fine_bins.push(record);
        self
    }

    /// Returns the CVV length declared by the first pattern.
    ///
    /// Patterns of one brand are expected to agree; disagreement is reported
    /// by [`lint`](crate::catalog::lint).
    pub fn cvv_length(&self) -> Option<usize> {
        self.patterns.first().map(BinPattern::cvv_length)
    }

    /// Returns true if this brand declares priority over `scheme`.
    #[inline]
    pub fn has_priority_over(&self, scheme: &str) -> bool {
        self.priority_over.iter().any(|s| s == scheme)
    }
}

impl fmt::Display for Brand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.display_name, self.scheme)
    }
}

/// An immutable, ordered set of brands.
#[derive(Debug, Clone)]
pub struct Catalog {
    brands: Vec<Brand>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Builds a catalog, checking the structural invariants.
    ///
    /// Every brand needs a non-empty scheme and at least one pattern, and
    /// schemes must be unique. All problems are collected before failing.
    pub fn new(brands: Vec<Brand>) -> Result<Self, CatalogError> {
        let mut issues = Vec::new();
        let mut index = HashMap::with_capacity(brands.len());

        for (i, brand) in brands.iter().enumerate() {
            let source = if brand.scheme.is_empty() {
                format!("brand {}", i)
            } else {
                brand.scheme.clone()
            };

            if brand.scheme.is_empty() {
                issues.push(CatalogIssue::new(&source, "missing required field \"scheme\""));
            } else if index.insert(brand.scheme.clone(), i).is_some() {
                issues.push(CatalogIssue::new(&source, "duplicate scheme identifier"));
            }

            if brand.patterns.is_empty() {
                issues.push(CatalogIssue::new(&source, "\"patterns\" must be a non-empty array"));
            }
        }

        if !issues.is_empty() {
            return Err(CatalogError::Invalid(issues));
        }

        tracing::debug!(brands = brands.len(), "catalog built");
        Ok(Self { brands, index })
    }

    /// Returns the brands in catalog order.
    #[inline]
    pub fn brands(&self) -> &[Brand] {
        &self.brands
    }

    /// Returns the scheme identifiers in catalog order.
    pub fn schemes(&self) -> Vec<&str> {
        self.brands.iter().map(|b| b.scheme.as_str()).collect()
    }

    /// Looks up a brand by scheme identifier.
    pub fn brand(&self, scheme: &str) -> Option<&Brand> {
        self.index.get(scheme).map(|&i| &self.brands[i])
    }

    /// Returns the catalog position of a scheme.
    pub fn position(&self, scheme: &str) -> Option<usize> {
        self.index.get(scheme).copied()
    }

    /// Returns the number of brands.
    #[inline]
    pub fn len(&self) -> usize {
        self.brands.len()
    }

    /// Returns true if the catalog has no brands.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.brands.is_empty()
    }

    /// Classifies a card number. See [`resolve::classify`](crate::resolve::classify).
    pub fn classify(&self, number: &str) -> Option<crate::resolve::Classification<'_>> {
        crate::resolve::classify(number, self)
    }

    /// Returns true if any brand recognizes the number.
    pub fn is_recognized(&self, number: &str) -> bool {
        crate::resolve::classify(number, self).is_some()
    }

    /// Validates a CVV against the brand named by `scheme`.
    ///
    /// Unknown schemes fail closed.
    pub fn validate_cvv(&self, cvv: &str, scheme: &str) -> bool {
        self.brand(scheme)
            .map(|brand| crate::cvv::validate_cvv(cvv, brand))
            .unwrap_or(false)
    }

    /// Runs the data-quality checks. See [`lint::lint`].
    pub fn lint(&self) -> Vec<CatalogWarning> {
        lint::lint(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pattern(bin: &str, lengths: &[usize]) -> BinPattern {
        BinPattern::new(bin, lengths, true, 3).unwrap()
    }

    #[test]
    fn test_pattern_rejects_bad_regex() {
        let issue = BinPattern::new("^(50", &[16], true, 3).unwrap_err();
        assert_eq!(issue.source, "^(50");
        assert!(issue.message.contains("invalid BIN regex"));
    }

    #[test]
    fn test_pattern_rejects_empty_lengths() {
        assert!(BinPattern::new("^4", &[], true, 3).is_err());
        assert!(BinPattern::new("^4", &[0, 16], true, 3).is_err());
        assert!(BinPattern::new("^4", &[16], true, 0).is_err());
    }

    #[test]
    fn test_pattern_rejects_unvalidatable_cvv_length() {
        assert!(BinPattern::new("^4", &[16], true, crate::cvv::MAX_CVV_DIGITS).is_ok());
        let issue = BinPattern::new("^4", &[16], true, 9).unwrap_err();
        assert!(issue.message.contains("between 1 and 8"));
    }

    #[test]
    fn test_pattern_lengths_sorted_and_deduped() {
        let p = pattern("^4", &[19, 13, 16, 16]);
        assert_eq!(p.lengths(), &[13, 16, 19]);
        assert!(p.accepts_length(16));
        assert!(!p.accepts_length(15));
    }

    #[test]
    fn test_catalog_rejects_duplicates_and_empty_patterns() {
        let brands = vec![
            Brand::new("visa", "Visa", CardType::Credit).pattern(pattern("^4", &[16])),
            Brand::new("visa", "Visa Again", CardType::Credit).pattern(pattern("^4", &[16])),
            Brand::new("empty", "Empty", CardType::Debit),
        ];
        let err = Catalog::new(brands).unwrap_err();
        let issues = err.issues();
        assert_eq!(issues.len(), 2);
        assert!(issues[0].message.contains("duplicate"));
        assert_eq!(issues[1].source, "empty");
    }

    #[test]
    fn test_catalog_lookup() {
        let catalog = Catalog::new(vec![
            Brand::new("visa", "Visa", CardType::Credit).pattern(pattern("^4", &[16])),
            Brand::new("amex", "American Express", CardType::Credit)
                .pattern(BinPattern::new("^3[47]", &[15], true, 4).unwrap()),
        ])
        .unwrap();

        assert_eq!(catalog.len(), 2);
        assert_eq!(catalog.schemes(), vec!["visa", "amex"]);
        assert_eq!(catalog.position("amex"), Some(1));
        assert_eq!(catalog.brand("amex").unwrap().cvv_length(), Some(4));
        assert!(catalog.brand("discover").is_none());
    }

    #[test]
    fn test_card_type_parse() {
        assert_eq!(CardType::parse("Debit"), Some(CardType::Debit));
        assert_eq!(CardType::parse("credit"), Some(CardType::Credit));
        assert_eq!(CardType::parse("prepaid"), None);
        assert_eq!(CardType::Debit.to_string(), "debit");
    }

    #[cfg(feature = "json")]
    #[test]
    fn test_card_type_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&CardType::Debit).unwrap(), "\"debit\"");
        assert_eq!(serde_json::to_string(&CardType::Credit).unwrap(), "\"credit\"");
    }

    #[test]
    fn test_catalog_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<Catalog>();
        assert_send_sync::<Brand>();
    }
}
