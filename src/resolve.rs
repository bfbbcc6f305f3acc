//! Brand resolution across a whole catalog.
//!
//! Every brand with at least one matching pattern is a candidate. When more
//! than one brand matches, the first candidate (in catalog order) that
//! declares `priority_over` another candidate wins; if none does, the first
//! candidate wins. Classification is a pure function of the number and the
//! catalog.

use crate::catalog::{BinPattern, Brand, CardType, Catalog, FineBinRecord};
use crate::detail;
use crate::mask::mask_number;
use crate::matcher::{first_match, is_digits};
use std::fmt;

/// The outcome of classifying one card number.
///
/// Borrows from the [`Catalog`] it was resolved against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification<'a> {
    /// The winning brand.
    pub brand: &'a Brand,
    /// The first pattern of the winning brand that matched.
    pub pattern: &'a BinPattern,
    /// The fine BIN record that applies, if the brand declares any.
    pub fine_bin: Option<&'a FineBinRecord>,
}

impl<'a> Classification<'a> {
    /// Returns the winning scheme identifier.
    #[inline]
    pub fn scheme(&self) -> &'a str {
        &self.brand.scheme
    }

    /// Returns an owned, serializable summary.
    pub fn summary(&self) -> CardSummary {
        CardSummary {
            scheme: self.brand.scheme.clone(),
            display_name: self.brand.display_name.clone(),
            card_type: self.brand.card_type,
            matched_pattern_bin: self.pattern.bin().to_string(),
            fine_bin: self.fine_bin.cloned(),
        }
    }
}

impl fmt::Display for Classification<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} via {}", self.brand, self.pattern.bin())
    }
}

/// Owned projection of a [`Classification`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CardSummary {
    /// Scheme identifier.
    pub scheme: String,
    /// Human-readable brand name.
    pub display_name: String,
    /// Credit or debit.
    pub card_type: CardType,
    /// Source of the BIN regex that matched.
    pub matched_pattern_bin: String,
    /// Fine BIN record, if one applies.
    #[cfg_attr(feature = "json", serde(skip_serializing_if = "Option::is_none"))]
    pub fine_bin: Option<FineBinRecord>,
}

/// A brand that matched, with the index of its first matching pattern.
#[derive(Debug, Clone, Copy)]
struct Candidate<'a> {
    brand: &'a Brand,
    pattern: usize,
}

/// Returns every brand with a matching pattern, in catalog order.
///
/// This is the ambiguity set before the priority rule is applied.
pub fn candidates<'a>(number: &str, catalog: &'a Catalog) -> Vec<&'a Brand> {
    collect_candidates(number, catalog)
        .into_iter()
        .map(|c| c.brand)
        .collect()
}

fn collect_candidates<'a>(number: &str, catalog: &'a Catalog) -> Vec<Candidate<'a>> {
    catalog
        .brands()
        .iter()
        .filter_map(|brand| {
            first_match(number, &brand.patterns).map(|pattern| Candidate { brand, pattern })
        })
        .collect()
}

/// Applies the priority rule to a non-empty candidate list.
fn pick<'a>(matched: &[Candidate<'a>]) -> Candidate<'a> {
    *matched
        .iter()
        .find(|c| {
            matched
                .iter()
                .any(|other| c.brand.has_priority_over(&other.brand.scheme))
        })
        .unwrap_or(&matched[0])
}

/// Classifies a card number against a catalog.
///
/// Returns `None` for empty or non-digit input, and when no brand matches.
///
/// # Example
///
/// ```
/// use card_identifier::catalog::{BinPattern, Brand, Catalog, CardType};
/// use card_identifier::resolve::classify;
///
/// let catalog = Catalog::new(vec![
///     Brand::new("aura", "Aura", CardType::Credit)
///         .pattern(BinPattern::new("^50", &[16, 19], true, 3).unwrap()),
///     Brand::new("elo", "Elo", CardType::Credit)
///         .pattern(BinPattern::new("^(506699|5067[0-6]\\d)", &[16], true, 3).unwrap())
///         .priority_over(["aura"]),
/// ])
/// .unwrap();
///
/// assert_eq!(classify("5066990000000000", &catalog).unwrap().scheme(), "elo");
/// assert_eq!(classify("5000000000000000", &catalog).unwrap().scheme(), "aura");
/// assert!(classify("abc", &catalog).is_none());
/// ```
pub fn classify<'a>(number: &str, catalog: &'a Catalog) -> Option<Classification<'a>> {
    if !is_digits(number) {
        return None;
    }

    let matched = collect_candidates(number, catalog);
    let winner = match matched.len() {
        0 => {
            tracing::debug!(number = %mask_number(number), "no brand matched");
            return None;
        }
        1 => matched[0],
        _ => {
            let winner = pick(&matched);
            tracing::debug!(
                number = %mask_number(number),
                candidates = matched.len(),
                winner = %winner.brand.scheme,
                "ambiguous BIN resolved"
            );
            winner
        }
    };

    let brand = winner.brand;
    let pattern = &brand.patterns[winner.pattern];
    Some(Classification {
        brand,
        pattern,
        fine_bin: detail::find_fine_bin(number, brand),
    })
}

/// Returns true if any brand of the catalog recognizes the number.
#[inline]
pub fn is_recognized(number: &str, catalog: &Catalog) -> bool {
    classify(number, catalog).is_some()
}
