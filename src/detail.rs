//! Fine-grained BIN lookup for classified numbers.
//!
//! Brands may carry literal [`FineBinRecord`]s with issuer metadata. They
//! never influence which brand wins; they only enrich the result.

use crate::catalog::{Brand, FineBinRecord};
use crate::matcher::is_digits;
use crate::resolve::Classification;

/// Returns the fine BIN record that applies to a classified number.
///
/// # Example
///
/// ```
/// use card_identifier::{detail, Catalog};
///
/// let catalog = Catalog::builtin().unwrap();
/// let result = catalog.classify("6062825624254001").unwrap();
/// let record = detail::detail("6062825624254001", &result).unwrap();
/// assert_eq!(record.bin, "606282");
/// ```
pub fn detail<'a>(number: &str, classification: &Classification<'a>) -> Option<&'a FineBinRecord> {
    find_fine_bin(number, classification.brand)
}

/// Finds the fine BIN record of `brand` that applies to `number`.
///
/// A record applies when the number's first six digits equal its BIN or
/// start with it; records longer than six digits apply when the number
/// starts with the whole record. When several apply, the longest (most
/// specific) wins, then declaration order.
pub fn find_fine_bin<'a>(number: &str, brand: &'a Brand) -> Option<&'a FineBinRecord> {
    if brand.fine_bins.is_empty() || !is_digits(number) {
        return None;
    }

    let bin6 = &number[..number.len().min(6)];
    let mut best: Option<&FineBinRecord> = None;

    for record in &brand.fine_bins {
        if !applies(bin6, number, &record.bin) {
            continue;
        }
        if best.map_or(true, |b| record.bin.len() > b.bin.len()) {
            best = Some(record);
        }
    }

    best
}

#[inline]
fn applies(bin6: &str, number: &str, record_bin: &str) -> bool {
    if record_bin.is_empty() {
        return false;
    }
    if record_bin.len() > 6 {
        number.starts_with(record_bin)
    } else {
        bin6.starts_with(record_bin)
    }
}
