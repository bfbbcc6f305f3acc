//! Data-quality checks for a built catalog.
//!
//! These findings never prevent classification. They point catalog
//! maintainers at entries that are legal but probably wrong.

use super::{Catalog, GLOBAL};
use std::fmt;

/// A data-quality finding.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct CatalogWarning {
    /// Scheme (and pattern or BIN) the finding refers to.
    pub source: String,
    /// Human-readable description.
    pub message: String,
}

impl CatalogWarning {
    fn new(source: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for CatalogWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.source, self.message)
    }
}

/// Returns true for a lowercase identifier such as `visa` or `china-union`.
fn is_canonical_scheme(scheme: &str) -> bool {
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_lowercase())
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

/// Returns true for an ISO 3166-1 alpha-2 shaped code or [`GLOBAL`].
fn is_country_code(code: &str) -> bool {
    code == GLOBAL || (code.len() == 2 && code.bytes().all(|b| b.is_ascii_uppercase()))
}

/// Checks a catalog for data-quality problems.
///
/// Reported:
///
/// - scheme identifiers that are not lowercase alphanumeric with hyphens
/// - `priority_over` entries naming the brand itself or an unknown scheme
/// - patterns of one brand disagreeing on CVV length
/// - fine BIN literals that are not 6-8 ASCII digits
/// - country codes that are neither ISO 3166-1 alpha-2 nor `GLOBAL`
pub fn lint(catalog: &Catalog) -> Vec<CatalogWarning> {
    let mut warnings = Vec::new();

    for brand in catalog.brands() {
        let scheme = brand.scheme.as_str();

        if !is_canonical_scheme(scheme) {
            warnings.push(CatalogWarning::new(
                scheme,
                "scheme should be lowercase alphanumeric with hyphens",
            ));
        }

        for target in &brand.priority_over {
            if target == scheme {
                warnings.push(CatalogWarning::new(scheme, "priorityOver lists the brand itself"));
            } else if catalog.brand(target).is_none() {
                warnings.push(CatalogWarning::new(
                    scheme,
                    format!("priorityOver references unknown scheme \"{}\"", target),
                ));
            }
        }

        if let Some(expected) = brand.cvv_length() {
            for (i, pattern) in brand.patterns.iter().enumerate().skip(1) {
                if pattern.cvv_length() != expected {
                    warnings.push(CatalogWarning::new(
                        format!("{}[pattern {}]", scheme, i),
                        format!(
                            "CVV length {} disagrees with the brand's first pattern ({})",
                            pattern.cvv_length(),
                            expected
                        ),
                    ));
                }
            }
        }

        for code in &brand.countries {
            if !is_country_code(code) {
                warnings.push(CatalogWarning::new(
                    scheme,
                    format!("country \"{}\" should be ISO 3166-1 alpha-2 or \"GLOBAL\"", code),
                ));
            }
        }

        for record in &brand.fine_bins {
            let len = record.bin.len();
            if !(6..=8).contains(&len) || !record.bin.bytes().all(|b| b.is_ascii_digit()) {
                warnings.push(CatalogWarning::new(
                    scheme,
                    format!("BIN \"{}\" should be 6-8 digits", record.bin),
                ));
            }
            for code in record.countries.iter().flatten() {
                if !is_country_code(code) {
                    warnings.push(CatalogWarning::new(
                        scheme,
                        format!(
                            "BIN \"{}\" country \"{}\" should be ISO 3166-1 alpha-2 or \"GLOBAL\"",
                            record.bin, code
                        ),
                    ));
                }
            }
        }
    }

    for warning in &warnings {
        tracing::warn!(source = %warning.source, "{}", warning.message);
    }

    warnings
}
