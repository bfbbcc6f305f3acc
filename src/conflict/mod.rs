//! Static conflict detection over a catalog.
//!
//! Two brands conflict when some number is matched by patterns of both. We
//! look for such numbers by synthesizing probes from each pattern (see
//! [`probe`]) and testing them against every pattern of every other brand.
//! A conflict is not an error: the priority rule resolves it at runtime. The
//! report tells catalog maintainers where a `priority_over` declaration is
//! doing work, or is missing.
//!
//! # Example
//!
//! ```
//! use card_identifier::conflict::detect_conflicts;
//! use card_identifier::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//! let conflicts = detect_conflicts(&catalog);
//!
//! assert!(conflicts
//!     .iter()
//!     .any(|c| c.brand_a == "elo" && c.brand_b == "aura" && c.shared_bin_prefix == "506699"));
//! ```

pub mod probe;

use crate::catalog::{BinPattern, Brand, Catalog};
use crate::matcher::matches;
use std::collections::HashSet;
use std::fmt;

/// Default number of literal prefixes expanded per pattern.
pub const DEFAULT_MAX_PROBES: usize = 5;

/// Tuning for [`detect_conflicts_with`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DetectorConfig {
    /// Maximum literal prefixes enumerated from each pattern.
    pub max_probes_per_pattern: usize,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            max_probes_per_pattern: DEFAULT_MAX_PROBES,
        }
    }
}

impl DetectorConfig {
    /// Sets the per-pattern probe cap.
    pub fn max_probes_per_pattern(mut self, max: usize) -> Self {
        self.max_probes_per_pattern = max;
        self
    }
}

/// One side of a conflict: a pattern identified by position and source.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct PatternRef {
    /// Index of the pattern within its brand.
    pub index: usize,
    /// BIN regex source.
    pub bin: String,
    /// Accepted lengths.
    pub lengths: Vec<usize>,
}

impl PatternRef {
    fn new(index: usize, pattern: &BinPattern) -> Self {
        Self {
            index,
            bin: pattern.bin().to_string(),
            lengths: pattern.lengths().to_vec(),
        }
    }
}

/// Two brands whose patterns both match a synthetic number.
///
/// `brand_a` always precedes `brand_b` in catalog order.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct Conflict {
    /// First six digits of the example number.
    pub shared_bin_prefix: String,
    /// Scheme earlier in the catalog.
    pub brand_a: String,
    /// Scheme later in the catalog.
    pub brand_b: String,
    /// The colliding pattern of `brand_a`.
    pub pattern_a: PatternRef,
    /// The colliding pattern of `brand_b`.
    pub pattern_b: PatternRef,
    /// A number both patterns match.
    pub example_number: String,
    /// Scheme that wins this pair at runtime.
    pub winner: String,
    /// True if the winner comes from a `priority_over` declaration rather
    /// than catalog order.
    pub resolved_by_priority: bool,
}

impl Conflict {
    fn new(
        a: &Brand,
        pattern_a: (usize, &BinPattern),
        b: &Brand,
        pattern_b: (usize, &BinPattern),
        example: &str,
    ) -> Self {
        let (winner, resolved_by_priority) = if a.has_priority_over(&b.scheme) {
            (&a.scheme, true)
        } else if b.has_priority_over(&a.scheme) {
            (&b.scheme, true)
        } else {
            (&a.scheme, false)
        };

        Self {
            shared_bin_prefix: example[..example.len().min(6)].to_string(),
            brand_a: a.scheme.clone(),
            brand_b: b.scheme.clone(),
            pattern_a: PatternRef::new(pattern_a.0, pattern_a.1),
            pattern_b: PatternRef::new(pattern_b.0, pattern_b.1),
            example_number: example.to_string(),
            winner: winner.clone(),
            resolved_by_priority,
        }
    }

    fn key(&self) -> (&str, &str, &str) {
        (&self.brand_a, &self.brand_b, &self.shared_bin_prefix)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} [{}] {} <-> {} [{}] {} (e.g. {}), {} wins",
            self.brand_a,
            self.pattern_a.index,
            self.pattern_a.bin,
            self.brand_b,
            self.pattern_b.index,
            self.pattern_b.bin,
            self.example_number,
            self.winner
        )?;
        if !self.resolved_by_priority {
            write!(f, " by catalog order")?;
        }
        Ok(())
    }
}

/// Probes per brand, per pattern.
type ProbeTable = Vec<Vec<Vec<String>>>;

fn brand_probes(brand: &Brand, config: &DetectorConfig) -> Vec<Vec<String>> {
    brand
        .patterns
        .iter()
        .map(|p| probe::probes(p, config.max_probes_per_pattern))
        .collect()
}

fn brand_pairs(len: usize) -> Vec<(usize, usize)> {
    (0..len)
        .flat_map(|i| (i + 1..len).map(move |j| (i, j)))
        .collect()
}

/// Tests one pair in both directions.
fn check_pair(catalog: &Catalog, probes: &ProbeTable, i: usize, j: usize) -> Vec<Conflict> {
    let brands = catalog.brands();
    let (a, b) = (&brands[i], &brands[j]);
    let mut found = Vec::new();

    for (ia, numbers) in probes[i].iter().enumerate() {
        for number in numbers {
            if let Some((ib, pb)) = b.patterns.iter().enumerate().find(|(_, p)| matches(number, p)) {
                found.push(Conflict::new(a, (ia, &a.patterns[ia]), b, (ib, pb), number));
            }
        }
    }

    for (ib, numbers) in probes[j].iter().enumerate() {
        for number in numbers {
            if let Some((ia, pa)) = a.patterns.iter().enumerate().find(|(_, p)| matches(number, p)) {
                found.push(Conflict::new(a, (ia, pa), b, (ib, &b.patterns[ib]), number));
            }
        }
    }

    found
}

/// Removes repeats of `(brand_a, brand_b, prefix)`, keeping the first.
fn dedup(conflicts: Vec<Conflict>) -> Vec<Conflict> {
    let mut seen = HashSet::new();
    let mut out = Vec::with_capacity(conflicts.len());
    for conflict in conflicts {
        let key = conflict.key();
        let key = (key.0.to_string(), key.1.to_string(), key.2.to_string());
        if seen.insert(key) {
            out.push(conflict);
        }
    }
    out
}

fn finish(catalog: &Catalog, raw: Vec<Conflict>) -> Vec<Conflict> {
    let conflicts = dedup(raw);
    for conflict in conflicts.iter().filter(|c| !c.resolved_by_priority) {
        tracing::warn!(
            brand_a = %conflict.brand_a,
            brand_b = %conflict.brand_b,
            prefix = %conflict.shared_bin_prefix,
            "conflict resolved only by catalog order"
        );
    }
    tracing::info!(
        brands = catalog.len(),
        conflicts = conflicts.len(),
        "conflict detection complete"
    );
    conflicts
}

/// Detects conflicts with the default configuration.
pub fn detect_conflicts(catalog: &Catalog) -> Vec<Conflict> {
    detect_conflicts_with(catalog, &DetectorConfig::default())
}

/// Detects conflicts between every pair of brands.
///
/// Pairs are visited in catalog order and both directions of a pair are
/// tested, so the result is deterministic.
pub fn detect_conflicts_with(catalog: &Catalog, config: &DetectorConfig) -> Vec<Conflict> {
    let probes: ProbeTable = catalog
        .brands()
        .iter()
        .map(|b| brand_probes(b, config))
        .collect();

    let raw = brand_pairs(catalog.len())
        .into_iter()
        .flat_map(|(i, j)| check_pair(catalog, &probes, i, j))
        .collect();

    finish(catalog, raw)
}

/// Detects conflicts using rayon, sharded over brand pairs.
///
/// Produces exactly the output of [`detect_conflicts_with`].
#[cfg(feature = "parallel")]
pub fn detect_conflicts_parallel(catalog: &Catalog, config: &DetectorConfig) -> Vec<Conflict> {
    use rayon::prelude::*;

    let probes: ProbeTable = catalog
        .brands()
        .par_iter()
        .map(|b| brand_probes(b, config))
        .collect();

    let raw = brand_pairs(catalog.len())
        .into_par_iter()
        .flat_map_iter(|(i, j)| check_pair(catalog, &probes, i, j))
        .collect();

    finish(catalog, raw)
}

/// Serializable summary of a detection run.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(serde::Serialize))]
pub struct ConflictReport {
    /// Number of brands analysed.
    pub brands: usize,
    /// Per-pattern probe cap used.
    pub max_probes_per_pattern: usize,
    /// Conflicts found, in detection order.
    pub conflicts: Vec<Conflict>,
}

impl ConflictReport {
    /// Runs detection and wraps the result.
    pub fn generate(catalog: &Catalog, config: &DetectorConfig) -> Self {
        Self::from_conflicts(catalog, config, detect_conflicts_with(catalog, config))
    }

    /// Wraps conflicts that were already detected.
    pub fn from_conflicts(catalog: &Catalog, config: &DetectorConfig, conflicts: Vec<Conflict>) -> Self {
        Self {
            brands: catalog.len(),
            max_probes_per_pattern: config.max_probes_per_pattern,
            conflicts,
        }
    }

    /// Conflicts that no `priority_over` declaration resolves.
    pub fn unresolved(&self) -> impl Iterator<Item = &Conflict> {
        self.conflicts.iter().filter(|c| !c.resolved_by_priority)
    }

    /// Renders the report as pretty-printed JSON.
    #[cfg(feature = "json")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

impl fmt::Display for ConflictReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} conflict(s) across {} brands ({} unresolved)",
            self.conflicts.len(),
            self.brands,
            self.unresolved().count()
        )?;
        for conflict in &self.conflicts {
            writeln!(f, "  {}: {}", conflict.shared_bin_prefix, conflict)?;
        }
        Ok(())
    }
}
