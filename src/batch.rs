//! Batch classification of many card numbers against one catalog.
//!
//! Classification borrows the catalog immutably, so batches can be split
//! across threads freely. With the `parallel` feature, rayon variants of
//! every operation are available and return results in input order.

use crate::catalog::Catalog;
use crate::resolve::{classify, Classification};
use std::collections::BTreeMap;

/// Classifies batches of numbers against a borrowed catalog.
///
/// # Example
///
/// ```
/// use card_identifier::{BatchClassifier, Catalog};
///
/// let catalog = Catalog::builtin().unwrap();
/// let batch = BatchClassifier::new(&catalog);
/// let numbers = ["4012001037141112", "378282246310005", "not a card"];
/// let results = batch.classify_all(&numbers);
///
/// assert_eq!(results[0].map(|c| c.scheme()), Some("visa"));
/// assert_eq!(results[1].map(|c| c.scheme()), Some("amex"));
/// assert!(results[2].is_none());
/// ```
#[derive(Debug, Clone, Copy)]
pub struct BatchClassifier<'a> {
    catalog: &'a Catalog,
}

impl<'a> BatchClassifier<'a> {
    /// Creates a batch classifier over `catalog`.
    #[inline]
    pub fn new(catalog: &'a Catalog) -> Self {
        Self { catalog }
    }

    /// Classifies every number, in input order.
    pub fn classify_all<S: AsRef<str>>(&self, numbers: &[S]) -> Vec<Option<Classification<'a>>> {
        numbers
            .iter()
            .map(|n| classify(n.as_ref(), self.catalog))
            .collect()
    }

    /// Returns only the recognized numbers, with their input index.
    pub fn recognized_only<S: AsRef<str>>(&self, numbers: &[S]) -> Vec<(usize, Classification<'a>)> {
        numbers
            .iter()
            .enumerate()
            .filter_map(|(i, n)| classify(n.as_ref(), self.catalog).map(|c| (i, c)))
            .collect()
    }

    /// Splits a batch into recognized results and indices of the rest.
    pub fn classify_partitioned<S: AsRef<str>>(
        &self,
        numbers: &[S],
    ) -> (Vec<Classification<'a>>, Vec<usize>) {
        let mut recognized = Vec::new();
        let mut unrecognized = Vec::new();

        for (i, number) in numbers.iter().enumerate() {
            match classify(number.as_ref(), self.catalog) {
                Some(c) => recognized.push(c),
                None => unrecognized.push(i),
            }
        }

        (recognized, unrecognized)
    }

    /// Counts recognized numbers per scheme.
    pub fn scheme_counts<S: AsRef<str>>(&self, numbers: &[S]) -> BTreeMap<&'a str, usize> {
        let mut counts = BTreeMap::new();
        for number in numbers {
            if let Some(c) = classify(number.as_ref(), self.catalog) {
                *counts.entry(c.scheme()).or_insert(0) += 1;
            }
        }
        counts
    }

    /// Classifies every number in parallel using rayon.
    ///
    /// # Feature
    ///
    /// Requires the `parallel` feature to be enabled.
    #[cfg(feature = "parallel")]
    pub fn classify_parallel<S: AsRef<str> + Sync>(
        &self,
        numbers: &[S],
    ) -> Vec<Option<Classification<'a>>> {
        use rayon::prelude::*;
        let catalog = self.catalog;
        numbers
            .par_iter()
            .map(|n| classify(n.as_ref(), catalog))
            .collect()
    }
}

/// Classifies a slice of numbers without creating a [`BatchClassifier`].
///
/// # Example
///
/// ```
/// use card_identifier::batch::classify_batch;
/// use card_identifier::Catalog;
///
/// let catalog = Catalog::builtin().unwrap();
/// let results = classify_batch(&["5066990000000000", "5000000000000000"], &catalog);
/// assert_eq!(results[0].unwrap().scheme(), "elo");
/// assert_eq!(results[1].unwrap().scheme(), "aura");
/// ```
#[inline]
pub fn classify_batch<'a, S: AsRef<str>>(
    numbers: &[S],
    catalog: &'a Catalog,
) -> Vec<Option<Classification<'a>>> {
    BatchClassifier::new(catalog).classify_all(numbers)
}

/// Classifies a slice of numbers in parallel.
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
#[inline]
pub fn classify_batch_parallel<'a, S: AsRef<str> + Sync>(
    numbers: &[S],
    catalog: &'a Catalog,
) -> Vec<Option<Classification<'a>>> {
    BatchClassifier::new(catalog).classify_parallel(numbers)
}

/// Counts recognized and unrecognized numbers without collecting results.
///
/// # Returns
///
/// Tuple of (recognized_count, unrecognized_count)
///
/// # Example
///
/// ```
/// use card_identifier::batch::count_recognized;
/// use card_identifier::Catalog;
///
/// let catalog = Catalog::builtin().unwrap();
/// let numbers = ["4012001037141112", "9999999999999999", "5555555555554444"];
/// assert_eq!(count_recognized(&numbers, &catalog), (2, 1));
/// ```
pub fn count_recognized<S: AsRef<str>>(numbers: &[S], catalog: &Catalog) -> (usize, usize) {
    let recognized = numbers
        .iter()
        .filter(|n| catalog.is_recognized(n.as_ref()))
        .count();
    (recognized, numbers.len() - recognized)
}

/// Counts recognized and unrecognized numbers in parallel.
///
/// # Feature
///
/// Requires the `parallel` feature to be enabled.
#[cfg(feature = "parallel")]
pub fn count_recognized_parallel<S: AsRef<str> + Sync>(
    numbers: &[S],
    catalog: &Catalog,
) -> (usize, usize) {
    use rayon::prelude::*;

    let recognized = numbers
        .par_iter()
        .filter(|n| catalog.is_recognized(n.as_ref()))
        .count();
    (recognized, numbers.len() - recognized)
}
