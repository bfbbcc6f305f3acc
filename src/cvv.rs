//! CVV/CVC/CID validation against a catalog brand.
//!
//! The expected length comes from the brand's patterns (`cvv_length`), so
//! a four-digit American Express CID and a three-digit Visa CVV2 are both
//! expressed as catalog data rather than hard-coded rules.
//!
//! # Example
//!
//! ```
//! use card_identifier::{cvv, Catalog};
//!
//! let catalog = Catalog::builtin().unwrap();
//! let visa = catalog.brand("visa").unwrap();
//!
//! assert!(cvv::validate_cvv("123", visa));
//! assert!(!cvv::validate_cvv("1234", visa));
//!
//! // Scheme lookup helper on the catalog
//! assert!(catalog.validate_cvv("1234", "amex"));
//! assert!(!catalog.validate_cvv("123", "unknown-scheme"));
//! ```

use crate::catalog::Brand;
use std::fmt;
use zeroize::Zeroize;

/// A validated CVV/CVC code.
#[derive(Clone)]
pub struct ValidatedCvv {
    /// The CVV digits.
    digits: [u8; MAX_CVV_DIGITS],
    /// Number of digits.
    length: u8,
}

/// Longest CVV any brand may declare.
pub const MAX_CVV_DIGITS: usize = 8;

impl ValidatedCvv {
    /// Returns the CVV as a string.
    pub fn as_str(&self) -> String {
        self.digits()
            .iter()
            .map(|&d| (b'0' + d) as char)
            .collect()
    }

    /// Returns the number of digits.
    #[inline]
    pub const fn length(&self) -> usize {
        self.length as usize
    }

    /// Returns the CVV digits as a slice.
    pub fn digits(&self) -> &[u8] {
        &self.digits[..self.length as usize]
    }
}

impl fmt::Debug for ValidatedCvv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidatedCvv")
            .field("value", &"***")
            .field("length", &self.length)
            .finish()
    }
}

impl fmt::Display for ValidatedCvv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", "*".repeat(self.length as usize))
    }
}

impl Drop for ValidatedCvv {
    fn drop(&mut self) {
        self.digits.zeroize();
        self.length.zeroize();
    }
}

/// Errors that can occur during CVV validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CvvError {
    /// The input is empty.
    Empty,
    /// The CVV contains non-digit characters.
    InvalidCharacter {
        /// The invalid character found.
        character: char,
        /// Position of the invalid character.
        position: usize,
    },
    /// The CVV length doesn't match what the brand requires.
    WrongLength {
        /// Actual length provided.
        length: usize,
        /// Expected length.
        expected: usize,
    },
    /// The brand declares no usable CVV length.
    UnknownLength,
}

impl fmt::Display for CvvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "CVV is empty"),
            Self::InvalidCharacter { character, position } => {
                write!(
                    f,
                    "invalid character '{}' at position {}",
                    character.escape_default(),
                    position
                )
            }
            Self::WrongLength { length, expected } => {
                write!(f, "CVV must be {} digits, got {}", expected, length)
            }
            Self::UnknownLength => write!(f, "brand declares no CVV length"),
        }
    }
}

impl std::error::Error for CvvError {}

/// Validates a CVV against an explicit length, explaining any failure.
///
/// # Example
///
/// ```
/// use card_identifier::cvv::{check_cvv_length, CvvError};
///
/// assert_eq!(check_cvv_length("1234", 4).unwrap().length(), 4);
/// assert_eq!(
///     check_cvv_length("123", 4).unwrap_err(),
///     CvvError::WrongLength { length: 3, expected: 4 }
/// );
/// ```
pub fn check_cvv_length(input: &str, expected: usize) -> Result<ValidatedCvv, CvvError> {
    if expected == 0 || expected > MAX_CVV_DIGITS {
        return Err(CvvError::UnknownLength);
    }
    if input.is_empty() {
        return Err(CvvError::Empty);
    }

    let mut digits = [0u8; MAX_CVV_DIGITS];
    let mut count = 0;

    for (pos, c) in input.chars().enumerate() {
        if !c.is_ascii_digit() {
            digits.zeroize();
            return Err(CvvError::InvalidCharacter {
                character: c,
                position: pos,
            });
        }
        if count < MAX_CVV_DIGITS {
            digits[count] = (c as u8) - b'0';
        }
        count += 1;
    }

    if count != expected {
        digits.zeroize();
        return Err(CvvError::WrongLength {
            length: count,
            expected,
        });
    }

    Ok(ValidatedCvv {
        digits,
        length: count as u8,
    })
}

/// Validates a CVV for a brand, explaining any failure.
pub fn check_cvv(input: &str, brand: &Brand) -> Result<ValidatedCvv, CvvError> {
    let expected = brand.cvv_length().ok_or(CvvError::UnknownLength)?;
    check_cvv_length(input, expected)
}

/// Returns true if `input` is a valid CVV for `brand`.
///
/// Fails closed: empty input or a brand without patterns yields `false`.
#[inline]
pub fn validate_cvv(input: &str, brand: &Brand) -> bool {
    check_cvv(input, brand).is_ok()
}

/// Returns true if `input` is exactly `expected` ASCII digits.
#[inline]
pub fn validate_cvv_length(input: &str, expected: usize) -> bool {
    check_cvv_length(input, expected).is_ok()
}
