//! Luhn checksum validation.
//!
//! The Luhn algorithm (also known as the "modulus 10" algorithm) catches
//! single-digit transcription errors in card numbers. It is independent of
//! the brand catalog: a number can be recognized by a brand and still fail
//! the checksum, or the other way around.
//!
//! # Performance
//!
//! A lookup table replaces the doubling branch, so the scan is O(n) with no
//! allocation. All functions are pure and safe to call from any thread.

/// Lookup table for doubled digits: double the value, subtract 9 if >= 10.
/// Index is the digit (0-9), value is the transformed result.
const DOUBLE_TABLE: [u8; 10] = [0, 2, 4, 6, 8, 1, 3, 5, 7, 9];

/// Validates a card number string using the Luhn algorithm.
///
/// Returns `false` for an empty string and for any string containing a
/// character other than an ASCII digit. Separators are not stripped:
/// `"4012-0010-3714-1112"` is invalid.
///
/// # Example
///
/// ```
/// use card_identifier::luhn::luhn_valid;
///
/// assert!(luhn_valid("4012001037141112"));
/// assert!(!luhn_valid("4012001037141113"));
/// assert!(!luhn_valid(""));
/// assert!(!luhn_valid("4012-0010-3714-1112"));
/// ```
pub fn luhn_valid(number: &str) -> bool {
    if number.is_empty() {
        return false;
    }

    // Reduced as we go so arbitrarily long input cannot overflow
    let mut sum: u8 = 0;
    for (i, b) in number.bytes().rev().enumerate() {
        if !b.is_ascii_digit() {
            return false;
        }
        let digit = b - b'0';
        let value = if i % 2 == 1 {
            DOUBLE_TABLE[digit as usize]
        } else {
            digit
        };
        sum = (sum + value) % 10;
    }

    sum == 0
}

/// Validates a dynamically typed value with the Luhn algorithm.
///
/// Strings are checked with [`luhn_valid`]. Any other JSON type is a
/// contract violation by the caller and yields
/// [`ValidationError::InvalidArgument`](crate::ValidationError::InvalidArgument).
///
/// # Example
///
/// ```
/// use card_identifier::luhn::luhn_valid_value;
/// use serde_json::json;
///
/// assert_eq!(luhn_valid_value(&json!("4012001037141112")), Ok(true));
/// assert!(luhn_valid_value(&json!(4012001037141112u64)).is_err());
/// ```
#[cfg(feature = "json")]
pub fn luhn_valid_value(value: &serde_json::Value) -> Result<bool, crate::ValidationError> {
    use serde_json::Value;

    let found = match value {
        Value::String(s) => return Ok(luhn_valid(s)),
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    };

    Err(crate::ValidationError::InvalidArgument {
        expected: "string",
        found,
    })
}

/// Validates a slice of digits (0-9) using the Luhn algorithm.
///
/// # Example
///
/// ```
/// use card_identifier::luhn::validate;
///
/// let digits = [4, 0, 1, 2, 0, 0, 1, 0, 3, 7, 1, 4, 1, 1, 1, 2];
/// assert!(validate(&digits));
/// ```
#[inline]
pub fn validate(digits: &[u8]) -> bool {
    if digits.is_empty() {
        return false;
    }

    compute_checksum(digits) == 0
}

/// Computes the Luhn sum of a sequence of digits, modulo 10.
///
/// A valid number has a checksum of 0.
#[inline]
pub fn compute_checksum(digits: &[u8]) -> u8 {
    digits
        .iter()
        .rev()
        .enumerate()
        .fold(0, |sum, (i, &digit)| {
            let value = if i % 2 == 1 {
                DOUBLE_TABLE[digit as usize]
            } else {
                digit
            };
            (sum + value) % 10
        })
}

/// Generates the check digit for a partial card number.
///
/// Given digits without the check digit, computes the digit that makes the
/// full number pass Luhn validation.
///
/// # Example
///
/// ```
/// use card_identifier::luhn::generate_check_digit;
///
/// let partial = [4, 0, 1, 2, 0, 0, 1, 0, 3, 7, 1, 4, 1, 1, 1];
/// assert_eq!(generate_check_digit(&partial), 2);
/// ```
#[inline]
pub fn generate_check_digit(digits: &[u8]) -> u8 {
    // Every existing digit shifts one position left once the check digit is
    // appended, so the doubling roles flip.
    let sum = digits
        .iter()
        .rev()
        .enumerate()
        .fold(0u8, |sum, (i, &digit)| {
            let value = if i % 2 == 0 {
                DOUBLE_TABLE[digit as usize]
            } else {
                digit
            };
            (sum + value) % 10
        });

    (10 - sum) % 10
}
