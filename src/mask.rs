//! PCI-DSS compliant masking of card numbers for logs and reports.
//!
//! PCI-DSS allows displaying at most the first 6 digits (BIN) and the last
//! 4 digits. Nothing in this crate logs or prints a full card number; every
//! trace event and CLI line goes through these helpers.

/// Masks a card number showing the BIN (first 6) and last 4 digits.
///
/// Numbers too short to keep both stay masked except for the last 4, and
/// numbers of 4 characters or fewer are masked entirely.
///
/// # Example
///
/// ```
/// use card_identifier::mask::mask_number;
///
/// assert_eq!(mask_number("4012001037141112"), "401200******1112");
/// assert_eq!(mask_number("40120010"), "****0010");
/// assert_eq!(mask_number("4012"), "****");
/// ```
pub fn mask_number(number: &str) -> String {
    let chars: Vec<char> = number.chars().collect();
    let len = chars.len();

    if len <= 4 {
        return "*".repeat(len);
    }

    let shown_head = if len >= 12 { 6 } else { 0 };
    let mut result = String::with_capacity(len);
    for (i, c) in chars.iter().enumerate() {
        if i < shown_head || i >= len - 4 {
            result.push(*c);
        } else {
            result.push('*');
        }
    }
    result
}

/// Masks a card number showing only the last 4 digits.
///
/// # Example
///
/// ```
/// use card_identifier::mask::mask_last_four;
///
/// assert_eq!(mask_last_four("4012001037141112"), "************1112");
/// ```
pub fn mask_last_four(number: &str) -> String {
    let len = number.chars().count();
    number
        .chars()
        .enumerate()
        .map(|(i, c)| if i + 4 >= len { c } else { '*' })
        .collect()
}
