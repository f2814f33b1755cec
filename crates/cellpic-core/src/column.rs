//! Column letter codec
//!
//! Spreadsheet column labels are a bijective base-26 numeral: the digits 1..=26
//! are written `A`..=`Z` and there is no digit for zero, so `Z` (26) is followed
//! by `AA` (27) and `ZZ` (702) by `AAA` (703).
//!
//! Both functions work on 1-based column numbers. They are not limited to the
//! Excel column range; callers that need that bound check it themselves.

use crate::error::{Error, Result};

/// Convert a 1-based column number to its letters (1 = A, 26 = Z, 27 = AA).
///
/// Returns an empty string for 0, which has no representation.
///
/// # Examples
/// ```
/// use cellpic_core::column::to_letters;
///
/// assert_eq!(to_letters(1), "A");
/// assert_eq!(to_letters(28), "AB");
/// assert_eq!(to_letters(703), "AAA");
/// ```
pub fn to_letters(n: u32) -> String {
    let mut digits = Vec::new();
    let mut n = n;

    while n > 0 {
        // Shift to 0..=25 so that a remainder of zero means "Z" and borrows one.
        let d = (n - 1) % 26;
        digits.push(b'A' + d as u8);
        n = (n - 1) / 26;
    }

    digits.iter().rev().map(|&b| b as char).collect()
}

/// Convert column letters to a 1-based column number (A = 1, Z = 26, AA = 27).
///
/// Lowercase letters are accepted. Empty input, any non-alphabetic character
/// and values that do not fit in a `u32` are rejected.
pub fn from_letters(letters: &str) -> Result<u32> {
    if letters.is_empty() {
        return Err(Error::InvalidColumn("empty column letters".into()));
    }

    let mut n: u32 = 0;
    for c in letters.chars() {
        if !c.is_ascii_alphabetic() {
            return Err(Error::InvalidColumn(format!(
                "invalid column letter '{}' in '{}'",
                c, letters
            )));
        }
        let digit = c.to_ascii_uppercase() as u32 - 'A' as u32 + 1;
        n = n
            .checked_mul(26)
            .and_then(|v| v.checked_add(digit))
            .ok_or_else(|| Error::InvalidColumn(format!("'{}' is too large", letters)))?;
    }

    Ok(n)
}

/// Convert a 0-based column index to letters (0 = A).
pub fn index_to_letters(index: u32) -> String {
    to_letters(index + 1)
}

/// Convert letters to a 0-based column index (A = 0).
pub fn letters_to_index(letters: &str) -> Result<u32> {
    from_letters(letters).map(|n| n - 1)
}
