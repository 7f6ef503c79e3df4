// src/digits.rs
// =============================================================================
// The DigitString type: an ordered run of pi's decimal digits.
//
// The API hands us digits as one long string ("3141592653..."). We keep it
// as a string on purpose: no leading zeros are stripped and nothing is
// parsed as a number. The only conversion offered is digit-by-digit into
// small integers, and that conversion refuses anything that isn't 0-9.
//
// Rust concepts:
// - Newtype pattern: a struct wrapping a String to give it its own methods
// - Iterators: chars().enumerate().map(...).collect() into a Result
// =============================================================================

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DigitError;

/// An opaque, ordered string of digit characters
///
/// Serializes as a plain JSON string.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DigitString(String);

impl DigitString {
    pub fn new(digits: impl Into<String>) -> Self {
        Self(digits.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Number of digit characters
    pub fn len(&self) -> usize {
        self.0.chars().count()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Appends another page of digits to the end of this one
    pub fn push_digits(&mut self, other: &DigitString) {
        self.0.push_str(&other.0);
    }

    /// Splits the string into one integer per digit, in order
    ///
    /// Example: "3141" -> [3, 1, 4, 1]
    ///
    /// Fails on the first character that is not an ASCII decimal digit.
    pub fn to_integer_list(&self) -> Result<Vec<u8>, DigitError> {
        self.0
            .chars()
            .enumerate()
            .map(|(index, character)| {
                character
                    .to_digit(10)
                    .map(|d| d as u8)
                    .ok_or(DigitError::NonDigit { index, character })
            })
            .collect()
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for DigitString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for DigitString {
    fn from(digits: String) -> Self {
        Self(digits)
    }
}

impl From<&str> for DigitString {
    fn from(digits: &str) -> Self {
        Self(digits.to_string())
    }
}

impl AsRef<str> for DigitString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

// Concatenates pages in iteration order
impl FromIterator<DigitString> for DigitString {
    fn from_iter<I: IntoIterator<Item = DigitString>>(iter: I) -> Self {
        let mut joined = DigitString::default();
        for page in iter {
            joined.push_digits(&page);
        }
        joined
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_to_integer_list() {
        let digits = DigitString::from("3141592653");
        assert_eq!(
            digits.to_integer_list().unwrap(),
            vec![3, 1, 4, 1, 5, 9, 2, 6, 5, 3]
        );
    }

    #[test]
    fn test_to_integer_list_keeps_leading_zeros() {
        let digits = DigitString::from("0007");
        let list = digits.to_integer_list().unwrap();
        assert_eq!(list.len(), digits.len());
        assert_eq!(list, vec![0, 0, 0, 7]);
    }

    #[test]
    fn test_non_digit_fails() {
        let digits = DigitString::from("31a4");
        assert_eq!(
            digits.to_integer_list(),
            Err(DigitError::NonDigit {
                index: 2,
                character: 'a'
            })
        );
    }

    #[test]
    fn test_len_counts_characters() {
        // 'é' is two bytes but one character
        let digits = DigitString::from("3é1");
        assert_eq!(digits.len(), 3);
        assert!(digits.to_integer_list().is_err());
        assert_eq!(DigitString::from("314159").len(), 6);
    }

    #[test]
    fn test_decimal_point_is_not_a_digit() {
        assert!(DigitString::from("3.14").to_integer_list().is_err());
    }

    #[test]
    fn test_collect_concatenates_in_order() {
        let pages = vec![
            DigitString::from("314"),
            DigitString::from("159"),
            DigitString::from("26"),
        ];
        let joined: DigitString = pages.into_iter().collect();
        assert_eq!(joined.as_str(), "31415926");
    }

    #[test]
    fn test_serializes_as_plain_string() {
        let json = serde_json::to_string(&DigitString::from("314")).unwrap();
        assert_eq!(json, "\"314\"");
    }
}
