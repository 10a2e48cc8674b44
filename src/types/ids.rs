//! Newtype wrappers for domain identifiers.
//!
//! These types keep a validated ebook ID from being confused with an arbitrary
//! repository name, and a commit hash from being confused with either.

use serde::Deserialize;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// A repository name that is not a valid ebook ID.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid ebook ID: {0:?}")]
pub struct InvalidEbookId(pub String);

/// A Project Gutenberg ebook ID.
///
/// The hosted repository for an ebook is named after its ID, and the local
/// mirror lives in a directory derived from the ID's digits. The ID is kept
/// as text: it is never re-rendered from an integer, so an ID with leading
/// zeros maps to exactly the directory its name spells out.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EbookId(String);

impl EbookId {
    /// Parses an ebook ID. The input must be non-empty and consist solely of
    /// ASCII decimal digits.
    ///
    /// # Examples
    ///
    /// ```
    /// use ebook_sync::types::EbookId;
    ///
    /// assert!(EbookId::parse("12345").is_ok());
    /// assert!(EbookId::parse("007").is_ok());
    ///
    /// assert!(EbookId::parse("").is_err());
    /// assert!(EbookId::parse("12a45").is_err());
    /// assert!(EbookId::parse("-1").is_err());
    /// ```
    pub fn parse(s: impl Into<String>) -> Result<Self, InvalidEbookId> {
        let s = s.into();
        if !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit()) {
            Ok(EbookId(s))
        } else {
            Err(InvalidEbookId(s))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EbookId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for EbookId {
    type Err = InvalidEbookId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EbookId::parse(s)
    }
}

/// A git commit hash as reported by GitHub or by the local mirror.
///
/// Note: This does not validate the format. The hash is only ever compared
/// for exact equality against what the local mirror reports.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(transparent)]
pub struct Sha(pub String);

impl Sha {
    pub fn new(s: impl Into<String>) -> Self {
        Sha(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns a short (7-character) version of the SHA for display.
    pub fn short(&self) -> &str {
        // get() rather than slicing: the value comes straight from a payload
        // and may be shorter than 7 bytes or not ASCII.
        self.0.get(..7).unwrap_or(&self.0)
    }
}

impl fmt::Display for Sha {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for Sha {
    fn from(s: &str) -> Self {
        Sha(s.to_string())
    }
}

impl From<String> for Sha {
    fn from(s: String) -> Self {
        Sha(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    mod ebook_id {
        use super::*;
        use proptest::prelude::*;

        #[test]
        fn rejects_empty() {
            assert_eq!(EbookId::parse(""), Err(InvalidEbookId(String::new())));
        }

        #[test]
        fn rejects_mixed_characters() {
            assert!(EbookId::parse("12a45").is_err());
            assert!(EbookId::parse(" 12").is_err());
            assert!(EbookId::parse("12\n").is_err());
            assert!(EbookId::parse("1.5").is_err());
            assert!(EbookId::parse("+7").is_err());
        }

        #[test]
        fn rejects_non_ascii_digits() {
            // Arabic-Indic digit four; is_numeric() would accept it
            assert!(EbookId::parse("\u{0664}2").is_err());
        }

        #[test]
        fn keeps_leading_zeros() {
            let id = EbookId::parse("0042").unwrap();
            assert_eq!(id.as_str(), "0042");
            assert_eq!(id.to_string(), "0042");
        }

        proptest! {
            #[test]
            fn accepts_all_digit_strings(s in "[0-9]{1,20}") {
                let id = EbookId::parse(&s).unwrap();
                prop_assert_eq!(id.as_str(), s.as_str());
            }

            #[test]
            fn rejects_any_non_digit(
                prefix in "[0-9]{0,5}",
                bad in "[^0-9]",
                suffix in "[0-9]{0,5}"
            ) {
                let s = format!("{}{}{}", prefix, bad, suffix);
                prop_assert_eq!(EbookId::parse(&s), Err(InvalidEbookId(s.clone())));
            }
        }
    }

    mod sha {
        use super::*;

        #[test]
        fn short_handles_short_input() {
            assert_eq!(Sha::new("abc").short(), "abc");
        }

        #[test]
        fn short_truncates_full_hash() {
            let sha = Sha::new("0123456789abcdef0123456789abcdef01234567");
            assert_eq!(sha.short(), "0123456");
        }

        #[test]
        fn deserializes_from_plain_string() {
            let sha: Sha = serde_json::from_str("\"abc123\"").unwrap();
            assert_eq!(sha, Sha::from("abc123"));
        }
    }
}
