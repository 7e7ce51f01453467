// src/domain/cep.rs
//
// Canonical CEP (Brazilian postal code)
//
// CRITICAL RULES:
// - A Cep is always exactly 8 ASCII digits
// - The only way in is canonicalize() (FromStr delegates to it)
// - Pure: no I/O, no side effects

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Separator between the 5-digit prefix and the 3-digit suffix.
const SEPARATOR: char = '-';

/// Number of digits in a canonical CEP.
pub const CEP_LEN: usize = 8;

/// Why a raw string is not a CEP.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvalidCode {
    #[error("empty CEP")]
    Empty,

    #[error("wrong position of '-'")]
    MisplacedSeparator,

    #[error("invalid CEP length {0}")]
    Length(usize),

    #[error("illegal character {0:?}")]
    IllegalCharacter(char),
}

/// A canonical CEP: 8 ASCII digits, no separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Cep(String);

impl Cep {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Cep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Cep {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for Cep {
    type Err = InvalidCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        canonicalize(s)
    }
}

impl<'de> Deserialize<'de> for Cep {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        canonicalize(&raw).map_err(serde::de::Error::custom)
    }
}

/// Transforms `raw` into its canonical form: 8 digits without the '-'.
///
/// Surrounding whitespace is ignored. A '-' is only accepted between the
/// fifth-from-last and the last three digits, and only the leading digit
/// may be omitted (it is restored as a '0').
pub fn canonicalize(raw: &str) -> Result<Cep, InvalidCode> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(InvalidCode::Empty);
    }

    let mut code = trimmed.to_string();
    if let Some(pos) = code.find(SEPARATOR) {
        if code.len() - pos != 4 {
            return Err(InvalidCode::MisplacedSeparator);
        }
        code.remove(pos);
    }

    let len = code.len();
    if !(CEP_LEN - 1..=CEP_LEN).contains(&len) {
        return Err(InvalidCode::Length(len));
    }

    if let Some(c) = code.chars().find(|c| !c.is_ascii_digit()) {
        return Err(InvalidCode::IllegalCharacter(c));
    }

    if len < CEP_LEN {
        code.insert(0, '0');
    }

    Ok(Cep(code))
}

/// Reports whether `raw` canonicalizes.
pub fn valid(raw: &str) -> bool {
    canonicalize(raw).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_input_is_unchanged() {
        for raw in ["01310000", "00000000", "99999999", "12345678"] {
            assert_eq!(canonicalize(raw).unwrap().as_str(), raw);
        }
    }

    #[test]
    fn test_separator_is_removed() {
        assert_eq!(canonicalize("01310-000").unwrap().as_str(), "01310000");
    }

    #[test]
    fn test_missing_leading_digit_is_padded() {
        assert_eq!(canonicalize("1310-000").unwrap().as_str(), "01310000");
        assert_eq!(canonicalize("1310000").unwrap().as_str(), "01310000");
    }

    #[test]
    fn test_surrounding_whitespace_is_trimmed() {
        assert_eq!(canonicalize("  01310-000\n").unwrap().as_str(), "01310000");
    }

    #[test]
    fn test_idempotent() {
        let once = canonicalize("1310-000").unwrap();
        let twice = canonicalize(once.as_str()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_misplaced_separator() {
        for raw in ["01310000-", "-01310000", "013-10000", "-1310000"] {
            assert_eq!(
                canonicalize(raw),
                Err(InvalidCode::MisplacedSeparator),
                "{raw}"
            );
        }
    }

    #[test]
    fn test_double_separator() {
        assert_eq!(
            canonicalize("1-310-000"),
            Err(InvalidCode::MisplacedSeparator)
        );
        assert_eq!(
            canonicalize("01-10-000"),
            Err(InvalidCode::MisplacedSeparator)
        );
    }

    #[test]
    fn test_invalid_length() {
        assert_eq!(canonicalize("310000"), Err(InvalidCode::Length(6)));
        assert_eq!(canonicalize("013100000"), Err(InvalidCode::Length(9)));
    }

    #[test]
    fn test_illegal_characters() {
        assert_eq!(
            canonicalize("12a34567"),
            Err(InvalidCode::IllegalCharacter('a'))
        );
        assert_eq!(
            canonicalize("abc12345"),
            Err(InvalidCode::IllegalCharacter('a'))
        );
        assert_eq!(
            canonicalize("01 310000"),
            Err(InvalidCode::IllegalCharacter(' '))
        );
        // Non-ASCII numerals are rejected, whatever their length in bytes.
        assert!(canonicalize("34㤹-678").is_err());
        assert!(canonicalize("0131000٣").is_err());
    }

    #[test]
    fn test_empty() {
        assert_eq!(canonicalize(""), Err(InvalidCode::Empty));
        assert_eq!(canonicalize("   "), Err(InvalidCode::Empty));
    }

    #[test]
    fn test_valid_matches_canonicalize() {
        for raw in ["1310000", "01310-000", "01 310000", "", "abc12345", "01310000-"] {
            assert_eq!(valid(raw), canonicalize(raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn test_from_str_and_serde() {
        let cep: Cep = "01310-000".parse().unwrap();
        assert_eq!(cep.to_string(), "01310000");

        let json = serde_json::to_string(&cep).unwrap();
        assert_eq!(json, "\"01310000\"");

        let back: Cep = serde_json::from_str("\"1310-000\"").unwrap();
        assert_eq!(back, cep);
        assert!(serde_json::from_str::<Cep>("\"0131\"").is_err());
    }
}
