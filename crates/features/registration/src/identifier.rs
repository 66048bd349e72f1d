//! CNPJ tax identifiers.
//!
//! An identifier is 14 decimal digits: a 12-digit base followed by two check digits,
//! each a weighted sum of the preceding digits taken modulo 11. Punctuation such as
//! `11.222.333/0001-81` is accepted on input and stripped before validation.

use std::borrow::Cow;
use std::fmt;
use std::str::FromStr;

/// Digit count of a normalized identifier.
pub const IDENTIFIER_LEN: usize = 14;

const FIRST_WEIGHTS: [u32; 12] = [5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];
const SECOND_WEIGHTS: [u32; 13] = [6, 5, 4, 3, 2, 9, 8, 7, 6, 5, 4, 3, 2];

#[orgdir_derive::orgdir_error]
#[derive(Clone, PartialEq, Eq)]
pub enum IdentifierError {
    #[error("Expected 14 digits, found {found}{}", format_context(.context))]
    Length { found: usize, context: Option<Cow<'static, str>> },

    #[error("All digits are identical{}", format_context(.context))]
    RepeatedDigits { context: Option<Cow<'static, str>> },

    #[error("Check digit {position} does not match{}", format_context(.context))]
    CheckDigit { position: usize, context: Option<Cow<'static, str>> },
}

/// Keeps only the ASCII digits of `input`.
#[must_use]
pub fn normalize(input: &str) -> String {
    input.chars().filter(char::is_ascii_digit).collect()
}

/// Returns `true` when `identifier` is a structurally valid CNPJ.
///
/// Never panics; arbitrary input simply yields `false`.
///
/// ```rust
/// use orgdir_registration::identifier::validate;
///
/// assert!(validate("11.222.333/0001-81"));
/// assert!(!validate("11222333000180"));
/// assert!(!validate("11111111111111"));
/// ```
#[must_use]
pub fn validate(identifier: &str) -> bool {
    TaxId::parse(identifier).is_ok()
}

/// A normalized, checksum-verified identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TaxId(String);

impl TaxId {
    /// # Errors
    /// Returns the first rule `input` violates once punctuation is stripped.
    pub fn parse(input: &str) -> Result<Self, IdentifierError> {
        let digits: Vec<u32> = input.chars().filter_map(|c| c.to_digit(10)).collect();

        if digits.len() != IDENTIFIER_LEN {
            return Err(IdentifierError::Length { found: digits.len(), context: None });
        }

        if digits.iter().all(|&d| d == digits[0]) {
            return Err(IdentifierError::RepeatedDigits { context: None });
        }

        if check_digit(&digits[..12], &FIRST_WEIGHTS) != digits[12] {
            return Err(IdentifierError::CheckDigit { position: 13, context: None });
        }

        if check_digit(&digits[..13], &SECOND_WEIGHTS) != digits[13] {
            return Err(IdentifierError::CheckDigit { position: 14, context: None });
        }

        Ok(Self(normalize(input)))
    }

    /// The 14 digits, unpunctuated.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }
}

fn check_digit(digits: &[u32], weights: &[u32]) -> u32 {
    let sum: u32 = digits.iter().zip(weights).map(|(d, w)| d * w).sum();
    match sum % 11 {
        r if r < 2 => 0,
        r => 11 - r,
    }
}

impl FromStr for TaxId {
    type Err = IdentifierError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl AsRef<str> for TaxId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Canonical punctuated form, e.g. `11.222.333/0001-81`.
impl fmt::Display for TaxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let d = &self.0;
        write!(f, "{}.{}.{}/{}-{}", &d[..2], &d[2..5], &d[5..8], &d[8..12], &d[12..])
    }
}
