//! Registration-time subdomain validation.
//!
//! Resolution (see [`crate::tenant`]) never validates; only new firms go
//! through [`Subdomain::parse`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::value_object::ValueObject;

/// Minimum number of characters in a registered subdomain.
pub const MIN_SUBDOMAIN_LEN: usize = 3;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SubdomainError {
    #[error("subdomain is required")]
    Empty,

    #[error("subdomain may only contain lowercase letters, digits and hyphens")]
    InvalidCharacters,

    #[error("subdomain must be at least {} characters", MIN_SUBDOMAIN_LEN)]
    TooShort,
}

/// A validated, lowercase tenant label (`^[a-z0-9-]+$`, at least 3 chars).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Subdomain(String);

impl ValueObject for Subdomain {}

impl Subdomain {
    /// Lowercase `raw` and validate it.
    ///
    /// Surrounding whitespace is trimmed; anything else outside the allowed
    /// alphabet is rejected rather than silently dropped.
    pub fn parse(raw: &str) -> Result<Self, SubdomainError> {
        let normalized = raw.trim().to_lowercase();
        if normalized.is_empty() {
            return Err(SubdomainError::Empty);
        }
        if !normalized
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
        {
            return Err(SubdomainError::InvalidCharacters);
        }
        if normalized.chars().count() < MIN_SUBDOMAIN_LEN {
            return Err(SubdomainError::TooShort);
        }
        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Subdomain {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Subdomain {
    type Error = SubdomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<Subdomain> for String {
    fn from(value: Subdomain) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_lowercases_mixed_case_input() {
        let s = Subdomain::parse("Already-Taken").unwrap();
        assert_eq!(s.as_str(), "already-taken");
    }

    #[test]
    fn parse_rejects_two_characters() {
        assert_eq!(Subdomain::parse("ab"), Err(SubdomainError::TooShort));
        assert!(SubdomainError::TooShort.to_string().contains('3'));
    }

    #[test]
    fn parse_checks_alphabet_before_length() {
        assert_eq!(Subdomain::parse("a_"), Err(SubdomainError::InvalidCharacters));
        assert_eq!(Subdomain::parse("acme.be"), Err(SubdomainError::InvalidCharacters));
    }

    #[test]
    fn parse_rejects_blank() {
        assert_eq!(Subdomain::parse("   "), Err(SubdomainError::Empty));
    }

    #[test]
    fn deserialize_goes_through_validation() {
        let ok: Subdomain = serde_json::from_str("\"kantoor-1\"").unwrap();
        assert_eq!(ok.as_str(), "kantoor-1");
        assert!(serde_json::from_str::<Subdomain>("\"x\"").is_err());
    }
}
