//! Sanitized domain identifiers.
//!
//! A domain is reduced to the charset `[a-zA-Z0-9_-]` by dropping every other
//! character, and the remainder must be 1–100 characters long. Sanitation is
//! the only way to build a [`Domain`], so every domain that reaches the store
//! or the challenge message has already been normalized.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypeError;

/// Maximum length of a sanitized domain.
pub const MAX_DOMAIN_LEN: usize = 100;

/// A sanitized, non-empty domain identifier.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Domain(String);

impl Domain {
    /// Strip `raw` to the allowed charset and check the resulting length.
    pub fn sanitize(raw: &str) -> Result<Self, TypeError> {
        let cleaned: String = raw.chars().filter(|c| is_domain_char(*c)).collect();
        if cleaned.is_empty() {
            return Err(TypeError::InvalidDomain(
                "domain is empty after sanitation".into(),
            ));
        }
        if cleaned.len() > MAX_DOMAIN_LEN {
            return Err(TypeError::InvalidDomain(format!(
                "domain is {} characters, maximum is {MAX_DOMAIN_LEN}",
                cleaned.len()
            )));
        }
        Ok(Self(cleaned))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

fn is_domain_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '-'
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for Domain {
    type Error = TypeError;

    /// Stored domains must already be in sanitized form.
    fn try_from(value: String) -> Result<Self, Self::Error> {
        let domain = Self::sanitize(&value)?;
        if domain.0 != value {
            return Err(TypeError::InvalidDomain(format!(
                "'{value}' is not in sanitized form"
            )));
        }
        Ok(domain)
    }
}

impl From<Domain> for String {
    fn from(domain: Domain) -> Self {
        domain.0
    }
}
