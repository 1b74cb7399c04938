use std::fmt;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::constants::SEPARATOR;
use crate::error::{FlagError, Result};

static INVALID_CHAR: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[\s;]").unwrap());

/// A single feature-flag identifier.
///
/// Always non-empty, free of whitespace and of the `;` separator.
/// Equality is exact and case-sensitive.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct Token(pub(crate) String);

impl Token {
    /// Check well-formedness only: trims, then rejects empty input and
    /// input containing whitespace or the separator.
    pub fn parse(candidate: &str) -> Result<Self> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            return Err(FlagError::EmptyToken);
        }
        if let Some(m) = INVALID_CHAR.find(trimmed) {
            let character = m.as_str().chars().next().unwrap_or(SEPARATOR);
            return Err(FlagError::InvalidCharacter {
                token: trimmed.to_string(),
                character,
            });
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Token {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Validate a candidate for addition to a managed list.
///
/// Errors, in order of precedence: `EmptyToken`, `InvalidCharacter`,
/// `DuplicateToken`. On success returns the trimmed token; the caller
/// is responsible for appending it.
pub fn validate<'a, I>(candidate: &str, managed: I) -> Result<Token>
where
    I: IntoIterator<Item = &'a Token>,
{
    let token = Token::parse(candidate)?;
    if managed.into_iter().any(|existing| existing == &token) {
        return Err(FlagError::DuplicateToken(token.0));
    }
    Ok(token)
}
