//! Movie identifier.

use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DomainError;

/// Identifier of a movie.
///
/// Ids are opaque strings: anything non-empty is accepted so that callers may
/// choose their own keys (`my-id-1`). The API allocates fresh ones with
/// [`MovieId::generate`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MovieId(String);

impl MovieId {
    /// Allocate a new globally unique identifier (UUIDv7 text, time-ordered).
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap an existing identifier.
    ///
    /// Prefer `parse()` for untrusted input; this constructor does not reject
    /// empty strings and exists for fixtures and stored documents.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl core::fmt::Display for MovieId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for MovieId {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().is_empty() {
            return Err(DomainError::invalid_id("MovieId: must not be empty"));
        }
        Ok(Self(s.to_string()))
    }
}

impl From<&str> for MovieId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

impl From<String> for MovieId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

impl AsRef<str> for MovieId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique() {
        let a = MovieId::generate();
        let b = MovieId::generate();
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn parse_rejects_blank() {
        assert!("".parse::<MovieId>().is_err());
        assert!("   ".parse::<MovieId>().is_err());
        assert_eq!("my-id".parse::<MovieId>().unwrap().as_str(), "my-id");
    }

    #[test]
    fn serializes_as_plain_string() {
        let json = serde_json::to_string(&MovieId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
