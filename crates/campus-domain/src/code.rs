//! Subject codes.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Unique short identifier of a subject: exactly three ASCII letters,
/// normalized to uppercase. Immutable once the subject exists.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct SubjectCode(String);

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("subject code must be exactly three ASCII letters")]
pub struct InvalidSubjectCode;

impl SubjectCode {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for SubjectCode {
    type Err = InvalidSubjectCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == 3 && s.chars().all(|c| c.is_ascii_alphabetic()) {
            Ok(Self(s.to_ascii_uppercase()))
        } else {
            Err(InvalidSubjectCode)
        }
    }
}

impl fmt::Display for SubjectCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for SubjectCode {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
