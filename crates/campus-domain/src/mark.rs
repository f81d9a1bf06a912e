//! Validated marks.

use serde::{Deserialize, Serialize};

/// Lowest mark a teacher can assign.
pub const MARK_MIN: i16 = 1;
/// Highest mark a teacher can assign.
pub const MARK_MAX: i16 = 10;

/// A mark assigned to an enrollment, always in `1..=10`.
///
/// Construction goes through [`Mark::new`], so a stored or deserialized value
/// outside the range can never reach the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Mark(i16);

/// Rejected mark value, kept for the error message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("mark {0} is out of range {MARK_MIN}..={MARK_MAX}")]
pub struct MarkOutOfRange(pub i16);

impl Mark {
    /// Validate and wrap a raw value.
    pub fn new(value: i16) -> Result<Self, MarkOutOfRange> {
        if (MARK_MIN..=MARK_MAX).contains(&value) {
            Ok(Self(value))
        } else {
            Err(MarkOutOfRange(value))
        }
    }

    pub fn value(self) -> i16 {
        self.0
    }
}

impl TryFrom<i16> for Mark {
    type Error = MarkOutOfRange;

    fn try_from(value: i16) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl<'de> Deserialize<'de> for Mark {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = i16::deserialize(deserializer)?;
        Self::new(raw).map_err(serde::de::Error::custom)
    }
}
