//! Account role types.

use serde::{Deserialize, Serialize};

/// Role attached to a profile at signup, immutable afterwards.
///
/// Wire format: `i16` in the database (0 = Student, 1 = Teacher).
/// Every call site matches exhaustively — an out-of-range stored value is
/// rejected at load time by `from_i16`, never silently carried along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Student = 0,
    Teacher = 1,
}

impl Role {
    /// Convert from the stored `i16` value. Returns `None` for unknown values.
    pub fn from_i16(v: i16) -> Option<Self> {
        match v {
            0 => Some(Self::Student),
            1 => Some(Self::Teacher),
            _ => None,
        }
    }

    /// Convert to the stored `i16` value.
    pub fn as_i16(self) -> i16 {
        self as i16
    }
}
