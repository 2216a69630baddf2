//! Modifier sources.
//!
//! Every modifier records where it came from (an item, a buff, a skill) as a
//! [`SourceId`]. The id carries no meaning for the stat; it only lets the
//! owner strip everything one source contributed in a single call.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of whatever granted a modifier.
///
/// Not unique per modifier: an item granting three bonuses tags all three
/// with the same id.
///
/// # Examples
///
/// ```rust
/// use modstat::SourceId;
///
/// let sword = SourceId::new(7);
/// assert_eq!(sword, SourceId::from(7u64));
/// assert_eq!(sword.to_string(), "7");
/// ```
#[derive(
    Debug, Clone, Copy, Default, Hash, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct SourceId(u64);

impl SourceId {
    /// Source of modifiers created without one.
    pub const NONE: SourceId = SourceId(0);

    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for SourceId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl From<u32> for SourceId {
    fn from(id: u32) -> Self {
        Self(u64::from(id))
    }
}

impl fmt::Display for SourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
