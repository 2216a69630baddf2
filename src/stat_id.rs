//! Stat identifier module.
//!
//! Provides the `StatId` type, which names a stat inside a
//! [`StatSheet`](crate::StatSheet) or a descriptor file. Stat names are data,
//! not a closed enum, so new stats need no code change.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::sync::Arc;

/// Shared string identifier for stats.
///
/// Uses `Arc<str>` so clones are cheap and comparisons stay by content.
///
/// # Examples
///
/// ```rust
/// use modstat::StatId;
///
/// let hp = StatId::from_str("HP");
/// let hp2: StatId = "HP".into();
/// let hp3: StatId = String::from("HP").into();
///
/// assert_eq!(hp, hp2);
/// assert_eq!(hp, hp3);
/// ```
#[derive(Debug, Clone, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct StatId(Arc<str>);

impl Serialize for StatId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        self.0.as_ref().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for StatId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(StatId::from(s))
    }
}

impl StatId {
    /// Create a new `StatId` from a string slice.
    #[allow(clippy::should_implement_trait)]
    pub fn from_str(s: &str) -> Self {
        Self(Arc::from(s))
    }

    /// Get the string representation of this stat ID.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for StatId {
    fn from(s: &str) -> Self {
        Self::from_str(s)
    }
}

impl From<String> for StatId {
    fn from(s: String) -> Self {
        Self(Arc::from(s))
    }
}

impl std::fmt::Display for StatId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stat_id_creation() {
        let id1 = StatId::from_str("MoveSpeed");
        let id2 = StatId::from_str("MoveSpeed");
        assert_eq!(id1, id2);
        assert_eq!(id1.as_str(), "MoveSpeed");
    }

    #[test]
    fn test_stat_id_serde_is_plain_string() {
        let id = StatId::from_str("AP");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"AP\"");
        let back: StatId = serde_json::from_str("\"AP\"").unwrap();
        assert_eq!(back, id);
    }

    #[test]
    fn test_stat_id_ordering() {
        assert!(StatId::from_str("AP") < StatId::from_str("HP"));
    }
}
