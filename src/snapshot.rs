//! Persistable stat state.
//!
//! Only the base value and the bounds of a stat need saving. The current
//! value is derived and modifiers belong to whatever granted them (items,
//! buffs), which re-attach them after loading.

use serde::{Deserialize, Serialize};

/// Base value and bounds of a [`Stat`](crate::Stat).
///
/// # Examples
///
/// ```rust
/// use modstat::{Stat, StatSnapshot};
///
/// let mut hp = Stat::with_default_operator(80, 0, 100);
/// let saved = serde_json::to_string(&hp.snapshot()).unwrap();
///
/// hp.set_base_value(10);
/// let loaded: StatSnapshot<i32> = serde_json::from_str(&saved).unwrap();
/// hp.restore(&loaded);
/// assert_eq!(hp.current_value(), 80);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatSnapshot<T> {
    pub base_value: T,
    pub min_value: T,
    pub max_value: T,
}
