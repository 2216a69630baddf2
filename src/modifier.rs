//! Stat modifiers.
//!
//! A modifier is one adjustment to a stat's base value: a flat amount, an
//! additive percentage, or a compounding percentage. Modifiers are plain
//! immutable data; all of the combination rules live in
//! [`Stat`](crate::Stat).

use crate::source::SourceId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// How a modifier's value is applied.
///
/// # Examples
///
/// With base 100:
///
/// - `Flat(+50)` gives `150`
/// - `PercentAdd(0.10)` and `PercentAdd(0.20)` next to each other give
///   `100 × (1 + 0.10 + 0.20) = 130`
/// - `PercentMult(0.10)` and `PercentMult(0.20)` give
///   `100 × 1.10 × 1.20 = 132`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ModifierKind {
    /// Added to the running value.
    Flat,
    /// Summed with adjacent `PercentAdd` entries, then applied once as
    /// `× (1 + sum)`.
    PercentAdd,
    /// Applied on its own as `× (1 + value)`, compounding.
    PercentMult,
}

impl fmt::Display for ModifierKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModifierKind::Flat => "Flat",
            ModifierKind::PercentAdd => "PercentAdd",
            ModifierKind::PercentMult => "PercentMult",
        };
        f.write_str(name)
    }
}

/// Handle of a modifier attached to a stat.
///
/// Returned by [`Stat::add_modifier`](crate::Stat::add_modifier). Each
/// attachment gets a fresh id, so two modifiers with identical fields stay
/// separate entries and can be removed one at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ModifierId(pub(crate) u64);

impl fmt::Display for ModifierId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// An immutable adjustment to a stat.
///
/// Lower `order` values are applied first; modifiers with equal order keep
/// the order in which they were added.
///
/// # Examples
///
/// ```rust
/// use modstat::{ModifierKind, SourceId, StatModifier};
///
/// let bonus = StatModifier::percent_add(0.25)
///     .with_order(10)
///     .with_source(SourceId::new(3));
///
/// assert_eq!(bonus.kind(), ModifierKind::PercentAdd);
/// assert_eq!(bonus.order(), 10);
/// assert_eq!(bonus.to_string(), "[PercentAdd] : 0.25 (From 3, Order=10)");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StatModifier<T> {
    value: T,
    kind: ModifierKind,
    #[serde(default)]
    order: i32,
    #[serde(default)]
    source: SourceId,
}

impl<T> StatModifier<T> {
    /// Create a modifier with every field given explicitly.
    pub fn new(value: T, kind: ModifierKind, order: i32, source: SourceId) -> Self {
        Self {
            value,
            kind,
            order,
            source,
        }
    }

    /// Flat modifier with order 0 and no source.
    pub fn flat(value: T) -> Self {
        Self::new(value, ModifierKind::Flat, 0, SourceId::NONE)
    }

    /// Additive-percent modifier with order 0 and no source.
    pub fn percent_add(value: T) -> Self {
        Self::new(value, ModifierKind::PercentAdd, 0, SourceId::NONE)
    }

    /// Multiplicative-percent modifier with order 0 and no source.
    pub fn percent_mult(value: T) -> Self {
        Self::new(value, ModifierKind::PercentMult, 0, SourceId::NONE)
    }

    /// Set the application order. Lower orders apply first.
    pub fn with_order(self, order: i32) -> Self {
        Self { order, ..self }
    }

    /// Tag the modifier with the source that grants it, so it can be
    /// removed with [`Stat::remove_modifiers_by_source`](crate::Stat::remove_modifiers_by_source).
    pub fn with_source(self, source: impl Into<SourceId>) -> Self {
        Self {
            source: source.into(),
            ..self
        }
    }

    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn source(&self) -> SourceId {
        self.source
    }
}

impl<T: Copy> StatModifier<T> {
    pub fn value(&self) -> T {
        self.value
    }
}

impl<T: fmt::Display> StatModifier<T> {
    /// Human-readable summary, as shown in breakdowns.
    pub fn description(&self) -> String {
        self.to_string()
    }
}

impl<T: fmt::Display> fmt::Display for StatModifier<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] : {} (From {}, Order={})",
            self.kind, self.value, self.source, self.order
        )
    }
}
