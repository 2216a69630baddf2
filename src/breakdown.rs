//! Recomputation breakdowns.
//!
//! A [`StatBreakdown`] records how a stat's current value was reached, one
//! entry per applied step. It is produced by
//! [`Stat::breakdown`](crate::Stat::breakdown) and is meant for tooltips,
//! logs and debugging.

use serde::{Deserialize, Serialize};

/// Step-by-step trace of a stat's modifier chain.
///
/// # Examples
///
/// ```rust
/// use modstat::{Stat, StatModifier};
///
/// let mut atk = Stat::with_default_operator(10, 0, 100);
/// atk.add_modifier(StatModifier::flat(5));
///
/// let breakdown = atk.breakdown();
/// assert_eq!(breakdown.base_value, 10);
/// assert_eq!(breakdown.value, 15);
/// assert_eq!(breakdown.steps[0], ("[Flat] : 5 (From 0, Order=0)".to_string(), 15));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatBreakdown<T> {
    /// Base value the chain started from.
    pub base_value: T,

    /// Final value of the chain, equal to the last step's value.
    ///
    /// Matches the stat's current value up to the operator's equality.
    pub value: T,

    /// Each entry is `(step_description, value_after_step)`, in applied
    /// order. Runs of adjacent `PercentAdd` modifiers appear as one step,
    /// and the final clamp is always the last entry.
    pub steps: Vec<(String, T)>,
}

impl<T> StatBreakdown<T> {
    /// Create an empty breakdown.
    pub fn new(base_value: T, value: T) -> Self {
        Self {
            base_value,
            value,
            steps: Vec::new(),
        }
    }

    /// Append a step with the running value after it.
    pub fn add_step(&mut self, description: impl Into<String>, value: T) {
        self.steps.push((description.into(), value));
    }

    /// Number of steps before the final clamp.
    pub fn modifier_steps(&self) -> usize {
        self.steps.len().saturating_sub(1)
    }
}
