//! Stat module.
//!
//! Provides [`Stat`], a bounded value with a base, a derived current value
//! and an ordered chain of modifiers.
//!
//! The current value is never set directly. It is recomputed whenever the
//! base value, a bound, or the modifier list changes:
//!
//! ```text
//! base → modifiers (ascending order) → clamp [min, max] → current
//! ```
//!
//! - `Flat` modifiers add to the running value
//! - adjacent `PercentAdd` modifiers are summed, then applied once as `× (1 + sum)`
//! - `PercentMult` modifiers each apply `× (1 + value)` on their own
//!
//! Listeners fire only when the recomputed value differs from the previous
//! one according to the stat's operator.

use crate::breakdown::StatBreakdown;
use crate::listener::{ListenerId, Listeners};
use crate::modifier::{ModifierId, ModifierKind, StatModifier};
use crate::numeric::{NumericOperator, StatNumeric};
use crate::snapshot::StatSnapshot;
use crate::source::SourceId;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// One step of a recomputation, reported to [`Stat::evaluate`] observers.
pub(crate) enum Step<'a, T> {
    /// A `Flat` or `PercentMult` modifier was applied.
    Modifier(&'a StatModifier<T>),
    /// A run of `count` adjacent `PercentAdd` modifiers summing to `sum` was
    /// applied.
    PercentAddRun { sum: T, count: usize },
    /// The result was clamped into the stat's bounds.
    Clamp { min: T, max: T },
}

#[derive(Debug, Clone, Copy)]
struct ModifierEntry<T> {
    id: ModifierId,
    modifier: StatModifier<T>,
}

/// A bounded stat with layered modifiers.
///
/// `Stat` is a plain value owned by whatever entity uses it. It performs no
/// I/O and no internal locking; listeners run synchronously inside the
/// mutating call and receive the stat by shared reference, so they can read
/// it but not mutate it.
///
/// # Examples
///
/// ```rust
/// use modstat::{Stat, StatModifier};
///
/// let mut hp = Stat::with_default_operator(100.0_f64, 0.0, 1000.0);
///
/// hp.add_modifier(StatModifier::flat(50.0));
/// hp.add_modifier(StatModifier::percent_add(0.10).with_order(1));
///
/// // (100 + 50) × 1.10
/// assert!((hp.current_value() - 165.0).abs() < 1e-9);
/// ```
pub struct Stat<T: Copy> {
    base_value: T,
    min_value: T,
    max_value: T,
    current_value: T,
    initial_value: T,
    modifiers: Vec<ModifierEntry<T>>,
    next_modifier_id: u64,
    listeners: Listeners<Stat<T>>,
    operator: Arc<dyn NumericOperator<T>>,
}

impl<T: StatNumeric> Stat<T> {
    /// Create a stat using the canonical operator for `T`.
    pub fn with_default_operator(initial_value: T, min_value: T, max_value: T) -> Self {
        Self::new(initial_value, min_value, max_value, T::operator())
    }
}

impl<T: Copy + fmt::Debug> Stat<T> {
    /// Create a stat with an explicit operator.
    ///
    /// The initial value is clamped into `[min_value, max_value]` and that
    /// clamped value is what [`reset`](Self::reset) later restores.
    pub fn new(
        initial_value: T,
        min_value: T,
        max_value: T,
        operator: Arc<dyn NumericOperator<T>>,
    ) -> Self {
        let base_value = operator.clamp(initial_value, min_value, max_value);
        Self {
            base_value,
            min_value,
            max_value,
            current_value: base_value,
            initial_value: base_value,
            modifiers: Vec::new(),
            next_modifier_id: 0,
            listeners: Listeners::new(),
            operator,
        }
    }

    /// Value before modifiers, always within bounds.
    pub fn base_value(&self) -> T {
        self.base_value
    }

    /// Lower bound.
    pub fn min_value(&self) -> T {
        self.min_value
    }

    /// Upper bound.
    pub fn max_value(&self) -> T {
        self.max_value
    }

    /// Value with every modifier applied, within bounds.
    pub fn current_value(&self) -> T {
        self.current_value
    }

    /// Clamped initial value captured at construction.
    pub fn initial_value(&self) -> T {
        self.initial_value
    }

    /// Operator used for every comparison and computation on this stat.
    pub fn operator(&self) -> &dyn NumericOperator<T> {
        self.operator.as_ref()
    }

    /// `true` when the current value is at (or below) the minimum.
    pub fn is_empty(&self) -> bool {
        self.operator
            .is_less_or_equal(self.current_value, self.min_value)
    }

    /// `true` when the current value is at (or above) the maximum.
    pub fn is_full(&self) -> bool {
        self.operator
            .is_greater_or_equal(self.current_value, self.max_value)
    }

    /// `true` when the current value lies within the stat's own bounds.
    pub fn is_valid(&self) -> bool {
        self.is_in_range(self.min_value, self.max_value)
    }

    /// `true` when the current value lies within `[min, max]`.
    pub fn is_in_range(&self, min: T, max: T) -> bool {
        self.operator.is_between(self.current_value, min, max)
    }

    /// Position of the current value between the bounds, in `[0.0, 1.0]`.
    ///
    /// Returns `0.0` when `max == min`.
    pub fn ratio(&self) -> f64 {
        self.operator
            .ratio(self.current_value, self.min_value, self.max_value)
    }

    /// `current_value - value`.
    pub fn difference(&self, value: T) -> T {
        self.operator.subtract(self.current_value, value)
    }

    // ------------------------------------------------------------------
    // Base value
    // ------------------------------------------------------------------

    /// Set the base value, clamped into the current bounds.
    pub fn set_base_value(&mut self, value: T) {
        self.base_value = self.operator.clamp(value, self.min_value, self.max_value);
        self.update_current_value();
    }

    /// Add `amount` to the base value, then clamp.
    pub fn add_base_value(&mut self, amount: T) {
        self.set_base_value(self.operator.add(self.base_value, amount));
    }

    /// Subtract `amount` from the base value, then clamp.
    pub fn subtract_base_value(&mut self, amount: T) {
        self.set_base_value(self.operator.subtract(self.base_value, amount));
    }

    /// Multiply the base value by `amount`, then clamp.
    pub fn multiply_base_value(&mut self, amount: T) {
        self.set_base_value(self.operator.multiply(self.base_value, amount));
    }

    /// Divide the base value by `amount`.
    ///
    /// Does nothing unless `amount` is greater than zero.
    pub fn divide_base_value(&mut self, amount: T) {
        if self.operator.is_greater_than(amount, self.operator.zero()) {
            self.set_base_value(self.operator.divide(self.base_value, amount));
        }
    }

    /// Set the base value to the maximum.
    pub fn set_full(&mut self) {
        self.set_base_value(self.max_value);
    }

    /// Set the base value to the minimum.
    pub fn set_empty(&mut self) {
        self.set_base_value(self.min_value);
    }

    // ------------------------------------------------------------------
    // Bounds
    // ------------------------------------------------------------------

    /// Set the lower bound and reclamp the base value.
    pub fn set_min_value(&mut self, value: T) {
        self.min_value = value;
        self.set_base_value(self.base_value);
    }

    /// Raise the lower bound by `amount`. See [`set_min_value`](Self::set_min_value).
    pub fn add_min_value(&mut self, amount: T) {
        self.set_min_value(self.operator.add(self.min_value, amount));
    }

    /// Lower the lower bound by `amount`.
    pub fn subtract_min_value(&mut self, amount: T) {
        self.set_min_value(self.operator.subtract(self.min_value, amount));
    }

    /// Set the upper bound and reclamp the base value.
    pub fn set_max_value(&mut self, value: T) {
        self.max_value = value;
        self.set_base_value(self.base_value);
    }

    /// Raise the upper bound by `amount`.
    pub fn add_max_value(&mut self, amount: T) {
        self.set_max_value(self.operator.add(self.max_value, amount));
    }

    /// Lower the upper bound by `amount`. See [`set_max_value`](Self::set_max_value).
    pub fn subtract_max_value(&mut self, amount: T) {
        self.set_max_value(self.operator.subtract(self.max_value, amount));
    }

    // ------------------------------------------------------------------
    // Modifiers
    // ------------------------------------------------------------------

    /// Attach a modifier and recompute.
    ///
    /// Modifiers are kept sorted by `order`; equal orders keep insertion
    /// order.
    pub fn add_modifier(&mut self, modifier: StatModifier<T>) -> ModifierId {
        let id = self.push_modifier(modifier);
        self.sort_modifiers();
        self.update_current_value();
        id
    }

    /// Attach several modifiers with a single recompute.
    pub fn add_modifiers<I>(&mut self, modifiers: I) -> Vec<ModifierId>
    where
        I: IntoIterator<Item = StatModifier<T>>,
    {
        let ids: Vec<_> = modifiers
            .into_iter()
            .map(|modifier| self.push_modifier(modifier))
            .collect();
        if !ids.is_empty() {
            self.sort_modifiers();
            self.update_current_value();
        }
        ids
    }

    /// Detach one modifier. Returns `false` if `id` is not attached.
    pub fn remove_modifier(&mut self, id: ModifierId) -> bool {
        let Some(index) = self.modifiers.iter().position(|entry| entry.id == id) else {
            return false;
        };
        // `remove` keeps the remaining entries in applied order
        self.modifiers.remove(index);
        self.update_current_value();
        true
    }

    /// Detach every modifier granted by `source`, recomputing once.
    ///
    /// Returns `true` if at least one modifier was removed.
    pub fn remove_modifiers_by_source(&mut self, source: SourceId) -> bool {
        let before = self.modifiers.len();
        self.modifiers
            .retain(|entry| entry.modifier.source() != source);
        let removed = before - self.modifiers.len();
        if removed == 0 {
            return false;
        }

        debug!(
            target: "modstat::stat",
            source = %source,
            removed,
            "Removed modifiers by source"
        );
        self.update_current_value();
        true
    }

    /// Detach every modifier.
    pub fn clear_modifiers(&mut self) {
        if !self.modifiers.is_empty() {
            self.modifiers.clear();
            self.update_current_value();
        }
    }

    /// Attached modifiers in the order they are applied.
    pub fn modifiers(&self) -> impl Iterator<Item = (ModifierId, &StatModifier<T>)> + '_ {
        self.modifiers
            .iter()
            .map(|entry| (entry.id, &entry.modifier))
    }

    /// Look up an attached modifier by the id [`add_modifier`](Self::add_modifier)
    /// returned.
    pub fn modifier(&self, id: ModifierId) -> Option<&StatModifier<T>> {
        self.modifiers
            .iter()
            .find(|entry| entry.id == id)
            .map(|entry| &entry.modifier)
    }

    /// Number of attached modifiers.
    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    /// Restore the initial base value and drop every modifier.
    ///
    /// Listeners stay registered.
    pub fn reset(&mut self) {
        self.base_value = self
            .operator
            .clamp(self.initial_value, self.min_value, self.max_value);
        self.modifiers.clear();
        debug!(
            target: "modstat::stat",
            base = ?self.base_value,
            "Stat reset"
        );
        self.update_current_value();
    }

    // ------------------------------------------------------------------
    // Listeners
    // ------------------------------------------------------------------

    /// Register a callback fired each time the current value changes.
    pub fn register_listener<F>(&mut self, listener: F) -> ListenerId
    where
        F: FnMut(&Stat<T>) + Send + 'static,
    {
        self.listeners.register(listener)
    }

    /// Remove a listener. Returns `false` if `id` was not registered.
    pub fn unregister_listener(&mut self, id: ListenerId) -> bool {
        self.listeners.unregister(id)
    }

    /// Remove every listener.
    pub fn clear_listeners(&mut self) {
        self.listeners.clear();
    }

    /// Number of registered listeners.
    ///
    /// Accurate from inside a listener callback as well.
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    // ------------------------------------------------------------------
    // Persistence
    // ------------------------------------------------------------------

    /// Capture the persistent part of the stat (base value and bounds).
    pub fn snapshot(&self) -> StatSnapshot<T> {
        StatSnapshot {
            base_value: self.base_value,
            min_value: self.min_value,
            max_value: self.max_value,
        }
    }

    /// Apply a snapshot's bounds and base value with a single recompute.
    ///
    /// Modifiers and listeners are left untouched.
    pub fn restore(&mut self, snapshot: &StatSnapshot<T>) {
        self.min_value = snapshot.min_value;
        self.max_value = snapshot.max_value;
        self.set_base_value(snapshot.base_value);
    }

    // ------------------------------------------------------------------
    // Recomputation
    // ------------------------------------------------------------------

    fn push_modifier(&mut self, modifier: StatModifier<T>) -> ModifierId {
        let id = ModifierId(self.next_modifier_id);
        self.next_modifier_id += 1;
        self.modifiers.push(ModifierEntry { id, modifier });
        id
    }

    fn sort_modifiers(&mut self) {
        // stable: adjacency of PercentAdd runs depends on insertion order
        self.modifiers
            .sort_by_key(|entry| entry.modifier.order());
    }

    /// Run the modifier chain from the base value and return the clamped
    /// result, reporting each step to `on_step`.
    pub(crate) fn evaluate<F>(&self, mut on_step: F) -> T
    where
        F: FnMut(Step<'_, T>, T),
    {
        let op = self.operator.as_ref();
        let mut result = self.base_value;
        let mut percent_add_sum = op.zero();
        let mut percent_add_count = 0;

        for (index, entry) in self.modifiers.iter().enumerate() {
            let modifier = &entry.modifier;
            match modifier.kind() {
                ModifierKind::Flat => {
                    result = op.add(result, modifier.value());
                    on_step(Step::Modifier(modifier), result);
                }
                ModifierKind::PercentAdd => {
                    percent_add_sum = op.add(percent_add_sum, modifier.value());
                    percent_add_count += 1;

                    let run_continues = self
                        .modifiers
                        .get(index + 1)
                        .is_some_and(|next| next.modifier.kind() == ModifierKind::PercentAdd);
                    if !run_continues {
                        result = op.multiply(result, op.add_one(percent_add_sum));
                        on_step(
                            Step::PercentAddRun {
                                sum: percent_add_sum,
                                count: percent_add_count,
                            },
                            result,
                        );
                        percent_add_sum = op.zero();
                        percent_add_count = 0;
                    }
                }
                ModifierKind::PercentMult => {
                    result = op.multiply(result, op.add_one(modifier.value()));
                    on_step(Step::Modifier(modifier), result);
                }
            }
        }

        let clamped = op.clamp(result, self.min_value, self.max_value);
        on_step(
            Step::Clamp {
                min: self.min_value,
                max: self.max_value,
            },
            clamped,
        );
        clamped
    }

    fn update_current_value(&mut self) {
        let result = self.evaluate(|_, _| {});
        if self.operator.is_equal(self.current_value, result) {
            return;
        }

        trace!(
            target: "modstat::stat",
            previous = ?self.current_value,
            current = ?result,
            "Stat value changed"
        );
        self.current_value = result;
        self.notify_listeners();
    }

    fn notify_listeners(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        // Listeners borrow the stat, so detach them for the duration.
        let mut listeners = self.listeners.detach();
        listeners.notify(self);
        self.listeners = listeners;
    }
}

impl<T: Copy + fmt::Debug + fmt::Display> Stat<T> {
    /// Replay the recomputation step by step.
    ///
    /// Does not change the stat or notify listeners. The breakdown's `value`
    /// is the freshly evaluated result, which always equals the last step.
    /// For float stats it can differ from [`current_value`](Self::current_value)
    /// by less than the operator's tolerance, because changes that small are
    /// not stored.
    pub fn breakdown(&self) -> StatBreakdown<T> {
        let mut breakdown = StatBreakdown::new(self.base_value, self.current_value);
        let value = self.evaluate(|step, value| {
            let description = match step {
                Step::Modifier(modifier) => modifier.description(),
                Step::PercentAddRun { sum, count } => {
                    format!("[{}] x{} : {}", ModifierKind::PercentAdd, count, sum)
                }
                Step::Clamp { min, max } => format!("clamp [{}, {}]", min, max),
            };
            breakdown.add_step(description, value);
        });
        breakdown.value = value;
        breakdown
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for Stat<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Stat")
            .field("base_value", &self.base_value)
            .field("min_value", &self.min_value)
            .field("max_value", &self.max_value)
            .field("current_value", &self.current_value)
            .field("initial_value", &self.initial_value)
            .field("modifiers", &self.modifiers.len())
            .field("listeners", &self.listeners.len())
            .field("operator", &self.operator)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::IntOperator;

    fn int_stat(initial: i32, min: i32, max: i32) -> Stat<i32> {
        Stat::new(initial, min, max, Arc::new(IntOperator))
    }

    #[test]
    fn test_construction_clamps_initial_value() {
        let stat = int_stat(150, 0, 100);
        assert_eq!(stat.base_value(), 100);
        assert_eq!(stat.current_value(), 100);
        assert_eq!(stat.initial_value(), 100);
    }

    #[test]
    fn test_base_value_arithmetic() {
        let mut stat = int_stat(10, 0, 100);
        stat.add_base_value(5);
        assert_eq!(stat.base_value(), 15);
        stat.subtract_base_value(20);
        assert_eq!(stat.base_value(), 0);
        stat.set_base_value(12);
        stat.multiply_base_value(3);
        assert_eq!(stat.base_value(), 36);
        stat.divide_base_value(4);
        assert_eq!(stat.base_value(), 9);
    }

    #[test]
    fn test_divide_by_non_positive_is_ignored() {
        let mut stat = int_stat(40, 0, 100);
        stat.divide_base_value(0);
        assert_eq!(stat.base_value(), 40);
        stat.divide_base_value(-2);
        assert_eq!(stat.base_value(), 40);
    }

    #[test]
    fn test_set_full_and_empty() {
        let mut stat = int_stat(40, 5, 90);
        stat.set_full();
        assert!(stat.is_full());
        assert_eq!(stat.current_value(), 90);
        stat.set_empty();
        assert!(stat.is_empty());
        assert_eq!(stat.current_value(), 5);
    }

    #[test]
    fn test_bounds_reclamp_base() {
        let mut stat = int_stat(50, 0, 100);
        stat.set_max_value(30);
        assert_eq!(stat.base_value(), 30);
        assert_eq!(stat.current_value(), 30);

        stat.add_min_value(40);
        assert_eq!(stat.min_value(), 40);
        // inverted bounds resolve to the minimum
        assert_eq!(stat.base_value(), 40);

        stat.add_max_value(70);
        stat.subtract_min_value(40);
        assert_eq!((stat.min_value(), stat.max_value()), (0, 100));
        assert_eq!(stat.base_value(), 40);

        stat.subtract_max_value(90);
        assert_eq!(stat.current_value(), 10);
    }

    #[test]
    fn test_modifier_order_is_stable() {
        let mut stat = int_stat(10, 0, 1000);
        let late = stat.add_modifier(StatModifier::flat(1).with_order(5));
        let first = stat.add_modifier(StatModifier::flat(2));
        let second = stat.add_modifier(StatModifier::flat(3));

        let ids: Vec<_> = stat.modifiers().map(|(id, _)| id).collect();
        assert_eq!(ids, vec![first, second, late]);
    }

    #[test]
    fn test_identical_modifiers_are_distinct() {
        let mut stat = int_stat(10, 0, 100);
        let a = stat.add_modifier(StatModifier::flat(5));
        let b = stat.add_modifier(StatModifier::flat(5));
        assert_ne!(a, b);
        assert_eq!(stat.current_value(), 20);

        assert!(stat.remove_modifier(a));
        assert!(!stat.remove_modifier(a));
        assert_eq!(stat.current_value(), 15);
        assert!(stat.modifier(b).is_some());
        assert!(stat.modifier(a).is_none());
    }

    #[test]
    fn test_int_percent_modifiers() {
        let mut stat = int_stat(10, 0, 1000);
        stat.add_modifiers([
            StatModifier::percent_add(1),
            StatModifier::percent_add(1),
            StatModifier::percent_mult(1).with_order(1),
        ]);
        // 10 × (1 + 2) × (1 + 1)
        assert_eq!(stat.current_value(), 60);
    }

    #[test]
    fn test_add_modifiers_empty_is_noop() {
        let mut stat = int_stat(10, 0, 100);
        let ids = stat.add_modifiers(std::iter::empty());
        assert!(ids.is_empty());
        assert_eq!(stat.modifier_count(), 0);
    }

    #[test]
    fn test_queries() {
        let stat = int_stat(25, 0, 100);
        assert!(stat.is_valid());
        assert!(stat.is_in_range(20, 30));
        assert!(!stat.is_in_range(26, 30));
        assert_eq!(stat.ratio(), 0.25);
        assert_eq!(stat.difference(5), 20);
        assert!(!stat.is_empty());
        assert!(!stat.is_full());
    }

    #[test]
    fn test_snapshot_restore() {
        let mut stat = int_stat(25, 0, 100);
        stat.add_modifier(StatModifier::flat(10));
        let snapshot = stat.snapshot();

        stat.set_max_value(20);
        stat.restore(&snapshot);
        assert_eq!(stat.max_value(), 100);
        assert_eq!(stat.base_value(), 25);
        assert_eq!(stat.current_value(), 35);
    }

    #[test]
    fn test_breakdown_matches_current_value() {
        let mut stat = int_stat(10, 0, 50);
        stat.add_modifiers([
            StatModifier::flat(5),
            StatModifier::percent_add(1).with_order(1),
            StatModifier::percent_add(1).with_order(1),
            StatModifier::percent_mult(1).with_order(2),
        ]);

        let breakdown = stat.breakdown();
        assert_eq!(breakdown.base_value, 10);
        assert_eq!(breakdown.value, stat.current_value());
        let values: Vec<_> = breakdown.steps.iter().map(|(_, v)| *v).collect();
        assert_eq!(values, vec![15, 45, 90, 50]);
        assert_eq!(breakdown.steps[1].0, "[PercentAdd] x2 : 2");
        assert_eq!(breakdown.steps[3].0, "clamp [0, 50]");
    }

    #[test]
    fn test_stat_is_send() {
        fn assert_send<S: Send>() {}
        assert_send::<Stat<i32>>();
        assert_send::<Stat<f32>>();
    }
}
