//! Stat sheets.
//!
//! A [`StatSheet`] is the set of stats one entity owns, keyed by
//! [`StatId`]. It is built from descriptors and offers the operations that
//! span stats: stripping a source's modifiers everywhere (unequipping an
//! item), resetting, and saving/loading the persistent part.

use crate::descriptor::StatDescriptor;
use crate::error::StatError;
use crate::registry::OperatorRegistry;
use crate::snapshot::StatSnapshot;
use crate::source::SourceId;
use crate::stat::Stat;
use crate::stat_id::StatId;
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use tracing::debug;

/// Stats of one entity, keyed by name.
///
/// # Examples
///
/// ```rust
/// use modstat::*;
///
/// let registry = OperatorRegistry::with_defaults();
/// let mut sheet = StatSheet::from_descriptors(
///     &[
///         StatDescriptor::with_default_operator("HP", 100, 0, 200),
///         StatDescriptor::with_default_operator("AP", 10, 0, 50),
///     ],
///     &registry,
/// )
/// .unwrap();
///
/// let sword = SourceId::new(1);
/// let ap = StatId::from_str("AP");
/// sheet
///     .get_mut(&ap)
///     .unwrap()
///     .add_modifier(StatModifier::flat(5).with_source(sword));
/// assert_eq!(sheet.current_value(&ap), Some(15));
///
/// assert_eq!(sheet.remove_modifiers_by_source(sword), 1);
/// assert_eq!(sheet.current_value(&ap), Some(10));
/// ```
pub struct StatSheet<T: Copy> {
    stats: HashMap<StatId, Stat<T>>,
}

impl<T: Copy + fmt::Debug> StatSheet<T> {
    /// Create an empty sheet.
    pub fn new() -> Self {
        Self {
            stats: HashMap::new(),
        }
    }

    /// Add or replace a stat. Returns the replaced stat, if any.
    pub fn insert(&mut self, id: impl Into<StatId>, stat: Stat<T>) -> Option<Stat<T>> {
        self.stats.insert(id.into(), stat)
    }

    /// Remove a stat, returning it with its modifiers and listeners.
    pub fn remove(&mut self, id: &StatId) -> Option<Stat<T>> {
        self.stats.remove(id)
    }

    /// Borrow a stat by id.
    pub fn get(&self, id: &StatId) -> Option<&Stat<T>> {
        self.stats.get(id)
    }

    /// Borrow a stat mutably, e.g. to attach modifiers.
    pub fn get_mut(&mut self, id: &StatId) -> Option<&mut Stat<T>> {
        self.stats.get_mut(id)
    }

    /// Current value of a stat, or `None` if the sheet has no such stat.
    pub fn current_value(&self, id: &StatId) -> Option<T> {
        self.stats.get(id).map(Stat::current_value)
    }

    /// `true` if the sheet holds a stat named `id`.
    pub fn contains(&self, id: &StatId) -> bool {
        self.stats.contains_key(id)
    }

    /// Number of stats.
    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Stat ids in sorted order.
    pub fn ids(&self) -> Vec<StatId> {
        let mut ids: Vec<_> = self.stats.keys().cloned().collect();
        ids.sort();
        ids
    }

    /// Iterate over all stats in arbitrary order. Use [`ids`](Self::ids) for a
    /// stable order.
    pub fn iter(&self) -> impl Iterator<Item = (&StatId, &Stat<T>)> {
        self.stats.iter()
    }

    /// Remove every modifier from `source` on every stat.
    ///
    /// Returns the number of stats that lost at least one modifier.
    pub fn remove_modifiers_by_source(&mut self, source: SourceId) -> usize {
        let affected = self
            .stats
            .values_mut()
            .map(|stat| stat.remove_modifiers_by_source(source))
            .filter(|removed| *removed)
            .count();
        debug!(
            target: "modstat::sheet",
            source = %source,
            affected,
            "Removed source from sheet"
        );
        affected
    }

    /// [`reset`](Stat::reset) every stat.
    pub fn reset_all(&mut self) {
        for stat in self.stats.values_mut() {
            stat.reset();
        }
    }

    /// Persistent state of every stat, ordered by id.
    pub fn snapshot(&self) -> BTreeMap<StatId, StatSnapshot<T>> {
        self.stats
            .iter()
            .map(|(id, stat)| (id.clone(), stat.snapshot()))
            .collect()
    }

    /// Restore saved state. Stats absent from `snapshots` are untouched.
    ///
    /// # Errors
    ///
    /// Returns [`StatError::UnknownStat`] if `snapshots` names a stat this
    /// sheet does not have; nothing is restored in that case.
    pub fn restore(&mut self, snapshots: &BTreeMap<StatId, StatSnapshot<T>>) -> Result<(), StatError> {
        if let Some(unknown) = snapshots.keys().find(|id| !self.stats.contains_key(*id)) {
            return Err(StatError::UnknownStat(unknown.clone()));
        }
        for (id, snapshot) in snapshots {
            if let Some(stat) = self.stats.get_mut(id) {
                stat.restore(snapshot);
            }
        }
        Ok(())
    }
}

impl<T> StatSheet<T>
where
    T: Copy + PartialOrd + fmt::Debug + fmt::Display + 'static,
{
    /// Build a sheet from descriptors.
    ///
    /// # Errors
    ///
    /// - [`StatError::DuplicateStat`] if two descriptors share a stat id
    /// - any error from [`StatDescriptor::build`]
    pub fn from_descriptors(
        descriptors: &[StatDescriptor<T>],
        registry: &OperatorRegistry,
    ) -> Result<Self, StatError> {
        let mut sheet = Self::new();
        for descriptor in descriptors {
            if sheet.contains(&descriptor.stat) {
                return Err(StatError::DuplicateStat(descriptor.stat.clone()));
            }
            let stat = descriptor.build(registry)?;
            sheet.stats.insert(descriptor.stat.clone(), stat);
        }
        debug!(
            target: "modstat::sheet",
            stats = sheet.len(),
            "Built stat sheet"
        );
        Ok(sheet)
    }
}

impl<T: Copy + fmt::Debug> Default for StatSheet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + fmt::Debug> fmt::Debug for StatSheet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut stats: Vec<_> = self.stats.iter().collect();
        stats.sort_by(|a, b| a.0.cmp(b.0));
        f.debug_struct("StatSheet").field("stats", &stats).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modifier::StatModifier;

    fn sheet() -> StatSheet<i32> {
        StatSheet::from_descriptors(
            &[
                StatDescriptor::with_default_operator("HP", 50, 0, 100),
                StatDescriptor::with_default_operator("AP", 5, 0, 20),
            ],
            &OperatorRegistry::with_defaults(),
        )
        .unwrap()
    }

    #[test]
    fn test_duplicate_descriptor_rejected() {
        let err = StatSheet::from_descriptors(
            &[
                StatDescriptor::with_default_operator("HP", 50, 0, 100),
                StatDescriptor::with_default_operator("HP", 10, 0, 100),
            ],
            &OperatorRegistry::with_defaults(),
        )
        .unwrap_err();
        assert_eq!(err, StatError::DuplicateStat(StatId::from_str("HP")));
    }

    #[test]
    fn test_ids_sorted() {
        let sheet = sheet();
        assert_eq!(
            sheet.ids(),
            vec![StatId::from_str("AP"), StatId::from_str("HP")]
        );
        assert_eq!(sheet.len(), 2);
    }

    #[test]
    fn test_insert_replaces() {
        let mut sheet = sheet();
        let replaced = sheet.insert("HP", Stat::with_default_operator(1, 0, 10));
        assert_eq!(replaced.map(|s| s.current_value()), Some(50));
        assert_eq!(sheet.current_value(&StatId::from_str("HP")), Some(1));
    }

    #[test]
    fn test_reset_all() {
        let mut sheet = sheet();
        let hp = StatId::from_str("HP");
        let stat = sheet.get_mut(&hp).unwrap();
        stat.add_base_value(25);
        stat.add_modifier(StatModifier::flat(3));

        sheet.reset_all();
        assert_eq!(sheet.current_value(&hp), Some(50));
        assert_eq!(sheet.get(&hp).unwrap().modifier_count(), 0);
    }

    #[test]
    fn test_restore_unknown_stat_is_atomic() {
        let mut sheet = sheet();
        let mut snapshots = sheet.snapshot();
        snapshots.get_mut(&StatId::from_str("HP")).unwrap().base_value = 99;
        snapshots.insert(
            StatId::from_str("MP"),
            StatSnapshot {
                base_value: 1,
                min_value: 0,
                max_value: 1,
            },
        );

        let err = sheet.restore(&snapshots).unwrap_err();
        assert_eq!(err, StatError::UnknownStat(StatId::from_str("MP")));
        assert_eq!(sheet.current_value(&StatId::from_str("HP")), Some(50));
    }
}
