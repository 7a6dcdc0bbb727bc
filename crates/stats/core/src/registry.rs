//! Per-character lookup of stats by kind.
//!
//! Unknown kinds are handled leniently: reads return `0`, writes are no-ops.
//! Callers may race with character initialization, so this must never panic
//! or error.

use std::collections::BTreeMap;

use crate::events::{EventBus, ListenerId, StatChanged, Topic};
use crate::kind::StatKind;
use crate::modifier::{Modifier, ModifierId, SourceId};
use crate::stat::{Mutation, Stat};
use crate::table::BaseStatTable;

/// Collection of a character's stats, keyed by [`StatKind`].
///
/// Every mutation that moves a computed value is reported synchronously to
/// subscribed listeners as a [`StatChanged`].
#[derive(Debug, Default)]
pub struct StatRegistry {
    stats: BTreeMap<StatKind, Stat>,
    listeners: EventBus<StatChanged>,
}

impl StatRegistry {
    /// Creates an empty registry. Stats are added with [`Self::ensure_stat`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding one stat per entry of `table`.
    pub fn from_table(table: &BaseStatTable) -> Self {
        let mut registry = Self::new();
        for (kind, base) in table.iter() {
            registry.ensure_stat(kind, base);
        }
        registry
    }

    /// Registers a stat for `kind` if none exists yet.
    ///
    /// The first registration wins; later calls for the same kind do not
    /// touch the existing stat. Returns true if a stat was created.
    pub fn ensure_stat(&mut self, kind: StatKind, base: f32) -> bool {
        if self.stats.contains_key(&kind) {
            return false;
        }
        self.stats.insert(kind, Stat::new(kind, base));
        true
    }

    pub fn contains(&self, kind: StatKind) -> bool {
        self.stats.contains_key(&kind)
    }

    pub fn stat(&self, kind: StatKind) -> Option<&Stat> {
        self.stats.get(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, &Stat)> + '_ {
        self.stats.iter().map(|(k, s)| (*k, s))
    }

    pub fn len(&self) -> usize {
        self.stats.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stats.is_empty()
    }

    /// Computed value of `kind`, or `0` if it is not registered.
    pub fn value(&self, kind: StatKind) -> f32 {
        self.stats.get(&kind).map_or(0.0, Stat::value)
    }

    /// Base value of `kind`, or `0` if it is not registered.
    pub fn base_value(&self, kind: StatKind) -> f32 {
        self.stats.get(&kind).map_or(0.0, Stat::base_value)
    }

    /// Snapshot of every base value. This is the persisted view of the registry.
    pub fn base_values(&self) -> BaseStatTable {
        self.iter().map(|(k, s)| (k, s.base_value())).collect()
    }

    /// Returns true if the write was applied.
    pub fn set_base_value(&mut self, kind: StatKind, value: f32) -> bool {
        self.set_base_value_into(kind, value, &mut Vec::new())
    }

    /// Adds `modifier` to `kind`. Returns `None` if `kind` is not registered.
    pub fn add_modifier(&mut self, kind: StatKind, modifier: Modifier) -> Option<ModifierId> {
        self.add_modifier_into(kind, modifier, &mut Vec::new())
    }

    /// Returns true if a modifier was removed.
    pub fn remove_modifier(&mut self, kind: StatKind, id: impl Into<ModifierId>) -> bool {
        self.remove_modifier_into(kind, id.into(), &mut Vec::new())
    }

    /// Removes every modifier owned by `source` from every stat and returns
    /// how many were removed in total.
    pub fn remove_all_modifiers_from_source(&mut self, source: SourceId) -> usize {
        self.remove_all_modifiers_from_source_into(source, &mut Vec::new())
    }

    /// Drops every modifier on `kind`. Returns how many were dropped.
    pub fn clear_modifiers(&mut self, kind: StatKind) -> usize {
        let mut changes = Vec::new();
        self.mutate(kind, &mut changes, Stat::clear_all_modifiers)
            .unwrap_or(0)
    }

    /// Drops every modifier on every stat. Returns how many were dropped.
    pub fn clear_all_modifiers(&mut self) -> usize {
        let mut changes = Vec::new();
        let kinds: Vec<StatKind> = self.stats.keys().copied().collect();
        kinds
            .into_iter()
            .filter_map(|kind| self.mutate(kind, &mut changes, Stat::clear_all_modifiers))
            .sum()
    }

    /// Advances every timed modifier by `delta_time` and returns the value
    /// changes caused by expiry.
    pub fn tick(&mut self, delta_time: f32) -> Vec<StatChanged> {
        let mut changes = Vec::new();
        self.tick_into(delta_time, &mut changes);
        changes
    }

    /// Registers a listener for stat value changes.
    pub fn subscribe(&mut self, handler: impl FnMut(&StatChanged) + 'static) -> ListenerId {
        self.listeners.subscribe(Topic::STATS, handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.listeners.unsubscribe(id)
    }

    // ========================================================================
    // Change-collecting variants used by the resource pool
    // ========================================================================

    pub(crate) fn set_base_value_into(
        &mut self,
        kind: StatKind,
        value: f32,
        changes: &mut Vec<StatChanged>,
    ) -> bool {
        self.mutate(kind, changes, |stat| stat.set_base_value(value))
            .unwrap_or(false)
    }

    pub(crate) fn add_modifier_into(
        &mut self,
        kind: StatKind,
        modifier: Modifier,
        changes: &mut Vec<StatChanged>,
    ) -> Option<ModifierId> {
        self.mutate(kind, changes, |stat| stat.add_modifier(modifier))
    }

    pub(crate) fn remove_modifier_into(
        &mut self,
        kind: StatKind,
        id: ModifierId,
        changes: &mut Vec<StatChanged>,
    ) -> bool {
        self.mutate(kind, changes, |stat| stat.remove_modifier(id))
            .unwrap_or(false)
    }

    pub(crate) fn remove_all_modifiers_from_source_into(
        &mut self,
        source: SourceId,
        changes: &mut Vec<StatChanged>,
    ) -> usize {
        self.for_each_stat(changes, |stat| {
            stat.remove_all_modifiers_from_source(source)
        })
    }

    pub(crate) fn tick_into(&mut self, delta_time: f32, changes: &mut Vec<StatChanged>) {
        self.for_each_stat(changes, |stat| stat.update_timed_modifiers(delta_time));
    }

    /// Applies `f` to the stat for `kind`, records and publishes its change.
    /// Returns `None` for unregistered kinds.
    fn mutate<T>(
        &mut self,
        kind: StatKind,
        changes: &mut Vec<StatChanged>,
        f: impl FnOnce(&mut Stat) -> Mutation<T>,
    ) -> Option<T> {
        let Some(stat) = self.stats.get_mut(&kind) else {
            tracing::debug!(stat = %kind, "ignoring mutation of unregistered stat");
            return None;
        };
        let mutation = f(stat);
        if let Some(change) = mutation.change {
            self.record(
                StatChanged {
                    kind,
                    old: change.old,
                    new: change.new,
                },
                changes,
            );
        }
        Some(mutation.result)
    }

    /// Applies `f` to every stat and sums the counts.
    fn for_each_stat(
        &mut self,
        changes: &mut Vec<StatChanged>,
        mut f: impl FnMut(&mut Stat) -> Mutation<usize>,
    ) -> usize {
        let mut total = 0;
        let mut fired = Vec::new();
        for (kind, stat) in self.stats.iter_mut() {
            let mutation = f(stat);
            total += mutation.result;
            if let Some(change) = mutation.change {
                fired.push(StatChanged {
                    kind: *kind,
                    old: change.old,
                    new: change.new,
                });
            }
        }
        for event in fired {
            self.record(event, changes);
        }
        total
    }

    fn record(&mut self, event: StatChanged, changes: &mut Vec<StatChanged>) {
        self.listeners.publish(&event);
        changes.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn registry() -> StatRegistry {
        StatRegistry::from_table(&BaseStatTable::standard())
    }

    #[test]
    fn unregistered_reads_zero_and_writes_are_noops() {
        let mut registry = StatRegistry::new();
        assert_eq!(registry.value(StatKind::Attack), 0.0);
        assert!(!registry.set_base_value(StatKind::Attack, 10.0));
        assert_eq!(registry.add_modifier(StatKind::Attack, Modifier::flat(1.0)), None);
        let stray = Modifier::flat(1.0);
        assert!(!registry.remove_modifier(StatKind::Attack, &stray));
        assert_eq!(registry.clear_modifiers(StatKind::Attack), 0);
        assert!(registry.is_empty());
    }

    #[test]
    fn first_registration_wins() {
        let mut registry = StatRegistry::new();
        assert!(registry.ensure_stat(StatKind::Defense, 5.0));
        assert!(!registry.ensure_stat(StatKind::Defense, 50.0));
        assert_eq!(registry.value(StatKind::Defense), 5.0);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn source_removal_fans_out_across_stats() {
        let mut registry = registry();
        let armor = SourceId::new();
        registry.add_modifier(StatKind::Defense, Modifier::flat(10.0).with_source(armor));
        registry.add_modifier(StatKind::MaxHealth, Modifier::flat(25.0).with_source(armor));
        registry.add_modifier(StatKind::MoveSpeed, Modifier::percent_add(-0.1).with_source(armor));
        registry.add_modifier(StatKind::Attack, Modifier::flat(3.0));

        assert_eq!(registry.remove_all_modifiers_from_source(armor), 3);
        assert_eq!(registry.value(StatKind::Defense), 5.0);
        assert_eq!(registry.value(StatKind::MaxHealth), 100.0);
        assert_eq!(registry.value(StatKind::Attack), 13.0);
    }

    #[test]
    fn listeners_see_tagged_changes() {
        let mut registry = registry();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        registry.subscribe(move |e| sink.borrow_mut().push(*e));

        let id = registry
            .add_modifier(StatKind::Attack, Modifier::flat(5.0))
            .unwrap();
        registry.remove_modifier(StatKind::Attack, id);

        assert_eq!(
            *seen.borrow(),
            vec![
                StatChanged {
                    kind: StatKind::Attack,
                    old: 10.0,
                    new: 15.0
                },
                StatChanged {
                    kind: StatKind::Attack,
                    old: 15.0,
                    new: 10.0
                },
            ]
        );
    }

    #[test]
    fn tick_expires_across_stats() {
        let mut registry = registry();
        registry.add_modifier(StatKind::Attack, Modifier::flat(5.0).with_duration(1.0));
        registry.add_modifier(StatKind::Defense, Modifier::flat(5.0).with_duration(3.0));

        let changes = registry.tick(1.5);
        assert_eq!(changes.len(), 1);
        assert_eq!(changes[0].kind, StatKind::Attack);
        assert_eq!(registry.value(StatKind::Defense), 10.0);

        let changes = registry.tick(1.5);
        assert_eq!(changes.len(), 1);
        assert_eq!(registry.value(StatKind::Defense), 5.0);
    }

    #[test]
    fn base_values_ignore_modifiers() {
        let mut registry = registry();
        registry.add_modifier(StatKind::Attack, Modifier::percent_mult(1.0));
        registry.set_base_value(StatKind::Defense, 8.0);

        let table = registry.base_values();
        assert_eq!(table.get(StatKind::Attack), Some(10.0));
        assert_eq!(table.get(StatKind::Defense), Some(8.0));
        assert_eq!(table.len(), StatKind::ALL.len());
    }

    #[test]
    fn clear_all_counts_every_stat() {
        let mut registry = registry();
        registry.add_modifier(StatKind::Attack, Modifier::flat(1.0));
        registry.add_modifier(StatKind::Defense, Modifier::flat(1.0));
        registry.add_modifier(StatKind::Defense, Modifier::flat(1.0));
        assert_eq!(registry.clear_all_modifiers(), 3);
        assert_eq!(registry.value(StatKind::Defense), 5.0);
    }
}
