//! A single attribute: base value, sorted modifiers, cached result.
//!
//! # Evaluation order
//!
//! Modifiers are kept sorted by `(kind, order)` with insertion order preserved
//! on ties, so every `Flat` precedes every `PercentAdditive`, which precedes
//! every `PercentMultiplicative`. Evaluation then walks the list once:
//!
//! ```text
//! result  = base
//! pending = 0
//! Flat         → result += v
//! PercentAdd   → pending += v
//! PercentMult  → if pending != 0 { result *= 1 + pending; pending = 0 }
//!                result *= 1 + v
//! end          → if pending != 0 { result *= 1 + pending }
//! ```
//!
//! Additive percents are summed and applied once, right before the first
//! multiplicative modifier (or at the end if there is none). Multiplicative
//! modifiers compound one by one.

use core::cell::Cell;

use crate::config::StatsConfig;
use crate::kind::{StatBounds, StatKind};
use crate::modifier::{Modifier, ModifierId, ModifierKind, SourceId};

/// Old and new cached value of a stat whose value moved by more than
/// [`StatsConfig::VALUE_EPSILON`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatChange {
    pub old: f32,
    pub new: f32,
}

/// Result of a stat mutation together with the change it caused, if any.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Mutation<T> {
    pub result: T,
    pub change: Option<StatChange>,
}

impl<T> Mutation<T> {
    fn unchanged(result: T) -> Self {
        Self {
            result,
            change: None,
        }
    }
}

/// One named attribute of a character.
///
/// Reads go through [`Stat::value`], which recomputes only when a mutation
/// marked the cache dirty. Mutators recompute eagerly so the returned
/// [`StatChange`] carries accurate old/new values.
#[derive(Clone, Debug)]
pub struct Stat {
    kind: StatKind,
    base: f32,
    bounds: StatBounds,
    modifiers: Vec<Modifier>,
    cached: Cell<f32>,
    dirty: Cell<bool>,
}

impl Stat {
    /// Creates a stat floored at zero.
    pub fn new(kind: StatKind, base: f32) -> Self {
        Self::with_bounds(kind, base, StatBounds::NON_NEGATIVE)
    }

    pub fn with_bounds(kind: StatKind, base: f32, bounds: StatBounds) -> Self {
        Self {
            kind,
            base,
            bounds,
            modifiers: Vec::new(),
            cached: Cell::new(0.0),
            dirty: Cell::new(true),
        }
    }

    pub fn kind(&self) -> StatKind {
        self.kind
    }

    pub fn base_value(&self) -> f32 {
        self.base
    }

    pub fn bounds(&self) -> StatBounds {
        self.bounds
    }

    /// Active modifiers in evaluation order.
    pub fn modifiers(&self) -> &[Modifier] {
        &self.modifiers
    }

    pub fn modifier_count(&self) -> usize {
        self.modifiers.len()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty.get()
    }

    /// Current value, recomputed first if anything changed since the last read.
    pub fn value(&self) -> f32 {
        if self.dirty.get() {
            let value = self.bounds.apply(Self::evaluate(self.base, &self.modifiers));
            self.cached.set(value);
            self.dirty.set(false);
        }
        self.cached.get()
    }

    /// Runs the modifier pipeline over `modifiers`, which must already be in
    /// `(kind, order)` order. Bounds are not applied.
    pub fn evaluate(base: f32, modifiers: &[Modifier]) -> f32 {
        let mut result = base;
        let mut pending_percent_add = 0.0_f32;

        for modifier in modifiers {
            match modifier.kind() {
                ModifierKind::Flat => result += modifier.value(),
                ModifierKind::PercentAdditive => pending_percent_add += modifier.value(),
                ModifierKind::PercentMultiplicative => {
                    if pending_percent_add != 0.0 {
                        result *= 1.0 + pending_percent_add;
                        pending_percent_add = 0.0;
                    }
                    result *= 1.0 + modifier.value();
                }
            }
        }

        if pending_percent_add != 0.0 {
            result *= 1.0 + pending_percent_add;
        }

        result
    }

    /// Updates the base value. Writes within epsilon of the current base are
    /// ignored; `result` reports whether the write was applied.
    pub fn set_base_value(&mut self, value: f32) -> Mutation<bool> {
        if !StatsConfig::differs(self.base, value) {
            return Mutation::unchanged(false);
        }
        let old = self.value();
        self.base = value;
        Mutation {
            result: true,
            change: self.refresh(old),
        }
    }

    /// Inserts `modifier` after every modifier with a key `<=` its own, which
    /// keeps the list sorted and stable on ties.
    pub fn add_modifier(&mut self, modifier: Modifier) -> Mutation<ModifierId> {
        let old = self.value();
        let id = modifier.id();
        let key = modifier.sort_key();
        let index = self.modifiers.partition_point(|m| m.sort_key() <= key);
        self.modifiers.insert(index, modifier);
        Mutation {
            result: id,
            change: self.refresh(old),
        }
    }

    /// Removes the modifier with `id`; `result` is false if it was not present.
    pub fn remove_modifier(&mut self, id: impl Into<ModifierId>) -> Mutation<bool> {
        let id = id.into();
        let Some(index) = self.modifiers.iter().position(|m| m.id() == id) else {
            return Mutation::unchanged(false);
        };
        let old = self.value();
        self.modifiers.remove(index);
        Mutation {
            result: true,
            change: self.refresh(old),
        }
    }

    /// Removes every modifier owned by `source` and recomputes once.
    pub fn remove_all_modifiers_from_source(&mut self, source: SourceId) -> Mutation<usize> {
        self.remove_where(|m| m.source() == Some(source))
    }

    /// Drops all modifiers; the value returns to the (bounded) base value.
    pub fn clear_all_modifiers(&mut self) -> Mutation<usize> {
        self.remove_where(|_| true)
    }

    /// Advances every timed modifier by `delta_time` and prunes the expired
    /// ones. `result` is the number pruned.
    pub fn update_timed_modifiers(&mut self, delta_time: f32) -> Mutation<usize> {
        let mut expired = 0;
        for modifier in &mut self.modifiers {
            if modifier.update_time(delta_time) {
                expired += 1;
            }
        }
        if expired == 0 {
            return Mutation::unchanged(0);
        }
        tracing::debug!(stat = %self.kind, expired, "pruning expired modifiers");
        self.remove_where(Modifier::is_expired)
    }

    fn remove_where(&mut self, predicate: impl Fn(&Modifier) -> bool) -> Mutation<usize> {
        let old = self.value();
        let before = self.modifiers.len();
        self.modifiers.retain(|m| !predicate(m));
        let removed = before - self.modifiers.len();
        if removed == 0 {
            return Mutation::unchanged(0);
        }
        Mutation {
            result: removed,
            change: self.refresh(old),
        }
    }

    /// Marks the cache dirty, recomputes, and reports the change if the value
    /// moved by more than epsilon.
    fn refresh(&mut self, old: f32) -> Option<StatChange> {
        self.dirty.set(true);
        let new = self.value();
        if !StatsConfig::differs(old, new) {
            return None;
        }
        tracing::trace!(stat = %self.kind, old, new, "stat value changed");
        Some(StatChange { old, new })
    }
}
