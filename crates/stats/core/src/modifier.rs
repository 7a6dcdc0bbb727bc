//! Modifier value object.
//!
//! A modifier is one additive or multiplicative adjustment to a single stat:
//! an equipment bonus, a buff, a debuff. Modifiers are runtime-only state and
//! are never persisted.

use core::sync::atomic::{AtomicU64, Ordering};

static NEXT_MODIFIER_ID: AtomicU64 = AtomicU64::new(1);
static NEXT_SOURCE_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique identifier of a modifier, used for direct removal.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ModifierId(u64);

impl ModifierId {
    fn next() -> Self {
        Self(NEXT_MODIFIER_ID.fetch_add(1, Ordering::Relaxed))
    }

    pub const fn get(&self) -> u64 {
        self.0
    }
}

impl From<&Modifier> for ModifierId {
    fn from(modifier: &Modifier) -> Self {
        modifier.id()
    }
}

/// Opaque owner token attached to modifiers for bulk removal.
///
/// The engine only compares tokens; what a token stands for (an item, a buff
/// instance, a caster) belongs to the subsystem that minted it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceId(u64);

impl SourceId {
    /// Allocates a fresh process-unique token.
    #[allow(clippy::new_without_default)]
    pub fn new() -> Self {
        Self(NEXT_SOURCE_ID.fetch_add(1, Ordering::Relaxed) | (1 << 63))
    }

    /// Wraps a caller-owned handle (an item slot, an entity id, ...).
    ///
    /// Raw tokens never collide with tokens from [`SourceId::new`] as long as
    /// the top bit is clear.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(&self) -> u64 {
        self.0
    }
}

/// How a modifier combines with the stat value.
///
/// Ordering matters: a stat evaluates every `Flat` modifier, then every
/// `PercentAdditive`, then every `PercentMultiplicative`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum ModifierKind {
    /// Absolute amount added to the running value.
    Flat,
    /// Fraction summed with the other additive percents, then applied once.
    PercentAdditive,
    /// Fraction applied on its own to the running value (`× (1 + value)`).
    PercentMultiplicative,
}

/// A single adjustment to a stat.
///
/// # Example
/// ```
/// # use stats_core::{Modifier, ModifierKind, SourceId};
/// let sword = SourceId::new();
/// let m = Modifier::percent_mult(0.1)
///     .with_order(5)
///     .with_source(sword)
///     .with_duration(3.0);
/// assert_eq!(m.kind(), ModifierKind::PercentMultiplicative);
/// assert!(!m.is_permanent());
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Modifier {
    id: ModifierId,
    kind: ModifierKind,
    value: f32,
    order: i32,
    source: Option<SourceId>,
    duration: Option<f32>,
    remaining: f32,
}

impl Modifier {
    /// Creates a permanent modifier with order 0 and no source.
    pub fn new(kind: ModifierKind, value: f32) -> Self {
        Self {
            id: ModifierId::next(),
            kind,
            value,
            order: 0,
            source: None,
            duration: None,
            remaining: 0.0,
        }
    }

    /// Create a flat modifier (`+value`)
    pub fn flat(value: f32) -> Self {
        Self::new(ModifierKind::Flat, value)
    }

    /// Create an additive percent modifier (0.2 = +20%, summed with its peers)
    pub fn percent_add(value: f32) -> Self {
        Self::new(ModifierKind::PercentAdditive, value)
    }

    /// Create a multiplicative percent modifier (0.1 = ×1.1)
    pub fn percent_mult(value: f32) -> Self {
        Self::new(ModifierKind::PercentMultiplicative, value)
    }

    /// Tie-break within the same kind; lower runs first.
    pub fn with_order(mut self, order: i32) -> Self {
        self.order = order;
        self
    }

    pub fn with_source(mut self, source: SourceId) -> Self {
        self.source = Some(source);
        self
    }

    /// Gives the modifier a lifetime in seconds. A negative duration keeps it
    /// permanent.
    pub fn with_duration(mut self, duration: f32) -> Self {
        if duration >= 0.0 {
            self.duration = Some(duration);
            self.remaining = duration;
        } else {
            self.duration = None;
            self.remaining = 0.0;
        }
        self
    }

    pub fn id(&self) -> ModifierId {
        self.id
    }

    pub fn kind(&self) -> ModifierKind {
        self.kind
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn order(&self) -> i32 {
        self.order
    }

    pub fn source(&self) -> Option<SourceId> {
        self.source
    }

    /// Total lifetime in seconds, `None` when permanent.
    pub fn duration(&self) -> Option<f32> {
        self.duration
    }

    /// Seconds left before expiry. Meaningless for permanent modifiers.
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    pub fn is_permanent(&self) -> bool {
        self.duration.is_none()
    }

    pub fn is_expired(&self) -> bool {
        self.duration.is_some() && self.remaining <= 0.0
    }

    /// Sort key inside a stat's modifier list.
    pub(crate) fn sort_key(&self) -> (ModifierKind, i32) {
        (self.kind, self.order)
    }

    /// Counts the lifetime down by `delta_time` and reports whether the
    /// modifier is now expired. Permanent modifiers are untouched.
    ///
    /// Removal and cache invalidation are the owning stat's job.
    pub fn update_time(&mut self, delta_time: f32) -> bool {
        if self.is_permanent() {
            return false;
        }
        self.remaining -= delta_time;
        self.is_expired()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_unique() {
        let a = Modifier::flat(1.0);
        let b = Modifier::flat(1.0);
        assert_ne!(a.id(), b.id());
        assert_ne!(SourceId::new(), SourceId::new());
    }

    #[test]
    fn modifier_ref_converts_to_its_id() {
        let m = Modifier::percent_add(0.1);
        assert_eq!(ModifierId::from(&m), m.id());
    }

    #[test]
    fn permanent_never_expires() {
        let mut m = Modifier::flat(5.0);
        assert!(m.is_permanent());
        assert!(!m.update_time(1_000.0));
        assert!(!m.is_expired());
    }

    #[test]
    fn negative_duration_is_permanent() {
        let m = Modifier::flat(5.0).with_duration(-1.0);
        assert!(m.is_permanent());
        assert_eq!(m.duration(), None);
    }

    #[test]
    fn timed_counts_down_to_expiry() {
        let mut m = Modifier::percent_add(0.2).with_duration(2.0);
        assert!(!m.update_time(1.0));
        assert_eq!(m.remaining(), 1.0);
        assert!(m.update_time(1.0));
        assert!(m.is_expired());
    }

    #[test]
    fn zero_duration_is_expired_immediately() {
        let m = Modifier::flat(1.0).with_duration(0.0);
        assert!(m.is_expired());
    }

    #[test]
    fn kinds_sort_flat_first() {
        assert!(ModifierKind::Flat < ModifierKind::PercentAdditive);
        assert!(ModifierKind::PercentAdditive < ModifierKind::PercentMultiplicative);
    }
}
