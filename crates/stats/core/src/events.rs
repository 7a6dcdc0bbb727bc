//! Synchronous, topic-filtered notifications.
//!
//! Listeners are plain closures invoked on the caller's thread, in
//! subscription order, before the mutating call returns.

use bitflags::bitflags;

use crate::combat::DamageType;
use crate::kind::StatKind;
use crate::modifier::SourceId;

bitflags! {
    /// Topics for event routing.
    ///
    /// A listener subscribes with a mask and only sees events whose topic
    /// intersects it.
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct Topic: u8 {
        const HEALTH    = 1 << 0;
        const MANA      = 1 << 1;
        const STAMINA   = 1 << 2;
        const COMBAT    = 1 << 3;
        const LIFECYCLE = 1 << 4;
        const STATS     = 1 << 5;
        const ALL = Self::HEALTH.bits()
            | Self::MANA.bits()
            | Self::STAMINA.bits()
            | Self::COMBAT.bits()
            | Self::LIFECYCLE.bits()
            | Self::STATS.bits();
    }
}

/// Events that know which [`Topic`] they belong to.
pub trait Topical {
    fn topic(&self) -> Topic;
}

/// A stat's computed value moved.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatChanged {
    pub kind: StatKind,
    pub old: f32,
    pub new: f32,
}

impl Topical for StatChanged {
    fn topic(&self) -> Topic {
        Topic::STATS
    }
}

/// Notifications raised by a [`crate::ResourcePool`].
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PoolEvent {
    HealthChanged { current: f32, max: f32 },
    ManaChanged { current: f32, max: f32 },
    StaminaChanged { current: f32, max: f32 },

    /// Damage after mitigation. May exceed the health that was left.
    Damaged {
        amount: f32,
        source: Option<SourceId>,
        damage_type: DamageType,
    },

    /// Health actually restored, after clamping to max.
    Healed {
        amount: f32,
        source: Option<SourceId>,
    },

    Died,
    Revived { health: f32 },

    /// Forwarded from the owned registry.
    StatChanged(StatChanged),
}

impl Topical for PoolEvent {
    fn topic(&self) -> Topic {
        match self {
            PoolEvent::HealthChanged { .. } => Topic::HEALTH,
            PoolEvent::ManaChanged { .. } => Topic::MANA,
            PoolEvent::StaminaChanged { .. } => Topic::STAMINA,
            PoolEvent::Damaged { .. } | PoolEvent::Healed { .. } => Topic::COMBAT,
            PoolEvent::Died | PoolEvent::Revived { .. } => Topic::LIFECYCLE,
            PoolEvent::StatChanged(_) => Topic::STATS,
        }
    }
}

/// Handle returned by [`EventBus::subscribe`], used to unsubscribe.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

struct Listener<E> {
    id: ListenerId,
    topics: Topic,
    handler: Box<dyn FnMut(&E)>,
}

/// Topic-based listener list.
pub struct EventBus<E> {
    listeners: Vec<Listener<E>>,
    next_id: u64,
}

impl<E: Topical> EventBus<E> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Registers `handler` for every event whose topic intersects `topics`.
    pub fn subscribe(&mut self, topics: Topic, handler: impl FnMut(&E) + 'static) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.listeners.push(Listener {
            id,
            topics,
            handler: Box::new(handler),
        });
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|l| l.id != id);
        self.listeners.len() != before
    }

    /// Delivers `event` to every matching listener.
    pub fn publish(&mut self, event: &E) {
        let topic = event.topic();
        for listener in &mut self.listeners {
            if listener.topics.intersects(topic) {
                (listener.handler)(event);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl<E: Topical> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> core::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
