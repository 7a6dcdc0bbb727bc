//! Character attribute engine.
//!
//! `stats-core` computes live stat values from a base value plus an ordered
//! list of temporary and permanent modifiers, and layers health, mana and
//! stamina pools on top of the result.
//!
//! ```text
//! [ Modifier ]  value object (flat / %add / %mult, optional lifetime)
//!      ↓
//! [ Stat ]      base + sorted modifiers → cached value
//!      ↓
//! [ StatRegistry ] StatKind → Stat, bulk ops, change notifications
//!      ↓
//! [ ResourcePool ] current resources, damage / heal, alive / dead
//! ```
//!
//! Everything runs synchronously on the caller's thread. Time only advances
//! when the host calls [`ResourcePool::tick`] (or [`StatRegistry::tick`]).
pub mod combat;
pub mod config;
pub mod error;
pub mod events;
pub mod kind;
pub mod modifier;
pub mod pool;
pub mod registry;
pub mod save;
pub mod stat;
pub mod table;

pub use combat::{DamageType, mitigate, outgoing_damage};
pub use config::StatsConfig;
pub use error::{ErrorSeverity, StatsError};
pub use events::{EventBus, ListenerId, PoolEvent, StatChanged, Topic, Topical};
pub use kind::{ResourceKind, StatBounds, StatKind};
pub use modifier::{Modifier, ModifierId, ModifierKind, SourceId};
pub use pool::{LifeState, ResourcePool};
pub use registry::StatRegistry;
pub use save::CharacterSave;
pub use stat::{Stat, StatChange};
pub use table::BaseStatTable;
