//! Persisted character state.
//!
//! Only base values and current resources are saved. Modifiers are runtime
//! state owned by the systems that applied them (equipment, buffs, skills);
//! those systems re-apply them after a load.

use crate::config::StatsConfig;
use crate::error::StatsError;
use crate::kind::ResourceKind;
use crate::pool::ResourcePool;
use crate::registry::StatRegistry;
use crate::table::BaseStatTable;

/// Save-game view of a character.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CharacterSave {
    pub base_values: BaseStatTable,
    pub health: f32,
    pub mana: f32,
    pub stamina: f32,
}

impl CharacterSave {
    /// Rejects NaN or infinite values anywhere in the save.
    pub fn validate(&self) -> Result<(), StatsError> {
        self.base_values.validate()?;
        for (resource, value) in [
            (ResourceKind::Health, self.health),
            (ResourceKind::Mana, self.mana),
            (ResourceKind::Stamina, self.stamina),
        ] {
            if !value.is_finite() {
                return Err(StatsError::NonFiniteResource { resource, value });
            }
        }
        Ok(())
    }
}

impl ResourcePool {
    /// Captures base values and current resources. Modifiers are left out.
    pub fn to_save(&self) -> CharacterSave {
        CharacterSave {
            base_values: self.stats().base_values(),
            health: self.health(),
            mana: self.mana(),
            stamina: self.stamina(),
        }
    }

    /// Rebuilds a character from `save` with no modifiers.
    ///
    /// Current values are clamped into `[0, max]` of the rebuilt registry;
    /// a save with zero health restores a dead character.
    pub fn from_save(save: &CharacterSave) -> Result<Self, StatsError> {
        Self::from_save_with_config(save, StatsConfig::default())
    }

    pub fn from_save_with_config(
        save: &CharacterSave,
        config: StatsConfig,
    ) -> Result<Self, StatsError> {
        save.validate()?;
        let stats = StatRegistry::from_table(&save.base_values);
        Ok(Self::with_current(
            stats,
            config,
            save.health,
            save.mana,
            save.stamina,
        ))
    }
}
