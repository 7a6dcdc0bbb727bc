//! Stat and resource identifiers.

/// Identifier naming one attribute of a character.
///
/// The engine treats every kind the same except the three capacity stats
/// ([`StatKind::MaxHealth`], [`StatKind::MaxMana`], [`StatKind::MaxStamina`]),
/// which the resource pool watches to re-clamp current values.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum StatKind {
    // ========================================================================
    // Capacities
    // ========================================================================
    MaxHealth,
    MaxMana,
    MaxStamina,

    // ========================================================================
    // Offense / Defense
    // ========================================================================
    Attack,
    MagicAttack,
    Defense,
    MagicDefense,

    // ========================================================================
    // Tempo
    // ========================================================================
    MoveSpeed,
    AttackSpeed,

    // ========================================================================
    // Critical strikes
    // ========================================================================
    /// Chance as a fraction (0.05 = 5%).
    CritRate,
    /// Bonus damage on a critical hit as a fraction (0.5 = +50%).
    CritDamage,

    // ========================================================================
    // Regeneration (per second)
    // ========================================================================
    HealthRegen,
    ManaRegen,
    StaminaRegen,
}

impl StatKind {
    /// Every stat kind, in declaration order.
    pub const ALL: [StatKind; 14] = [
        StatKind::MaxHealth,
        StatKind::MaxMana,
        StatKind::MaxStamina,
        StatKind::Attack,
        StatKind::MagicAttack,
        StatKind::Defense,
        StatKind::MagicDefense,
        StatKind::MoveSpeed,
        StatKind::AttackSpeed,
        StatKind::CritRate,
        StatKind::CritDamage,
        StatKind::HealthRegen,
        StatKind::ManaRegen,
        StatKind::StaminaRegen,
    ];

    /// Returns true for the capacity stats the resource pool clamps against.
    pub const fn is_capacity(&self) -> bool {
        matches!(
            self,
            StatKind::MaxHealth | StatKind::MaxMana | StatKind::MaxStamina
        )
    }
}

/// The three depletable resources of a character.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ResourceKind {
    Health,
    Mana,
    Stamina,
}

impl ResourceKind {
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::Health,
        ResourceKind::Mana,
        ResourceKind::Stamina,
    ];

    /// The stat holding this resource's maximum.
    pub const fn max_stat(&self) -> StatKind {
        match self {
            ResourceKind::Health => StatKind::MaxHealth,
            ResourceKind::Mana => StatKind::MaxMana,
            ResourceKind::Stamina => StatKind::MaxStamina,
        }
    }

    /// The stat holding this resource's regeneration per second.
    pub const fn regen_stat(&self) -> StatKind {
        match self {
            ResourceKind::Health => StatKind::HealthRegen,
            ResourceKind::Mana => StatKind::ManaRegen,
            ResourceKind::Stamina => StatKind::StaminaRegen,
        }
    }

    /// Inverse of [`Self::max_stat`].
    pub const fn from_capacity(stat: StatKind) -> Option<Self> {
        match stat {
            StatKind::MaxHealth => Some(ResourceKind::Health),
            StatKind::MaxMana => Some(ResourceKind::Mana),
            StatKind::MaxStamina => Some(ResourceKind::Stamina),
            _ => None,
        }
    }
}

/// Clamp applied to a stat's computed value after all modifiers ran.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StatBounds {
    pub min: f32,
    pub max: f32,
}

impl StatBounds {
    /// `[0, +inf)`. Used for every stat a registry creates, so a debuff can
    /// never push defense (or a capacity) below zero.
    pub const NON_NEGATIVE: Self = Self {
        min: 0.0,
        max: f32::INFINITY,
    };

    /// No bounds (unclamped)
    ///
    /// Use sparingly - only when negative values are meaningful.
    pub const UNCLAMPED: Self = Self {
        min: f32::NEG_INFINITY,
        max: f32::INFINITY,
    };

    pub fn apply(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }
}

impl Default for StatBounds {
    fn default() -> Self {
        Self::NON_NEGATIVE
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn names_round_trip_through_strum() {
        for kind in StatKind::ALL {
            let name = kind.to_string();
            assert_eq!(StatKind::from_str(&name).unwrap(), kind);
        }
        assert_eq!(StatKind::from_str("MAX_HEALTH").unwrap(), StatKind::MaxHealth);
        assert_eq!(StatKind::MagicDefense.as_ref(), "magic_defense");
        assert!(StatKind::from_str("luck").is_err());
    }

    #[test]
    fn capacity_mapping_is_symmetric() {
        for resource in ResourceKind::ALL {
            let stat = resource.max_stat();
            assert!(stat.is_capacity());
            assert_eq!(ResourceKind::from_capacity(stat), Some(resource));
        }
        assert_eq!(ResourceKind::from_capacity(StatKind::Attack), None);
        assert!(!StatKind::HealthRegen.is_capacity());
    }

    #[test]
    fn bounds_clamp() {
        assert_eq!(StatBounds::NON_NEGATIVE.apply(-3.0), 0.0);
        assert_eq!(StatBounds::NON_NEGATIVE.apply(7.5), 7.5);
        assert_eq!(StatBounds::UNCLAMPED.apply(-3.0), -3.0);
    }
}
