//! Damage types and formulas.

use crate::kind::StatKind;
use crate::registry::StatRegistry;

/// Damage type, selecting which defense stat mitigates a hit.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum DamageType {
    /// Mitigated by [`StatKind::Defense`].
    Physical,
    /// Mitigated by [`StatKind::MagicDefense`].
    Magical,
    /// Ignores defense.
    True,
    /// Fixed amount, ignores defense.
    Pure,
}

impl DamageType {
    /// The stat that mitigates this damage type, if any.
    pub const fn defense_stat(&self) -> Option<StatKind> {
        match self {
            DamageType::Physical => Some(StatKind::Defense),
            DamageType::Magical => Some(StatKind::MagicDefense),
            DamageType::True | DamageType::Pure => None,
        }
    }

    /// The stat that scales outgoing damage of this type, if any.
    pub const fn attack_stat(&self) -> Option<StatKind> {
        match self {
            DamageType::Physical => Some(StatKind::Attack),
            DamageType::Magical => Some(StatKind::MagicAttack),
            DamageType::True | DamageType::Pure => None,
        }
    }
}

/// Reduces `raw` by `defense`.
///
/// # Formula
///
/// ```text
/// final = raw × K / (K + max(defense, 0))
/// ```
///
/// With `K = 100`, 100 defense halves incoming damage and the reduction
/// approaches but never reaches 100%.
///
/// ```
/// # use stats_core::mitigate;
/// assert_eq!(mitigate(100.0, 0.0, 100.0), 100.0);
/// assert_eq!(mitigate(100.0, 100.0, 100.0), 50.0);
/// ```
pub fn mitigate(raw: f32, defense: f32, constant: f32) -> f32 {
    raw * constant / (constant + defense.max(0.0))
}

/// Damage an attacker deals before the target's mitigation.
///
/// # Formula
///
/// ```text
/// scaled = base + attack_stat          (Physical / Magical)
/// scaled = base                        (True / Pure)
///
/// if critical:
///     scaled *= 1 + CritDamage
/// ```
///
/// Pure damage is a fixed amount and never crits.
pub fn outgoing_damage(
    attacker: &StatRegistry,
    base: f32,
    damage_type: DamageType,
    critical: bool,
) -> f32 {
    let mut damage = match damage_type.attack_stat() {
        Some(stat) => base + attacker.value(stat),
        None => base,
    };

    if critical && damage_type != DamageType::Pure {
        damage *= 1.0 + attacker.value(StatKind::CritDamage);
    }

    damage.max(0.0)
}
