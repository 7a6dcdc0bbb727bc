//! Base-value tables.
//!
//! A [`BaseStatTable`] is the character sheet a registry is built from, and
//! the only stat data that survives a save/load cycle.

use std::collections::BTreeMap;
use std::str::FromStr;

use crate::error::StatsError;
use crate::kind::StatKind;

/// Ordered `StatKind → base value` table.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct BaseStatTable {
    values: BTreeMap<StatKind, f32>,
}

impl BaseStatTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Default character sheet: every [`StatKind`] present.
    pub fn standard() -> Self {
        Self::new()
            .with(StatKind::MaxHealth, 100.0)
            .with(StatKind::MaxMana, 50.0)
            .with(StatKind::MaxStamina, 100.0)
            .with(StatKind::Attack, 10.0)
            .with(StatKind::MagicAttack, 10.0)
            .with(StatKind::Defense, 5.0)
            .with(StatKind::MagicDefense, 5.0)
            .with(StatKind::MoveSpeed, 5.0)
            .with(StatKind::AttackSpeed, 1.0)
            .with(StatKind::CritRate, 0.05)
            .with(StatKind::CritDamage, 0.5)
            .with(StatKind::HealthRegen, 0.0)
            .with(StatKind::ManaRegen, 1.0)
            .with(StatKind::StaminaRegen, 10.0)
    }

    /// Builds a table from `(name, value)` pairs, parsing names
    /// case-insensitively in snake_case (`"max_health"`).
    pub fn from_named<'a>(
        entries: impl IntoIterator<Item = (&'a str, f32)>,
    ) -> Result<Self, StatsError> {
        let mut table = Self::new();
        for (name, value) in entries {
            let kind =
                StatKind::from_str(name).map_err(|_| StatsError::UnknownStat(name.to_string()))?;
            table.insert(kind, value);
        }
        table.validate()?;
        Ok(table)
    }

    /// Set a base value (builder pattern)
    pub fn with(mut self, kind: StatKind, value: f32) -> Self {
        self.insert(kind, value);
        self
    }

    /// Sets or replaces the base value for `kind`.
    pub fn insert(&mut self, kind: StatKind, value: f32) -> Option<f32> {
        self.values.insert(kind, value)
    }

    pub fn get(&self, kind: StatKind) -> Option<f32> {
        self.values.get(&kind).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StatKind, f32)> + '_ {
        self.values.iter().map(|(k, v)| (*k, *v))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Rejects NaN and infinite base values.
    pub fn validate(&self) -> Result<(), StatsError> {
        match self.iter().find(|(_, value)| !value.is_finite()) {
            Some((stat, value)) => Err(StatsError::NonFiniteValue { stat, value }),
            None => Ok(()),
        }
    }
}

impl FromIterator<(StatKind, f32)> for BaseStatTable {
    fn from_iter<I: IntoIterator<Item = (StatKind, f32)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_covers_every_kind() {
        let table = BaseStatTable::standard();
        for kind in StatKind::ALL {
            assert!(table.get(kind).is_some(), "missing {kind}");
        }
        assert_eq!(table.get(StatKind::MaxHealth), Some(100.0));
    }

    #[test]
    fn from_named_parses_and_rejects() {
        let table = BaseStatTable::from_named([("max_health", 80.0), ("Attack", 12.0)]).unwrap();
        assert_eq!(table.get(StatKind::MaxHealth), Some(80.0));
        assert_eq!(table.get(StatKind::Attack), Some(12.0));

        let err = BaseStatTable::from_named([("luck", 1.0)]).unwrap_err();
        assert_eq!(err, StatsError::UnknownStat("luck".into()));
    }

    #[test]
    fn validate_rejects_nan() {
        let table = BaseStatTable::new().with(StatKind::Defense, f32::NAN);
        assert!(matches!(
            table.validate(),
            Err(StatsError::NonFiniteValue {
                stat: StatKind::Defense,
                ..
            })
        ));
    }
}
