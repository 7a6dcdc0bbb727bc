//! Resource pools built on a stat registry.
//!
//! Current health, mana and stamina are stored state; their maximums are
//! read live from the capacity stats. Whenever a capacity stat drops below
//! the current value, the current value is pulled down to it before the
//! mutating call returns.
//!
//! # Lifecycle
//!
//! ```text
//!   Alive ──(health reaches 0: take_damage / set_health(0) / die)──▶ Dead
//!   Dead  ──(revive(fraction))──────────────────────────────────────▶ Alive
//! ```
//!
//! While dead, damage and healing are ignored.

use crate::combat::{DamageType, mitigate};
use crate::config::StatsConfig;
use crate::events::{EventBus, ListenerId, PoolEvent, StatChanged, Topic};
use crate::kind::{ResourceKind, StatKind};
use crate::modifier::{Modifier, ModifierId, SourceId};
use crate::registry::StatRegistry;

/// Alive / dead state of a character.
///
/// Health at zero does not imply `Dead`: shrinking max health to zero clamps
/// current health but keeps the character alive.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[strum(serialize_all = "snake_case")]
pub enum LifeState {
    #[default]
    Alive,
    Dead,
}

/// Current health, mana and stamina of one character, plus the registry
/// that defines their maximums.
///
/// Mutate stats through the pool ([`Self::add_modifier`], [`Self::tick`], ...)
/// so capacity changes are reflected in the current values; read them through
/// [`Self::stats`].
#[derive(Debug)]
pub struct ResourcePool {
    stats: StatRegistry,
    config: StatsConfig,
    health: f32,
    mana: f32,
    stamina: f32,
    life: LifeState,
    events: EventBus<PoolEvent>,
}

impl ResourcePool {
    /// Wraps `stats` with every resource at its maximum.
    pub fn new(stats: StatRegistry) -> Self {
        Self::with_config(stats, StatsConfig::default())
    }

    pub fn with_config(stats: StatRegistry, config: StatsConfig) -> Self {
        let health = stats.value(StatKind::MaxHealth);
        let mana = stats.value(StatKind::MaxMana);
        let stamina = stats.value(StatKind::MaxStamina);
        Self {
            stats,
            config,
            health,
            mana,
            stamina,
            life: LifeState::Alive,
            events: EventBus::new(),
        }
    }

    /// Restores stored current values, clamping each into `[0, max]`.
    ///
    /// A character restored with zero health starts dead.
    pub(crate) fn with_current(
        stats: StatRegistry,
        config: StatsConfig,
        health: f32,
        mana: f32,
        stamina: f32,
    ) -> Self {
        let mut pool = Self::with_config(stats, config);
        pool.health = health.min(pool.max_health()).max(0.0);
        pool.mana = mana.min(pool.max_mana()).max(0.0);
        pool.stamina = stamina.min(pool.max_stamina()).max(0.0);
        if pool.health <= 0.0 {
            pool.life = LifeState::Dead;
        }
        pool
    }

    pub fn stats(&self) -> &StatRegistry {
        &self.stats
    }

    pub fn config(&self) -> &StatsConfig {
        &self.config
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn current(&self, resource: ResourceKind) -> f32 {
        match resource {
            ResourceKind::Health => self.health,
            ResourceKind::Mana => self.mana,
            ResourceKind::Stamina => self.stamina,
        }
    }

    pub fn max(&self, resource: ResourceKind) -> f32 {
        self.stats.value(resource.max_stat())
    }

    pub fn health(&self) -> f32 {
        self.health
    }

    pub fn mana(&self) -> f32 {
        self.mana
    }

    pub fn stamina(&self) -> f32 {
        self.stamina
    }

    pub fn max_health(&self) -> f32 {
        self.max(ResourceKind::Health)
    }

    pub fn max_mana(&self) -> f32 {
        self.max(ResourceKind::Mana)
    }

    pub fn max_stamina(&self) -> f32 {
        self.max(ResourceKind::Stamina)
    }

    /// Current health over max health, `0` when max health is zero.
    pub fn health_fraction(&self) -> f32 {
        let max = self.max_health();
        if max > 0.0 { self.health / max } else { 0.0 }
    }

    pub fn life_state(&self) -> LifeState {
        self.life
    }

    pub fn is_alive(&self) -> bool {
        self.life == LifeState::Alive
    }

    // ========================================================================
    // Listeners
    // ========================================================================

    /// Registers `handler` for every event whose topic intersects `topics`.
    pub fn subscribe(
        &mut self,
        topics: Topic,
        handler: impl FnMut(&PoolEvent) + 'static,
    ) -> ListenerId {
        self.events.subscribe(topics, handler)
    }

    pub fn unsubscribe(&mut self, id: ListenerId) -> bool {
        self.events.unsubscribe(id)
    }

    // ========================================================================
    // Stat facade
    // ========================================================================

    /// Adds a modifier to `kind`. Returns `None` if `kind` is not registered.
    pub fn add_modifier(&mut self, kind: StatKind, modifier: Modifier) -> Option<ModifierId> {
        let mut changes = Vec::new();
        let id = self.stats.add_modifier_into(kind, modifier, &mut changes);
        self.react(changes);
        id
    }

    pub fn remove_modifier(&mut self, kind: StatKind, id: impl Into<ModifierId>) -> bool {
        let mut changes = Vec::new();
        let removed = self
            .stats
            .remove_modifier_into(kind, id.into(), &mut changes);
        self.react(changes);
        removed
    }

    pub fn remove_all_modifiers_from_source(&mut self, source: SourceId) -> usize {
        let mut changes = Vec::new();
        let removed = self
            .stats
            .remove_all_modifiers_from_source_into(source, &mut changes);
        self.react(changes);
        removed
    }

    pub fn set_base_value(&mut self, kind: StatKind, value: f32) -> bool {
        let mut changes = Vec::new();
        let applied = self.stats.set_base_value_into(kind, value, &mut changes);
        self.react(changes);
        applied
    }

    /// Advances timed modifiers by `delta_time`, then applies regeneration
    /// while alive.
    ///
    /// This is the per-frame entry point for the host's simulation loop.
    pub fn tick(&mut self, delta_time: f32) {
        let mut changes = Vec::new();
        self.stats.tick_into(delta_time, &mut changes);
        self.react(changes);

        if !self.config.regen_enabled || !self.is_alive() || delta_time <= 0.0 {
            return;
        }
        for resource in ResourceKind::ALL {
            let per_second = self.stats.value(resource.regen_stat());
            if per_second > 0.0 {
                self.restore(resource, per_second * delta_time);
            }
        }
    }

    /// Forwards registry changes, then re-clamps every current value against
    /// its live maximum.
    ///
    /// The clamp reads the capacity stat directly rather than the forwarded
    /// changes, which skip moves below [`StatsConfig::VALUE_EPSILON`].
    ///
    /// A capacity pulled to zero leaves health at zero without killing; only
    /// damage, [`Self::set_health`] and [`Self::die`] kill.
    fn react(&mut self, changes: Vec<StatChanged>) {
        for change in changes {
            self.events.publish(&PoolEvent::StatChanged(change));
        }

        for resource in ResourceKind::ALL {
            let max = self.max(resource);
            if self.current(resource) > max {
                tracing::debug!(%resource, max, "clamping to reduced capacity");
                *self.current_mut(resource) = max.max(0.0);
                self.emit_resource(resource);
            }
        }
    }

    // ========================================================================
    // Health
    // ========================================================================

    /// Applies `raw_amount` of `damage_type` damage and returns the damage
    /// after mitigation (`0` if ignored).
    ///
    /// Ignored when `raw_amount <= 0` or the character is dead. Physical and
    /// magical damage are mitigated by `Defense` / `MagicDefense`; true and
    /// pure damage land in full.
    pub fn take_damage(
        &mut self,
        raw_amount: f32,
        source: Option<SourceId>,
        damage_type: DamageType,
    ) -> f32 {
        if raw_amount <= 0.0 || !self.is_alive() {
            return 0.0;
        }

        let amount = match damage_type.defense_stat() {
            Some(stat) => mitigate(
                raw_amount,
                self.stats.value(stat),
                self.config.defense_constant,
            ),
            None => raw_amount,
        };

        self.health = (self.health - amount).max(0.0);
        tracing::debug!(amount, %damage_type, health = self.health, "damage taken");

        self.events.publish(&PoolEvent::Damaged {
            amount,
            source,
            damage_type,
        });
        self.emit_resource(ResourceKind::Health);

        if self.health <= 0.0 {
            self.die();
        }
        amount
    }

    /// Restores up to `amount` health and returns what was actually restored.
    ///
    /// Ignored when `amount <= 0` or the character is dead.
    pub fn heal(&mut self, amount: f32, source: Option<SourceId>) -> f32 {
        if amount <= 0.0 || !self.is_alive() {
            return 0.0;
        }

        let before = self.health;
        self.health = (self.health + amount).min(self.max_health());
        let healed = self.health - before;

        self.events.publish(&PoolEvent::Healed {
            amount: healed,
            source,
        });
        self.emit_resource(ResourceKind::Health);
        healed
    }

    /// Heals exactly the missing health.
    pub fn full_heal(&mut self) -> f32 {
        let missing = self.max_health() - self.health;
        self.heal(missing, None)
    }

    /// Sets health directly, clamped into `[0, max]`. Setting zero kills.
    /// Ignored while dead; use [`Self::revive`].
    pub fn set_health(&mut self, value: f32) {
        if !self.is_alive() {
            return;
        }
        self.health = value.min(self.max_health()).max(0.0);
        self.emit_resource(ResourceKind::Health);
        if self.health <= 0.0 {
            self.die();
        }
    }

    /// Kills the character. No-op if already dead.
    pub fn die(&mut self) {
        if !self.is_alive() {
            return;
        }
        if self.health > 0.0 {
            self.health = 0.0;
            self.emit_resource(ResourceKind::Health);
        }
        self.life = LifeState::Dead;
        tracing::info!("character died");
        self.events.publish(&PoolEvent::Died);
    }

    /// Brings a dead character back with `health_fraction` (clamped to
    /// `[0, 1]`) of max health. Returns false if the character was alive.
    pub fn revive(&mut self, health_fraction: f32) -> bool {
        if self.is_alive() {
            return false;
        }
        self.life = LifeState::Alive;
        self.health = self.max_health() * health_fraction.clamp(0.0, 1.0);
        tracing::info!(health = self.health, "character revived");
        self.emit_resource(ResourceKind::Health);
        self.events.publish(&PoolEvent::Revived {
            health: self.health,
        });
        true
    }

    // ========================================================================
    // Mana / Stamina
    // ========================================================================

    /// Spends `amount` mana. Returns false, leaving mana untouched, if there
    /// is not enough (or `amount` is negative).
    pub fn use_mana(&mut self, amount: f32) -> bool {
        self.spend(ResourceKind::Mana, amount)
    }

    /// Spends `amount` stamina. Returns false, leaving stamina untouched, if
    /// there is not enough (or `amount` is negative).
    pub fn use_stamina(&mut self, amount: f32) -> bool {
        self.spend(ResourceKind::Stamina, amount)
    }

    pub fn restore_mana(&mut self, amount: f32) {
        self.restore(ResourceKind::Mana, amount);
    }

    pub fn restore_stamina(&mut self, amount: f32) {
        self.restore(ResourceKind::Stamina, amount);
    }

    pub fn set_mana(&mut self, value: f32) {
        self.set_current(ResourceKind::Mana, value);
    }

    pub fn set_stamina(&mut self, value: f32) {
        self.set_current(ResourceKind::Stamina, value);
    }

    fn spend(&mut self, resource: ResourceKind, amount: f32) -> bool {
        if amount < 0.0 || self.current(resource) < amount {
            return false;
        }
        if amount > 0.0 {
            *self.current_mut(resource) -= amount;
            self.emit_resource(resource);
        }
        true
    }

    /// Adds `amount` clamped to max; emits only if the value moved.
    fn restore(&mut self, resource: ResourceKind, amount: f32) {
        if amount <= 0.0 {
            return;
        }
        let max = self.max(resource);
        let current = self.current(resource);
        let next = (current + amount).min(max);
        if next > current {
            *self.current_mut(resource) = next;
            self.emit_resource(resource);
        }
    }

    fn set_current(&mut self, resource: ResourceKind, value: f32) {
        let max = self.max(resource);
        *self.current_mut(resource) = value.min(max).max(0.0);
        self.emit_resource(resource);
    }

    fn current_mut(&mut self, resource: ResourceKind) -> &mut f32 {
        match resource {
            ResourceKind::Health => &mut self.health,
            ResourceKind::Mana => &mut self.mana,
            ResourceKind::Stamina => &mut self.stamina,
        }
    }

    fn emit_resource(&mut self, resource: ResourceKind) {
        let current = self.current(resource);
        let max = self.max(resource);
        let event = match resource {
            ResourceKind::Health => PoolEvent::HealthChanged { current, max },
            ResourceKind::Mana => PoolEvent::ManaChanged { current, max },
            ResourceKind::Stamina => PoolEvent::StaminaChanged { current, max },
        };
        self.events.publish(&event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::BaseStatTable;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn pool() -> ResourcePool {
        ResourcePool::new(StatRegistry::from_table(&BaseStatTable::standard()))
    }

    fn recorder(pool: &mut ResourcePool, topics: Topic) -> Rc<RefCell<Vec<PoolEvent>>> {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        pool.subscribe(topics, move |e| sink.borrow_mut().push(e.clone()));
        seen
    }

    #[test]
    fn starts_full_and_alive() {
        let pool = pool();
        assert_eq!(pool.health(), 100.0);
        assert_eq!(pool.mana(), 50.0);
        assert_eq!(pool.stamina(), 100.0);
        assert!(pool.is_alive());
        assert_eq!(pool.health_fraction(), 1.0);
    }

    #[test]
    fn physical_damage_uses_defense() {
        let mut pool = pool();
        pool.set_base_value(StatKind::Defense, 50.0);
        let dealt = pool.take_damage(100.0, None, DamageType::Physical);
        assert!((dealt - 66.666_67).abs() < 1e-3);
        assert!((pool.health() - 33.333_33).abs() < 1e-3);
    }

    #[test]
    fn magical_damage_uses_magic_defense() {
        let mut pool = pool();
        pool.set_base_value(StatKind::MagicDefense, 100.0);
        assert_eq!(pool.take_damage(40.0, None, DamageType::Magical), 20.0);
        assert_eq!(pool.health(), 80.0);
    }

    #[test]
    fn true_and_pure_bypass_defense() {
        let mut pool = pool();
        pool.set_base_value(StatKind::Defense, 1_000.0);
        assert_eq!(pool.take_damage(10.0, None, DamageType::True), 10.0);
        assert_eq!(pool.take_damage(15.0, None, DamageType::Pure), 15.0);
        assert_eq!(pool.health(), 75.0);
    }

    #[test]
    fn non_positive_damage_is_ignored() {
        let mut pool = pool();
        let seen = recorder(&mut pool, Topic::ALL);
        assert_eq!(pool.take_damage(0.0, None, DamageType::True), 0.0);
        assert_eq!(pool.take_damage(-5.0, None, DamageType::True), 0.0);
        assert_eq!(pool.health(), 100.0);
        assert!(seen.borrow().is_empty());
    }

    #[test]
    fn lethal_damage_kills_once() {
        let mut pool = pool();
        let source = SourceId::new();
        let seen = recorder(&mut pool, Topic::COMBAT | Topic::LIFECYCLE);

        pool.take_damage(500.0, Some(source), DamageType::True);
        assert_eq!(pool.health(), 0.0);
        assert_eq!(pool.life_state(), LifeState::Dead);

        // Dead: further damage and healing are no-ops.
        assert_eq!(pool.take_damage(10.0, None, DamageType::True), 0.0);
        assert_eq!(pool.heal(10.0, None), 0.0);
        pool.die();

        assert_eq!(
            *seen.borrow(),
            vec![
                PoolEvent::Damaged {
                    amount: 500.0,
                    source: Some(source),
                    damage_type: DamageType::True
                },
                PoolEvent::Died,
            ]
        );
    }

    #[test]
    fn heal_reports_actual_amount() {
        let mut pool = pool();
        pool.take_damage(30.0, None, DamageType::True);
        let seen = recorder(&mut pool, Topic::COMBAT);

        assert_eq!(pool.heal(50.0, None), 30.0);
        assert_eq!(pool.health(), 100.0);
        assert_eq!(
            *seen.borrow(),
            vec![PoolEvent::Healed {
                amount: 30.0,
                source: None
            }]
        );
        assert_eq!(pool.heal(0.0, None), 0.0);
    }

    #[test]
    fn full_heal_restores_missing() {
        let mut pool = pool();
        pool.take_damage(42.0, None, DamageType::Pure);
        assert_eq!(pool.full_heal(), 42.0);
        assert_eq!(pool.health(), pool.max_health());
    }

    #[test]
    fn insufficient_mana_is_rejected() {
        let mut pool = pool();
        pool.set_mana(20.0);
        assert!(!pool.use_mana(30.0));
        assert_eq!(pool.mana(), 20.0);
        assert!(pool.use_mana(20.0));
        assert_eq!(pool.mana(), 0.0);
        assert!(!pool.use_mana(-1.0));
    }

    #[test]
    fn stamina_spend_and_restore_clamp() {
        let mut pool = pool();
        assert!(pool.use_stamina(60.0));
        assert_eq!(pool.stamina(), 40.0);
        pool.restore_stamina(500.0);
        assert_eq!(pool.stamina(), 100.0);
        pool.restore_mana(-3.0);
        assert_eq!(pool.mana(), 50.0);
    }

    #[test]
    fn capacity_shrink_clamps_synchronously() {
        let mut pool = pool();
        pool.set_health(80.0);
        let seen = recorder(&mut pool, Topic::HEALTH);

        let id = pool
            .add_modifier(StatKind::MaxHealth, Modifier::flat(-50.0))
            .unwrap();
        assert_eq!(pool.max_health(), 50.0);
        assert_eq!(pool.health(), 50.0);
        assert_eq!(
            *seen.borrow(),
            vec![PoolEvent::HealthChanged {
                current: 50.0,
                max: 50.0
            }]
        );

        // Ceiling only: restoring capacity does not refill.
        pool.remove_modifier(StatKind::MaxHealth, id);
        assert_eq!(pool.max_health(), 100.0);
        assert_eq!(pool.health(), 50.0);
    }

    #[test]
    fn mana_and_stamina_capacity_clamp() {
        let mut pool = pool();
        let curse = SourceId::new();
        pool.add_modifier(StatKind::MaxMana, Modifier::percent_mult(-0.5).with_source(curse));
        pool.add_modifier(StatKind::MaxStamina, Modifier::flat(-70.0).with_source(curse));
        assert_eq!(pool.mana(), 25.0);
        assert_eq!(pool.stamina(), 30.0);

        assert_eq!(pool.remove_all_modifiers_from_source(curse), 2);
        assert_eq!(pool.mana(), 25.0);
        assert_eq!(pool.max_mana(), 50.0);
    }

    #[test]
    fn set_health_zero_kills_and_revive_restores() {
        let mut pool = pool();
        let seen = recorder(&mut pool, Topic::LIFECYCLE);
        pool.set_health(0.0);
        assert!(!pool.is_alive());

        pool.set_health(50.0);
        assert_eq!(pool.health(), 0.0);

        assert!(pool.revive(0.25));
        assert!(pool.is_alive());
        assert_eq!(pool.health(), 25.0);
        assert!(!pool.revive(1.0));

        assert_eq!(
            *seen.borrow(),
            vec![PoolEvent::Died, PoolEvent::Revived { health: 25.0 }]
        );
    }

    #[test]
    fn revive_clamps_fraction() {
        let mut pool = pool();
        pool.die();
        assert_eq!(pool.health(), 0.0);
        pool.revive(3.0);
        assert_eq!(pool.health(), 100.0);
    }

    #[test]
    fn tick_expires_and_regenerates() {
        let mut pool = pool();
        pool.set_base_value(StatKind::HealthRegen, 2.0);
        pool.take_damage(10.0, None, DamageType::True);
        pool.use_mana(10.0);
        pool.add_modifier(StatKind::Attack, Modifier::flat(5.0).with_duration(1.0));

        pool.tick(1.0);
        assert_eq!(pool.stats().value(StatKind::Attack), 10.0);
        assert_eq!(pool.health(), 92.0);
        assert_eq!(pool.mana(), 41.0);
        assert_eq!(pool.stamina(), 100.0);
    }

    #[test]
    fn tick_expiry_clamps_capacity() {
        let mut pool = pool();
        pool.add_modifier(StatKind::MaxHealth, Modifier::flat(50.0).with_duration(1.0));
        pool.add_modifier(StatKind::MaxMana, Modifier::flat(20.0).with_duration(1.0));
        pool.full_heal();
        pool.restore_mana(20.0);
        assert_eq!(pool.health(), 150.0);
        assert_eq!(pool.mana(), 70.0);
        let seen = recorder(&mut pool, Topic::HEALTH);

        pool.tick(1.0);
        assert_eq!(pool.max_health(), 100.0);
        assert_eq!(pool.health(), 100.0);
        assert_eq!(pool.mana(), 50.0);
        assert_eq!(
            *seen.borrow(),
            vec![PoolEvent::HealthChanged {
                current: 100.0,
                max: 100.0
            }]
        );
    }

    #[test]
    fn sub_epsilon_shrinks_still_clamp() {
        let mut pool = pool();
        for _ in 0..40 {
            pool.add_modifier(StatKind::MaxHealth, Modifier::flat(-0.00009));
        }
        assert!(pool.max_health() < 100.0);
        assert!(pool.health() <= pool.max_health());
        assert!(pool.health_fraction() <= 1.0);
    }

    #[test]
    fn zero_capacity_keeps_character_alive() {
        let mut pool = pool();
        pool.add_modifier(StatKind::MaxHealth, Modifier::percent_mult(-1.0));
        assert_eq!(pool.max_health(), 0.0);
        assert_eq!(pool.health(), 0.0);
        assert!(pool.is_alive());
        assert_eq!(pool.life_state(), LifeState::Alive);
    }

    #[test]
    fn regen_disabled_or_dead_skips_restore() {
        let stats = StatRegistry::from_table(&BaseStatTable::standard());
        let mut pool = ResourcePool::with_config(stats, StatsConfig::new().with_regen(false));
        pool.use_mana(10.0);
        pool.tick(1.0);
        assert_eq!(pool.mana(), 40.0);

        let mut pool = self::pool();
        pool.use_mana(10.0);
        pool.die();
        pool.tick(1.0);
        assert_eq!(pool.mana(), 40.0);
    }

    #[test]
    fn stat_changes_are_forwarded() {
        let mut pool = pool();
        let seen = recorder(&mut pool, Topic::STATS);
        pool.add_modifier(StatKind::Attack, Modifier::flat(1.0));
        assert_eq!(
            *seen.borrow(),
            vec![PoolEvent::StatChanged(StatChanged {
                kind: StatKind::Attack,
                old: 10.0,
                new: 11.0
            })]
        );
    }
}
