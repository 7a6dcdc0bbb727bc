//! Scripted combat scenario.
//!
//! One character is equipped, buffed and then hit by a fixed enemy every
//! step. Halfway through the armor comes off, which shrinks max health and
//! clamps current health. Deaths are answered with an immediate revive.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use stats_core::{
    BaseStatTable, DamageType, Modifier, PoolEvent, ResourcePool, SourceId, StatKind,
    StatRegistry, Topic, outgoing_damage,
};

use crate::config::SimConfig;

const STAMINA_PER_SWING: f32 = 15.0;
const MANA_PER_BOLT: f32 = 20.0;
const MANA_PER_HEAL: f32 = 10.0;
const HEAL_AMOUNT: f32 = 25.0;
const HEAL_THRESHOLD: f32 = 0.3;
const REVIVE_FRACTION: f32 = 0.5;
const PLAYER_BASE_DAMAGE: f32 = 10.0;

/// Event counts observed through the pool's listener API.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Tally {
    pub hits_taken: u32,
    pub damage_taken: f32,
    pub healed: f32,
    pub deaths: u32,
    pub revives: u32,
    pub stat_changes: u32,
}

/// Outcome of one run.
#[derive(Clone, Debug)]
pub struct Report {
    pub ticks: u32,
    pub elapsed: f32,
    pub damage_dealt: f32,
    pub tally: Tally,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "ticks:         {} ({:.1}s)", self.ticks, self.elapsed)?;
        writeln!(f, "damage dealt:  {:.1}", self.damage_dealt)?;
        writeln!(
            f,
            "damage taken:  {:.1} over {} hits",
            self.tally.damage_taken, self.tally.hits_taken
        )?;
        writeln!(f, "healed:        {:.1}", self.tally.healed)?;
        writeln!(
            f,
            "deaths:        {} (revived {})",
            self.tally.deaths, self.tally.revives
        )?;
        write!(f, "stat changes:  {}", self.tally.stat_changes)
    }
}

pub struct Scenario {
    config: SimConfig,
    enemy: StatRegistry,
    enemy_id: SourceId,
}

impl Scenario {
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            enemy: StatRegistry::from_table(&BaseStatTable::standard()),
            enemy_id: SourceId::new(),
        }
    }

    pub fn run(&self, pool: &mut ResourcePool) -> Report {
        let tally = Rc::new(RefCell::new(Tally::default()));
        let sink = Rc::clone(&tally);
        let listener = pool.subscribe(Topic::ALL, move |event| record(&mut sink.borrow_mut(), event));

        let sword = SourceId::new();
        let armor = SourceId::new();
        pool.add_modifier(StatKind::Attack, Modifier::flat(8.0).with_source(sword));
        pool.add_modifier(
            StatKind::CritDamage,
            Modifier::percent_add(0.25).with_source(sword),
        );
        pool.add_modifier(
            StatKind::MaxHealth,
            Modifier::percent_add(0.2).with_source(armor),
        );
        pool.add_modifier(StatKind::Defense, Modifier::flat(15.0).with_source(armor));
        pool.full_heal();

        // War cry: short multiplicative attack buff.
        pool.add_modifier(
            StatKind::Attack,
            Modifier::percent_mult(0.3).with_duration(3.0),
        );

        let mut damage_dealt = 0.0;
        for step in 1..=self.config.ticks {
            pool.tick(self.config.delta);
            self.enemy_turn(pool, step);
            damage_dealt += player_turn(pool);

            if !pool.is_alive() {
                pool.revive(REVIVE_FRACTION);
            }
            if step == self.config.ticks / 2 {
                let removed = pool.remove_all_modifiers_from_source(armor);
                tracing::info!(step, removed, max_health = pool.max_health(), "armor removed");
            }
        }

        pool.unsubscribe(listener);
        let tally = tally.borrow().clone();
        Report {
            ticks: self.config.ticks,
            elapsed: self.config.ticks as f32 * self.config.delta,
            damage_dealt,
            tally,
        }
    }

    fn enemy_turn(&self, pool: &mut ResourcePool, step: u32) {
        let damage_type = if step % 3 == 0 {
            DamageType::Magical
        } else {
            DamageType::Physical
        };
        let critical = step % 5 == 0;
        let raw = outgoing_damage(&self.enemy, self.config.seed_damage, damage_type, critical);
        pool.take_damage(raw, Some(self.enemy_id), damage_type);
    }
}

/// Swings if stamina allows, otherwise casts; heals when low.
fn player_turn(pool: &mut ResourcePool) -> f32 {
    if !pool.is_alive() {
        return 0.0;
    }

    let mut dealt = 0.0;
    if pool.use_stamina(STAMINA_PER_SWING) {
        dealt += outgoing_damage(pool.stats(), PLAYER_BASE_DAMAGE, DamageType::Physical, false);
    } else if pool.use_mana(MANA_PER_BOLT) {
        dealt += outgoing_damage(pool.stats(), PLAYER_BASE_DAMAGE, DamageType::Magical, false);
    }

    if pool.health_fraction() < HEAL_THRESHOLD && pool.use_mana(MANA_PER_HEAL) {
        pool.heal(HEAL_AMOUNT, None);
    }
    dealt
}

fn record(tally: &mut Tally, event: &PoolEvent) {
    match event {
        PoolEvent::Damaged {
            amount,
            damage_type,
            ..
        } => {
            tally.hits_taken += 1;
            tally.damage_taken += amount;
            tracing::debug!(amount, %damage_type, "hit");
        }
        PoolEvent::Healed { amount, .. } => {
            tally.healed += amount;
            tracing::debug!(amount, "healed");
        }
        PoolEvent::Died => {
            tally.deaths += 1;
            tracing::warn!("player died");
        }
        PoolEvent::Revived { health } => {
            tally.revives += 1;
            tracing::info!(health, "player revived");
        }
        PoolEvent::StatChanged(change) => {
            tally.stat_changes += 1;
            tracing::debug!(stat = %change.kind, old = change.old, new = change.new, "stat changed");
        }
        PoolEvent::HealthChanged { current, max }
        | PoolEvent::ManaChanged { current, max }
        | PoolEvent::StaminaChanged { current, max } => {
            tracing::trace!(?event, current, max, "resource changed");
        }
    }
}
