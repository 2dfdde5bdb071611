//! The pet unit: stats, leveling, status effects, and the capturing
//! health setter.
//!
//! ## Stat model
//!
//! Attack and health are clamped to `0..=50` on every mutation. Battle
//! buffs (`attack_buff`/`health_buff`) live beside the base stats and are
//! folded in at battle start on the battle copies, then cleared at battle
//! end on the persistent pets.
//!
//! ## Health mutation
//!
//! [`Pet::set_health`] is the single funnel for health changes. On a loss
//! it applies the holder's shield effect first (garlic, melon, coconut),
//! clamps, and reports a [`HealthOutcome`] so the caller can fire the right
//! hook. `Fainted` is reported exactly once per pet; a pet that already
//! fainted reports `Unchanged` for any further writes.
//!
//! ## Leveling
//!
//! Experience thresholds are per-level: 2 experience carries level 1 to 2,
//! then 3 more carries level 2 to 3. Thresholds are subtracted as they are
//! crossed, and at max level the counter pins to the final threshold so the
//! display reads `3/3`.

use crate::core::StatusEffect;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

use super::Species;

/// Stat ceiling for both attack and health.
pub const MAX_STAT: i32 = 50;

/// Experience required to leave level 1 and level 2, respectively.
pub const EXP_TO_LEVEL: [u32; 2] = [2, 3];

/// Highest reachable level.
pub const MAX_LEVEL: u8 = 3;

/// Unique pet identifier within one game.
///
/// Ids are handed out by [`PetIdGen`]; battle copies keep the ids of the
/// pets they were copied from, and mid-battle summons draw from a
/// battle-local generator.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PetId(u32);

impl PetId {
    #[must_use]
    pub fn raw(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pet({})", self.0)
    }
}

/// Monotonic [`PetId`] source.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct PetIdGen {
    next: u32,
}

impl PetIdGen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A generator whose first id is `first`.
    ///
    /// Used to continue a game's id sequence into a battle without
    /// colliding with ids already on that side's deck.
    #[must_use]
    pub fn starting_at(first: u32) -> Self {
        Self { next: first }
    }

    /// The id the next call to [`next_id`](Self::next_id) will return.
    #[must_use]
    pub fn peek(&self) -> u32 {
        self.next
    }

    pub fn next_id(&mut self) -> PetId {
        let id = PetId(self.next);
        self.next += 1;
        id
    }
}

/// What a health write did to the pet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HealthOutcome {
    /// No effective change (includes writes to an already-fainted pet).
    Unchanged,
    /// Health decreased but stayed above zero.
    Hurt,
    /// Health reached zero for the first time.
    Fainted,
}

/// A single pet.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Pet {
    id: PetId,
    species: Species,
    attack: i32,
    health: i32,
    attack_buff: i32,
    health_buff: i32,
    level: u8,
    experience: u32,
    gold_cost: u32,
    effect: Option<StatusEffect>,
    in_battle: bool,
    duplicate_as: u8,
    fainted: bool,
}

impl Pet {
    /// A fresh pet with its species' base stats.
    ///
    /// Scorpions spawn holding poison; every other species spawns clean.
    #[must_use]
    pub fn new(id: PetId, species: Species) -> Self {
        let (attack, health) = species.base_stats();
        Self::with_stats(id, species, attack, health)
    }

    /// A pet with explicit stats, used for tokens and shop offers.
    #[must_use]
    pub fn with_stats(id: PetId, species: Species, attack: i32, health: i32) -> Self {
        Self {
            id,
            species,
            attack: attack.clamp(0, MAX_STAT),
            health: health.clamp(0, MAX_STAT),
            attack_buff: 0,
            health_buff: 0,
            level: 1,
            experience: 0,
            gold_cost: 3,
            effect: species.innate_effect(),
            in_battle: false,
            duplicate_as: 0,
            fainted: false,
        }
    }

    /// Builder-style level override for deck setup.
    ///
    /// Experience is pinned as if the pet had just reached the level.
    #[must_use]
    pub fn at_level(mut self, level: u8) -> Self {
        assert!(
            (1..=MAX_LEVEL).contains(&level),
            "level must be in 1..={MAX_LEVEL}, got {level}"
        );
        self.level = level;
        self.experience = if level == MAX_LEVEL {
            *EXP_TO_LEVEL.last().expect("threshold table is non-empty")
        } else {
            0
        };
        self
    }

    #[must_use]
    pub fn id(&self) -> PetId {
        self.id
    }

    #[must_use]
    pub fn species(&self) -> Species {
        self.species
    }

    #[must_use]
    pub fn attack(&self) -> i32 {
        self.attack
    }

    #[must_use]
    pub fn health(&self) -> i32 {
        self.health
    }

    #[must_use]
    pub fn attack_buff(&self) -> i32 {
        self.attack_buff
    }

    /// Attack including any not-yet-folded battle buff, capped.
    ///
    /// Battle damage and cast ordering use this, so a buff granted
    /// mid-battle counts immediately.
    #[must_use]
    pub fn effective_attack(&self) -> i32 {
        (self.attack + self.attack_buff).clamp(0, MAX_STAT)
    }

    #[must_use]
    pub fn health_buff(&self) -> i32 {
        self.health_buff
    }

    #[must_use]
    pub fn level(&self) -> u8 {
        self.level
    }

    #[must_use]
    pub fn experience(&self) -> u32 {
        self.experience
    }

    #[must_use]
    pub fn effect(&self) -> Option<StatusEffect> {
        self.effect
    }

    #[must_use]
    pub fn in_battle(&self) -> bool {
        self.in_battle
    }

    #[must_use]
    pub fn duplicate_as(&self) -> u8 {
        self.duplicate_as
    }

    #[must_use]
    pub fn has_fainted(&self) -> bool {
        self.fainted
    }

    /// Resale value in gold.
    #[must_use]
    pub fn resale_value(&self) -> u32 {
        self.gold_cost
    }

    /// Purchase price in gold while the pet sits in the shop.
    #[must_use]
    pub fn shop_cost(&self) -> u32 {
        self.gold_cost
    }

    pub fn set_attack(&mut self, value: i32) {
        self.attack = value.clamp(0, MAX_STAT);
    }

    pub fn add_attack(&mut self, delta: i32) {
        self.set_attack(self.attack + delta);
    }

    pub fn add_attack_buff(&mut self, delta: i32) {
        // No cap needed; attack is capped when the buff folds in.
        self.attack_buff += delta;
    }

    pub fn add_health_buff(&mut self, delta: i32) {
        self.health_buff += delta;
    }

    pub fn set_effect(&mut self, effect: Option<StatusEffect>) {
        self.effect = effect;
    }

    pub fn set_in_battle(&mut self, value: bool) {
        self.in_battle = value;
    }

    pub fn set_duplicate_as(&mut self, level: u8) {
        self.duplicate_as = level;
    }

    /// Write a new health value, applying shield effects to losses.
    ///
    /// Gains never consult shields. Losses are filtered through the
    /// holder's shield first: garlic reduces the loss by 1 (minimum loss
    /// 1), melon absorbs up to 20 and wears off, coconut negates the loss
    /// and wears off. The outcome reports a faint exactly once per pet.
    pub fn set_health(&mut self, value: i32) -> HealthOutcome {
        let prev = self.health;
        let mut value = value;
        if value < prev {
            let mut loss = prev - value;
            match self.effect {
                Some(StatusEffect::GarlicArmor) => {
                    loss = (loss - 1).max(1);
                }
                Some(StatusEffect::MelonArmor) => {
                    loss = (loss - 20).max(0);
                    self.effect = None;
                }
                Some(StatusEffect::CoconutShield) => {
                    loss = 0;
                    self.effect = None;
                }
                _ => {}
            }
            value = prev - loss;
        }
        self.health = value.clamp(0, MAX_STAT);

        if self.fainted {
            return HealthOutcome::Unchanged;
        }
        if self.health == 0 {
            self.fainted = true;
            HealthOutcome::Fainted
        } else if self.health < prev {
            HealthOutcome::Hurt
        } else {
            HealthOutcome::Unchanged
        }
    }

    pub fn add_health(&mut self, delta: i32) -> HealthOutcome {
        self.set_health(self.health + delta)
    }

    /// Drop health to zero, bypassing shields.
    ///
    /// Returns true if this faint is the pet's first (the caller should
    /// then fire the faint hook).
    pub fn force_faint(&mut self) -> bool {
        self.health = 0;
        if self.fainted {
            false
        } else {
            self.fainted = true;
            true
        }
    }

    #[must_use]
    pub fn can_level(&self) -> bool {
        self.level < MAX_LEVEL
    }

    /// Grant experience, cascading level-ups.
    ///
    /// Returns the levels reached, in order, so the caller can fire a
    /// level-up hook per level at the right effective level.
    pub fn add_experience(&mut self, amount: u32) -> SmallVec<[u8; 2]> {
        let mut reached = SmallVec::new();
        self.experience += amount;
        while self.can_level() {
            let needed = EXP_TO_LEVEL[(self.level - 1) as usize];
            if self.experience < needed {
                break;
            }
            self.experience -= needed;
            self.level += 1;
            reached.push(self.level);
        }
        if self.level == MAX_LEVEL {
            self.experience = *EXP_TO_LEVEL.last().expect("threshold table is non-empty");
        }
        reached
    }

    /// Absorb another pet of the same species.
    ///
    /// Experience folds first (the absorbed pet counts for its experience
    /// plus one), then stats: one more than the better of the two, capped.
    /// Buffs add. Returns the levels reached during the experience fold.
    ///
    /// # Panics
    ///
    /// Panics if the species differ; the caller gates on species.
    pub fn merge_from(&mut self, other: &Pet) -> SmallVec<[u8; 2]> {
        assert_eq!(
            self.species, other.species,
            "merge requires matching species"
        );
        let reached = self.add_experience(other.experience + 1);
        self.set_attack(self.attack.max(other.attack) + 1);
        let merged_health = self.health.max(other.health) + 1;
        self.set_health(merged_health);
        self.attack_buff += other.attack_buff;
        self.health_buff += other.health_buff;
        reached
    }

    /// Fold battle buffs into the base stats (battle copies only).
    pub fn fold_battle_buffs(&mut self) {
        self.add_attack(self.attack_buff);
        self.add_health(self.health_buff);
        self.attack_buff = 0;
        self.health_buff = 0;
    }

    /// Clear battle buffs without folding (persistent pets at battle end).
    pub fn clear_battle_buffs(&mut self) {
        self.attack_buff = 0;
        self.health_buff = 0;
    }

    /// Purchase bookkeeping: a bought pet resells for 1 gold.
    pub fn mark_bought(&mut self) {
        self.gold_cost = 1;
    }

    /// Level-up bookkeeping: each level adds 1 gold of resale value.
    pub fn raise_resale(&mut self) {
        self.gold_cost += 1;
    }
}

impl fmt::Display for Pet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {}/{}",
            self.species.name(),
            self.attack + self.attack_buff,
            self.health + self.health_buff
        )?;
        write!(f, " L{}", self.level)?;
        if let Some(effect) = self.effect {
            write!(f, " [{effect}]")?;
        }
        Ok(())
    }
}
