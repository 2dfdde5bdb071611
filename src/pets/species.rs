//! The species roster.
//!
//! Species carry only static data: base stats, tier, display name, and an
//! innate status effect where one exists. Behavior lives in the ability
//! dispatch, keyed on species.
//!
//! Tokens (honey bee, zombie cricket, ram) never appear in the shop; they
//! are summoned mid-battle and their stats are set by the summoner.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::StatusEffect;

/// Every pet species, including battle-only tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Species {
    // Tier 1
    Ant,
    Beaver,
    Cricket,
    Fish,
    Horse,
    Mosquito,
    Otter,
    Pig,
    Sloth,
    // Tier 2
    Peacock,
    Shrimp,
    Swan,
    // Tier 3
    Giraffe,
    Kangaroo,
    Ox,
    Rabbit,
    Sheep,
    // Tier 4
    Hippo,
    Worm,
    // Tier 5
    Rhino,
    Scorpion,
    Shark,
    // Tier 6
    Boar,
    Cat,
    Tiger,
    // Tokens
    HoneyBee,
    ZombieCricket,
    Ram,
}

impl Species {
    /// Base attack and health for a freshly spawned level-1 pet.
    ///
    /// Token stats here are placeholders; summoners set real stats.
    #[must_use]
    pub fn base_stats(&self) -> (i32, i32) {
        match self {
            Species::Ant => (2, 1),
            Species::Beaver => (2, 2),
            Species::Cricket => (1, 2),
            Species::Fish => (2, 3),
            Species::Horse => (2, 1),
            Species::Mosquito => (2, 2),
            Species::Otter => (1, 2),
            Species::Pig => (3, 1),
            Species::Sloth => (1, 1),
            Species::Peacock => (1, 5),
            Species::Shrimp => (2, 3),
            Species::Swan => (3, 3),
            Species::Giraffe => (2, 5),
            Species::Kangaroo => (1, 2),
            Species::Ox => (1, 4),
            Species::Rabbit => (3, 2),
            Species::Sheep => (2, 2),
            Species::Hippo => (4, 7),
            Species::Worm => (2, 2),
            Species::Rhino => (5, 8),
            Species::Scorpion => (1, 1),
            Species::Shark => (4, 4),
            Species::Boar => (8, 6),
            Species::Cat => (4, 5),
            Species::Tiger => (4, 3),
            Species::HoneyBee => (1, 1),
            Species::ZombieCricket => (1, 1),
            Species::Ram => (2, 2),
        }
    }

    /// Shop tier, or `None` for battle-only tokens.
    #[must_use]
    pub fn tier(&self) -> Option<u8> {
        match self {
            Species::Ant
            | Species::Beaver
            | Species::Cricket
            | Species::Fish
            | Species::Horse
            | Species::Mosquito
            | Species::Otter
            | Species::Pig
            | Species::Sloth => Some(1),
            Species::Peacock | Species::Shrimp | Species::Swan => Some(2),
            Species::Giraffe
            | Species::Kangaroo
            | Species::Ox
            | Species::Rabbit
            | Species::Sheep => Some(3),
            Species::Hippo | Species::Worm => Some(4),
            Species::Rhino | Species::Scorpion | Species::Shark => Some(5),
            Species::Boar | Species::Cat | Species::Tiger => Some(6),
            Species::HoneyBee | Species::ZombieCricket | Species::Ram => None,
        }
    }

    #[must_use]
    pub fn is_token(&self) -> bool {
        self.tier().is_none()
    }

    /// Status effect the species spawns with.
    #[must_use]
    pub fn innate_effect(&self) -> Option<StatusEffect> {
        match self {
            Species::Scorpion => Some(StatusEffect::Poison),
            _ => None,
        }
    }

    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Species::Ant => "Ant",
            Species::Beaver => "Beaver",
            Species::Cricket => "Cricket",
            Species::Fish => "Fish",
            Species::Horse => "Horse",
            Species::Mosquito => "Mosquito",
            Species::Otter => "Otter",
            Species::Pig => "Pig",
            Species::Sloth => "Sloth",
            Species::Peacock => "Peacock",
            Species::Shrimp => "Shrimp",
            Species::Swan => "Swan",
            Species::Giraffe => "Giraffe",
            Species::Kangaroo => "Kangaroo",
            Species::Ox => "Ox",
            Species::Rabbit => "Rabbit",
            Species::Sheep => "Sheep",
            Species::Hippo => "Hippo",
            Species::Worm => "Worm",
            Species::Rhino => "Rhino",
            Species::Scorpion => "Scorpion",
            Species::Shark => "Shark",
            Species::Boar => "Boar",
            Species::Cat => "Cat",
            Species::Tiger => "Tiger",
            Species::HoneyBee => "Honey Bee",
            Species::ZombieCricket => "Zombie Cricket",
            Species::Ram => "Ram",
        }
    }
}

impl fmt::Display for Species {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
