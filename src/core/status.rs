//! Status effects carried by pets.
//!
//! A pet holds at most one status effect at a time; granting a new one
//! overwrites the old. Effects split into three families:
//!
//! - **Shields** modify incoming health losses ([`GarlicArmor`],
//!   [`MelonArmor`], [`CoconutShield`]). Melon and coconut are consumed by
//!   the hit they absorb; garlic persists.
//! - **Attack modifiers** apply when the holder attacks ([`BoneAttack`],
//!   [`SteakAttack`], [`Poison`], [`Splash`]). Steak is consumed on use.
//! - **Death riders** fire when the holder faints ([`HoneyBee`],
//!   [`ExtraLife`]).
//!
//! The shield arithmetic lives in [`Pet::set_health`](crate::pets::Pet);
//! attack modifiers are resolved by the battle loop and the before-attack
//! base behavior.
//!
//! [`GarlicArmor`]: StatusEffect::GarlicArmor
//! [`MelonArmor`]: StatusEffect::MelonArmor
//! [`CoconutShield`]: StatusEffect::CoconutShield
//! [`BoneAttack`]: StatusEffect::BoneAttack
//! [`SteakAttack`]: StatusEffect::SteakAttack
//! [`Poison`]: StatusEffect::Poison
//! [`Splash`]: StatusEffect::Splash
//! [`HoneyBee`]: StatusEffect::HoneyBee
//! [`ExtraLife`]: StatusEffect::ExtraLife

use serde::{Deserialize, Serialize};
use std::fmt;

/// The closed set of status effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffect {
    /// A defender damaged by the holder faints outright.
    Poison,
    /// Incoming health losses are reduced by 1, to a minimum loss of 1.
    GarlicArmor,
    /// Absorbs up to 20 of one health loss, then wears off.
    MelonArmor,
    /// The holder's attacks also deal 5 damage to the enemy second slot.
    Splash,
    /// Negates one health loss entirely, then wears off.
    CoconutShield,
    /// +5 attack on every attack the holder makes.
    BoneAttack,
    /// +20 attack on the holder's next attack, then wears off.
    SteakAttack,
    /// A 1/1 honey bee is summoned where the holder faints.
    HoneyBee,
    /// The holder comes back as a fresh level-1 1/1 when it faints.
    ExtraLife,
}

impl StatusEffect {
    /// Three-character display code, matching the card rendering.
    #[must_use]
    pub fn code(&self) -> &'static str {
        match self {
            StatusEffect::Poison => "Psn",
            StatusEffect::GarlicArmor => "Glc",
            StatusEffect::MelonArmor => "Mln",
            StatusEffect::Splash => "Spl",
            StatusEffect::CoconutShield => "Cct",
            StatusEffect::BoneAttack => "Bne",
            StatusEffect::SteakAttack => "Stk",
            StatusEffect::HoneyBee => "Bee",
            StatusEffect::ExtraLife => "1up",
        }
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
