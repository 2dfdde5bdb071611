//! Shop foods and their application.
//!
//! Foods are consumed the moment they are bought. Most target one deck
//! slot; canned food targets the shop itself and is routed by the buy
//! operation instead of [`apply_food`].
//!
//! Stat foods (apple, cupcake, pear) are scaled by the shop's food
//! multipliers, which cats raise. Status foods wrap the target in a
//! [`StatusEffect`]; chocolate grants experience and can cascade
//! level-ups.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::StatusEffect;
use crate::pets::abilities::{self, HookScope};
use crate::pets::Hook;

/// Every food the shop can stock.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FoodKind {
    Apple,
    Honey,
    Cupcake,
    MeatBone,
    SleepingPill,
    Garlic,
    Pear,
    CannedFood,
    Chili,
    Chocolate,
    Melon,
    Mushroom,
    Steak,
}

impl FoodKind {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            FoodKind::Apple => "Apple",
            FoodKind::Honey => "Honey",
            FoodKind::Cupcake => "Cupcake",
            FoodKind::MeatBone => "Meat Bone",
            FoodKind::SleepingPill => "Sleeping Pill",
            FoodKind::Garlic => "Garlic",
            FoodKind::Pear => "Pear",
            FoodKind::CannedFood => "Canned Food",
            FoodKind::Chili => "Chili",
            FoodKind::Chocolate => "Chocolate",
            FoodKind::Melon => "Melon",
            FoodKind::Mushroom => "Mushroom",
            FoodKind::Steak => "Steak",
        }
    }

    /// Purchase price in gold.
    #[must_use]
    pub fn gold_cost(&self) -> u32 {
        match self {
            FoodKind::SleepingPill => 1,
            _ => 3,
        }
    }

    /// True for foods aimed at the shop rather than a deck slot.
    #[must_use]
    pub fn targets_shop(&self) -> bool {
        matches!(self, FoodKind::CannedFood)
    }
}

impl fmt::Display for FoodKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Feed a pet-targeted food to the pet at `slot`.
///
/// Returns false when the slot is empty; nothing is spent or fired. On
/// success the eat-food hook fires on the target (level-up hooks first
/// for chocolate). A pill that kills its target drops the eat-food hook
/// with the corpse.
///
/// # Panics
///
/// Panics on [`FoodKind::CannedFood`]; the buy operation routes that to
/// the shop.
pub(crate) fn apply_food(scope: &mut HookScope<'_>, slot: usize, kind: FoodKind) -> bool {
    assert!(!kind.targets_shop(), "{kind} targets the shop, not a slot");
    let Some(pet) = scope.friends.get_mut(slot) else {
        return false;
    };
    let id = pet.id();
    let (am, hm) = match scope.shop.as_deref() {
        Some(shop) => (shop.food_attack_multiplier(), shop.food_health_multiplier()),
        None => (1, 1),
    };
    let pet = scope.friends.get_mut(slot).expect("slot checked above");

    let mut reached = smallvec::SmallVec::<[u8; 2]>::new();
    match kind {
        FoodKind::Apple => {
            pet.add_attack(am);
            let _ = pet.add_health(hm);
        }
        FoodKind::Pear => {
            pet.add_attack(2 * am);
            let _ = pet.add_health(2 * hm);
        }
        FoodKind::Cupcake => {
            pet.add_attack_buff(3 * am);
            pet.add_health_buff(3 * hm);
        }
        FoodKind::Honey => pet.set_effect(Some(StatusEffect::HoneyBee)),
        FoodKind::MeatBone => pet.set_effect(Some(StatusEffect::BoneAttack)),
        FoodKind::Garlic => pet.set_effect(Some(StatusEffect::GarlicArmor)),
        FoodKind::Chili => pet.set_effect(Some(StatusEffect::Splash)),
        FoodKind::Melon => pet.set_effect(Some(StatusEffect::MelonArmor)),
        FoodKind::Mushroom => pet.set_effect(Some(StatusEffect::ExtraLife)),
        FoodKind::Steak => pet.set_effect(Some(StatusEffect::SteakAttack)),
        FoodKind::Chocolate => {
            reached = pet.add_experience(1);
        }
        FoodKind::SleepingPill => {
            abilities::force_faint_at(scope, slot);
        }
        FoodKind::CannedFood => unreachable!("rejected above"),
    }

    for level in reached {
        abilities::run_hook_at_level(scope, id, Hook::LevelUp, level);
    }
    abilities::fire_hook(scope, id, Hook::EatFood);
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::GameRng;
    use crate::deck::Deck;
    use crate::game::CastQueue;
    use crate::pets::{Pet, PetIdGen, Species};

    struct World {
        deck: Deck,
        ids: PetIdGen,
        queue: CastQueue,
        rng: GameRng,
    }

    impl World {
        fn new() -> Self {
            Self {
                deck: Deck::new(),
                ids: PetIdGen::new(),
                queue: CastQueue::new(),
                rng: GameRng::new(11),
            }
        }

        fn spawn(&mut self, slot: usize, species: Species) {
            let pet = Pet::new(self.ids.next_id(), species);
            self.deck.put(slot, pet);
        }

        fn feed(&mut self, slot: usize, kind: FoodKind) -> bool {
            let mut scope = HookScope {
                friends: &mut self.deck,
                enemies: None,
                shop: None,
                econ: None,
                ids: &mut self.ids,
                queue: &mut self.queue,
                enemy_queue: None,
                rng: &mut self.rng,
            };
            apply_food(&mut scope, slot, kind)
        }
    }

    #[test]
    fn test_apple_feeds_one_of_each() {
        let mut w = World::new();
        w.spawn(0, Species::Fish); // 2/3
        assert!(w.feed(0, FoodKind::Apple));
        let fish = w.deck.get(0).unwrap();
        assert_eq!(fish.attack(), 3);
        assert_eq!(fish.health(), 4);
    }

    #[test]
    fn test_empty_slot_is_a_failed_purchase() {
        let mut w = World::new();
        assert!(!w.feed(2, FoodKind::Apple));
    }

    #[test]
    fn test_cupcake_is_temporary() {
        let mut w = World::new();
        w.spawn(0, Species::Fish);
        assert!(w.feed(0, FoodKind::Cupcake));
        let fish = w.deck.get(0).unwrap();
        assert_eq!(fish.attack(), 2);
        assert_eq!(fish.attack_buff(), 3);
        assert_eq!(fish.health_buff(), 3);
    }

    #[test]
    fn test_status_foods_overwrite() {
        let mut w = World::new();
        w.spawn(0, Species::Fish);
        assert!(w.feed(0, FoodKind::Garlic));
        assert_eq!(
            w.deck.get(0).unwrap().effect(),
            Some(StatusEffect::GarlicArmor)
        );
        assert!(w.feed(0, FoodKind::Melon));
        assert_eq!(
            w.deck.get(0).unwrap().effect(),
            Some(StatusEffect::MelonArmor)
        );
    }

    #[test]
    fn test_chocolate_levels_up() {
        let mut w = World::new();
        w.spawn(0, Species::Pig);
        w.deck.get_mut(0).unwrap().add_experience(1);
        assert!(w.feed(0, FoodKind::Chocolate));
        let pig = w.deck.get(0).unwrap();
        assert_eq!(pig.level(), 2);
        // Base level-up behavior raised the resale value
        assert_eq!(pig.resale_value(), 4);
    }

    #[test]
    fn test_sleeping_pill_faints_the_target() {
        let mut w = World::new();
        w.spawn(0, Species::Hippo);
        assert!(w.feed(0, FoodKind::SleepingPill));
        assert!(w.deck.get(0).is_none());
    }

    #[test]
    fn test_sleeping_pill_triggers_faint_riders() {
        let mut w = World::new();
        w.spawn(0, Species::Cricket);
        assert!(w.feed(0, FoodKind::SleepingPill));
        assert_eq!(
            w.deck.get(0).unwrap().species(),
            Species::ZombieCricket
        );
    }

    #[test]
    #[should_panic(expected = "targets the shop")]
    fn test_canned_food_rejects_slot_targeting() {
        let mut w = World::new();
        w.spawn(0, Species::Fish);
        let _ = w.feed(0, FoodKind::CannedFood);
    }

    #[test]
    fn test_costs() {
        assert_eq!(FoodKind::SleepingPill.gold_cost(), 1);
        assert_eq!(FoodKind::Steak.gold_cost(), 3);
    }
}
