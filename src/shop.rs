//! The shop: rollable pet and food offers.
//!
//! ## Slots and schedule
//!
//! The shop holds up to five pet slots and two food slots; how many are
//! active, and which catalog tiers stock them, grows with the turn
//! counter on a fixed schedule. A slot can be frozen, which carries its
//! offer through rolls and turn changes until it is bought or unfrozen.
//!
//! Items are addressed by one unified index: active pet slots first, then
//! active food slots.
//!
//! ## Rolling
//!
//! A roll refills every active, unfrozen slot by weighted sampling (with
//! replacement) from the union of all unlocked tiers. Each tier's table
//! is normalized, and the union divides every weight by the number of
//! unlocked tiers, so unlocking a tier dilutes rather than displaces the
//! lower tiers.
//!
//! ## Standing bonuses
//!
//! Canned food raises the shop's permanent stat bonuses, applied to every
//! pet offer from then on and retroactively to offers already on display.
//! Cats raise the food stat multipliers; both multipliers floor at 1.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::GameRng;
use crate::foods::FoodKind;
use crate::pets::Species;

/// Most pet slots a shop can grow to.
pub const SHOP_PET_SLOTS: usize = 5;
/// Most food slots a shop can grow to.
pub const SHOP_FOOD_SLOTS: usize = 2;

/// Turn thresholds for active pet slots.
const PET_SLOT_SCHEDULE: &[(u32, usize)] = &[(1, 3), (5, 4), (9, 5)];
/// Turn thresholds for active food slots.
const FOOD_SLOT_SCHEDULE: &[(u32, usize)] = &[(1, 1), (3, 2)];
/// Turn thresholds for the highest stocked tier.
const TIER_SCHEDULE: &[(u32, usize)] = &[(1, 1), (3, 2), (5, 3), (7, 4), (9, 5), (11, 6)];

/// Value of a stepped schedule at `turn`: the entry with the highest
/// threshold not above it.
fn step_value<T: Copy>(schedule: &[(u32, T)], turn: u32) -> T {
    schedule
        .iter()
        .take_while(|(threshold, _)| *threshold <= turn)
        .last()
        .map(|(_, v)| *v)
        .unwrap_or(schedule[0].1)
}

/// A pet offer: species plus the stats it will spawn with.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShopPet {
    pub species: Species,
    pub attack: i32,
    pub health: i32,
}

/// One purchasable offer.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ShopItem {
    Pet(ShopPet),
    Food(FoodKind),
}

impl ShopItem {
    /// Purchase price in gold.
    #[must_use]
    pub fn gold_cost(&self) -> u32 {
        match self {
            ShopItem::Pet(_) => 3,
            ShopItem::Food(kind) => kind.gold_cost(),
        }
    }
}

impl fmt::Display for ShopItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShopItem::Pet(pet) => {
                write!(f, "{} {}/{}", pet.species.name(), pet.attack, pet.health)
            }
            ShopItem::Food(kind) => f.write_str(kind.name()),
        }
    }
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
struct ShopSlot {
    item: Option<ShopItem>,
    frozen: bool,
}

/// Weighted per-tier stock tables.
///
/// Each tier's weights sum to 1; [`Shop`] dilutes them across unlocked
/// tiers when it rolls.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShopCatalog {
    pets: FxHashMap<u8, Vec<(Species, f32)>>,
    foods: FxHashMap<u8, Vec<(FoodKind, f32)>>,
}

impl ShopCatalog {
    /// A roster with no stock; populate it with [`add_pet`](Self::add_pet)
    /// and [`add_food`](Self::add_food).
    ///
    /// A shop rolling from an empty tier leaves its slots empty, which
    /// makes single-item catalogs convenient for scripted scenarios.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            pets: FxHashMap::default(),
            foods: FxHashMap::default(),
        }
    }

    /// Stock a species at `tier` with the given roll weight.
    pub fn add_pet(&mut self, tier: u8, species: Species, weight: f32) {
        self.pets.entry(tier).or_default().push((species, weight));
    }

    /// Stock a food at `tier` with the given roll weight.
    pub fn add_food(&mut self, tier: u8, kind: FoodKind, weight: f32) {
        self.foods.entry(tier).or_default().push((kind, weight));
    }

    /// The standard six-tier roster.
    #[must_use]
    pub fn standard() -> Self {
        let mut pets = FxHashMap::default();
        pets.insert(
            1,
            vec![
                (Species::Ant, 0.12375),
                (Species::Beaver, 0.12375),
                (Species::Cricket, 0.12375),
                (Species::Fish, 0.12375),
                (Species::Horse, 0.12375),
                (Species::Mosquito, 0.12375),
                (Species::Otter, 0.12375),
                (Species::Pig, 0.12375),
                (Species::Sloth, 0.01),
            ],
        );
        pets.insert(
            2,
            vec![
                (Species::Peacock, 0.34),
                (Species::Shrimp, 0.33),
                (Species::Swan, 0.33),
            ],
        );
        pets.insert(
            3,
            vec![
                (Species::Giraffe, 0.2),
                (Species::Kangaroo, 0.2),
                (Species::Ox, 0.2),
                (Species::Rabbit, 0.2),
                (Species::Sheep, 0.2),
            ],
        );
        pets.insert(4, vec![(Species::Hippo, 0.5), (Species::Worm, 0.5)]);
        pets.insert(
            5,
            vec![
                (Species::Rhino, 0.34),
                (Species::Scorpion, 0.33),
                (Species::Shark, 0.33),
            ],
        );
        pets.insert(
            6,
            vec![
                (Species::Boar, 0.34),
                (Species::Cat, 0.33),
                (Species::Tiger, 0.33),
            ],
        );

        let mut foods = FxHashMap::default();
        foods.insert(1, vec![(FoodKind::Apple, 0.5), (FoodKind::Honey, 0.5)]);
        foods.insert(
            2,
            vec![
                (FoodKind::Cupcake, 0.4),
                (FoodKind::MeatBone, 0.4),
                (FoodKind::SleepingPill, 0.2),
            ],
        );
        foods.insert(3, vec![(FoodKind::Garlic, 1.0)]);
        foods.insert(
            4,
            vec![(FoodKind::CannedFood, 0.5), (FoodKind::Pear, 0.5)],
        );
        foods.insert(
            5,
            vec![(FoodKind::Chili, 0.5), (FoodKind::Chocolate, 0.5)],
        );
        foods.insert(
            6,
            vec![
                (FoodKind::Melon, 0.34),
                (FoodKind::Mushroom, 0.33),
                (FoodKind::Steak, 0.33),
            ],
        );

        Self { pets, foods }
    }

    fn pet_pool(&self, highest_tier: usize) -> (Vec<Species>, Vec<f32>) {
        let dilution = highest_tier as f32;
        let mut species = Vec::new();
        let mut weights = Vec::new();
        for tier in 1..=highest_tier as u8 {
            if let Some(table) = self.pets.get(&tier) {
                for &(s, w) in table {
                    species.push(s);
                    weights.push(w / dilution);
                }
            }
        }
        (species, weights)
    }

    fn food_pool(&self, highest_tier: usize) -> (Vec<FoodKind>, Vec<f32>) {
        let dilution = highest_tier as f32;
        let mut kinds = Vec::new();
        let mut weights = Vec::new();
        for tier in 1..=highest_tier as u8 {
            if let Some(table) = self.foods.get(&tier) {
                for &(k, w) in table {
                    kinds.push(k);
                    weights.push(w / dilution);
                }
            }
        }
        (kinds, weights)
    }
}

/// The shop for one game.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Shop {
    catalog: ShopCatalog,
    pet_slots: [ShopSlot; SHOP_PET_SLOTS],
    food_slots: [ShopSlot; SHOP_FOOD_SLOTS],
    active_pets: usize,
    active_foods: usize,
    highest_tier: usize,
    pet_attack_bonus: i32,
    pet_health_bonus: i32,
    attack_multiplier: i32,
    health_multiplier: i32,
}

impl Shop {
    #[must_use]
    pub fn new(catalog: ShopCatalog) -> Self {
        Self {
            catalog,
            pet_slots: Default::default(),
            food_slots: Default::default(),
            active_pets: step_value(PET_SLOT_SCHEDULE, 1),
            active_foods: step_value(FOOD_SLOT_SCHEDULE, 1),
            highest_tier: step_value(TIER_SCHEDULE, 1),
            pet_attack_bonus: 0,
            pet_health_bonus: 0,
            attack_multiplier: 1,
            health_multiplier: 1,
        }
    }

    /// Grow slots and unlock tiers for a new turn.
    ///
    /// The schedules are monotone, so a later turn never shrinks the shop.
    pub fn set_turn(&mut self, turn: u32) {
        self.active_pets = step_value(PET_SLOT_SCHEDULE, turn);
        self.active_foods = step_value(FOOD_SLOT_SCHEDULE, turn);
        self.highest_tier = step_value(TIER_SCHEDULE, turn);
    }

    /// Number of addressable slots right now.
    #[must_use]
    pub fn len(&self) -> usize {
        self.active_pets + self.active_foods
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn highest_tier(&self) -> usize {
        self.highest_tier
    }

    fn slot(&self, index: usize) -> &ShopSlot {
        assert!(index < self.len(), "shop index {index} out of range");
        if index < self.active_pets {
            &self.pet_slots[index]
        } else {
            &self.food_slots[index - self.active_pets]
        }
    }

    fn slot_mut(&mut self, index: usize) -> &mut ShopSlot {
        assert!(index < self.len(), "shop index {index} out of range");
        if index < self.active_pets {
            &mut self.pet_slots[index]
        } else {
            &mut self.food_slots[index - self.active_pets]
        }
    }

    #[must_use]
    pub fn item(&self, index: usize) -> Option<&ShopItem> {
        self.slot(index).item.as_ref()
    }

    #[must_use]
    pub fn is_frozen(&self, index: usize) -> bool {
        self.slot(index).frozen
    }

    /// Flip a slot's frozen flag. Freezing an empty slot is allowed and
    /// simply preserves the emptiness.
    pub fn toggle_freeze(&mut self, index: usize) {
        let slot = self.slot_mut(index);
        slot.frozen = !slot.frozen;
    }

    /// Remove and return the offer at `index`, clearing its freeze.
    pub fn take(&mut self, index: usize) -> Option<ShopItem> {
        let slot = self.slot_mut(index);
        slot.frozen = false;
        slot.item.take()
    }

    /// Refill every active, unfrozen slot.
    pub fn roll(&mut self, rng: &mut GameRng) {
        let (species, pet_weights) = self.catalog.pet_pool(self.highest_tier);
        for slot in self.pet_slots.iter_mut().take(self.active_pets) {
            if slot.frozen {
                continue;
            }
            slot.item = rng.choose_weighted(&pet_weights).map(|pick| {
                let s = species[pick];
                let (attack, health) = s.base_stats();
                ShopItem::Pet(ShopPet {
                    species: s,
                    attack: attack + self.pet_attack_bonus,
                    health: health + self.pet_health_bonus,
                })
            });
        }

        let (kinds, food_weights) = self.catalog.food_pool(self.highest_tier);
        for slot in self.food_slots.iter_mut().take(self.active_foods) {
            if slot.frozen {
                continue;
            }
            slot.item = rng
                .choose_weighted(&food_weights)
                .map(|pick| ShopItem::Food(kinds[pick]));
        }
    }

    /// Canned food: raise the standing pet stat bonuses and retrofit the
    /// offers currently on display.
    pub fn boost_future_pets(&mut self, attack: i32, health: i32) {
        self.pet_attack_bonus += attack;
        self.pet_health_bonus += health;
        for slot in self.pet_slots.iter_mut() {
            if let Some(ShopItem::Pet(pet)) = slot.item.as_mut() {
                pet.attack += attack;
                pet.health += health;
            }
        }
    }

    #[must_use]
    pub fn food_attack_multiplier(&self) -> i32 {
        self.attack_multiplier
    }

    #[must_use]
    pub fn food_health_multiplier(&self) -> i32 {
        self.health_multiplier
    }

    /// Raise both food multipliers to at least `value`.
    pub fn raise_food_multipliers(&mut self, value: i32) {
        self.attack_multiplier = self.attack_multiplier.max(value);
        self.health_multiplier = self.health_multiplier.max(value);
    }

    /// Drop both food multipliers back to the floor of 1.
    pub fn reset_food_multipliers(&mut self) {
        self.attack_multiplier = 1;
        self.health_multiplier = 1;
    }
}

impl fmt::Display for Shop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for index in 0..self.len() {
            if index > 0 {
                f.write_str(" | ")?;
            }
            write!(f, "{index}: ")?;
            match self.item(index) {
                Some(item) => write!(f, "{item}")?,
                None => f.write_str("-")?,
            }
            if self.is_frozen(index) {
                f.write_str(" *")?;
            }
        }
        Ok(())
    }
}
