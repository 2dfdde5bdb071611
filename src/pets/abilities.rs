//! Hook dispatch and species abilities.
//!
//! ## Hooks
//!
//! Every game event that pets can react to is a [`Hook`]. Hooks reach a pet
//! through [`fire_hook`]: during the shop phase the hook runs on the spot;
//! during a battle most hooks are captured into the side's
//! [`CastQueue`](crate::game::CastQueue) and executed when the battle loop
//! drains it. Capture is a per-species, per-hook property: faints and
//! summon reactions run immediately by default, everything else defers.
//!
//! ## Running a hook
//!
//! Executing a hook has two parts: the base behavior shared by all species
//! (purchase bookkeeping, battle buff folding, steak and bone attack
//! bonuses, the eat-food broadcast) and the species ability, a single match
//! on `(species, hook)`. Faints take a separate path because species that
//! react to their own faint need the slot recorded before the corpse is
//! removed, and summons must land back in that slot.
//!
//! Ability amounts scale with an *effective level*: normally the caster's
//! level, but a pet marked by a tiger repeats its ability at the tiger's
//! level, and level-up abilities run once per level gained.
//!
//! ## Scope
//!
//! [`HookScope`] bundles the mutable world a hook may touch: the caster's
//! deck, and whichever of the enemy deck, shop, and economy exist in the
//! current phase. [`HookScope::flip`] turns the scope around so an ability
//! can hurt the enemy line through the same helpers it uses on its own.

use crate::core::{GameRng, StatusEffect};
use crate::deck::Deck;
use crate::game::{CastQueue, Economy, QueuedCast};
use crate::shop::Shop;
use serde::{Deserialize, Serialize};

use super::{Pet, PetId, PetIdGen, Species};

/// Events a pet can react to.
///
/// Index payloads identify the slot of the pet the event is about, on the
/// reacting pet's own side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Hook {
    /// The pet was bought from the shop.
    Buy,
    /// The pet is being sold (still on the deck when this fires).
    Sell,
    /// The pet's health reached zero.
    Faint,
    /// A friend was bought and placed at `index`.
    FriendBought { index: usize },
    /// A friend was sold and removed.
    FriendSold,
    /// A friend appeared at `index`.
    FriendSummoned { index: usize },
    /// The friend at `index` fainted and was removed.
    FriendFaint { index: usize },
    /// The friend at `index` ate food.
    FriendEatFood { index: usize },
    /// The friend at `index` attacked.
    FriendAttack { index: usize },
    /// The pet ate food.
    EatFood,
    /// The pet reached a new level.
    LevelUp,
    /// A new shop turn began.
    TurnStart,
    /// The shop turn is ending, battle is next.
    TurnEnd,
    /// The battle is about to begin.
    BattleStart,
    /// The battle ended (fires on the persistent deck).
    BattleEnd,
    /// The pet is at the front and about to attack.
    BeforeAttack,
    /// The pet lost health but survived.
    Hurt,
    /// The enemy front slot was knocked empty this round.
    KnockOut,
}

/// Everything a hook may mutate, borrowed for one dispatch.
///
/// Shop-phase scopes carry the shop and economy; battle scopes carry the
/// enemy deck and both cast queues. Summons draw ids from `ids`.
pub(crate) struct HookScope<'a> {
    pub friends: &'a mut Deck,
    pub enemies: Option<&'a mut Deck>,
    pub shop: Option<&'a mut Shop>,
    pub econ: Option<&'a mut Economy>,
    pub ids: &'a mut PetIdGen,
    pub queue: &'a mut CastQueue,
    pub enemy_queue: Option<&'a mut CastQueue>,
    pub rng: &'a mut GameRng,
}

impl HookScope<'_> {
    /// The same battle seen from the other side.
    ///
    /// Returns `None` outside a battle. The flipped scope has no shop or
    /// economy; enemy-side effects never touch the caster's gold.
    pub(crate) fn flip(&mut self) -> Option<HookScope<'_>> {
        let HookScope {
            friends,
            enemies,
            ids,
            queue,
            enemy_queue,
            rng,
            ..
        } = self;
        let enemy_deck = enemies.as_deref_mut()?;
        let enemy_queue = enemy_queue.as_deref_mut()?;
        Some(HookScope {
            friends: enemy_deck,
            enemies: Some(&mut **friends),
            shop: None,
            econ: None,
            ids: &mut **ids,
            queue: enemy_queue,
            enemy_queue: Some(&mut **queue),
            rng: &mut **rng,
        })
    }
}

/// Whether this species defers this hook to the cast queue in battle.
fn is_captured(species: Species, hook: Hook) -> bool {
    match (species, hook) {
        (Species::Ant | Species::Cricket, Hook::Faint) => true,
        (Species::Horse, Hook::FriendSummoned { .. }) => true,
        (Species::Tiger, Hook::BattleStart) => false,
        (Species::Worm, Hook::EatFood) => false,
        (_, Hook::Faint | Hook::FriendSummoned { .. }) => false,
        _ => true,
    }
}

/// Whether a tiger mark repeats this species' ability on this hook.
fn is_duplicable(species: Species, hook: Hook) -> bool {
    matches!(
        (species, hook),
        (Species::Peacock, Hook::Hurt)
            | (Species::Kangaroo, Hook::FriendAttack { .. })
            | (Species::Ox, Hook::FriendFaint { .. })
            | (Species::Sheep, Hook::Faint)
    )
}

/// Deliver a hook to a pet, deferring it in battle where the species
/// captures it.
///
/// A hook aimed at a pet that has left the deck is dropped.
pub(crate) fn fire_hook(scope: &mut HookScope<'_>, caster: PetId, hook: Hook) {
    let Some(slot) = scope.friends.position_of(caster) else {
        return;
    };
    let pet = scope.friends.get(slot).expect("slot just resolved");
    if pet.in_battle() && is_captured(pet.species(), hook) {
        scope.queue.push(QueuedCast {
            caster,
            hook,
            attack_hint: pet.effective_attack(),
        });
        return;
    }
    run_hook(scope, caster, hook);
}

/// Execute a hook now: base behavior, then the species ability, then the
/// tiger-marked repeat where it applies.
pub(crate) fn run_hook(scope: &mut HookScope<'_>, caster: PetId, hook: Hook) {
    if matches!(hook, Hook::Faint) {
        run_faint(scope, caster);
        return;
    }
    let Some(slot) = scope.friends.position_of(caster) else {
        return;
    };
    let pet = scope.friends.get(slot).expect("slot just resolved");
    let species = pet.species();
    let level = pet.level();
    let dup = pet.duplicate_as();
    let in_battle = pet.in_battle();

    run_base(scope, caster, hook);
    run_ability(scope, caster, hook, level);
    if in_battle && dup > 0 && is_duplicable(species, hook) {
        run_ability(scope, caster, hook, dup);
    }
}

/// Execute a hook at an explicit effective level.
///
/// Level-up hooks use this so a cascade fires once per level reached,
/// with the ability scaled to each level in turn.
pub(crate) fn run_hook_at_level(scope: &mut HookScope<'_>, caster: PetId, hook: Hook, level: u8) {
    debug_assert!(!matches!(hook, Hook::Faint));
    if scope.friends.position_of(caster).is_none() {
        return;
    }
    run_base(scope, caster, hook);
    run_ability(scope, caster, hook, level);
}

/// Base behavior shared by every species.
fn run_base(scope: &mut HookScope<'_>, caster: PetId, hook: Hook) {
    let Some(slot) = scope.friends.position_of(caster) else {
        return;
    };
    match hook {
        Hook::Buy => {
            if let Some(pet) = scope.friends.get_mut(slot) {
                pet.mark_bought();
            }
        }
        Hook::LevelUp => {
            if let Some(pet) = scope.friends.get_mut(slot) {
                pet.raise_resale();
            }
        }
        Hook::EatFood => {
            // Everyone, including the eater, hears about the meal.
            let diners: Vec<PetId> = scope.friends.iter().map(|(_, p)| p.id()).collect();
            for id in diners {
                fire_hook(scope, id, Hook::FriendEatFood { index: slot });
            }
        }
        Hook::BattleStart => {
            if let Some(pet) = scope.friends.get_mut(slot) {
                pet.fold_battle_buffs();
            }
        }
        Hook::BattleEnd => {
            if let Some(pet) = scope.friends.get_mut(slot) {
                pet.clear_battle_buffs();
            }
        }
        Hook::BeforeAttack => {
            if let Some(pet) = scope.friends.get_mut(slot) {
                match pet.effect() {
                    Some(StatusEffect::SteakAttack) => {
                        pet.add_attack(20);
                        pet.set_effect(None);
                    }
                    Some(StatusEffect::BoneAttack) => {
                        pet.add_attack(5);
                    }
                    _ => {}
                }
            }
        }
        _ => {}
    }
}

/// The species ability for a non-faint hook, at the given effective level.
fn run_ability(scope: &mut HookScope<'_>, caster: PetId, hook: Hook, level: u8) {
    let Some(slot) = scope.friends.position_of(caster) else {
        return;
    };
    let species = scope.friends.get(slot).expect("slot just resolved").species();
    let l = i32::from(level);

    match (species, hook) {
        (Species::Beaver, Hook::Sell) => {
            let targets = others_excluding(scope.friends, slot);
            for &pick in &pick_random(scope.rng, &targets, 2) {
                buff(scope.friends, pick, 0, l);
            }
        }
        (Species::Fish, Hook::LevelUp) => {
            for target in others_excluding(scope.friends, slot) {
                buff(scope.friends, target, l, l);
            }
        }
        (Species::Horse, Hook::FriendSummoned { index }) => {
            if index != slot {
                if let Some(pet) = scope.friends.get_mut(index) {
                    pet.add_attack_buff(1);
                }
            }
        }
        (Species::Mosquito, Hook::BattleStart) => {
            let targets = match scope.enemies.as_deref() {
                Some(enemy) => enemy.occupied_slots(),
                None => return,
            };
            let picks = pick_random(scope.rng, &targets, level as usize);
            if let Some(mut enemy) = scope.flip() {
                for &target in &picks {
                    deal_damage(&mut enemy, target, l);
                }
            }
        }
        (Species::Otter, Hook::Buy) => {
            let targets = others_excluding(scope.friends, slot);
            for &pick in &pick_random(scope.rng, &targets, 1) {
                buff(scope.friends, pick, l, l);
            }
        }
        (Species::Pig, Hook::Sell) | (Species::Swan, Hook::TurnStart) => {
            if let Some(econ) = scope.econ.as_deref_mut() {
                econ.add_gold(level as u32);
            }
        }
        (Species::Peacock, Hook::Hurt) => {
            buff(scope.friends, slot, 2 * l, 0);
        }
        (Species::Shrimp, Hook::FriendSold) => {
            let targets = others_excluding(scope.friends, slot);
            for &pick in &pick_random(scope.rng, &targets, 1) {
                buff(scope.friends, pick, 0, l);
            }
        }
        (Species::Giraffe, Hook::TurnEnd) => {
            let ahead: Vec<usize> = (0..slot)
                .rev()
                .filter(|&i| scope.friends.get(i).is_some())
                .take(level as usize)
                .collect();
            for target in ahead {
                buff(scope.friends, target, 1, 1);
            }
        }
        (Species::Kangaroo, Hook::FriendAttack { index }) => {
            if directly_behind(scope.friends, slot, index) {
                buff(scope.friends, slot, 2 * l, 2 * l);
            }
        }
        (Species::Ox, Hook::FriendFaint { index }) => {
            if directly_behind(scope.friends, slot, index) {
                if let Some(pet) = scope.friends.get_mut(slot) {
                    pet.set_effect(Some(StatusEffect::MelonArmor));
                    pet.add_attack(2 * l);
                }
            }
        }
        (Species::Rabbit, Hook::FriendEatFood { index }) => {
            buff(scope.friends, index, 0, l);
        }
        (Species::Hippo, Hook::KnockOut) => {
            buff(scope.friends, slot, 2 * l, 2 * l);
        }
        (Species::Worm, Hook::EatFood) => {
            buff(scope.friends, slot, l, l);
        }
        (Species::Rhino, Hook::KnockOut) => {
            let target = scope.enemies.as_deref().and_then(Deck::front);
            if let (Some(target), Some(mut enemy)) = (target, scope.flip()) {
                deal_damage(&mut enemy, target, 4 * l);
            }
        }
        (Species::Shark, Hook::FriendFaint { .. }) => {
            buff(scope.friends, slot, l, 2 * l);
        }
        (Species::Boar, Hook::BeforeAttack) => {
            buff(scope.friends, slot, 2 * l, 2 * l);
        }
        (Species::Cat, Hook::Buy | Hook::LevelUp) => {
            if let Some(shop) = scope.shop.as_deref_mut() {
                shop.raise_food_multipliers(l + 1);
            }
        }
        (Species::Cat, Hook::Sell) => {
            // Recompute from the cats staying behind.
            if let Some(shop) = scope.shop.as_deref_mut() {
                shop.reset_food_multipliers();
                let remaining: Vec<i32> = scope
                    .friends
                    .iter()
                    .filter(|&(i, p)| i != slot && p.species() == Species::Cat)
                    .map(|(_, p)| i32::from(p.level()) + 1)
                    .collect();
                for value in remaining {
                    shop.raise_food_multipliers(value);
                }
            }
        }
        (Species::Tiger, Hook::BattleStart) => {
            if let Some(target) = (0..slot).rev().find(|&i| scope.friends.get(i).is_some()) {
                if let Some(pet) = scope.friends.get_mut(target) {
                    pet.set_duplicate_as(level);
                }
            }
        }
        _ => {}
    }
}

/// Faint resolution: remove the corpse, notify survivors, resolve death
/// riders, then the species' own faint ability at the recorded slot.
fn run_faint(scope: &mut HookScope<'_>, caster: PetId) {
    let Some(slot) = scope.friends.position_of(caster) else {
        return;
    };
    let pet = scope.friends.get(slot).expect("slot just resolved");
    let species = pet.species();
    let level = pet.level();
    let dup = pet.duplicate_as();
    let in_battle = pet.in_battle();
    let l = i32::from(level);

    let Some(vacated) = base_faint(scope, caster) else {
        return;
    };

    match species {
        Species::Ant => {
            let targets = scope.friends.occupied_slots();
            for &pick in &pick_random(scope.rng, &targets, 1) {
                buff(scope.friends, pick, 2 * l, l);
            }
        }
        Species::Cricket => {
            let mut zombie =
                Pet::with_stats(scope.ids.next_id(), Species::ZombieCricket, l, l);
            zombie.set_in_battle(in_battle);
            summon_at(scope, vacated, zombie);
        }
        Species::Sheep => {
            summon_rams(scope, vacated, i32::from(level), in_battle);
            if in_battle && dup > 0 {
                summon_rams(scope, vacated, i32::from(dup), in_battle);
            }
        }
        Species::Cat => {
            // Shop-phase faint (sleeping pill); the bonus it backed is gone.
            if let Some(shop) = scope.shop.as_deref_mut() {
                shop.reset_food_multipliers();
                let remaining: Vec<i32> = scope
                    .friends
                    .iter()
                    .filter(|&(_, p)| p.species() == Species::Cat)
                    .map(|(_, p)| i32::from(p.level()) + 1)
                    .collect();
                for value in remaining {
                    shop.raise_food_multipliers(value);
                }
            }
        }
        _ => {}
    }
}

/// Shared faint base: remove, broadcast, then honey bee or extra life.
///
/// Returns the vacated slot so faint abilities can summon back into it.
fn base_faint(scope: &mut HookScope<'_>, caster: PetId) -> Option<usize> {
    let slot = scope.friends.position_of(caster)?;
    let corpse = scope.friends.take(slot).expect("slot just resolved");

    let survivors: Vec<PetId> = scope.friends.iter().map(|(_, p)| p.id()).collect();
    for id in survivors {
        fire_hook(scope, id, Hook::FriendFaint { index: slot });
    }

    match corpse.effect() {
        Some(StatusEffect::HoneyBee) => {
            let mut bee = Pet::with_stats(scope.ids.next_id(), Species::HoneyBee, 1, 1);
            bee.set_in_battle(corpse.in_battle());
            summon_at(scope, slot, bee);
        }
        Some(StatusEffect::ExtraLife) => {
            let mut revived = Pet::with_stats(scope.ids.next_id(), corpse.species(), 1, 1);
            revived.set_in_battle(corpse.in_battle());
            summon_at(scope, slot, revived);
        }
        _ => {}
    }
    Some(slot)
}

fn summon_rams(scope: &mut HookScope<'_>, slot: usize, l: i32, in_battle: bool) {
    for _ in 0..2 {
        let mut ram = Pet::with_stats(scope.ids.next_id(), Species::Ram, 2 * l, 2 * l);
        ram.set_in_battle(in_battle);
        summon_at(scope, slot, ram);
    }
}

/// Insert a summoned pet and notify the rest of the line.
///
/// A full deck swallows the summon.
pub(crate) fn summon_at(scope: &mut HookScope<'_>, slot: usize, pet: Pet) {
    let id = pet.id();
    if scope.friends.insert(slot, pet).is_err() {
        return;
    }
    let others: Vec<PetId> = scope
        .friends
        .iter()
        .filter(|&(_, p)| p.id() != id)
        .map(|(_, p)| p.id())
        .collect();
    for other in others {
        fire_hook(scope, other, Hook::FriendSummoned { index: slot });
    }
}

/// Lower a pet's health through its shields and fire the outcome hook.
pub(crate) fn deal_damage(scope: &mut HookScope<'_>, slot: usize, amount: i32) {
    use crate::pets::HealthOutcome;
    let Some(pet) = scope.friends.get_mut(slot) else {
        return;
    };
    let id = pet.id();
    match pet.add_health(-amount) {
        HealthOutcome::Hurt => fire_hook(scope, id, Hook::Hurt),
        HealthOutcome::Fainted => fire_hook(scope, id, Hook::Faint),
        HealthOutcome::Unchanged => {}
    }
}

/// Kill a pet outright, bypassing shields, and fire its faint hook once.
pub(crate) fn force_faint_at(scope: &mut HookScope<'_>, slot: usize) {
    let Some(pet) = scope.friends.get_mut(slot) else {
        return;
    };
    let id = pet.id();
    if pet.force_faint() {
        fire_hook(scope, id, Hook::Faint);
    }
}

fn buff(deck: &mut Deck, slot: usize, attack: i32, health: i32) {
    if let Some(pet) = deck.get_mut(slot) {
        pet.add_attack(attack);
        let _ = pet.add_health(health);
    }
}

fn others_excluding(deck: &Deck, slot: usize) -> Vec<usize> {
    deck.occupied_slots()
        .into_iter()
        .filter(|&i| i != slot)
        .collect()
}

fn pick_random(rng: &mut GameRng, targets: &[usize], count: usize) -> Vec<usize> {
    rng.sample_distinct(count, targets.len())
        .into_iter()
        .map(|i| targets[i])
        .collect()
}

/// True when `index` is the nearest occupied slot ahead of `own`.
///
/// Used by abilities that react only to the friend standing directly in
/// front of them.
fn directly_behind(deck: &Deck, own: usize, index: usize) -> bool {
    index < own && ((index + 1)..own).all(|i| deck.get(i).is_none())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope<'a>(
        deck: &'a mut Deck,
        ids: &'a mut PetIdGen,
        queue: &'a mut CastQueue,
        rng: &'a mut GameRng,
    ) -> HookScope<'a> {
        HookScope {
            friends: deck,
            enemies: None,
            shop: None,
            econ: None,
            ids,
            queue,
            enemy_queue: None,
            rng,
        }
    }

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
                rng: GameRng::new(7),
            }
        }

        fn spawn(&mut self, slot: usize, species: Species) -> PetId {
            let pet = Pet::new(self.ids.next_id(), species);
            let id = pet.id();
            self.deck.put(slot, pet);
            id
        }
    }

    #[test]
    fn test_ant_faint_buffs_a_survivor() {
        let mut w = World::new();
        let ant = w.spawn(0, Species::Ant);
        w.spawn(1, Species::Fish); // 2/3
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 0);
        assert!(w.deck.position_of(ant).is_none());
        let fish = w.deck.get(1).unwrap();
        assert_eq!(fish.attack(), 4);
        assert_eq!(fish.health(), 4);
    }

    #[test]
    fn test_cricket_leaves_a_zombie() {
        let mut w = World::new();
        w.spawn(1, Species::Cricket);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 1);
        let zombie = w.deck.get(1).unwrap();
        assert_eq!(zombie.species(), Species::ZombieCricket);
        assert_eq!(zombie.attack(), 1);
        assert_eq!(zombie.health(), 1);
    }

    #[test]
    fn test_sheep_faint_summons_two_rams() {
        let mut w = World::new();
        let sheep = Pet::new(w.ids.next_id(), Species::Sheep).at_level(2);
        let sheep_id = sheep.id();
        w.deck.put(2, sheep);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 2);
        assert!(w.deck.position_of(sheep_id).is_none());
        let rams: Vec<_> = w
            .deck
            .iter()
            .filter(|(_, p)| p.species() == Species::Ram)
            .collect();
        assert_eq!(rams.len(), 2);
        for (_, ram) in rams {
            assert_eq!(ram.attack(), 4);
            assert_eq!(ram.health(), 4);
        }
    }

    #[test]
    fn test_honey_bee_rider_summons_in_place() {
        let mut w = World::new();
        let fish = w.spawn(1, Species::Fish);
        w.deck
            .get_mut(1)
            .unwrap()
            .set_effect(Some(StatusEffect::HoneyBee));
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 1);
        assert!(w.deck.position_of(fish).is_none());
        assert_eq!(w.deck.get(1).unwrap().species(), Species::HoneyBee);
    }

    #[test]
    fn test_extra_life_revives_fresh() {
        let mut w = World::new();
        w.spawn(0, Species::Hippo); // 4/7
        w.deck
            .get_mut(0)
            .unwrap()
            .set_effect(Some(StatusEffect::ExtraLife));
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 0);
        let revived = w.deck.get(0).unwrap();
        assert_eq!(revived.species(), Species::Hippo);
        assert_eq!(revived.attack(), 1);
        assert_eq!(revived.health(), 1);
        assert_eq!(revived.level(), 1);
    }

    #[test]
    fn test_horse_buffs_summoned_friend() {
        let mut w = World::new();
        w.spawn(0, Species::Horse);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        let pet = Pet::new(s.ids.next_id(), Species::Cricket);
        summon_at(&mut s, 2, pet);
        let summoned = w.deck.get(2).unwrap();
        assert_eq!(summoned.attack_buff(), 1);
        // The horse itself is untouched
        assert_eq!(w.deck.get(0).unwrap().attack_buff(), 0);
    }

    #[test]
    fn test_peacock_gains_attack_when_hurt() {
        let mut w = World::new();
        w.spawn(0, Species::Peacock); // 1/5
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        deal_damage(&mut s, 0, 2);
        let peacock = w.deck.get(0).unwrap();
        assert_eq!(peacock.health(), 3);
        assert_eq!(peacock.attack(), 3);
    }

    #[test]
    fn test_battle_hooks_are_deferred() {
        let mut w = World::new();
        w.spawn(0, Species::Peacock);
        w.deck.get_mut(0).unwrap().set_in_battle(true);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        deal_damage(&mut s, 0, 2);
        // Ability has not run yet
        assert_eq!(w.deck.get(0).unwrap().attack(), 1);
        assert_eq!(w.queue.len(), 1);
    }

    #[test]
    fn test_faint_runs_immediately_even_in_battle() {
        let mut w = World::new();
        let fish = w.spawn(0, Species::Fish);
        w.deck.get_mut(0).unwrap().set_in_battle(true);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        deal_damage(&mut s, 0, 10);
        assert!(w.deck.position_of(fish).is_none());
        assert!(w.queue.is_empty());
    }

    #[test]
    fn test_ant_faint_is_deferred_in_battle() {
        let mut w = World::new();
        let ant = w.spawn(0, Species::Ant);
        w.deck.get_mut(0).unwrap().set_in_battle(true);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        deal_damage(&mut s, 0, 10);
        // Corpse stays until the queue drains
        assert_eq!(w.deck.position_of(ant), Some(0));
        assert_eq!(w.queue.len(), 1);

        let batch = w.queue.drain();
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        for cast in batch {
            run_hook(&mut s, cast.caster, cast.hook);
        }
        assert!(w.deck.position_of(ant).is_none());
    }

    #[test]
    fn test_kangaroo_gate() {
        let mut w = World::new();
        let roo = w.spawn(2, Species::Kangaroo); // 1/2
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        // Attack from directly ahead triggers
        fire_hook(&mut s, roo, Hook::FriendAttack { index: 0 });
        let pet = w.deck.get(2).unwrap();
        assert_eq!(pet.attack(), 3);
        assert_eq!(pet.health(), 4);

        // A pet standing between blocks the trigger
        w.spawn(1, Species::Sloth);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        fire_hook(&mut s, roo, Hook::FriendAttack { index: 0 });
        assert_eq!(w.deck.get(2).unwrap().attack(), 3);
    }

    #[test]
    fn test_ox_gains_melon_when_friend_ahead_faints() {
        let mut w = World::new();
        w.spawn(0, Species::Sloth);
        let ox = w.spawn(1, Species::Ox);
        assert_eq!(ox, w.deck.get(1).unwrap().id());
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        force_faint_at(&mut s, 0);
        let ox = w.deck.get(1).unwrap();
        assert_eq!(ox.effect(), Some(StatusEffect::MelonArmor));
        assert_eq!(ox.attack(), 3);
    }

    #[test]
    fn test_giraffe_buffs_friends_ahead() {
        let mut w = World::new();
        w.spawn(0, Species::Fish); // 2/3
        w.spawn(1, Species::Sloth); // 1/1
        let giraffe = w.spawn(2, Species::Giraffe);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        fire_hook(&mut s, giraffe, Hook::TurnEnd);
        // Level 1: only the nearest friend ahead
        assert_eq!(w.deck.get(1).unwrap().attack(), 2);
        assert_eq!(w.deck.get(0).unwrap().attack(), 2);
    }

    #[test]
    fn test_worm_grows_on_eating() {
        let mut w = World::new();
        let worm = w.spawn(0, Species::Worm); // 2/2
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        fire_hook(&mut s, worm, Hook::EatFood);
        let pet = w.deck.get(0).unwrap();
        assert_eq!(pet.attack(), 3);
        assert_eq!(pet.health(), 3);
    }

    #[test]
    fn test_rabbit_tops_up_the_eater() {
        let mut w = World::new();
        let fish = w.spawn(0, Species::Fish); // 2/3
        w.spawn(1, Species::Rabbit);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        fire_hook(&mut s, fish, Hook::EatFood);
        assert_eq!(w.deck.get(0).unwrap().health(), 4);
    }

    #[test]
    fn test_tiger_marks_the_friend_ahead() {
        let mut w = World::new();
        w.spawn(0, Species::Peacock);
        let pet = Pet::new(w.ids.next_id(), Species::Tiger).at_level(2);
        let tiger = pet.id();
        w.deck.put(1, pet);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        fire_hook(&mut s, tiger, Hook::BattleStart);
        assert_eq!(w.deck.get(0).unwrap().duplicate_as(), 2);
        // The tiger never marks itself
        assert_eq!(w.deck.get(1).unwrap().duplicate_as(), 0);
    }

    #[test]
    fn test_marked_peacock_casts_twice() {
        let mut w = World::new();
        w.spawn(0, Species::Peacock);
        {
            let pet = w.deck.get_mut(0).unwrap();
            pet.set_in_battle(true);
            pet.set_duplicate_as(3);
        }
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);

        deal_damage(&mut s, 0, 1);
        let batch = w.queue.drain();
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        for cast in batch {
            run_hook(&mut s, cast.caster, cast.hook);
        }
        // +2 at own level 1, then +6 at the marked level 3
        assert_eq!(w.deck.get(0).unwrap().attack(), 9);
    }

    #[test]
    fn test_steak_consumed_bone_persists() {
        let mut w = World::new();
        let boar = w.spawn(0, Species::Sloth);
        w.deck
            .get_mut(0)
            .unwrap()
            .set_effect(Some(StatusEffect::SteakAttack));
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        run_hook(&mut s, boar, Hook::BeforeAttack);
        let pet = w.deck.get(0).unwrap();
        assert_eq!(pet.attack(), 21);
        assert_eq!(pet.effect(), None);

        w.deck
            .get_mut(0)
            .unwrap()
            .set_effect(Some(StatusEffect::BoneAttack));
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        run_hook(&mut s, boar, Hook::BeforeAttack);
        let pet = w.deck.get(0).unwrap();
        assert_eq!(pet.attack(), 26);
        assert_eq!(pet.effect(), Some(StatusEffect::BoneAttack));
    }

    #[test]
    fn test_hook_for_departed_pet_is_dropped() {
        let mut w = World::new();
        let ghost = w.spawn(0, Species::Fish);
        let _ = w.deck.take(0);
        let mut s = scope(&mut w.deck, &mut w.ids, &mut w.queue, &mut w.rng);
        fire_hook(&mut s, ghost, Hook::Hurt);
        assert!(w.queue.is_empty());
    }
}
