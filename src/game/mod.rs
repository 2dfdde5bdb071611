//! One player's game: deck, shop, economy, and the shop-phase operations.
//!
//! ## Operations
//!
//! [`Game`] exposes the player-facing moves: [`roll`](Game::roll),
//! [`freeze`](Game::freeze), [`buy`](Game::buy), [`sell`](Game::sell),
//! [`swap`](Game::swap), [`merge`](Game::merge), and
//! [`challenge`](Game::challenge) (in [`battle`]). Each returns whether
//! the move took effect; a finished game ignores every move. Out-of-range
//! slot indices are caller bugs and panic.
//!
//! Every operation attempt counts toward `actions_taken`, including the
//! free roll a game performs on construction, so a fresh game reports one
//! action already taken.
//!
//! ## Gold
//!
//! Gold resets to 10 each turn, floors at zero, and has no upper cap, so
//! gold-granting abilities stack above the turn allowance.

pub mod battle;
pub mod queue;

pub use queue::{CastQueue, QueuedCast};

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::core::{GameRng, MatchResult};
use crate::deck::{Deck, DECK_SLOTS};
use crate::foods;
use crate::pets::abilities::{self, HookScope};
use crate::pets::{Hook, Pet, PetIdGen, Species};
use crate::shop::{Shop, ShopCatalog, ShopItem};

/// Gold granted at the start of every turn.
pub const GOLD_PER_TURN: u32 = 10;
/// Cost of re-rolling the shop.
pub const ROLL_COST: u32 = 1;
/// Lives a game starts with; losing them all ends the game.
pub const STARTING_LIVES: u32 = 10;
/// Trophies needed to win.
pub const TROPHIES_TO_WIN: u32 = 10;

/// Gold, lives, trophies, and the running match record.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Economy {
    turn: u32,
    gold: u32,
    lives: u32,
    trophies: u32,
    actions_taken: u64,
    match_history: Vec<MatchResult>,
}

impl Economy {
    #[must_use]
    pub fn new() -> Self {
        Self {
            turn: 1,
            gold: GOLD_PER_TURN,
            lives: STARTING_LIVES,
            trophies: 0,
            actions_taken: 0,
            match_history: Vec::new(),
        }
    }

    #[must_use]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    #[must_use]
    pub fn gold(&self) -> u32 {
        self.gold
    }

    #[must_use]
    pub fn lives(&self) -> u32 {
        self.lives
    }

    #[must_use]
    pub fn trophies(&self) -> u32 {
        self.trophies
    }

    #[must_use]
    pub fn actions_taken(&self) -> u64 {
        self.actions_taken
    }

    #[must_use]
    pub fn match_history(&self) -> &[MatchResult] {
        &self.match_history
    }

    pub fn add_gold(&mut self, amount: u32) {
        self.gold += amount;
    }

    /// Debit `cost` if affordable; gold never goes below zero.
    pub fn try_spend(&mut self, cost: u32) -> bool {
        if self.gold < cost {
            return false;
        }
        self.gold -= cost;
        true
    }

    /// Append a battle result and settle trophies or lives.
    pub fn record_result(&mut self, result: MatchResult) {
        self.match_history.push(result);
        match result {
            MatchResult::Won => self.trophies += 1,
            MatchResult::Lost => self.lives = self.lives.saturating_sub(1),
            MatchResult::Draw => {}
        }
    }

    pub fn note_action(&mut self) {
        self.actions_taken += 1;
    }

    /// Advance the turn counter and reset the gold allowance.
    pub fn next_turn(&mut self) {
        self.turn += 1;
        self.gold = GOLD_PER_TURN;
    }

    #[must_use]
    pub fn has_won(&self) -> bool {
        self.trophies >= TROPHIES_TO_WIN
    }

    #[must_use]
    pub fn has_lost(&self) -> bool {
        self.lives == 0
    }

    #[must_use]
    pub fn game_over(&self) -> bool {
        self.has_won() || self.has_lost()
    }
}

impl Default for Economy {
    fn default() -> Self {
        Self::new()
    }
}

/// A source and destination deck slot, accepted as a tuple or array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct SlotPair {
    pub src: usize,
    pub dst: usize,
}

impl From<(usize, usize)> for SlotPair {
    fn from((src, dst): (usize, usize)) -> Self {
        Self { src, dst }
    }
}

impl From<[usize; 2]> for SlotPair {
    fn from([src, dst]: [usize; 2]) -> Self {
        Self { src, dst }
    }
}

/// How a pet landed on the deck.
enum PlaceOutcome {
    /// Took an empty slot.
    Placed,
    /// Absorbed into the occupant; carries the levels reached.
    Merged(smallvec::SmallVec<[u8; 2]>),
    /// No room and no merge partner; the pet comes back.
    Rejected(Pet),
}

/// One player's full game state.
#[derive(Debug)]
pub struct Game {
    deck: Deck,
    shop: Shop,
    econ: Economy,
    queue: CastQueue,
    ids: PetIdGen,
    rng: GameRng,
}

impl Game {
    /// A fresh game with the standard catalog and a stocked shop.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self::with_catalog(seed, ShopCatalog::standard())
    }

    #[must_use]
    pub fn with_catalog(seed: u64, catalog: ShopCatalog) -> Self {
        let mut game = Self {
            deck: Deck::new(),
            shop: Shop::new(catalog),
            econ: Economy::new(),
            queue: CastQueue::new(),
            ids: PetIdGen::new(),
            rng: GameRng::new(seed),
        };
        // The opening stock is free but still counts as an action.
        game.shop.roll(&mut game.rng);
        game.econ.note_action();
        game
    }

    #[must_use]
    pub fn builder() -> GameBuilder {
        GameBuilder::new()
    }

    #[must_use]
    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    #[must_use]
    pub fn shop(&self) -> &Shop {
        &self.shop
    }

    #[must_use]
    pub fn economy(&self) -> &Economy {
        &self.econ
    }

    fn finished(&self) -> bool {
        if self.econ.game_over() {
            log::info!(
                "game is over ({}); move ignored",
                if self.econ.has_won() { "won" } else { "lost" }
            );
            return true;
        }
        false
    }

    fn scope(&mut self) -> HookScope<'_> {
        HookScope {
            friends: &mut self.deck,
            enemies: None,
            shop: Some(&mut self.shop),
            econ: Some(&mut self.econ),
            ids: &mut self.ids,
            queue: &mut self.queue,
            enemy_queue: None,
            rng: &mut self.rng,
        }
    }

    /// Re-stock the shop for one gold.
    pub fn roll(&mut self) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        if !self.econ.try_spend(ROLL_COST) {
            return false;
        }
        self.shop.roll(&mut self.rng);
        true
    }

    /// Flip the freeze on a shop slot.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not an active shop slot.
    pub fn freeze(&mut self, index: usize) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        self.shop.toggle_freeze(index);
        true
    }

    /// Buy the shop offer at `index`.
    ///
    /// Pets land at deck slot `target`, merging into a same-species
    /// occupant that can still level. Foods are consumed on the pet at
    /// `target`, except canned food, which upgrades the shop itself and
    /// ignores `target`. Fails without spending when the offer is missing,
    /// unaffordable, or its target is unusable.
    ///
    /// # Panics
    ///
    /// Panics if `index` is not an active shop slot or `target` is not a
    /// deck slot.
    pub fn buy(&mut self, index: usize, target: usize) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        assert!(target < DECK_SLOTS, "deck slot {target} out of range");
        let Some(item) = self.shop.item(index).copied() else {
            return false;
        };
        if self.econ.gold() < item.gold_cost() {
            return false;
        }

        match item {
            ShopItem::Pet(offer) => {
                let pet = Pet::with_stats(
                    self.ids.next_id(),
                    offer.species,
                    offer.attack,
                    offer.health,
                );
                let id = pet.id();
                match self.place_pet(target, pet) {
                    PlaceOutcome::Rejected(_) => false,
                    PlaceOutcome::Placed => {
                        let _ = self.shop.take(index);
                        let spent = self.econ.try_spend(item.gold_cost());
                        debug_assert!(spent);
                        let others = self.deck_ids_except(id);
                        let mut scope = self.scope();
                        for other in &others {
                            abilities::fire_hook(
                                &mut scope,
                                *other,
                                Hook::FriendSummoned { index: target },
                            );
                        }
                        abilities::fire_hook(&mut scope, id, Hook::Buy);
                        for other in others {
                            abilities::fire_hook(
                                &mut scope,
                                other,
                                Hook::FriendBought { index: target },
                            );
                        }
                        true
                    }
                    PlaceOutcome::Merged(reached) => {
                        let _ = self.shop.take(index);
                        let spent = self.econ.try_spend(item.gold_cost());
                        debug_assert!(spent);
                        let merged = self
                            .deck
                            .get(target)
                            .expect("merge keeps the slot occupied")
                            .id();
                        let others = self.deck_ids_except(merged);
                        let mut scope = self.scope();
                        for level in reached {
                            abilities::run_hook_at_level(&mut scope, merged, Hook::LevelUp, level);
                        }
                        abilities::fire_hook(&mut scope, merged, Hook::Buy);
                        for other in others {
                            abilities::fire_hook(
                                &mut scope,
                                other,
                                Hook::FriendBought { index: target },
                            );
                        }
                        true
                    }
                }
            }
            ShopItem::Food(kind) if kind.targets_shop() => {
                let _ = self.shop.take(index);
                let spent = self.econ.try_spend(item.gold_cost());
                debug_assert!(spent);
                self.shop.boost_future_pets(2, 2);
                true
            }
            ShopItem::Food(kind) => {
                if self.deck.get(target).is_none() {
                    return false;
                }
                let _ = self.shop.take(index);
                let spent = self.econ.try_spend(item.gold_cost());
                debug_assert!(spent);
                let mut scope = self.scope();
                let fed = foods::apply_food(&mut scope, target, kind);
                debug_assert!(fed);
                true
            }
        }
    }

    /// Sell the pet at `slot` for its resale value.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is not a deck slot.
    pub fn sell(&mut self, slot: usize) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        let Some(pet) = self.deck.get(slot) else {
            return false;
        };
        let id = pet.id();
        self.econ.add_gold(pet.resale_value());

        // The seller hears about its own sale while still on the deck.
        let mut scope = self.scope();
        abilities::fire_hook(&mut scope, id, Hook::Sell);

        let _ = self.deck.take(slot);
        let survivors: Vec<_> = self.deck.iter().map(|(_, p)| p.id()).collect();
        let mut scope = self.scope();
        for survivor in survivors {
            abilities::fire_hook(&mut scope, survivor, Hook::FriendSold);
        }
        true
    }

    /// Exchange two deck slots without firing any hooks.
    ///
    /// # Panics
    ///
    /// Panics if either slot is not a deck slot.
    pub fn swap(&mut self, pair: impl Into<SlotPair>) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        let SlotPair { src, dst } = pair.into();
        self.deck.swap(src, dst);
        true
    }

    /// Move the pet at `src` onto `dst`, merging into a same-species
    /// occupant that can still level.
    ///
    /// # Panics
    ///
    /// Panics if either slot is not a deck slot.
    pub fn merge(&mut self, pair: impl Into<SlotPair>) -> bool {
        if self.finished() {
            return false;
        }
        self.econ.note_action();
        let SlotPair { src, dst } = pair.into();
        if src == dst {
            return false;
        }
        let Some(pet) = self.deck.take(src) else {
            return false;
        };
        let id = pet.id();
        match self.place_pet(dst, pet) {
            PlaceOutcome::Placed => {
                // Landing in an empty slot reads as a summon to the rest
                // of the line, same as a purchase.
                let others = self.deck_ids_except(id);
                let mut scope = self.scope();
                for other in others {
                    abilities::fire_hook(&mut scope, other, Hook::FriendSummoned { index: dst });
                }
                true
            }
            PlaceOutcome::Merged(reached) => {
                let merged = self
                    .deck
                    .get(dst)
                    .expect("merge keeps the slot occupied")
                    .id();
                let mut scope = self.scope();
                for level in reached {
                    abilities::run_hook_at_level(&mut scope, merged, Hook::LevelUp, level);
                }
                true
            }
            PlaceOutcome::Rejected(pet) => {
                self.deck.put(src, pet);
                false
            }
        }
    }

    /// Place a pet at `slot`, merging where the occupant allows it.
    fn place_pet(&mut self, slot: usize, pet: Pet) -> PlaceOutcome {
        match self.deck.get_mut(slot) {
            None => {
                self.deck.put(slot, pet);
                PlaceOutcome::Placed
            }
            Some(occupant) => {
                if occupant.species() == pet.species() && occupant.can_level() {
                    PlaceOutcome::Merged(occupant.merge_from(&pet))
                } else {
                    PlaceOutcome::Rejected(pet)
                }
            }
        }
    }

    fn deck_ids_except(&self, id: crate::pets::PetId) -> Vec<crate::pets::PetId> {
        self.deck
            .iter()
            .filter(|&(_, p)| p.id() != id)
            .map(|(_, p)| p.id())
            .collect()
    }

    /// Roll into the next turn: new gold, a grown shop, free stock, and
    /// turn-start abilities.
    pub(crate) fn new_turn(&mut self) {
        self.econ.next_turn();
        self.shop.set_turn(self.econ.turn());
        self.shop.roll(&mut self.rng);
        self.econ.note_action();

        let occupants: Vec<_> = self.deck.iter().map(|(_, p)| p.id()).collect();
        let mut scope = self.scope();
        for id in occupants {
            abilities::fire_hook(&mut scope, id, Hook::TurnStart);
        }
    }

}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "turn {} | gold {} | lives {} | trophies {}",
            self.econ.turn(),
            self.econ.gold(),
            self.econ.lives(),
            self.econ.trophies()
        )?;
        writeln!(f, "deck  {}", self.deck)?;
        write!(f, "shop  {}", self.shop)
    }
}

/// Test and scenario setup for [`Game`] with pets pre-placed on the deck.
///
/// Placement bypasses the shop and fires no hooks.
#[derive(Debug)]
pub struct GameBuilder {
    seed: u64,
    catalog: Option<ShopCatalog>,
    placements: Vec<Placement>,
    gold: Option<u32>,
}

#[derive(Debug)]
struct Placement {
    slot: usize,
    species: Species,
    stats: Option<(i32, i32)>,
    level: u8,
    effect: Option<crate::core::StatusEffect>,
}

impl GameBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            seed: 0,
            catalog: None,
            placements: Vec::new(),
            gold: None,
        }
    }

    #[must_use]
    pub fn seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    #[must_use]
    pub fn catalog(mut self, catalog: ShopCatalog) -> Self {
        self.catalog = Some(catalog);
        self
    }

    #[must_use]
    pub fn pet(self, slot: usize, species: Species) -> Self {
        self.push(slot, species, None, 1, None)
    }

    #[must_use]
    pub fn pet_with(self, slot: usize, species: Species, attack: i32, health: i32) -> Self {
        self.push(slot, species, Some((attack, health)), 1, None)
    }

    #[must_use]
    pub fn pet_at_level(self, slot: usize, species: Species, level: u8) -> Self {
        self.push(slot, species, None, level, None)
    }

    /// Give the most recently added pet a status effect.
    ///
    /// # Panics
    ///
    /// Panics if no pet was added yet.
    #[must_use]
    pub fn effect(mut self, effect: crate::core::StatusEffect) -> Self {
        self.placements
            .last_mut()
            .expect("effect() needs a preceding pet")
            .effect = Some(effect);
        self
    }

    #[must_use]
    pub fn gold(mut self, gold: u32) -> Self {
        self.gold = Some(gold);
        self
    }

    fn push(
        mut self,
        slot: usize,
        species: Species,
        stats: Option<(i32, i32)>,
        level: u8,
        effect: Option<crate::core::StatusEffect>,
    ) -> Self {
        self.placements.push(Placement {
            slot,
            species,
            stats,
            level,
            effect,
        });
        self
    }

    #[must_use]
    pub fn build(self) -> Game {
        let catalog = self.catalog.unwrap_or_else(ShopCatalog::standard);
        let mut game = Game::with_catalog(self.seed, catalog);
        for placement in self.placements {
            let id = game.ids.next_id();
            let mut pet = match placement.stats {
                Some((attack, health)) => {
                    Pet::with_stats(id, placement.species, attack, health)
                }
                None => Pet::new(id, placement.species),
            };
            if placement.level > 1 {
                pet = pet.at_level(placement.level);
            }
            if placement.effect.is_some() {
                pet.set_effect(placement.effect);
            }
            game.deck.put(placement.slot, pet);
        }
        if let Some(gold) = self.gold {
            game.econ.gold = gold;
        }
        game
    }
}

impl Default for GameBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_game_state() {
        let game = Game::new(1);
        let econ = game.economy();
        assert_eq!(econ.turn(), 1);
        assert_eq!(econ.gold(), GOLD_PER_TURN);
        assert_eq!(econ.lives(), STARTING_LIVES);
        assert_eq!(econ.trophies(), 0);
        // The opening free roll counts as an action
        assert_eq!(econ.actions_taken(), 1);
        assert!(game.shop().item(0).is_some());
        assert!(game.deck().is_empty());
    }

    #[test]
    fn test_roll_costs_one_gold() {
        let mut game = Game::new(1);
        assert!(game.roll());
        assert_eq!(game.economy().gold(), GOLD_PER_TURN - 1);
    }

    #[test]
    fn test_roll_fails_when_broke() {
        let mut game = Game::builder().gold(0).build();
        assert!(!game.roll());
        assert_eq!(game.economy().gold(), 0);
    }

    #[test]
    fn test_buy_pet_places_and_debits() {
        let mut game = Game::new(1);
        assert!(game.buy(0, 2));
        assert_eq!(game.economy().gold(), GOLD_PER_TURN - 3);
        let pet = game.deck().get(2).unwrap();
        // Bought pets resell for 1
        assert_eq!(pet.resale_value(), 1);
        assert!(game.shop().item(0).is_none());
    }

    #[test]
    fn test_buy_empty_slot_fails() {
        let mut game = Game::new(1);
        assert!(game.buy(0, 2));
        assert!(!game.buy(0, 3));
        assert_eq!(game.economy().gold(), GOLD_PER_TURN - 3);
    }

    #[test]
    fn test_buy_without_gold_fails() {
        let mut game = Game::builder().gold(2).build();
        assert!(!game.buy(0, 0));
        assert!(game.deck().is_empty());
        assert_eq!(game.economy().gold(), 2);
    }

    #[test]
    fn test_sell_credits_resale() {
        let mut game = Game::new(1);
        assert!(game.buy(0, 0));
        let gold = game.economy().gold();
        assert!(game.sell(0));
        assert_eq!(game.economy().gold(), gold + 1);
        assert!(game.deck().is_empty());
    }

    #[test]
    fn test_sell_empty_slot_fails() {
        let mut game = Game::new(1);
        assert!(!game.sell(4));
    }

    #[test]
    fn test_swap_moves_without_hooks() {
        let mut game = Game::builder().pet(0, Species::Horse).build();
        assert!(game.swap((0, 3)));
        assert!(game.deck().get(0).is_none());
        let moved = game.deck().get(3).unwrap();
        assert_eq!(moved.species(), Species::Horse);
        // No summon hook fired, so no horse self-buff shenanigans
        assert_eq!(moved.attack_buff(), 0);
    }

    #[test]
    fn test_merge_same_species() {
        let mut game = Game::builder()
            .pet(0, Species::Pig)
            .pet(2, Species::Pig)
            .build();
        assert!(game.merge((2, 0)));
        let pig = game.deck().get(0).unwrap();
        assert_eq!(pig.experience(), 1);
        assert!(game.deck().get(2).is_none());
    }

    #[test]
    fn test_merge_mismatch_restores_source() {
        let mut game = Game::builder()
            .pet(0, Species::Pig)
            .pet(2, Species::Ant)
            .build();
        assert!(!game.merge((2, 0)));
        assert_eq!(game.deck().get(2).unwrap().species(), Species::Ant);
    }

    #[test]
    fn test_merge_into_empty_slot_moves() {
        let mut game = Game::builder().pet(1, Species::Ant).build();
        assert!(game.merge((1, 4)));
        assert!(game.deck().get(1).is_none());
        assert!(game.deck().get(4).is_some());
    }

    #[test]
    fn test_merge_into_empty_slot_fires_summon_hooks() {
        let mut game = Game::builder()
            .pet(0, Species::Horse)
            .pet(2, Species::Ant)
            .build();
        assert!(game.merge((2, 4)));
        // The relocated ant counts as a summon, so the horse blesses it
        let ant = game.deck().get(4).unwrap();
        assert_eq!(ant.attack_buff(), 1);
        assert_eq!(game.deck().get(0).unwrap().attack_buff(), 0);
    }

    #[test]
    fn test_merge_rejected_at_max_level() {
        let mut game = Game::builder()
            .pet_at_level(0, Species::Pig, 3)
            .pet(1, Species::Pig)
            .build();
        assert!(!game.merge((1, 0)));
        assert!(game.deck().get(1).is_some());
    }

    #[test]
    fn test_every_move_counts_as_an_action() {
        let mut game = Game::new(1);
        let start = game.economy().actions_taken();
        let _ = game.roll();
        let _ = game.freeze(0);
        let _ = game.sell(0); // fails, still counts
        assert_eq!(game.economy().actions_taken(), start + 3);
    }

    #[test]
    fn test_finished_game_ignores_moves() {
        let mut game = Game::new(1);
        for _ in 0..STARTING_LIVES {
            game.econ.record_result(MatchResult::Lost);
        }
        assert!(game.economy().has_lost());
        assert!(!game.roll());
        assert!(!game.buy(0, 0));
        assert_eq!(game.economy().gold(), GOLD_PER_TURN);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_buy_bad_deck_slot_panics() {
        let mut game = Game::new(1);
        let _ = game.buy(0, 9);
    }

    #[test]
    fn test_economy_floors_and_caps() {
        let mut econ = Economy::new();
        assert!(!econ.try_spend(GOLD_PER_TURN + 1));
        assert!(econ.try_spend(GOLD_PER_TURN));
        assert_eq!(econ.gold(), 0);
        // No upper cap
        econ.add_gold(25);
        assert_eq!(econ.gold(), 25);
    }

    #[test]
    fn test_record_result_settles_both_counters() {
        let mut econ = Economy::new();
        econ.record_result(MatchResult::Won);
        econ.record_result(MatchResult::Draw);
        econ.record_result(MatchResult::Lost);
        assert_eq!(econ.trophies(), 1);
        assert_eq!(econ.lives(), STARTING_LIVES - 1);
        assert_eq!(econ.match_history().len(), 3);
    }
}
