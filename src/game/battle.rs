//! The battle between two games.
//!
//! ## Shape of a battle
//!
//! [`Game::challenge`] runs one complete battle and rolls both games into
//! their next turn:
//!
//! 1. Turn-end casts are staged for both persistent decks and drained
//!    as one merged batch in cast order.
//! 2. Each deck is snapshotted into a battle copy; the persistent decks
//!    stay latched until cleanup.
//! 3. Battle-start abilities fire on the copies and the queues drain.
//! 4. Rounds run until a side is empty: both lines close ranks, the two
//!    front pets trade blows simultaneously, and deferred casts drain at
//!    fixed points between the phases.
//! 5. The result lands in both match histories, battle-end clears buffs
//!    on the persistent decks, the latches release, and both games start
//!    a new turn.
//!
//! ## Cast ordering
//!
//! Drained casts execute in ascending attack order, re-keyed on the
//! caster's current attack when it is still standing, with the
//! challenger's casts ahead of the opponent's on ties. A batch's own
//! side effects can enqueue further casts; draining repeats until both
//! queues are quiet.
//!
//! All battle randomness draws from the challenger's RNG, so a battle is
//! a pure function of the two game states.

use crate::core::{GameRng, MatchResult, StatusEffect};
use crate::deck::Deck;
use crate::pets::abilities::{self, HookScope};
use crate::pets::{Hook, PetId, PetIdGen};

use super::{CastQueue, Game, QueuedCast};

/// Rounds after which a stalemate is called a draw.
///
/// Two zero-attack lines never kill each other; without a cutoff the
/// round loop would spin forever.
const MAX_ROUNDS: u32 = 1_000;

#[derive(Clone, Copy)]
enum Side {
    Challenger,
    Opponent,
}

/// The two battle copies, their cast queues, and the shared id source for
/// mid-battle summons.
struct Battlefield {
    challenger: Deck,
    opponent: Deck,
    challenger_queue: CastQueue,
    opponent_queue: CastQueue,
    ids: PetIdGen,
}

impl Battlefield {
    fn deck(&self, side: Side) -> &Deck {
        match side {
            Side::Challenger => &self.challenger,
            Side::Opponent => &self.opponent,
        }
    }

    fn scope<'s>(&'s mut self, side: Side, rng: &'s mut GameRng) -> HookScope<'s> {
        match side {
            Side::Challenger => HookScope {
                friends: &mut self.challenger,
                enemies: Some(&mut self.opponent),
                shop: None,
                econ: None,
                ids: &mut self.ids,
                queue: &mut self.challenger_queue,
                enemy_queue: Some(&mut self.opponent_queue),
                rng,
            },
            Side::Opponent => HookScope {
                friends: &mut self.opponent,
                enemies: Some(&mut self.challenger),
                shop: None,
                econ: None,
                ids: &mut self.ids,
                queue: &mut self.opponent_queue,
                enemy_queue: Some(&mut self.challenger_queue),
                rng,
            },
        }
    }

    fn fire_on_all(&mut self, side: Side, hook: Hook, rng: &mut GameRng) {
        let ids: Vec<PetId> = self.deck(side).iter().map(|(_, p)| p.id()).collect();
        let mut scope = self.scope(side, rng);
        for id in ids {
            abilities::fire_hook(&mut scope, id, hook);
        }
    }

    /// Execute deferred casts until both queues are quiet.
    fn drain_casts(&mut self, rng: &mut GameRng) {
        while !self.challenger_queue.is_empty() || !self.opponent_queue.is_empty() {
            let mut batch: Vec<(Side, QueuedCast, i32)> = Vec::new();
            for cast in self.challenger_queue.drain() {
                let key = cast_key(&self.challenger, &cast);
                batch.push((Side::Challenger, cast, key));
            }
            for cast in self.opponent_queue.drain() {
                let key = cast_key(&self.opponent, &cast);
                batch.push((Side::Opponent, cast, key));
            }
            // Stable sort keeps the challenger ahead on equal attack.
            batch.sort_by_key(|&(_, _, key)| key);
            for (side, cast, _) in batch {
                let mut scope = self.scope(side, rng);
                abilities::run_hook(&mut scope, cast.caster, cast.hook);
            }
        }
    }
}

/// A cast's ordering key: the caster's current attack while it stands,
/// its attack at enqueue time once it is gone.
fn cast_key(deck: &Deck, cast: &QueuedCast) -> i32 {
    deck.position_of(cast.caster)
        .and_then(|slot| deck.get(slot))
        .map(crate::pets::Pet::effective_attack)
        .unwrap_or(cast.attack_hint)
}

/// The front pet's vitals captured before the exchange.
struct Front {
    id: PetId,
    attack: i32,
    health: i32,
    effect: Option<StatusEffect>,
}

fn front_of(deck: &Deck) -> Option<Front> {
    deck.get(0).map(|pet| Front {
        id: pet.id(),
        attack: pet.effective_attack(),
        health: pet.health(),
        effect: pet.effect(),
    })
}

impl Game {
    /// Fight `opponent` and advance both games to their next turn.
    ///
    /// Returns the result from the challenger's perspective, or `None`
    /// when either game is already over (nothing happens in that case).
    pub fn challenge(&mut self, opponent: &mut Game) -> Option<MatchResult> {
        if self.finished() || opponent.finished() {
            return None;
        }
        self.econ.note_action();
        opponent.econ.note_action();

        self.stage_turn_end();
        opponent.stage_turn_end();
        drain_turn_end(self, opponent);

        let mut field = Battlefield {
            challenger: self.deck.prep_for_battle(),
            opponent: opponent.deck.prep_for_battle(),
            challenger_queue: CastQueue::new(),
            opponent_queue: CastQueue::new(),
            ids: PetIdGen::starting_at(self.ids.peek().max(opponent.ids.peek())),
        };

        let result = {
            let rng = &mut self.rng;
            log::debug!("battle: {} vs {}", field.challenger, field.opponent);

            field.fire_on_all(Side::Challenger, Hook::BattleStart, rng);
            field.fire_on_all(Side::Opponent, Hook::BattleStart, rng);
            field.drain_casts(rng);

            run_rounds(&mut field, rng)
        };
        log::debug!("battle result: {result}");

        self.econ.record_result(result);
        opponent.econ.record_result(result.flipped());

        self.fire_battle_end();
        opponent.fire_battle_end();
        self.deck.battle_cleanup();
        opponent.deck.battle_cleanup();

        self.new_turn();
        opponent.new_turn();
        Some(result)
    }

    /// Queue a turn-end cast for every occupant without running any;
    /// both games' casts drain as one merged batch.
    fn stage_turn_end(&mut self) {
        for (_, pet) in self.deck.iter() {
            self.queue.push(QueuedCast {
                caster: pet.id(),
                hook: Hook::TurnEnd,
                attack_hint: pet.effective_attack(),
            });
        }
    }

    fn fire_battle_end(&mut self) {
        let occupants: Vec<PetId> = self.deck.iter().map(|(_, p)| p.id()).collect();
        let mut scope = self.scope();
        for id in occupants {
            abilities::fire_hook(&mut scope, id, Hook::BattleEnd);
        }
    }
}

/// Drain both games' staged turn-end casts as one batch, weakest casters
/// first, the challenger ahead on ties. These run on the persistent
/// decks with full shop-phase scopes, so gold and shop effects stick.
fn drain_turn_end(challenger: &mut Game, opponent: &mut Game) {
    while !challenger.queue.is_empty() || !opponent.queue.is_empty() {
        let mut batch: Vec<(Side, QueuedCast, i32)> = Vec::new();
        for cast in challenger.queue.drain() {
            let key = cast_key(&challenger.deck, &cast);
            batch.push((Side::Challenger, cast, key));
        }
        for cast in opponent.queue.drain() {
            let key = cast_key(&opponent.deck, &cast);
            batch.push((Side::Opponent, cast, key));
        }
        batch.sort_by_key(|&(_, _, key)| key);
        for (side, cast, _) in batch {
            let game = match side {
                Side::Challenger => &mut *challenger,
                Side::Opponent => &mut *opponent,
            };
            let mut scope = game.scope();
            abilities::run_hook(&mut scope, cast.caster, cast.hook);
        }
    }
}

/// The round loop, from closed ranks to an empty side.
fn run_rounds(field: &mut Battlefield, rng: &mut GameRng) -> MatchResult {
    let mut rounds = 0;
    loop {
        field.challenger.shift_all_forward();
        field.opponent.shift_all_forward();
        match (field.challenger.is_empty(), field.opponent.is_empty()) {
            (true, true) => return MatchResult::Draw,
            (false, true) => return MatchResult::Won,
            (true, false) => return MatchResult::Lost,
            (false, false) => {}
        }
        rounds += 1;
        if rounds > MAX_ROUNDS {
            log::debug!("battle: stalemate after {MAX_ROUNDS} rounds");
            return MatchResult::Draw;
        }

        // Before-attack phase; steak, bone, and boar buffs land here.
        for side in [Side::Challenger, Side::Opponent] {
            if let Some(pet) = field.deck(side).get(0) {
                let id = pet.id();
                let mut scope = field.scope(side, rng);
                abilities::fire_hook(&mut scope, id, Hook::BeforeAttack);
            }
        }
        field.drain_casts(rng);

        // A front that fell during the drain restarts the round.
        let (Some(challenger_front), Some(opponent_front)) =
            (front_of(&field.challenger), front_of(&field.opponent))
        else {
            continue;
        };

        // Simultaneous exchange at the captured attack values.
        {
            let mut scope = field.scope(Side::Challenger, rng);
            abilities::deal_damage(&mut scope, 0, opponent_front.attack);
        }
        {
            let mut scope = field.scope(Side::Opponent, rng);
            abilities::deal_damage(&mut scope, 0, challenger_front.attack);
        }

        // Chili splashes past the front into the second slot.
        if challenger_front.effect == Some(StatusEffect::Splash) {
            let mut scope = field.scope(Side::Opponent, rng);
            abilities::deal_damage(&mut scope, 1, 5);
        }
        if opponent_front.effect == Some(StatusEffect::Splash) {
            let mut scope = field.scope(Side::Challenger, rng);
            abilities::deal_damage(&mut scope, 1, 5);
        }

        // Poison finishes any defender the attack wounded.
        resolve_poison(field, Side::Opponent, &challenger_front, &opponent_front, rng);
        resolve_poison(field, Side::Challenger, &opponent_front, &challenger_front, rng);
        field.drain_casts(rng);

        // Knock-outs: a front slot left empty rallies the whole other line.
        if field.opponent.get(0).is_none() {
            field.fire_on_all(Side::Challenger, Hook::KnockOut, rng);
        }
        if field.challenger.get(0).is_none() {
            field.fire_on_all(Side::Opponent, Hook::KnockOut, rng);
        }
        field.drain_casts(rng);

        // Both lines hear that their front attacked.
        field.fire_on_all(Side::Challenger, Hook::FriendAttack { index: 0 }, rng);
        field.fire_on_all(Side::Opponent, Hook::FriendAttack { index: 0 }, rng);
        field.drain_casts(rng);
    }
}

/// Force-faint the defender if the attacker's poison drew blood.
fn resolve_poison(
    field: &mut Battlefield,
    defender_side: Side,
    attacker: &Front,
    defender: &Front,
    rng: &mut GameRng,
) {
    if attacker.effect != Some(StatusEffect::Poison) {
        return;
    }
    let Some(slot) = field.deck(defender_side).position_of(defender.id) else {
        return;
    };
    let wounded = field
        .deck(defender_side)
        .get(slot)
        .is_some_and(|pet| pet.health() < defender.health);
    if wounded {
        let mut scope = field.scope(defender_side, rng);
        abilities::force_faint_at(&mut scope, slot);
    }
}
