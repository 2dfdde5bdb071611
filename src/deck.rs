//! Fixed five-slot pet line.
//!
//! ## Layout
//!
//! Slot 0 is the front of the line; in battle the front pets of the two
//! decks trade blows. The deck is a pure container: it moves pets around
//! but never fires ability hooks. Hook firing belongs to the layers above,
//! which is what lets the battle loop control exactly when summon and
//! faint hooks run.
//!
//! ## Insertion
//!
//! [`Deck::insert`] lands the pet at exactly the requested slot when any
//! slot is free, shifting neighbors out of the way: occupants behind the
//! slot slide back to the first gap, or if there is no room behind,
//! occupants ahead slide forward into the last gap before the slot. A full
//! deck rejects the pet.
//!
//! ## Battle snapshots
//!
//! [`Deck::prep_for_battle`] clones the line into a battle copy whose pets
//! are flagged as in battle, and latches the persistent deck until
//! [`Deck::battle_cleanup`] releases it. Preparing twice, or cleaning up
//! without preparing, is a caller bug and panics.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::pets::{Pet, PetId};

/// Number of slots in a deck.
pub const DECK_SLOTS: usize = 5;

/// A five-slot pet line.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct Deck {
    slots: [Option<Pet>; DECK_SLOTS],
    battle_prepped: bool,
}

impl Deck {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, slot: usize) -> Option<&Pet> {
        self.slots[slot].as_ref()
    }

    #[must_use]
    pub fn get_mut(&mut self, slot: usize) -> Option<&mut Pet> {
        self.slots[slot].as_mut()
    }

    /// Place a pet into an empty slot.
    ///
    /// # Panics
    ///
    /// Panics if the slot is occupied; callers resolve merges before
    /// placing.
    pub fn put(&mut self, slot: usize, pet: Pet) {
        assert!(
            self.slots[slot].is_none(),
            "slot {slot} is occupied; take or merge first"
        );
        self.slots[slot] = Some(pet);
    }

    pub fn take(&mut self, slot: usize) -> Option<Pet> {
        self.slots[slot].take()
    }

    /// Slot holding the pet with this id, if it is still on the deck.
    #[must_use]
    pub fn position_of(&self, id: PetId) -> Option<usize> {
        self.slots
            .iter()
            .position(|s| s.as_ref().is_some_and(|p| p.id() == id))
    }

    /// First occupied slot, the pet that fights next.
    #[must_use]
    pub fn front(&self) -> Option<usize> {
        self.slots.iter().position(Option::is_some)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }

    #[must_use]
    pub fn is_full(&self) -> bool {
        self.slots.iter().all(Option::is_some)
    }

    #[must_use]
    pub fn count(&self) -> usize {
        self.slots.iter().filter(|s| s.is_some()).count()
    }

    /// Occupied slots front to back.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &Pet)> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|p| (i, p)))
    }

    #[must_use]
    pub fn occupied_slots(&self) -> Vec<usize> {
        self.slots
            .iter()
            .enumerate()
            .filter_map(|(i, s)| s.as_ref().map(|_| i))
            .collect()
    }

    /// Place into the last empty slot.
    ///
    /// Returns the slot used, or gives the pet back when the deck is full.
    pub fn append(&mut self, pet: Pet) -> Result<usize, Pet> {
        match self.slots.iter().rposition(Option::is_none) {
            Some(slot) => {
                self.slots[slot] = Some(pet);
                Ok(slot)
            }
            None => Err(pet),
        }
    }

    /// Insert at exactly `slot`, shifting neighbors into gaps.
    ///
    /// Prefers shifting occupants backward into the first gap at or behind
    /// the slot; falls back to shifting occupants forward into the last
    /// gap ahead of it. Returns the slot on success, or gives the pet back
    /// when the deck is full.
    ///
    /// # Panics
    ///
    /// Panics if `slot` is out of range.
    pub fn insert(&mut self, slot: usize, pet: Pet) -> Result<usize, Pet> {
        assert!(slot < DECK_SLOTS, "slot {slot} out of range");
        if let Some(gap) = (slot..DECK_SLOTS).find(|&i| self.slots[i].is_none()) {
            self.slots[slot..=gap].rotate_right(1);
        } else if let Some(gap) = (0..=slot).rev().find(|&i| self.slots[i].is_none()) {
            self.slots[gap..=slot].rotate_left(1);
        } else {
            return Err(pet);
        }
        debug_assert!(self.slots[slot].is_none());
        self.slots[slot] = Some(pet);
        Ok(slot)
    }

    /// Exchange the contents of two slots; either may be empty.
    pub fn swap(&mut self, a: usize, b: usize) {
        self.slots.swap(a, b);
    }

    /// Close the gap at the front of the line.
    ///
    /// Battle rounds call this so the next fighter stands at slot 0; gaps
    /// between pets are preserved.
    pub fn shift_all_forward(&mut self) {
        while self.slots[0].is_none() && !self.is_empty() {
            self.slots.rotate_left(1);
        }
    }

    /// Clone the line into a battle copy and latch this deck.
    ///
    /// # Panics
    ///
    /// Panics if the deck is already latched for a battle.
    #[must_use]
    pub fn prep_for_battle(&mut self) -> Deck {
        assert!(
            !self.battle_prepped,
            "deck is already prepared for a battle"
        );
        self.battle_prepped = true;
        let mut copy = self.clone();
        copy.battle_prepped = false;
        for slot in copy.slots.iter_mut().flatten() {
            slot.set_in_battle(true);
        }
        copy
    }

    /// Release the battle latch.
    ///
    /// # Panics
    ///
    /// Panics if the deck was not prepared.
    pub fn battle_cleanup(&mut self) {
        assert!(
            self.battle_prepped,
            "battle_cleanup without prep_for_battle"
        );
        self.battle_prepped = false;
    }
}

impl fmt::Display for Deck {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (i, slot) in self.slots.iter().enumerate() {
            if !first {
                f.write_str(" | ")?;
            }
            first = false;
            match slot {
                Some(pet) => write!(f, "{i}: {pet}")?,
                None => write!(f, "{i}: -")?,
            }
        }
        Ok(())
    }
}
