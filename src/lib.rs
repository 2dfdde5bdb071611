//! A deterministic auto-battler rules engine.
//!
//! Two players each run a [`Game`]: buy pets and foods from a rolling
//! [`Shop`](shop::Shop), arrange a five-slot [`Deck`](deck::Deck), then
//! [`challenge`](Game::challenge) each other. The battle resolves
//! automatically, the result settles trophies and lives, and both games
//! roll into the next turn. Ten trophies win; ten lost lives end the run.
//!
//! ## Key properties
//!
//! - **Deterministic**: every game owns a seeded RNG
//!   ([`GameRng`](core::GameRng)); nothing touches global randomness, so
//!   identical seeds and moves replay identically.
//! - **Single-threaded**: a game is one mutable value; battles borrow the
//!   two games exclusively and need no synchronization.
//! - **Hook driven**: pet abilities react to game events through a single
//!   dispatch ([`pets::abilities`]); in battle, reactions defer to a cast
//!   queue drained in attack order.
//!
//! ## Example
//!
//! ```
//! use pet_arena::Game;
//!
//! let mut challenger = Game::new(1);
//! let mut opponent = Game::new(2);
//!
//! // Buy the first shop offer onto the front of the deck, then fight.
//! assert!(challenger.buy(0, 0));
//! let result = challenger.challenge(&mut opponent).expect("both games are live");
//! println!("challenger {result}");
//! ```
//!
//! The crate never binds a logger; bind [`log`] to any backend to see
//! battle traces.

pub mod core;
pub mod deck;
pub mod foods;
pub mod game;
pub mod pets;
pub mod shop;

pub use crate::core::{GameRng, GameRngState, MatchResult, StatusEffect};
pub use crate::deck::{Deck, DECK_SLOTS};
pub use crate::foods::FoodKind;
pub use crate::game::{Economy, Game, GameBuilder, SlotPair};
pub use crate::pets::{Hook, Pet, PetId, Species};
pub use crate::shop::{Shop, ShopCatalog, ShopItem, ShopPet};
