//! Core building blocks: deterministic RNG, status effects, battle outcomes.

pub mod outcome;
pub mod rng;
pub mod status;

pub use outcome::MatchResult;
pub use rng::{GameRng, GameRngState};
pub use status::StatusEffect;
