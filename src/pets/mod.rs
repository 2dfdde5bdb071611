//! Pets: the unit type, the species roster, and ability dispatch.

pub mod abilities;
pub mod pet;
pub mod species;

pub use abilities::Hook;
pub use pet::{HealthOutcome, Pet, PetId, PetIdGen, EXP_TO_LEVEL, MAX_LEVEL, MAX_STAT};
pub use species::Species;
