//! Battle outcomes from one side's perspective.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The result of a single battle, recorded in each game's match history.
///
/// Both participants record a result: the winner records `Won`, the loser
/// `Lost`, and a stalemate records `Draw` on both sides.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MatchResult {
    Won,
    Draw,
    Lost,
}

impl MatchResult {
    /// The same result seen from the opposing side.
    #[must_use]
    pub fn flipped(&self) -> MatchResult {
        match self {
            MatchResult::Won => MatchResult::Lost,
            MatchResult::Lost => MatchResult::Won,
            MatchResult::Draw => MatchResult::Draw,
        }
    }
}

impl fmt::Display for MatchResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MatchResult::Won => "won",
            MatchResult::Draw => "draw",
            MatchResult::Lost => "lost",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flipped() {
        assert_eq!(MatchResult::Won.flipped(), MatchResult::Lost);
        assert_eq!(MatchResult::Lost.flipped(), MatchResult::Won);
        assert_eq!(MatchResult::Draw.flipped(), MatchResult::Draw);
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&MatchResult::Draw).unwrap();
        let back: MatchResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back, MatchResult::Draw);
    }
}
