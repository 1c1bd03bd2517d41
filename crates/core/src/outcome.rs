use serde::{Deserialize, Serialize};
use std::fmt;

/// How the winner of a duel was decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Decision {
    /// The loser's health reached zero.
    Knockout,
    /// At least one fighter entered the duel with no health; no turns were played.
    Forfeit,
    /// The turn cap was reached; the fighter with more health left won.
    TurnLimit,
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Decision::Knockout => "knockout",
            Decision::Forfeit => "forfeit",
            Decision::TurnLimit => "turn limit",
        };
        f.write_str(s)
    }
}

/// Result of one simulated duel.
///
/// `winner` is always the name of one of the two fighters passed to
/// [`simulate`](crate::simulate()).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BattleOutcome {
    pub winner: String,
    #[serde(rename = "battle_logs")]
    pub log: Vec<String>,
    pub turns: u32,
    pub decision: Decision,
}
